use crate::error::Result;
use log::warn;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use super::document::ConceptRow;

/// A string table whose columns are the union of all row fields
///
/// Columns appear in first-seen order; cells a row does not provide are null.
#[derive(Debug, Clone, Default)]
pub struct CatalogTable {
    frame: DataFrame,
}

impl CatalogTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from flattened concept rows
    pub fn from_rows(rows: &[ConceptRow]) -> Result<Self> {
        let mut names: Vec<&str> = Vec::new();
        for row in rows {
            for (name, _) in row {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }

        let columns: Vec<Column> = names
            .iter()
            .map(|&name| {
                let values: Vec<Option<String>> = rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .find(|(key, _)| key == name)
                            .and_then(|(_, value)| value.clone())
                    })
                    .collect();
                Column::new(name.into(), values)
            })
            .collect();

        Ok(Self {
            frame: DataFrame::new(columns)?,
        })
    }

    /// Stacks tables vertically, taking the union of their columns
    pub fn concat(tables: Vec<CatalogTable>) -> Result<Self> {
        let frames: Vec<LazyFrame> = tables
            .into_iter()
            .filter(|table| table.frame.width() > 0)
            .map(|table| table.frame.lazy())
            .collect();
        if frames.is_empty() {
            return Ok(Self::new());
        }

        let frame = concat_lf_diagonal(frames, UnionArgs::default())?.collect()?;
        Ok(Self { frame })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn columns(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Cell at `row` in the column called `column`
    pub fn cell(&self, row: usize, column: &str) -> Option<String> {
        if row >= self.frame.height() {
            return None;
        }
        let series = self.frame.column(column).ok()?.as_materialized_series();
        series.str().ok()?.get(row).map(|value| value.to_string())
    }

    /// Writes the table as CSV with a header row; null cells are empty
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        if self.frame.width() == 0 {
            warn!("No columns to write, {} left empty", path.display());
            return Ok(());
        }
        let mut frame = self.frame.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)?;
        Ok(())
    }

    /// Writes the table as parquet, every column a nullable UTF-8 string
    ///
    /// A table without columns has no parquet schema; nothing is written.
    pub fn write_parquet(&self, path: &Path) -> Result<()> {
        if self.frame.width() == 0 {
            warn!("No columns to write, skipping {}", path.display());
            return Ok(());
        }
        let mut frame = self.frame.clone();
        ParquetWriter::new(File::create(path)?).finish(&mut frame)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(pairs: &[(&str, Option<&str>)]) -> ConceptRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(|s| s.to_string())))
            .collect()
    }

    fn sample() -> CatalogTable {
        CatalogTable::from_rows(&[
            row(&[("code", Some("A")), ("id", Some("vs1"))]),
            row(&[("code", Some("B")), ("display", Some("Bee")), ("id", Some("vs1"))]),
        ])
        .unwrap()
    }

    #[test]
    fn test_union_of_columns_in_first_seen_order() {
        let table = sample();
        assert_eq!(table.columns(), vec!["code", "id", "display"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "display"), None);
        assert_eq!(table.cell(1, "display").as_deref(), Some("Bee"));
        assert_eq!(table.cell(1, "missing"), None);
    }

    #[test]
    fn test_concat_merges_columns() {
        let other = CatalogTable::from_rows(&[row(&[("system", Some("s")), ("code", Some("C"))])])
            .unwrap();
        let table = CatalogTable::concat(vec![sample(), CatalogTable::new(), other]).unwrap();

        assert_eq!(table.columns(), vec!["code", "id", "display", "system"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.cell(2, "code").as_deref(), Some("C"));
        assert_eq!(table.cell(2, "system").as_deref(), Some("s"));
        assert_eq!(table.cell(2, "id"), None);
        assert_eq!(table.cell(0, "system"), None);
    }

    #[test]
    fn test_concat_nothing() {
        let table = CatalogTable::concat(vec![]).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_write_csv() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("table.csv");
        sample().write_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["code,id,display", "A,vs1,", "B,vs1,Bee"]);
    }

    #[test]
    fn test_write_parquet() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("table.parquet");
        sample().write_parquet(&path).unwrap();

        let frame = ParquetReader::new(File::open(&path).unwrap())
            .finish()
            .unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.column("display").unwrap().null_count(), 1);
    }

    #[test]
    fn test_write_empty_table() {
        let tmp = TempDir::new().unwrap();
        let table = CatalogTable::new();
        assert!(table.is_empty());
        table.write_csv(&tmp.path().join("empty.csv")).unwrap();
        table.write_parquet(&tmp.path().join("empty.parquet")).unwrap();
        assert!(tmp.path().join("empty.csv").exists());
        assert!(!tmp.path().join("empty.parquet").exists());
    }
}
