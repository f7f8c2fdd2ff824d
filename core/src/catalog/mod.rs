//! Terminology catalog flattening
//!
//! Turns a directory of value-set JSON documents into one flat table with a
//! row per concept, written both as CSV and as parquet.

mod document;
mod table;

pub use document::{cell_text, Compose, ConceptRow, Include, ValueSetDocument, INJECTED_FIELDS};
pub use table::CatalogTable;

use crate::error::Result;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Flattens one document file into a table
pub fn load_document(path: &Path) -> Result<CatalogTable> {
    let document = ValueSetDocument::load(path)?;
    CatalogTable::from_rows(&document.concept_rows())
}

/// JSON documents directly inside `dir`, sorted by name
pub fn document_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if path.is_file() && is_json {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Flattens every JSON document of a directory into one table
///
/// A document that cannot be read or parsed is reported and contributes no
/// rows; the remaining documents are still processed. Columns are the union
/// over all documents.
pub fn load_directory(dir: &Path) -> Result<CatalogTable> {
    let mut tables = Vec::new();
    for path in document_paths(dir)? {
        match load_document(&path) {
            Ok(table) => {
                debug!("{}: {} concepts", path.display(), table.len());
                tables.push(table);
            }
            Err(e) => warn!("An error occurred processing {}: {}", path.display(), e),
        }
    }
    CatalogTable::concat(tables)
}
