use crate::error::{HarvestError, Result};
use dicom_core::dictionary::DataDictionary;
use dicom_core::Tag;
use dicom_dictionary_std::StandardDataDictionary;
use regex::Regex;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

/// A tag of interest, resolved from its textual catalog form
///
/// The text as written is preserved because it is what appears in the `tag`
/// column of harvested records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSelector {
    pub name: String,
    pub tag: Tag,
}

impl TagSelector {
    /// Resolves a textual tag reference
    ///
    /// Accepts:
    /// - keywords from the standard dictionary: "ScanningSequence"
    /// - "(0018,0020)", "0018,0020" or "00180020"
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::InvalidValue`] if the text names no known tag
    pub fn parse(s: &str) -> Result<Self> {
        let name = s.trim();
        let tag = parse_hex_tag(name)
            .or_else(|| StandardDataDictionary.parse_tag(name))
            .ok_or_else(|| HarvestError::InvalidValue(format!("Unknown tag '{}'", name)))?;

        Ok(Self {
            name: name.to_string(),
            tag,
        })
    }

    /// Loads the ordered list of tags of interest from a CSV with a `tag` column
    pub fn load_csv(path: &Path) -> Result<Vec<Self>> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Reads the ordered list of tags of interest from CSV content
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<Self>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let column = reader
            .headers()?
            .iter()
            .position(|h| h.trim() == "tag")
            .ok_or_else(|| HarvestError::InvalidValue("CSV has no 'tag' column".to_string()))?;

        let mut selectors = Vec::new();
        for row in reader.records() {
            let row = row?;
            match row.get(column).map(str::trim) {
                Some(value) if !value.is_empty() => selectors.push(Self::parse(value)?),
                _ => continue,
            }
        }
        Ok(selectors)
    }
}

impl fmt::Display for TagSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.tag)
    }
}

fn parse_hex_tag(s: &str) -> Option<Tag> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"^\(?([0-9A-Fa-f]{4}),?([0-9A-Fa-f]{4})\)?$").expect("Failed to compile regex")
    });

    let caps = re.captures(s)?;
    let group = u16::from_str_radix(&caps[1], 16).ok()?;
    let element = u16::from_str_radix(&caps[2], 16).ok()?;
    Some(Tag(group, element))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ScanningSequence", Tag(0x0018, 0x0020))]
    #[case("(0018,0021)", Tag(0x0018, 0x0021))]
    #[case("0018,0022", Tag(0x0018, 0x0022))]
    #[case("00180025", Tag(0x0018, 0x0025))]
    #[case("(7fe0,0010)", Tag(0x7FE0, 0x0010))]
    fn test_parse(#[case] input: &str, #[case] expected: Tag) {
        let selector = TagSelector::parse(input).unwrap();
        assert_eq!(selector.tag, expected);
        assert_eq!(selector.name, input);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(TagSelector::parse("NotARealKeyword").is_err());
        assert!(TagSelector::parse("").is_err());
    }

    #[test]
    fn test_from_csv_reader_keeps_order() {
        let content = "name,tag\nScan Options,ScanOptions\nSequence Variant,SequenceVariant\n,\nModality,(0008,0060)\n";
        let selectors = TagSelector::from_csv_reader(content.as_bytes()).unwrap();
        let names: Vec<_> = selectors.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ScanOptions", "SequenceVariant", "(0008,0060)"]);
        assert_eq!(selectors[2].tag, Tag(0x0008, 0x0060));
    }

    #[test]
    fn test_from_csv_reader_missing_column() {
        let content = "keyword\nScanOptions\n";
        assert!(matches!(
            TagSelector::from_csv_reader(content.as_bytes()),
            Err(HarvestError::InvalidValue(_))
        ));
    }
}
