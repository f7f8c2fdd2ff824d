use thiserror::Error;

/// Result type for csharvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Error types for csharvest operations
#[derive(Error, Debug)]
pub enum HarvestError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Required tag not found in a DICOM object
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    /// Invalid tag value
    #[error("Invalid tag value: {0}")]
    InvalidValue(String),

    /// Generic extraction error
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Catalog table building or writing error
    #[error("Table error: {0}")]
    TableError(#[from] polars::error::PolarsError),
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for HarvestError {
    fn from(e: dicom_object::ReadError) -> Self {
        HarvestError::DicomError(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for HarvestError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        HarvestError::InvalidValue(format!("{}", e))
    }
}
