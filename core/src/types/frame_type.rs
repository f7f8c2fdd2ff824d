use crate::error::{HarvestError, Result};
use std::fmt;

/// DICOM FrameType field decomposed into the components reconstruction reads
///
/// - `pixels`: First element, pixel data characteristics (e.g., "ORIGINAL", "DERIVED")
/// - `exam`: Second element (e.g., "PRIMARY")
/// - `flavor`: Third element, the image flavor (e.g., "ANGIO", "CARDIAC", "CARD_RESP_GATED")
///
/// Further elements are not used and are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameType {
    pub pixels: String,
    pub exam: String,
    pub flavor: Option<String>,
}

impl FrameType {
    /// Builds a FrameType from the raw multi-valued attribute
    pub fn from_values(values: &[String]) -> Self {
        Self {
            pixels: values.first().cloned().unwrap_or_default(),
            exam: values.get(1).cloned().unwrap_or_default(),
            flavor: values.get(2).cloned(),
        }
    }

    /// Returns the image flavor (third component)
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::InvalidValue`] when the frame type has fewer
    /// than three components.
    pub fn require_flavor(&self) -> Result<&str> {
        self.flavor.as_deref().ok_or_else(|| {
            HarvestError::InvalidValue(format!("FrameType '{}' has no third component", self))
        })
    }
}

/// Format: "pixels|exam|flavor", with an empty flavor shown as ''
impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.pixels, self.exam)?;
        match self.flavor.as_deref() {
            Some("") => write!(f, "|''"),
            Some(flavor) => write!(f, "|{}", flavor),
            None => Ok(()),
        }
    }
}
