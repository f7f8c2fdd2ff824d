use serde::{Deserialize, Serialize};

/// Configuration for a harvesting run
///
/// # Example
///
/// ```
/// use csharvest_core::HarvestConfig;
///
/// let config = HarvestConfig::default()
///     .reconstruct_legacy(false)
///     .with_extensions(vec!["dcm".to_string(), "ima".to_string()]);
///
/// assert!(!config.reconstruct_legacy);
/// assert!(config.accepts_extension("IMA"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Rebuild legacy single-frame attributes on frames of `legacy_modality`
    pub reconstruct_legacy: bool,

    /// Modality whose frames get legacy-attribute reconstruction
    pub legacy_modality: String,

    /// File extensions (case-insensitive, without dot) a session contributes
    pub extensions: Vec<String>,

    /// Sort directory entries by name before processing
    pub sorted_traversal: bool,

    /// Read the pixel data element instead of stopping before it
    pub read_pixel_data: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            reconstruct_legacy: true,
            legacy_modality: "MR".to_string(),
            extensions: vec!["dcm".to_string()],
            sorted_traversal: true,
            read_pixel_data: false,
        }
    }
}

impl HarvestConfig {
    /// Builder: Enable or disable legacy-attribute reconstruction
    pub fn reconstruct_legacy(mut self, enabled: bool) -> Self {
        self.reconstruct_legacy = enabled;
        self
    }

    /// Builder: Set the modality that gets legacy-attribute reconstruction
    pub fn with_legacy_modality(mut self, modality: impl Into<String>) -> Self {
        self.legacy_modality = modality.into();
        self
    }

    /// Builder: Set accepted file extensions
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Builder: Sort directory entries by name
    ///
    /// # Example
    ///
    /// ```
    /// use csharvest_core::HarvestConfig;
    ///
    /// let config = HarvestConfig::default().sorted_traversal(false);
    /// assert!(!config.sorted_traversal);
    /// ```
    pub fn sorted_traversal(mut self, sorted: bool) -> Self {
        self.sorted_traversal = sorted;
        self
    }

    /// Builder: Read pixel data
    pub fn read_pixel_data(mut self, read: bool) -> Self {
        self.read_pixel_data = read;
        self
    }

    /// Checks whether a file extension is accepted by this configuration
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Checks whether a modality gets legacy-attribute reconstruction
    pub fn reconstructs(&self, modality: Option<&str>) -> bool {
        self.reconstruct_legacy && modality == Some(self.legacy_modality.as_str())
    }
}
