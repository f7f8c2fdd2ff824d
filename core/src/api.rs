use crate::error::Result;
use crate::extraction::tags::{get_string_value, MODALITY, PIXEL_DATA};
use crate::extraction::{
    has_functional_groups, materialize_frames, reconstruct_legacy_attributes, FrameAttributes,
};
use crate::types::HarvestConfig;
use dicom_object::{DefaultDicomObject, InMemDicomObject, OpenFileOptions};
use log::debug;
use std::path::Path;

/// Main entry point turning one DICOM object into per-frame attribute sets
///
/// Multi-frame objects with functional groups are materialized into one flat
/// attribute set per frame, and materialized frames of the configured legacy
/// modality get their legacy attributes reconstructed. Other objects yield
/// themselves, untouched, as a single frame.
///
/// # Example
///
/// ```
/// use csharvest_core::{FrameHarvester, HarvestConfig};
/// use dicom_object::InMemDicomObject;
/// use dicom_core::value::DataSetSequence;
/// use dicom_core::{DataElement, PrimitiveValue, VR, Tag};
///
/// let frame_group = InMemDicomObject::from_element_iter([DataElement::new(
///     Tag(0x0018, 0x9008), // EchoPulseSequence
///     VR::CS,
///     PrimitiveValue::from("GRADIENT"),
/// )]);
///
/// let mut dcm = InMemDicomObject::new_empty();
/// dcm.put(DataElement::new(
///     Tag(0x0008, 0x0060), // Modality
///     VR::CS,
///     PrimitiveValue::from("MR"),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x0008, 0x9007), // FrameType
///     VR::CS,
///     PrimitiveValue::Strs(vec!["ORIGINAL".to_string(), "PRIMARY".to_string(), "M".to_string()].into()),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x5200, 0x9229), // SharedFunctionalGroupsSequence
///     VR::SQ,
///     DataSetSequence::from(vec![InMemDicomObject::new_empty()]),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x5200, 0x9230), // PerFrameFunctionalGroupsSequence
///     VR::SQ,
///     DataSetSequence::from(vec![frame_group]),
/// ));
///
/// let frames = FrameHarvester::frames_from_dataset(&dcm, &HarvestConfig::default()).unwrap();
/// assert_eq!(frames.len(), 1);
///
/// // ScanningSequence rebuilt from EchoPulseSequence
/// let scanning = frames[0].attributes.element(Tag(0x0018, 0x0020)).unwrap();
/// assert_eq!(scanning.to_str().unwrap(), "GR");
/// ```
pub struct FrameHarvester;

impl FrameHarvester {
    /// Reads a DICOM file, stopping before the pixel data unless configured otherwise
    pub fn read_file(path: &Path, config: &HarvestConfig) -> Result<DefaultDicomObject> {
        let options = OpenFileOptions::new();
        let obj = if config.read_pixel_data {
            options.open_file(path)?
        } else {
            options.read_until(PIXEL_DATA).open_file(path)?
        };
        Ok(obj)
    }

    /// Reads a DICOM file and returns its frames
    pub fn frames_from_file(path: &Path, config: &HarvestConfig) -> Result<Vec<FrameAttributes>> {
        let obj = Self::read_file(path, config)?;
        let frames = Self::frames(&obj, config)?;
        debug!("{}: {} frames", path.display(), frames.len());
        Ok(frames)
    }

    /// Returns the frames of an opened file object
    pub fn frames(obj: &DefaultDicomObject, config: &HarvestConfig) -> Result<Vec<FrameAttributes>> {
        let dataset: &InMemDicomObject = obj;
        Self::frames_from_dataset(dataset, config)
    }

    /// Returns the frames of a data set
    ///
    /// # Errors
    ///
    /// Returns an error if a frame of the legacy modality lacks a usable
    /// FrameType.
    pub fn frames_from_dataset(
        dcm: &InMemDicomObject,
        config: &HarvestConfig,
    ) -> Result<Vec<FrameAttributes>> {
        if !has_functional_groups(dcm) {
            return Ok(vec![FrameAttributes {
                index: 0,
                attributes: dcm.clone(),
            }]);
        }

        materialize_frames(dcm)
            .into_iter()
            .map(|frame| Self::reconstruct(frame, config))
            .collect()
    }

    /// Reconstructs the legacy attributes of a frame when its modality calls for it
    pub fn reconstruct(frame: FrameAttributes, config: &HarvestConfig) -> Result<FrameAttributes> {
        let modality = get_string_value(&frame.attributes, MODALITY);
        if !config.reconstructs(modality.as_deref()) {
            return Ok(frame);
        }
        Ok(FrameAttributes {
            attributes: reconstruct_legacy_attributes(&frame.attributes)?,
            ..frame
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarvestError;
    use crate::extraction::tags::{
        ECHO_PULSE_SEQUENCE, FRAME_TYPE, PER_FRAME_FUNCTIONAL_GROUPS_SEQUENCE, SCANNING_SEQUENCE,
        SEQUENCE_VARIANT, SHARED_FUNCTIONAL_GROUPS_SEQUENCE,
    };
    use dicom_core::value::DataSetSequence;
    use dicom_core::{DataElement, PrimitiveValue, Tag, VR};

    fn cs(tag: Tag, value: &str) -> DataElement<InMemDicomObject> {
        DataElement::new(tag, VR::CS, PrimitiveValue::from(value))
    }

    fn enhanced(modality: &str, with_frame_type: bool) -> InMemDicomObject {
        let mut shared = InMemDicomObject::new_empty();
        if with_frame_type {
            shared.put(DataElement::new(
                FRAME_TYPE,
                VR::CS,
                PrimitiveValue::Strs(
                    vec!["ORIGINAL".to_string(), "PRIMARY".to_string(), "M".to_string()].into(),
                ),
            ));
        }
        InMemDicomObject::from_element_iter([
            cs(Tag(0x0008, 0x0060), modality),
            DataElement::new(
                SHARED_FUNCTIONAL_GROUPS_SEQUENCE,
                VR::SQ,
                DataSetSequence::from(vec![shared]),
            ),
            DataElement::new(
                PER_FRAME_FUNCTIONAL_GROUPS_SEQUENCE,
                VR::SQ,
                DataSetSequence::from(vec![
                    InMemDicomObject::from_element_iter([cs(ECHO_PULSE_SEQUENCE, "SPIN")]),
                    InMemDicomObject::from_element_iter([cs(ECHO_PULSE_SEQUENCE, "GRADIENT")]),
                ]),
            ),
        ])
    }

    #[test]
    fn test_mr_frames_are_reconstructed() {
        let frames =
            FrameHarvester::frames_from_dataset(&enhanced("MR", true), &HarvestConfig::default())
                .unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(
            get_string_value(&frames[0].attributes, SCANNING_SEQUENCE).as_deref(),
            Some("SE")
        );
        assert_eq!(
            get_string_value(&frames[1].attributes, SCANNING_SEQUENCE).as_deref(),
            Some("GR")
        );
        assert_eq!(
            get_string_value(&frames[1].attributes, SEQUENCE_VARIANT).as_deref(),
            Some("NONE")
        );
    }

    #[test]
    fn test_other_modalities_pass_through() {
        let frames =
            FrameHarvester::frames_from_dataset(&enhanced("CT", false), &HarvestConfig::default())
                .unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].attributes.element(SCANNING_SEQUENCE).is_err());
    }

    #[test]
    fn test_reconstruction_can_be_disabled() {
        let config = HarvestConfig::default().reconstruct_legacy(false);
        let frames = FrameHarvester::frames_from_dataset(&enhanced("MR", false), &config).unwrap();
        assert!(frames[0].attributes.element(SEQUENCE_VARIANT).is_err());
    }

    #[test]
    fn test_mr_without_frame_type_fails() {
        let result =
            FrameHarvester::frames_from_dataset(&enhanced("MR", false), &HarvestConfig::default());
        assert!(matches!(result, Err(HarvestError::TagNotFound(_))));
    }

    #[test]
    fn test_single_frame_object_is_one_frame() {
        let dcm = InMemDicomObject::from_element_iter([
            cs(Tag(0x0008, 0x0060), "MR"),
            cs(SCANNING_SEQUENCE, "SE"),
        ]);
        let frames = FrameHarvester::frames_from_dataset(&dcm, &HarvestConfig::default()).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].index, 0);
        // Single-frame objects are not reconstructed, even for MR
        assert!(frames[0].attributes.element(SEQUENCE_VARIANT).is_err());
    }
}
