use dicom_core::{Tag, VR};
use dicom_object::mem::InMemElement;
use dicom_object::InMemDicomObject;

// Multi-frame Structure Tags
pub const SHARED_FUNCTIONAL_GROUPS_SEQUENCE: Tag = Tag(0x5200, 0x9229);
pub const PER_FRAME_FUNCTIONAL_GROUPS_SEQUENCE: Tag = Tag(0x5200, 0x9230);
pub const DIMENSION_INDEX_SEQUENCE: Tag = Tag(0x0020, 0x9222);
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
pub const SOURCE_IMAGE_EVIDENCE_SEQUENCE: Tag = Tag(0x0008, 0x9154);
pub const REFERENCED_IMAGE_EVIDENCE_SEQUENCE: Tag = Tag(0x0008, 0x9092);
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

// Core Image Tags
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const FRAME_TYPE: Tag = Tag(0x0008, 0x9007);
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);

// Series Identification Tags
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
pub const SERIES_DATE: Tag = Tag(0x0008, 0x0021);

// Device/Manufacturer Tags
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
pub const MANUFACTURER_MODEL_NAME: Tag = Tag(0x0008, 0x1090);

// Institution/Site Tags
pub const INSTITUTION_NAME: Tag = Tag(0x0008, 0x0080);

// Legacy MR Tags
pub const SCANNING_SEQUENCE: Tag = Tag(0x0018, 0x0020);
pub const SEQUENCE_VARIANT: Tag = Tag(0x0018, 0x0021);
pub const SCAN_OPTIONS: Tag = Tag(0x0018, 0x0022);
pub const ANGIO_FLAG: Tag = Tag(0x0018, 0x0025);
pub const ECHO_TIME: Tag = Tag(0x0018, 0x0081);

// Enhanced MR Tags
pub const ECHO_PULSE_SEQUENCE: Tag = Tag(0x0018, 0x9008);
pub const INVERSION_RECOVERY: Tag = Tag(0x0018, 0x9009);
pub const FLOW_COMPENSATION: Tag = Tag(0x0018, 0x9010);
pub const SPOILING: Tag = Tag(0x0018, 0x9016);
pub const STEADY_STATE_PULSE_SEQUENCE: Tag = Tag(0x0018, 0x9017);
pub const ECHO_PLANAR_PULSE_SEQUENCE: Tag = Tag(0x0018, 0x9018);
pub const MAGNETIZATION_TRANSFER: Tag = Tag(0x0018, 0x9020);
pub const SPECTRALLY_SELECTED_SUPPRESSION: Tag = Tag(0x0018, 0x9025);
pub const SPATIAL_PRESATURATION: Tag = Tag(0x0018, 0x9027);
pub const OVERSAMPLING_PHASE: Tag = Tag(0x0018, 0x9029);
pub const SEGMENTED_K_SPACE_TRAVERSAL: Tag = Tag(0x0018, 0x9033);
pub const RECTILINEAR_PHASE_ENCODE_REORDERING: Tag = Tag(0x0018, 0x9034);
pub const PARTIAL_FOURIER_DIRECTION: Tag = Tag(0x0018, 0x9036);
pub const EFFECTIVE_ECHO_TIME: Tag = Tag(0x0018, 0x9082);

/// Tags never carried into the shared base of a materialized frame
pub const EXCLUDED_TAGS: [Tag; 7] = [
    SHARED_FUNCTIONAL_GROUPS_SEQUENCE,
    PER_FRAME_FUNCTIONAL_GROUPS_SEQUENCE,
    DIMENSION_INDEX_SEQUENCE,
    NUMBER_OF_FRAMES,
    SOURCE_IMAGE_EVIDENCE_SEQUENCE,
    REFERENCED_IMAGE_EVIDENCE_SEQUENCE,
    PIXEL_DATA,
];

/// Strips value padding (spaces and trailing nulls)
fn trim_value(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\0')
}

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| trim_value(&s).to_string())
}

/// Helper to get integer value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to i32
pub fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<i32>().ok())
}

/// Helper to get multi-string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to Vec<String>
pub fn get_multi_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<Vec<String>> {
    dcm.element(tag).ok().and_then(|elem| {
        if let Ok(strs) = elem.to_multi_str() {
            Some(strs.iter().map(|s| trim_value(s).to_string()).collect())
        } else {
            // Fallback: try to get as single string and split by backslash
            elem.to_str()
                .ok()
                .map(|s| s.split('\\').map(|part| trim_value(part).to_string()).collect())
        }
    })
}

/// Value representations whose payload is one opaque value, however many
/// bytes or words it stores
const BINARY_VRS: [VR; 7] = [VR::OB, VR::OW, VR::OF, VR::OD, VR::OL, VR::OV, VR::UN];

/// Declared value multiplicity of an element
///
/// Binary elements count as a single value; everything else counts its
/// stored values.
pub fn multiplicity(elem: &InMemElement) -> u32 {
    let stored = elem.value().multiplicity();
    if BINARY_VRS.contains(&elem.vr()) {
        stored.min(1)
    } else {
        stored
    }
}

/// Returns the declared value multiplicity of a tag, if present
pub fn get_multiplicity(dcm: &InMemDicomObject, tag: Tag) -> Option<u32> {
    dcm.element(tag).ok().map(multiplicity)
}

/// Returns the individual values of a tag as strings, honoring its multiplicity
///
/// A multiplicity of 0 or 1 always yields exactly one value (the whole
/// element rendered as a string), so empty attributes still produce one entry.
/// Larger multiplicities yield one entry per stored value.
pub fn get_values(dcm: &InMemDicomObject, tag: Tag) -> Option<Vec<String>> {
    let elem = dcm.element(tag).ok()?;
    if multiplicity(elem) <= 1 {
        let value = elem
            .to_str()
            .map(|s| trim_value(&s).to_string())
            .unwrap_or_default();
        Some(vec![value])
    } else {
        get_multi_string_value(dcm, tag)
    }
}
