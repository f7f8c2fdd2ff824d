use dicom_object::InMemDicomObject;
use log::{debug, warn};

use super::flatten::{flatten, overlay};
use super::tags::{
    get_int_value, EXCLUDED_TAGS, NUMBER_OF_FRAMES, PER_FRAME_FUNCTIONAL_GROUPS_SEQUENCE,
    SHARED_FUNCTIONAL_GROUPS_SEQUENCE,
};

/// Flat attribute set of one frame of a (possibly multi-frame) object
///
/// `index` is the position of the frame in physical frame order. Objects
/// without functional groups produce a single frame with index 0.
#[derive(Debug, Clone)]
pub struct FrameAttributes {
    pub index: usize,
    pub attributes: InMemDicomObject,
}

/// Checks whether an object encodes its frames in functional groups
pub fn has_functional_groups(dcm: &InMemDicomObject) -> bool {
    dcm.element(SHARED_FUNCTIONAL_GROUPS_SEQUENCE).is_ok()
}

/// Builds the base set shared by all frames: top-level attributes minus the excluded tags
pub fn shared_base(dcm: &InMemDicomObject) -> InMemDicomObject {
    InMemDicomObject::from_element_iter(
        dcm.iter()
            .filter(|elem| !EXCLUDED_TAGS.contains(&elem.header().tag))
            .cloned(),
    )
}

/// Materializes one flat attribute set per frame of a multi-frame object
///
/// # Algorithm
///
/// 1. Base = top-level attributes minus [`EXCLUDED_TAGS`]
/// 2. Overlay the flattened first item of SharedFunctionalGroupsSequence
/// 3. For each item of PerFrameFunctionalGroupsSequence, in order, overlay its
///    flattened content onto a fresh copy of the shared-overlaid base
///
/// An object with no per-frame groups yields no frames.
pub fn materialize_frames(dcm: &InMemDicomObject) -> Vec<FrameAttributes> {
    let shared = dcm
        .element(SHARED_FUNCTIONAL_GROUPS_SEQUENCE)
        .ok()
        .and_then(|seq| seq.items())
        .and_then(|items| items.first())
        .map(flatten)
        .unwrap_or_else(InMemDicomObject::new_empty);
    let base = overlay(&shared_base(dcm), &shared);

    let per_frame = dcm
        .element(PER_FRAME_FUNCTIONAL_GROUPS_SEQUENCE)
        .ok()
        .and_then(|seq| seq.items())
        .unwrap_or(&[]);

    if let Some(declared) = get_int_value(dcm, NUMBER_OF_FRAMES) {
        if usize::try_from(declared).ok() != Some(per_frame.len()) {
            warn!(
                "NumberOfFrames is {} but {} per-frame functional groups are present",
                declared,
                per_frame.len()
            );
        }
    }
    debug!("Materializing {} frames", per_frame.len());

    per_frame
        .iter()
        .enumerate()
        .map(|(index, group)| FrameAttributes {
            index,
            attributes: overlay(&base, &flatten(group)),
        })
        .collect()
}
