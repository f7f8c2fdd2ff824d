pub mod flatten;
pub mod legacy;
pub mod materialize;
pub mod tags;

pub use flatten::{flatten, flatten_items, overlay};
pub use legacy::{extract_frame_type, reconstruct_legacy_attributes};
pub use materialize::{has_functional_groups, materialize_frames, shared_base, FrameAttributes};
pub use tags::*;
