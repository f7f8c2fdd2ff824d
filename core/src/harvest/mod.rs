//! Per-subject harvesting of tag values
//!
//! Walks subject/session directories, turns every file into per-frame
//! attribute sets, assigns hierarchical identifiers and emits one record per
//! value of every tag of interest.

mod identity;
mod pipeline;
mod record;

pub use identity::{HierarchicalId, IdentityAssigner, OrdinalIndex};
pub use pipeline::{CsvAppender, FailedSubject, Harvester, RunSummary, SubjectHarvest};
pub use record::{harvest_frame, HarvestRecord, Provenance};
