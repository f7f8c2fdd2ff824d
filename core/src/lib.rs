pub mod api;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod harvest;
pub mod types;

pub use api::FrameHarvester;
pub use catalog::{CatalogTable, ValueSetDocument};
pub use cli::report::TextReport;
pub use error::{HarvestError, Result};
pub use extraction::FrameAttributes;
pub use harvest::{
    harvest_frame, CsvAppender, Harvester, HarvestRecord, HierarchicalId, IdentityAssigner,
    RunSummary,
};
pub use types::*;
