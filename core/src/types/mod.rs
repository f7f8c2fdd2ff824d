//! Core type definitions for multi-frame harvesting
//!
//! This module provides the fundamental types used throughout the csharvest library:
//! - [`FrameType`]: Decomposed DICOM FrameType field
//! - [`IdentityScope`]: Subject/session/series/image ordinal scopes
//! - [`HarvestConfig`]: Configuration for a harvesting run
//! - [`TagSelector`]: A tag of interest resolved from the tag catalog

mod config;
mod frame_type;
mod scope;
mod tag_selector;

pub use config::HarvestConfig;
pub use frame_type::FrameType;
pub use scope::IdentityScope;
pub use tag_selector::TagSelector;
