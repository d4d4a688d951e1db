//! Data model types, filter-group classification, and upstream field
//! normalization for the community site.
//!
//! This crate has no database or network dependencies. `fpcomm-db` persists
//! these types and `fpcomm-service` fills them from the upstream catalog.

pub mod filter_groups;
pub mod normalize;
pub mod types;

pub use filter_groups::{Classification, FilterGroup, TagClassifier, builtin_filter_groups};
pub use normalize::split_delimited;
pub use types::*;
