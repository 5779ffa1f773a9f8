//! Data model for detector output and classified blocks.
//!
//! Regions come from the layout detector, one page at a time. After merging
//! and ordering they become [`Block`]s, which every classify and scrub stage
//! rewrites. No type here outlives one document run.

mod block;
mod document;
mod region;

pub use block::Block;
pub use document::{PageLayout, PipelineStats, ProcessedDocument};
pub use region::{BBox, Detection, Region, RegionClass};
