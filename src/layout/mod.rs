//! Page layout analysis over detector output.
//!
//! This module merges duplicate detections and reconstructs the linear
//! reading order of a page from its 2-D region boxes.

pub mod geometry;
mod merge;
mod order;

pub use merge::{LayoutItem, MergeResult, RegionMerger};
pub use order::ReadingOrder;
