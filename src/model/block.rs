//! Classified content blocks produced by the structural passes.

use serde::{Deserialize, Serialize};

use super::{BBox, Region, RegionClass};

/// A typed content block: the unit every classify and scrub stage consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Layout class (possibly rewritten by a stage)
    pub class: RegionClass,
    /// Text content or asset reference
    pub content: String,
    /// Bounding box in page-pixel space
    #[serde(flatten)]
    pub bbox: BBox,
    /// 1-indexed page number the block came from
    #[serde(default)]
    pub page: u32,
}

impl Block {
    /// Create a new block.
    pub fn new(class: RegionClass, content: impl Into<String>, bbox: BBox, page: u32) -> Self {
        Self {
            class,
            content: content.into(),
            bbox,
            page,
        }
    }

    /// Same geometry and page, different class and content.
    pub fn derive(&self, class: RegionClass, content: impl Into<String>) -> Self {
        Self {
            class,
            content: content.into(),
            bbox: self.bbox,
            page: self.page,
        }
    }

    /// Same block with a different class.
    pub fn with_class(mut self, class: RegionClass) -> Self {
        self.class = class;
        self
    }

    /// Check if the content is empty after trimming.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

impl From<Region> for Block {
    fn from(region: Region) -> Self {
        Self {
            class: region.class,
            content: region.content,
            bbox: region.bbox,
            page: region.page,
        }
    }
}
