//! Page- and document-level types.

use serde::{Deserialize, Serialize};

use super::{Block, Region, RegionClass};
use crate::error::{Error, Result};

/// One page of detector output: its size plus the regions found on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in the same pixel space as the region boxes
    pub width: f32,

    /// Page height in the same pixel space as the region boxes
    pub height: f32,

    /// Regions detected on the page, in any order
    #[serde(default)]
    pub regions: Vec<Region>,
}

impl PageLayout {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            regions: Vec::new(),
        }
    }

    /// Add a region to the page.
    pub fn add_region(&mut self, region: Region) {
        self.regions.push(region);
    }

    /// Check page dimensions and every region on the page.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(Error::InvalidPage(format!(
                "page {} has non-positive size {}x{}",
                self.number, self.width, self.height
            )));
        }
        for region in &self.regions {
            region.validate()?;
        }
        Ok(())
    }

    /// Check if the page has no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Output of a full document run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    /// Surviving blocks in reading order
    pub blocks: Vec<Block>,

    /// License boilerplate cut out of blocks, one record per affected block
    pub removed_licenses: Vec<Block>,

    /// Blocks removed as title-page noise or bibliography
    pub removed_references: Vec<Block>,

    /// Per-stage counters
    pub stats: PipelineStats,
}

impl ProcessedDocument {
    /// Get the number of surviving blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Check if no blocks survived.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get plain text of the surviving blocks, assets excluded.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter(|b| !b.class.is_asset())
            .map(|b| b.content.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Count surviving blocks of a class.
    pub fn count_class(&self, class: RegionClass) -> usize {
        self.blocks.iter().filter(|b| b.class == class).count()
    }
}

/// Statistics collected while processing a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Pages processed
    pub page_count: u32,

    /// Regions received from the detector
    pub regions_in: u32,

    /// Regions dropped for falling below the confidence floor
    pub low_confidence: u32,

    /// Regions absorbed into another region by the merger
    pub regions_merged: u32,

    /// Blocks leaving the structural classifier
    pub blocks_classified: u32,

    /// Blocks touched by the license filter
    pub license_hits: u32,

    /// Blocks removed by the reference filter
    pub references_removed: u32,

    /// Blocks in the final output
    pub blocks_out: u32,
}

impl PipelineStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &PipelineStats) {
        self.page_count += other.page_count;
        self.regions_in += other.regions_in;
        self.low_confidence += other.low_confidence;
        self.regions_merged += other.regions_merged;
        self.blocks_classified += other.blocks_classified;
        self.license_hits += other.license_hits;
        self.references_removed += other.references_removed;
        self.blocks_out += other.blocks_out;
    }
}
