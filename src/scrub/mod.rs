//! Document-level removal of license boilerplate and bibliography.

mod license;
mod reference;
mod score;

pub use license::LicenseFilter;
pub use reference::ReferenceFilter;
pub use score::{ref_score, LineSignals};

use crate::config::ScrubConfig;
use crate::error::Result;
use crate::model::Block;

/// Output of [`ContentScrubber::scrub`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrubOutput {
    /// Surviving blocks in document order
    pub blocks: Vec<Block>,
    /// License text cut from blocks
    pub removed_licenses: Vec<Block>,
    /// Front matter and bibliography blocks
    pub removed_references: Vec<Block>,
}

/// Runs the license filter, then the reference filter.
pub struct ContentScrubber<'a> {
    license: LicenseFilter<'a>,
    reference: ReferenceFilter<'a>,
}

impl<'a> ContentScrubber<'a> {
    /// Create a scrubber, compiling the configured license patterns.
    pub fn new(config: &'a ScrubConfig) -> Result<Self> {
        Ok(Self {
            license: LicenseFilter::new(&config.license)?,
            reference: ReferenceFilter::new(&config.reference),
        })
    }

    /// Scrub a whole document (all pages concatenated in reading order).
    pub fn scrub(&self, blocks: Vec<Block>) -> ScrubOutput {
        let (blocks, removed_licenses) = self.license.filter(blocks);
        let (blocks, removed_references) = self.reference.filter(blocks);
        log::debug!(
            "Scrubbed document: {} license records, {} reference blocks removed",
            removed_licenses.len(),
            removed_references.len()
        );
        ScrubOutput {
            blocks,
            removed_licenses,
            removed_references,
        }
    }
}
