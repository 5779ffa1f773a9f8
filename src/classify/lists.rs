//! Detection of enumerated list items.

use regex::Regex;

use crate::model::{Block, RegionClass};

/// Reclassify text and caption blocks that open with an enumeration marker
/// (`[12] ` or `3. `) as list items. Captions that do not match are demoted
/// to plain text.
pub(crate) fn detect_list_items(blocks: Vec<Block>, marker: &Regex) -> Vec<Block> {
    let mut promoted = 0;
    let out = blocks
        .into_iter()
        .map(|mut block| match block.class {
            RegionClass::Text | RegionClass::Caption => {
                block.content = block.content.trim().to_string();
                if marker.is_match(&block.content) {
                    promoted += 1;
                    block.with_class(RegionClass::ListItem)
                } else {
                    block.with_class(RegionClass::Text)
                }
            }
            RegionClass::Title
            | RegionClass::SectionHeader
            | RegionClass::ListItem
            | RegionClass::Picture
            | RegionClass::Table
            | RegionClass::Formula
            | RegionClass::PageHeader
            | RegionClass::PageFooter
            | RegionClass::Footnote => block,
        })
        .collect();
    if promoted > 0 {
        log::debug!("Promoted {} blocks to list items", promoted);
    }
    out
}
