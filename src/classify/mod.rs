//! Structural classification of a page's ordered block stream.
//!
//! Four rewrite passes run in a fixed order, each consuming the previous
//! pass's full output:
//!
//! 1. keyword header promotion
//! 2. noise filtering
//! 3. paragraph stitching
//! 4. list detection

mod headers;
mod lists;
mod noise;
mod stitch;

use std::collections::HashSet;

use regex::Regex;

use crate::config::ClassifyConfig;
use crate::error::Result;
use crate::model::Block;

/// Rule-based block classifier.
pub struct StructuralClassifier<'a> {
    config: &'a ClassifyConfig,
    vocabulary: HashSet<&'a str>,
    list_marker: Regex,
}

impl<'a> StructuralClassifier<'a> {
    /// Create a classifier, compiling the configured list-marker pattern.
    pub fn new(config: &'a ClassifyConfig) -> Result<Self> {
        Ok(Self {
            config,
            vocabulary: config.section_headers.iter().map(String::as_str).collect(),
            list_marker: Regex::new(&config.list_marker_pattern)?,
        })
    }

    /// Run all four passes over one page's blocks (already in reading order).
    pub fn classify(&self, blocks: Vec<Block>) -> Vec<Block> {
        let before = blocks.len();
        let blocks = self.promote_headers(blocks);
        let blocks = self.filter_noise(blocks);
        let blocks = self.stitch_paragraphs(blocks);
        let blocks = self.detect_lists(blocks);
        log::debug!("Classified {} blocks into {}", before, blocks.len());
        blocks
    }

    /// Pass 1: split out lines matching the section vocabulary.
    pub fn promote_headers(&self, blocks: Vec<Block>) -> Vec<Block> {
        headers::promote_keyword_headers(blocks, &self.vocabulary)
    }

    /// Pass 2: drop furniture and junk lines.
    pub fn filter_noise(&self, blocks: Vec<Block>) -> Vec<Block> {
        noise::filter_noise(blocks, &self.config.noise)
    }

    /// Pass 3: merge paragraphs split across boxes.
    pub fn stitch_paragraphs(&self, blocks: Vec<Block>) -> Vec<Block> {
        stitch::stitch_paragraphs(blocks, &self.config.stitch)
    }

    /// Pass 4: promote enumerated blocks to list items.
    pub fn detect_lists(&self, blocks: Vec<Block>) -> Vec<Block> {
        lists::detect_list_items(blocks, &self.list_marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{BBox, RegionClass};

    fn block(class: RegionClass, content: &str, y0: f32, y1: f32) -> Block {
        Block::new(class, content, BBox::new(100.0, y0, 500.0, y1).unwrap(), 1)
    }

    #[test]
    fn test_passes_run_in_order() {
        let config = ClassifyConfig::default();
        let classifier = StructuralClassifier::new(&config).unwrap();
        let out = classifier.classify(vec![
            block(RegionClass::PageHeader, "medRxiv preprint", 0.0, 20.0),
            block(RegionClass::Text, "Our cohort was large.\nmethods\nWe enrolled", 50.0, 150.0),
            block(RegionClass::Text, "patients from 3 sites.", 155.0, 250.0),
            block(RegionClass::Text, "1. Consent was obtained.", 400.0, 450.0),
        ]);

        let summary: Vec<(RegionClass, &str)> =
            out.iter().map(|b| (b.class, b.content.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (RegionClass::Text, "Our cohort was large."),
                (RegionClass::SectionHeader, "methods"),
                (RegionClass::Text, "We enrolled patients from 3 sites."),
                (RegionClass::ListItem, "1. Consent was obtained."),
            ]
        );
    }

    #[test]
    fn test_reclassifying_twice_is_stable() {
        let config = ClassifyConfig::default();
        let classifier = StructuralClassifier::new(&config).unwrap();
        let once = classifier.classify(vec![
            block(RegionClass::Title, "A  Study", 0.0, 40.0),
            block(RegionClass::Text, "abstract\nWe looked at data.", 50.0, 150.0),
            block(RegionClass::Text, "[1] A. Smith. Paper. 2019.", 200.0, 230.0),
        ]);
        let twice = classifier.classify(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_bad_list_pattern_rejected() {
        let config = ClassifyConfig {
            list_marker_pattern: "(".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            StructuralClassifier::new(&config),
            Err(Error::Pattern(_))
        ));
    }
}
