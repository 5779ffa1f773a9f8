//! # docsift
//!
//! Layout post-processing for scientific papers.
//!
//! A layout detector finds classified boxes (text, title, section header,
//! list item, caption, picture, table, formula, page furniture) on each
//! rendered page. This library turns that raw output into a clean, ordered
//! block stream ready for Markdown: it merges duplicate detections,
//! reconstructs multi-column reading order, re-classifies blocks with
//! document heuristics, and scrubs license boilerplate and bibliographies.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docsift::{process_file, render};
//!
//! fn main() -> docsift::Result<()> {
//!     // One region record per line, as produced by the detector stage
//!     let doc = process_file("paper.jsonl")?;
//!
//!     println!("{}", render::to_markdown(&doc.blocks));
//!     eprintln!("{} reference blocks removed", doc.removed_references.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Region merging**: duplicate, overlapping and nested boxes collapse per class
//! - **Reading order**: full-width cuts and two-column pages
//! - **Structural classification**: section headers, noise, split paragraphs, lists
//! - **Scrubbing**: license notices and reference sections, kept for inspection
//! - **Parallel processing**: pages run on Rayon, output order is unchanged
//! - **Pluggable detection**: any backend behind [`LayoutDetector`]

pub mod classify;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod scrub;

// Re-export commonly used types
pub use classify::StructuralClassifier;
pub use config::{
    ClassifyConfig, HeuristicConfig, LicenseConfig, MergeConfig, NoiseConfig, OrderConfig,
    ReferenceConfig, ScoreWeights, ScrubConfig, StitchConfig,
};
pub use error::{Error, Result};
pub use layout::{LayoutItem, ReadingOrder, RegionMerger};
pub use model::{
    BBox, Block, Detection, PageLayout, PipelineStats, ProcessedDocument, Region, RegionClass,
};
pub use pipeline::{ContentExtractor, LayoutDetector, Pipeline, RenderedPage};
pub use render::{JsonFormat, MarkdownOptions};
pub use scrub::{ref_score, ContentScrubber, LineSignals};

use std::path::Path;

/// Default page width: US Letter rendered at 216 DPI.
pub const DEFAULT_PAGE_WIDTH: f32 = 1836.0;

/// Default page height: US Letter rendered at 216 DPI.
pub const DEFAULT_PAGE_HEIGHT: f32 = 2376.0;

/// Parse region records from JSON Lines text.
///
/// Blank lines are skipped; `conf` is accepted as an alias of `confidence`.
///
/// # Example
///
/// ```
/// let text = r#"{"class": "text", "x0": 0, "y0": 0, "x1": 10, "y1": 5, "conf": 0.9, "page": 1, "content": "hi"}"#;
/// let regions = docsift::parse_regions(text).unwrap();
/// assert_eq!(regions[0].content, "hi");
/// ```
pub fn parse_regions(text: &str) -> Result<Vec<Region>> {
    let regions: Vec<Region> = render::from_jsonl(text)?;
    for region in &regions {
        region.validate()?;
    }
    Ok(regions)
}

/// Read region records from a JSON Lines file.
pub fn read_regions<P: AsRef<Path>>(path: P) -> Result<Vec<Region>> {
    let text = std::fs::read_to_string(path)?;
    parse_regions(&text)
}

/// Process a region JSON Lines file with default heuristics and page size.
///
/// # Example
///
/// ```no_run
/// let doc = docsift::process_file("paper.jsonl").unwrap();
/// println!("{}", doc.plain_text());
/// ```
pub fn process_file<P: AsRef<Path>>(path: P) -> Result<ProcessedDocument> {
    Docsift::new().process_file(path).map(|result| result.document)
}

/// Process a region JSON Lines file and render it to Markdown.
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(Docsift::new().process_file(path)?.to_markdown())
}

/// Process a region JSON Lines file and render it to JSON.
///
/// # Example
///
/// ```no_run
/// use docsift::{to_json, JsonFormat};
///
/// let json = to_json("paper.jsonl", JsonFormat::Pretty).unwrap();
/// std::fs::write("paper.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    Docsift::new().process_file(path)?.to_json(format)
}

/// Builder for processing region files.
///
/// # Example
///
/// ```no_run
/// use docsift::{Docsift, HeuristicConfig};
///
/// let markdown = Docsift::new()
///     .with_config(HeuristicConfig::load("heuristics.json")?)
///     .with_page_size(1700.0, 2200.0)
///     .sequential()
///     .process_file("paper.jsonl")?
///     .to_markdown();
/// # Ok::<(), docsift::Error>(())
/// ```
pub struct Docsift {
    pipeline: Pipeline,
    page_width: f32,
    page_height: f32,
    markdown_options: MarkdownOptions,
}

impl Docsift {
    /// Create a new builder with default heuristics.
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::new(),
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            markdown_options: MarkdownOptions::default(),
        }
    }

    /// Use the given heuristics.
    pub fn with_config(mut self, config: HeuristicConfig) -> Self {
        self.pipeline = self.pipeline.with_config(config);
        self
    }

    /// Set the page size the region boxes refer to.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set Markdown output options.
    pub fn with_markdown_options(mut self, options: MarkdownOptions) -> Self {
        self.markdown_options = options;
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.pipeline = self.pipeline.sequential();
        self
    }

    /// Process region records already in memory.
    pub fn process_regions(&self, regions: Vec<Region>) -> Result<DocsiftResult> {
        let document = self
            .pipeline
            .process_regions(regions, self.page_width, self.page_height)?;
        Ok(DocsiftResult {
            document,
            markdown_options: self.markdown_options.clone(),
        })
    }

    /// Read and process a region JSON Lines file.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<DocsiftResult> {
        let path = path.as_ref();
        log::debug!("Reading regions from {}", path.display());
        self.process_regions(read_regions(path)?)
    }
}

impl Default for Docsift {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of processing one document.
pub struct DocsiftResult {
    /// The processed document
    pub document: ProcessedDocument,
    /// Markdown options to use
    markdown_options: MarkdownOptions,
}

impl DocsiftResult {
    /// Convert surviving blocks to Markdown.
    pub fn to_markdown(&self) -> String {
        render::MarkdownRenderer::new(self.markdown_options.clone()).render(&self.document.blocks)
    }

    /// Convert removed license records to Markdown.
    pub fn removed_licenses_markdown(&self) -> String {
        render::MarkdownRenderer::new(self.markdown_options.clone())
            .render(&self.document.removed_licenses)
    }

    /// Convert removed reference blocks to Markdown.
    pub fn removed_references_markdown(&self) -> String {
        render::MarkdownRenderer::new(self.markdown_options.clone())
            .render(&self.document.removed_references)
    }

    /// Convert the document to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Convert surviving blocks to JSON Lines.
    pub fn to_jsonl(&self) -> Result<String> {
        render::to_jsonl(&self.document.blocks)
    }

    /// Get plain text of the surviving blocks.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &ProcessedDocument {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docsift_builder() {
        let builder = Docsift::new()
            .with_page_size(1000.0, 1400.0)
            .with_markdown_options(MarkdownOptions::new().with_atx_headings(true))
            .sequential();
        assert_eq!(builder.page_width, 1000.0);
        assert_eq!(builder.page_height, 1400.0);
        assert!(builder.markdown_options.atx_headings);
        assert!(!builder.pipeline.is_parallel());
    }

    #[test]
    fn test_docsift_builder_default() {
        let builder = Docsift::default();
        assert_eq!(builder.page_width, DEFAULT_PAGE_WIDTH);
        assert!(builder.pipeline.is_parallel());
    }

    #[test]
    fn test_parse_regions_rejects_negative_confidence() {
        let text = r#"{"class": "text", "x0": 0, "y0": 0, "x1": 10, "y1": 5, "conf": -0.5, "page": 1, "content": ""}"#;
        assert!(matches!(parse_regions(text), Err(Error::InvalidRegion(_))));
    }

    #[test]
    fn test_parse_regions_rejects_unknown_class() {
        let text = r#"{"class": "sidebar", "x0": 0, "y0": 0, "x1": 10, "y1": 5, "conf": 0.5, "page": 1, "content": ""}"#;
        let err = parse_regions(text).unwrap_err();
        assert!(err.to_string().contains("sidebar"));
    }

    #[test]
    fn test_parse_regions_missing_field() {
        let text = r#"{"class": "text", "x0": 0, "y0": 0, "x1": 10, "conf": 0.5, "page": 1, "content": ""}"#;
        assert!(parse_regions(text).is_err());
    }

    #[test]
    fn test_read_regions_missing_file() {
        assert!(matches!(
            read_regions("/nonexistent/regions.jsonl"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_result_renders() {
        let regions = parse_regions(
            r#"{"class": "section-header", "x0": 100, "y0": 100, "x1": 600, "y1": 140, "conf": 0.9, "page": 1, "content": "Introduction"}
{"class": "text", "x0": 100, "y0": 200, "x1": 1700, "y1": 400, "conf": 0.9, "page": 1, "content": "We study layout."}"#,
        )
        .unwrap();
        let result = Docsift::new().process_regions(regions).unwrap();
        assert_eq!(result.to_markdown(), "\n\nIntroduction\n\nWe study layout.\n");
        assert_eq!(result.to_jsonl().unwrap().lines().count(), 2);
        assert_eq!(result.removed_references_markdown(), "");
        assert_eq!(result.plain_text(), "Introduction\n\nWe study layout.");
    }
}
