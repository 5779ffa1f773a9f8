//! End-to-end document processing.
//!
//! Per page: merge duplicate regions, sequence them into reading order,
//! and classify the resulting blocks. Pages are independent and may run in
//! parallel; their outputs are concatenated in page order and the whole
//! document is scrubbed once.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::classify::StructuralClassifier;
use crate::config::HeuristicConfig;
use crate::error::{Error, Result};
use crate::layout::{ReadingOrder, RegionMerger};
use crate::model::{Block, Detection, PageLayout, PipelineStats, ProcessedDocument, Region};
use crate::scrub::ContentScrubber;

/// A rasterized page handed to a [`LayoutDetector`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGB8 pixels
    pub pixels: Vec<u8>,
}

impl RenderedPage {
    /// Create a page, checking that the buffer matches the dimensions.
    pub fn new(number: u32, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(Error::InvalidPage(format!(
                "page {}: {}x{} needs {} RGB bytes, got {}",
                number,
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            number,
            width,
            height,
            pixels,
        })
    }
}

/// Layout detection backend: given a page image, return classified boxes.
pub trait LayoutDetector: Send + Sync {
    /// Backend name, for logging.
    fn name(&self) -> &str;

    /// Detect layout regions on one page.
    fn detect(&self, page: &RenderedPage) -> Result<Vec<Detection>>;
}

/// Fills a merged detection with its text or a reference to its cropped asset.
pub trait ContentExtractor: Send + Sync {
    /// Extract content for one detection on `page`.
    fn extract(&self, page: &RenderedPage, detection: &Detection) -> Result<String>;
}

/// Document pipeline.
///
/// # Example
///
/// ```
/// use docsift::{BBox, PageLayout, Pipeline, Region, RegionClass};
///
/// let mut page = PageLayout::new(1, 1000.0, 1400.0);
/// page.add_region(Region::new(
///     RegionClass::SectionHeader,
///     BBox::new(100.0, 100.0, 400.0, 140.0)?,
///     0.9,
///     1,
///     "Introduction",
/// )?);
///
/// let doc = Pipeline::new().process_layouts(vec![page])?;
/// assert_eq!(doc.blocks[0].content, "Introduction");
/// # Ok::<(), docsift::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: HeuristicConfig,
    parallel: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Stages built once per document and shared by every page.
struct Stages<'a> {
    merger: RegionMerger<'a>,
    order: ReadingOrder<'a>,
    classifier: StructuralClassifier<'a>,
    scrubber: ContentScrubber<'a>,
}

struct PageOutput {
    blocks: Vec<Block>,
    stats: PipelineStats,
}

impl Pipeline {
    /// Create a pipeline with default heuristics, processing pages in parallel.
    pub fn new() -> Self {
        Self {
            config: HeuristicConfig::default(),
            parallel: true,
        }
    }

    /// Use the given heuristics.
    pub fn with_config(mut self, config: HeuristicConfig) -> Self {
        self.config = config;
        self
    }

    /// Process pages one after another on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Get the active configuration.
    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    /// Check whether pages run in parallel.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Process pages whose regions already carry their content.
    ///
    /// Pages are emitted in ascending page-number order.
    pub fn process_layouts(&self, mut pages: Vec<PageLayout>) -> Result<ProcessedDocument> {
        let stages = self.stages()?;
        pages.sort_by_key(|p| p.number);
        let outputs = self.map_pages(pages, |page| layout_page(&stages, page))?;
        Ok(finish(&stages, outputs))
    }

    /// Process a flat region list, grouping regions by their page number.
    /// Every page is assumed to be `page_width` x `page_height`.
    pub fn process_regions(
        &self,
        regions: Vec<Region>,
        page_width: f32,
        page_height: f32,
    ) -> Result<ProcessedDocument> {
        let mut pages: BTreeMap<u32, PageLayout> = BTreeMap::new();
        for region in regions {
            pages
                .entry(region.page)
                .or_insert_with(|| PageLayout::new(region.page, page_width, page_height))
                .add_region(region);
        }
        self.process_layouts(pages.into_values().collect())
    }

    /// Run detection and extraction on rendered pages, then process them.
    pub fn process_rendered(
        &self,
        mut pages: Vec<RenderedPage>,
        detector: &dyn LayoutDetector,
        extractor: &dyn ContentExtractor,
    ) -> Result<ProcessedDocument> {
        log::info!(
            "Processing {} rendered pages with detector '{}'",
            pages.len(),
            detector.name()
        );
        let stages = self.stages()?;
        pages.sort_by_key(|p| p.number);
        let outputs = self.map_pages(pages, |page| {
            rendered_page(&stages, &page, detector, extractor)
        })?;
        Ok(finish(&stages, outputs))
    }

    fn stages(&self) -> Result<Stages<'_>> {
        Ok(Stages {
            merger: RegionMerger::new(&self.config.merge),
            order: ReadingOrder::new(&self.config.order),
            classifier: StructuralClassifier::new(&self.config.classify)?,
            scrubber: ContentScrubber::new(&self.config.scrub)?,
        })
    }

    fn map_pages<P, F>(&self, pages: Vec<P>, f: F) -> Result<Vec<PageOutput>>
    where
        P: Send,
        F: Fn(P) -> Result<PageOutput> + Send + Sync,
    {
        if self.parallel {
            pages.into_par_iter().map(f).collect()
        } else {
            pages.into_iter().map(f).collect()
        }
    }
}

/// Concatenate page outputs in order and scrub the document.
fn finish(stages: &Stages<'_>, outputs: Vec<PageOutput>) -> ProcessedDocument {
    let mut stats = PipelineStats::new();
    let mut blocks = Vec::new();
    for output in outputs {
        stats.merge(&output.stats);
        blocks.extend(output.blocks);
    }

    let scrubbed = stages.scrubber.scrub(blocks);

    stats.license_hits = scrubbed.removed_licenses.len() as u32;
    stats.references_removed = scrubbed.removed_references.len() as u32;
    stats.blocks_out = scrubbed.blocks.len() as u32;

    log::info!(
        "Processed {} pages: {} regions in, {} blocks out ({} license, {} reference removals)",
        stats.page_count,
        stats.regions_in,
        stats.blocks_out,
        stats.license_hits,
        stats.references_removed
    );

    ProcessedDocument {
        blocks: scrubbed.blocks,
        removed_licenses: scrubbed.removed_licenses,
        removed_references: scrubbed.removed_references,
        stats,
    }
}

fn layout_page(stages: &Stages<'_>, page: PageLayout) -> Result<PageOutput> {
    page.validate()?;
    if page.is_empty() {
        log::warn!("Page {} has no regions", page.number);
    }

    let regions_in = page.regions.len();
    let merged = stages.merger.merge(page.regions);
    let ordered = stages.order.sequence(merged.items, page.width, page.height);
    let blocks = ordered.into_iter().map(Block::from).collect();

    Ok(classify_page(
        stages,
        page.number,
        blocks,
        regions_in,
        merged.low_confidence,
        merged.absorbed,
    ))
}

fn rendered_page(
    stages: &Stages<'_>,
    page: &RenderedPage,
    detector: &dyn LayoutDetector,
    extractor: &dyn ContentExtractor,
) -> Result<PageOutput> {
    let detections = detector.detect(page)?;
    let regions_in = detections.len();
    if detections.is_empty() {
        log::warn!("Detector found nothing on page {}", page.number);
    }

    let merged = stages.merger.merge(detections);
    let ordered = stages
        .order
        .sequence(merged.items, page.width as f32, page.height as f32);

    let mut blocks = Vec::with_capacity(ordered.len());
    for detection in ordered {
        let content = extractor.extract(page, &detection)?;
        blocks.push(Block::new(detection.class, content, detection.bbox, page.number));
    }

    Ok(classify_page(
        stages,
        page.number,
        blocks,
        regions_in,
        merged.low_confidence,
        merged.absorbed,
    ))
}

fn classify_page(
    stages: &Stages<'_>,
    number: u32,
    blocks: Vec<Block>,
    regions_in: usize,
    low_confidence: usize,
    absorbed: usize,
) -> PageOutput {
    let blocks = stages.classifier.classify(blocks);
    log::debug!("Page {}: {} regions -> {} blocks", number, regions_in, blocks.len());
    PageOutput {
        stats: PipelineStats {
            page_count: 1,
            regions_in: regions_in as u32,
            low_confidence: low_confidence as u32,
            regions_merged: absorbed as u32,
            blocks_classified: blocks.len() as u32,
            ..Default::default()
        },
        blocks,
    }
}
