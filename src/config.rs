//! Heuristic thresholds and vocabularies.
//!
//! Every tunable number used by the merge, order, classify and scrub stages
//! lives here. Stages receive the relevant sub-config by reference, so tests
//! can perturb a single value without touching global state. All structs
//! deserialize with `#[serde(default)]`: a JSON config file only needs the
//! keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration passed into a [`crate::Pipeline`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Region merger thresholds
    pub merge: MergeConfig,
    /// Reading-order thresholds
    pub order: OrderConfig,
    /// Structural classifier settings
    pub classify: ClassifyConfig,
    /// License and reference scrubbing settings
    pub scrub: ScrubConfig,
}

impl HeuristicConfig {
    /// Create configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Set merge thresholds.
    pub fn with_merge(mut self, merge: MergeConfig) -> Self {
        self.merge = merge;
        self
    }

    /// Set reading-order thresholds.
    pub fn with_order(mut self, order: OrderConfig) -> Self {
        self.order = order;
        self
    }

    /// Set classifier settings.
    pub fn with_classify(mut self, classify: ClassifyConfig) -> Self {
        self.classify = classify;
        self
    }

    /// Set scrubber settings.
    pub fn with_scrub(mut self, scrub: ScrubConfig) -> Self {
        self.scrub = scrub;
        self
    }
}

/// Thresholds for merging same-class detections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Merge when intersection-over-union reaches this value
    pub iou_threshold: f32,
    /// Merge when the smaller box is covered at least this much
    pub containment_threshold: f32,
    /// Max per-corner delta (pixels) for near-duplicate boxes
    pub near_duplicate_eps: f32,
    /// Detections below this confidence are discarded before merging
    pub min_confidence: f32,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.40,
            containment_threshold: 0.85,
            near_duplicate_eps: 2.0,
            min_confidence: 0.40,
        }
    }
}

impl MergeConfig {
    /// Set the IoU threshold.
    pub fn with_iou(mut self, threshold: f32) -> Self {
        self.iou_threshold = threshold;
        self
    }

    /// Set the containment threshold.
    pub fn with_containment(mut self, threshold: f32) -> Self {
        self.containment_threshold = threshold;
        self
    }

    /// Set the confidence floor.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }
}

/// Thresholds for reading-order reconstruction, as fractions of page size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// A region at least this wide (fraction of page width) is full-width
    pub full_width_fraction: f32,
    /// Minimum gap between column centers (fraction of page width) to split
    pub min_column_gap_fraction: f32,
    /// Padding around full-width cut lines (fraction of page height)
    pub band_pad_fraction: f32,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            full_width_fraction: 0.70,
            min_column_gap_fraction: 0.12,
            band_pad_fraction: 0.005,
        }
    }
}

impl OrderConfig {
    /// Set the full-width fraction.
    pub fn with_full_width(mut self, fraction: f32) -> Self {
        self.full_width_fraction = fraction;
        self
    }

    /// Set the minimum column gap fraction.
    pub fn with_min_column_gap(mut self, fraction: f32) -> Self {
        self.min_column_gap_fraction = fraction;
        self
    }
}

/// Default closed vocabulary of academic section names.
pub const DEFAULT_SECTION_HEADERS: &[&str] = &[
    "abstract",
    "keywords",
    "introduction",
    "background",
    "literature review",
    "rationale",
    "objectives",
    "hypothesis",
    "research questions",
    "materials and methods",
    "materials",
    "methods",
    "study design",
    "participants",
    "subjects",
    "cohort description",
    "data collection",
    "experimental setup",
    "apparatus",
    "statistical analysis",
    "data analysis",
    "results",
    "statistical findings",
    "discussion",
    "interpretation of findings",
    "strengths",
    "limitations",
    "comparison with previous studies",
    "implications",
    "applications",
    "conclusion",
    "summary",
    "future work",
    "recommendations",
    "acknowledgements",
    "funding",
    "conflict of interest",
    "declarations",
    "references",
    "bibliography",
    "supplementary material",
];

/// Structural classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Lines exactly equal to one of these are promoted to section headers
    pub section_headers: Vec<String>,
    /// Line-level noise thresholds
    pub noise: NoiseConfig,
    /// Paragraph stitching geometry
    pub stitch: StitchConfig,
    /// Pattern a block must match (at its start) to become a list item
    pub list_marker_pattern: String,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            section_headers: DEFAULT_SECTION_HEADERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            noise: NoiseConfig::default(),
            stitch: StitchConfig::default(),
            list_marker_pattern: r"^\s{0,2}(?:\[\d+\]|\d+\.)\s+\S".to_string(),
        }
    }
}

impl ClassifyConfig {
    /// Replace the section-header vocabulary.
    pub fn with_section_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.section_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Set stitching geometry.
    pub fn with_stitch(mut self, stitch: StitchConfig) -> Self {
        self.stitch = stitch;
        self
    }
}

/// Line-level noise thresholds for body text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Lines with at most this many characters are dropped
    pub max_short_line: usize,
    /// Lines whose space/length ratio exceeds this are dropped
    pub max_space_density: f32,
    /// Lines with fewer non-space characters than this are dropped
    pub min_visible_chars: usize,
    /// Blocks shorter than this after cleanup are dropped
    pub min_block_len: usize,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            max_short_line: 2,
            max_space_density: 0.5,
            min_visible_chars: 3,
            min_block_len: 2,
        }
    }
}

/// Geometry limits for stitching a paragraph split across two boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Max vertical gap, as a fraction of the upper block's height
    pub max_vgap_fraction: f32,
    /// Max left-edge offset, as a fraction of the upper block's width
    pub left_tolerance_fraction: f32,
    /// Max relative width difference
    pub width_tolerance_fraction: f32,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            max_vgap_fraction: 0.35,
            left_tolerance_fraction: 0.08,
            width_tolerance_fraction: 0.15,
        }
    }
}

/// Content scrubber settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubConfig {
    /// License notice filter
    pub license: LicenseConfig,
    /// Reference filter
    pub reference: ReferenceConfig,
}

/// License notice filter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
    /// Blocks shorter than this containing a short-block phrase are emptied
    pub short_block_len: usize,
    /// Lowercase phrases that mark a short block as pure boilerplate
    pub short_block_phrases: Vec<String>,
    /// Span running from a license opener to the archive marker
    pub preprint_span_pattern: String,
    /// Accept any "rxiv" archive in a preprint span, not only medRxiv
    pub accept_any_rxiv: bool,
    /// Creative Commons attribution notice
    pub cc_notice_pattern: String,
    /// Literal phrase removed wherever it appears
    pub granted_license_phrase: String,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            short_block_len: 150,
            short_block_phrases: vec![
                "international license".to_string(),
                "all rights reserved".to_string(),
            ],
            preprint_span_pattern:
                r"(?is)(?:cc|all\s+rights|is the author/funder).*?medRxiv preprint".to_string(),
            accept_any_rxiv: true,
            cc_notice_pattern: concat!(
                r"(?i)\bCC(?:[\s\-]*BY)?(?:[\s\-]*NC)?(?:[\s\-]*ND)?\s*4[.\s]?0",
                r"\s*International\s+license\s+It\s+is\s+made\s+available\s+under\s+a"
            )
            .to_string(),
            granted_license_phrase:
                "who has granted medRxiv a license to display the preprint in perpetuity"
                    .to_string(),
        }
    }
}

impl LicenseConfig {
    /// Require "medrxiv" rather than any "rxiv" inside preprint spans.
    pub fn medrxiv_only(mut self) -> Self {
        self.accept_any_rxiv = false;
        self
    }
}

/// Reference filter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// A list run is removed when its median line score reaches this
    pub run_median_threshold: f64,
    /// List items scoring above this are removed
    pub list_line_threshold: f64,
    /// Any text line scoring above this is removed
    pub any_line_threshold: f64,
    /// Comma density (before the first period) above which a list item is removed
    pub max_comma_density: f64,
    /// Single-item runs with at most this many words become headers
    pub header_max_words: usize,
    /// Window (chars) searched for a bracket marker in list items
    pub bracket_window: usize,
    /// Window (chars) searched for empty parentheses in list items
    pub empty_paren_window: usize,
    /// Lowercase affiliation openers
    pub affiliation_prefixes: Vec<String>,
    /// Window (chars) searched for an affiliation opener
    pub affiliation_window: usize,
    /// Affiliation lines at least this long are kept
    pub affiliation_max_len: usize,
    /// `ref_score` weights
    pub weights: ScoreWeights,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            run_median_threshold: 0.5,
            list_line_threshold: 1.0,
            any_line_threshold: 2.0,
            max_comma_density: 0.05,
            header_max_words: 2,
            bracket_window: 10,
            empty_paren_window: 15,
            affiliation_prefixes: vec![
                "university of".to_string(),
                "college of".to_string(),
                "department of".to_string(),
            ],
            affiliation_window: 30,
            affiliation_max_len: 300,
            weights: ScoreWeights::default(),
        }
    }
}

impl ReferenceConfig {
    /// Set the list-run median threshold.
    pub fn with_run_threshold(mut self, threshold: f64) -> Self {
        self.run_median_threshold = threshold;
        self
    }
}

/// Weights of the citation-likelihood score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Leading `[n]` or `n.` index
    pub index: f64,
    /// Four-digit year 1900-2099
    pub year: f64,
    /// Page range
    pub pages: f64,
    /// Volume/issue
    pub volume_issue: f64,
    /// DOI or arXiv identifier
    pub doi: f64,
    /// Proceedings/venue acronym
    pub proceedings: f64,
    /// Abbreviated author name
    pub author: f64,
    /// Bare URL
    pub url: f64,
    /// Bonus per comma beyond the first
    pub comma_step: f64,
    /// Cap on the comma bonus
    pub comma_cap: f64,
    /// Penalty for a leading "Fig."/"Figure"
    pub figure_penalty: f64,
    /// Penalty for a leading "Section"/"Sec."
    pub section_penalty: f64,
    /// Penalty for prose sentence boundaries on weak lines
    pub sentence_penalty: f64,
    /// Penalty for very short lines
    pub short_penalty: f64,
    /// Penalty for very long weak lines
    pub long_penalty: f64,
    /// Lines shorter than this get the short penalty
    pub short_len: usize,
    /// Lines longer than this may get the long penalty
    pub long_len: usize,
    /// Number of core signals that make a line "strong"
    pub strong_signals: usize,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            index: 1.2,
            year: 1.0,
            pages: 1.0,
            volume_issue: 0.8,
            doi: 1.2,
            proceedings: 1.0,
            author: 1.0,
            url: 1.0,
            comma_step: 0.2,
            comma_cap: 0.8,
            figure_penalty: 1.5,
            section_penalty: 0.8,
            sentence_penalty: 1.2,
            short_penalty: 0.8,
            long_penalty: 0.8,
            short_len: 20,
            long_len: 450,
            strong_signals: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HeuristicConfig::default();
        assert_eq!(config.merge.iou_threshold, 0.40);
        assert_eq!(config.order.full_width_fraction, 0.70);
        assert_eq!(config.scrub.reference.run_median_threshold, 0.5);
        assert!(config
            .classify
            .section_headers
            .iter()
            .any(|h| h == "introduction"));
    }

    #[test]
    fn test_partial_json_overrides() {
        let json = r#"{"merge": {"iou_threshold": 0.6}, "scrub": {"reference": {"run_median_threshold": 1.5}}}"#;
        let config = HeuristicConfig::from_json(json).unwrap();
        assert_eq!(config.merge.iou_threshold, 0.6);
        assert_eq!(config.merge.containment_threshold, 0.85);
        assert_eq!(config.scrub.reference.run_median_threshold, 1.5);
        assert_eq!(config.scrub.reference.weights.index, 1.2);
    }

    #[test]
    fn test_builder() {
        let config = HeuristicConfig::new()
            .with_merge(MergeConfig::default().with_iou(0.5).with_min_confidence(0.0))
            .with_classify(ClassifyConfig::default().with_section_headers(["Einleitung"]));
        assert_eq!(config.merge.iou_threshold, 0.5);
        assert_eq!(config.merge.min_confidence, 0.0);
        assert_eq!(config.classify.section_headers, vec!["Einleitung".to_string()]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"order": {"min_column_gap_fraction": 0.2}}"#).unwrap();
        let config = HeuristicConfig::load(&path).unwrap();
        assert_eq!(config.order.min_column_gap_fraction, 0.2);
        assert!(HeuristicConfig::load(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_round_trip_is_identity() {
        let config = HeuristicConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(HeuristicConfig::from_json(&json).unwrap(), config);
    }
}
