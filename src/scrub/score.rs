//! Citation-likelihood scoring of single lines.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::ScoreWeights;

lazy_static! {
    static ref RX_YEAR: Regex = Regex::new(r"\b(19|20)\d{2}\b").unwrap();
    static ref RX_PAGES: Regex = Regex::new(r"(?i)\b(?:pp\.?\s*)?\d{1,5}\s*[-–]\s*\d{1,5}\b").unwrap();
    static ref RX_VOL_ISSUE: Regex = Regex::new(
        r"(?i)\b(?:vol\.?\s*\d+|no\.?\s*\d+|volume\s*\d+|\d+\s*\(\d+\)|\d{1,4}\s*,\s*\d{1,5}(?:[-–]\d{1,5})?)\b"
    )
    .unwrap();
    static ref RX_DOI: Regex = Regex::new(r"(?i)\b(doi:\S+|https?://doi\.org/\S+|arXiv:\S+)\b").unwrap();
    static ref RX_PROCEEDINGS: Regex = Regex::new(
        r"\b(Proc\.|Proceedings|ICCV|CVPR|ECCV|MICCAI|NeurIPS|ICML|AAAI|IJCAI|TIP|TMI|PAMI)\b"
    )
    .unwrap();
    static ref RX_BRACKET_IDX: Regex = Regex::new(r"^\s*\[\d+\]").unwrap();
    static ref RX_NUM_IDX: Regex = Regex::new(r"^\s*\d+\.\s+").unwrap();
    /// "F. Last"
    static ref RX_AUTHOR_INITIAL_FIRST: Regex = Regex::new(r"\b(?:[A-Z]\.\s*){1,3}[A-Z][a-zA-Z\-']+\b").unwrap();
    /// "Last, F."
    static ref RX_AUTHOR_SURNAME_FIRST: Regex = Regex::new(r"\b[A-Z][a-zA-Z\-']+,\s*(?:[A-Z]\.\s*){1,3}\b").unwrap();
    static ref RX_FIGURE: Regex = Regex::new(r"(?i)^\s*(Fig\.?|Figure)\b").unwrap();
    static ref RX_SECTION: Regex = Regex::new(r"(?i)^\s*(Section|Sec\.?)\b").unwrap();
    static ref RX_SENTENCE_END: Regex = Regex::new(r"[.!?]\s+[A-Z]").unwrap();
    static ref RX_HTTP: Regex = Regex::new(r"(?i)https?://").unwrap();
}

/// Which citation signals fired on a whitespace-normalized line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSignals {
    /// Leading `[n]` or `n. ` index
    pub index: bool,
    /// Year 1900-2099
    pub year: bool,
    /// Page range
    pub pages: bool,
    /// Volume or issue
    pub volume_issue: bool,
    /// DOI or arXiv identifier
    pub doi: bool,
    /// Venue acronym or "Proceedings"
    pub proceedings: bool,
    /// Abbreviated author name
    pub author: bool,
    /// URL
    pub url: bool,
    /// Leading "Fig."/"Figure"
    pub figure: bool,
    /// Leading "Section"/"Sec."
    pub section: bool,
    /// Sentence boundary followed by a capital
    pub sentence_end: bool,
    /// Comma count
    pub commas: usize,
    /// Length in characters
    pub chars: usize,
}

impl LineSignals {
    /// Collect signals for a line. Whitespace is collapsed first.
    pub fn detect(line: &str) -> Self {
        let text = line.split_whitespace().collect::<Vec<_>>().join(" ");
        Self {
            index: RX_BRACKET_IDX.is_match(&text) || RX_NUM_IDX.is_match(&text),
            year: RX_YEAR.is_match(&text),
            pages: RX_PAGES.is_match(&text),
            volume_issue: RX_VOL_ISSUE.is_match(&text),
            doi: RX_DOI.is_match(&text),
            proceedings: RX_PROCEEDINGS.is_match(&text),
            author: RX_AUTHOR_INITIAL_FIRST.is_match(&text)
                || RX_AUTHOR_SURNAME_FIRST.is_match(&text),
            url: RX_HTTP.is_match(&text),
            figure: RX_FIGURE.is_match(&text),
            section: RX_SECTION.is_match(&text),
            sentence_end: RX_SENTENCE_END.is_match(&text),
            commas: text.matches(',').count(),
            chars: text.chars().count(),
        }
    }

    /// Number of core signals (index, year, pages, volume/issue, DOI, author).
    pub fn core_count(&self) -> usize {
        [
            self.index,
            self.year,
            self.pages,
            self.volume_issue,
            self.doi,
            self.author,
        ]
        .iter()
        .filter(|&&fired| fired)
        .count()
    }

    /// Weighted score of these signals.
    pub fn score(&self, weights: &ScoreWeights) -> f64 {
        let bonus = |fired: bool, weight: f64| if fired { weight } else { 0.0 };
        let mut score = bonus(self.index, weights.index)
            + bonus(self.year, weights.year)
            + bonus(self.pages, weights.pages)
            + bonus(self.volume_issue, weights.volume_issue)
            + bonus(self.doi, weights.doi)
            + bonus(self.proceedings, weights.proceedings)
            + bonus(self.author, weights.author)
            + bonus(self.url, weights.url);

        if self.commas >= 2 {
            score += (weights.comma_step * (self.commas - 1) as f64).min(weights.comma_cap);
        }

        let strong = self.core_count() >= weights.strong_signals;
        if self.figure {
            score -= weights.figure_penalty;
        }
        if self.section {
            score -= weights.section_penalty;
        }
        if self.sentence_end && !strong {
            score -= weights.sentence_penalty;
        }
        if self.chars < weights.short_len {
            score -= weights.short_penalty;
        } else if self.chars > weights.long_len && !strong {
            score -= weights.long_penalty;
        }
        score
    }

    /// Names of the signals that fired, for display.
    pub fn fired(&self) -> Vec<&'static str> {
        [
            (self.index, "index"),
            (self.year, "year"),
            (self.pages, "pages"),
            (self.volume_issue, "volume/issue"),
            (self.doi, "doi"),
            (self.proceedings, "proceedings"),
            (self.author, "author"),
            (self.url, "url"),
            (self.figure, "figure"),
            (self.section, "section"),
            (self.sentence_end, "sentence-end"),
        ]
        .into_iter()
        .filter_map(|(fired, name)| fired.then_some(name))
        .collect()
    }
}

/// Heuristic likelihood that `line` is a bibliography entry, roughly -3..+7.
pub fn ref_score(line: &str, weights: &ScoreWeights) -> f64 {
    LineSignals::detect(line).score(weights)
}

/// Median of `values`; the mean of the middle pair for even lengths.
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
