//! Removal of title-page noise and bibliography entries.
//!
//! Four stages run in sequence over the whole document:
//!
//! 1. front matter before the first "abstract"/"introduction" heading
//! 2. list items following a "references" heading
//! 3. runs of list items whose median [`ref_score`] is citation-like
//! 4. single lines matching citation or affiliation rules
//!
//! Each stage appends what it removes to one shared list.

use crate::config::ReferenceConfig;
use crate::model::{Block, RegionClass};

use super::score::{median, ref_score};

/// A maximal run of list items, or any other block.
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Other(Block),
    ListRun(Vec<Block>),
}

/// Group consecutive list items into runs.
fn group_list_runs(blocks: Vec<Block>) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut run: Vec<Block> = Vec::new();
    for block in blocks {
        if block.class == RegionClass::ListItem {
            run.push(block);
            continue;
        }
        if !run.is_empty() {
            segments.push(Segment::ListRun(std::mem::take(&mut run)));
        }
        segments.push(Segment::Other(block));
    }
    if !run.is_empty() {
        segments.push(Segment::ListRun(run));
    }
    segments
}

/// Bibliography and front-matter filter.
pub struct ReferenceFilter<'a> {
    config: &'a ReferenceConfig,
}

impl<'a> ReferenceFilter<'a> {
    /// Create a new filter.
    pub fn new(config: &'a ReferenceConfig) -> Self {
        Self { config }
    }

    /// Run all four stages until they change nothing. Returns the kept
    /// blocks and everything removed.
    ///
    /// A line removed in stage 4 can split a kept list run and leave a
    /// single item that stage 3 would demote, so the stages repeat. Every
    /// repeat removes a block or demotes a list item, which bounds the loop.
    pub fn filter(&self, mut blocks: Vec<Block>) -> (Vec<Block>, Vec<Block>) {
        let mut removed = Vec::new();

        loop {
            let before = blocks.clone();
            blocks = self.anchor_front_matter(blocks, &mut removed);
            blocks = self.skip_bibliography(blocks, &mut removed);
            blocks = self.score_list_runs(blocks, &mut removed);
            blocks = self.filter_lines(blocks, &mut removed);
            if blocks == before {
                break;
            }
        }

        (blocks, removed)
    }

    /// Stage 1: drop everything before the first abstract or introduction
    /// heading and canonicalize that heading.
    pub fn anchor_front_matter(&self, mut blocks: Vec<Block>, removed: &mut Vec<Block>) -> Vec<Block> {
        let anchor = blocks.iter().enumerate().find_map(|(i, block)| {
            if !block.class.is_heading() {
                return None;
            }
            let lower = block.content.to_lowercase();
            if lower.contains("abstract") {
                Some((i, "Abstract"))
            } else if lower.contains("introduction") {
                Some((i, "Introduction"))
            } else {
                None
            }
        });

        let Some((index, label)) = anchor else {
            log::debug!("No abstract or introduction heading found");
            return blocks;
        };

        if index > 0 {
            log::debug!("Removing {} front-matter blocks", index);
        }
        removed.extend(blocks.drain(..index));
        let heading = &mut blocks[0];
        heading.class = RegionClass::SectionHeader;
        heading.content = label.to_string();
        blocks
    }

    /// Stage 2: after a references heading, drop consecutive list items.
    /// The heading itself is removed too; the first other block is kept.
    pub fn skip_bibliography(&self, blocks: Vec<Block>, removed: &mut Vec<Block>) -> Vec<Block> {
        let mut kept = Vec::with_capacity(blocks.len());
        let mut skipping = false;
        let before = removed.len();

        for block in blocks {
            if !skipping
                && block.class.is_heading()
                && block.content.to_lowercase().contains("references")
            {
                skipping = true;
                removed.push(block);
                continue;
            }
            if skipping {
                if block.class == RegionClass::ListItem {
                    removed.push(block);
                    continue;
                }
                skipping = false;
            }
            kept.push(block);
        }

        if removed.len() > before {
            log::debug!("Removed {} bibliography blocks", removed.len() - before);
        }
        kept
    }

    /// Stage 3: score list-item runs by median [`ref_score`]. Single items
    /// are demoted to headers (short) or text.
    pub fn score_list_runs(&self, blocks: Vec<Block>, removed: &mut Vec<Block>) -> Vec<Block> {
        let mut kept = Vec::with_capacity(blocks.len());

        for segment in group_list_runs(blocks) {
            match segment {
                Segment::Other(block) => kept.push(block),
                Segment::ListRun(mut run) if run.len() == 1 => {
                    let mut solo = run.remove(0);
                    solo.content = solo.content.trim().to_string();
                    let class = if solo.word_count() <= self.config.header_max_words {
                        RegionClass::SectionHeader
                    } else {
                        RegionClass::Text
                    };
                    kept.push(solo.with_class(class));
                }
                Segment::ListRun(run) => {
                    let scores: Vec<f64> = run
                        .iter()
                        .map(|b| ref_score(&b.content, &self.config.weights))
                        .collect();
                    let run_median = median(&scores).unwrap_or(f64::NEG_INFINITY);
                    if run_median >= self.config.run_median_threshold {
                        log::debug!(
                            "Removing list run of {} items (median score {:.2})",
                            run.len(),
                            run_median
                        );
                        removed.extend(run);
                    } else {
                        kept.extend(run);
                    }
                }
            }
        }
        kept
    }

    /// Stage 4: line-level citation and affiliation rules.
    pub fn filter_lines(&self, blocks: Vec<Block>, removed: &mut Vec<Block>) -> Vec<Block> {
        let mut kept = Vec::with_capacity(blocks.len());
        for block in blocks {
            if block.class.is_asset() || !self.is_reference_line(&block) {
                kept.push(block);
            } else {
                removed.push(block);
            }
        }
        kept
    }

    fn is_reference_line(&self, block: &Block) -> bool {
        let config = self.config;
        let line = block.content.trim();

        if block.class == RegionClass::ListItem {
            if is_bare_label(line) {
                return false;
            }
            let head = prefix(line, config.bracket_window);
            if head.contains('[') || head.contains(']') {
                return true;
            }
            let head = prefix(line, config.empty_paren_window);
            if head.contains("( )") || head.contains("() ") {
                return true;
            }
            if ref_score(line, &config.weights) > config.list_line_threshold {
                return true;
            }
            if line.contains('.') && comma_density_before_period(line) > config.max_comma_density {
                return true;
            }
        }

        if line.contains("[internet]") || line.contains("[cited") {
            return true;
        }

        let head = prefix(line, config.affiliation_window).to_lowercase();
        if config
            .affiliation_prefixes
            .iter()
            .any(|p| head.contains(p.as_str()))
            && line.chars().count() < config.affiliation_max_len
        {
            return true;
        }

        ref_score(line, &config.weights) > config.any_line_threshold
    }
}

/// A single alphabetic token such as "Keywords:" or "A.B.".
fn is_bare_label(line: &str) -> bool {
    if line.contains(' ') {
        return false;
    }
    let mut letters = line.chars().filter(|c| !matches!(c, '.' | ',' | ':')).peekable();
    letters.peek().is_some() && letters.all(char::is_alphabetic)
}

/// The first `n` characters of `s`.
fn prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Comma ratio of the text between character 4 and the first period.
fn comma_density_before_period(line: &str) -> f64 {
    let segment: Vec<char> = line.chars().skip(4).take_while(|&c| c != '.').collect();
    if segment.is_empty() {
        return 0.0;
    }
    segment.iter().filter(|&&c| c == ',').count() as f64 / segment.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn block(class: RegionClass, content: &str) -> Block {
        Block::new(class, content, BBox::new(0.0, 0.0, 100.0, 20.0).unwrap(), 1)
    }

    fn summary(blocks: &[Block]) -> Vec<(RegionClass, &str)> {
        blocks.iter().map(|b| (b.class, b.content.as_str())).collect()
    }

    #[test]
    fn test_front_matter_removed_before_abstract() {
        let config = ReferenceConfig::default();
        let filter = ReferenceFilter::new(&config);
        let mut removed = Vec::new();
        let out = filter.anchor_front_matter(
            vec![
                block(RegionClass::Title, "A Study of Things"),
                block(RegionClass::Text, "J. Doe, R. Roe"),
                block(RegionClass::Title, "ABSTRACT:"),
                block(RegionClass::Text, "We studied things."),
            ],
            &mut removed,
        );
        assert_eq!(
            summary(&out),
            vec![
                (RegionClass::SectionHeader, "Abstract"),
                (RegionClass::Text, "We studied things."),
            ]
        );
        assert_eq!(removed.len(), 2);
    }

    #[test]
    fn test_introduction_anchor_and_missing_anchor() {
        let config = ReferenceConfig::default();
        let filter = ReferenceFilter::new(&config);
        let mut removed = Vec::new();
        let out = filter.anchor_front_matter(
            vec![
                block(RegionClass::Text, "Author list"),
                block(RegionClass::SectionHeader, "1 Introduction"),
            ],
            &mut removed,
        );
        assert_eq!(out[0].content, "Introduction");
        assert_eq!(removed.len(), 1);

        let mut removed = Vec::new();
        let blocks = vec![block(RegionClass::Text, "no headings at all")];
        let out = filter.anchor_front_matter(blocks.clone(), &mut removed);
        assert_eq!(out, blocks);
        assert!(removed.is_empty());
    }

    #[test]
    fn test_bibliography_skipped() {
        let config = ReferenceConfig::default();
        let filter = ReferenceFilter::new(&config);
        let mut removed = Vec::new();
        let out = filter.skip_bibliography(
            vec![
                block(RegionClass::Text, "Body."),
                block(RegionClass::SectionHeader, "References"),
                block(RegionClass::ListItem, "1. First ref"),
                block(RegionClass::ListItem, "2. Second ref"),
                block(RegionClass::Text, "Appendix text."),
                block(RegionClass::ListItem, "3. Not skipped"),
            ],
            &mut removed,
        );
        assert_eq!(
            summary(&out),
            vec![
                (RegionClass::Text, "Body."),
                (RegionClass::Text, "Appendix text."),
                (RegionClass::ListItem, "3. Not skipped"),
            ]
        );
        assert_eq!(removed.len(), 3);
        assert_eq!(removed[0].content, "References");
    }

    #[test]
    fn test_citation_run_removed_by_median() {
        let config = ReferenceConfig::default();
        let filter = ReferenceFilter::new(&config);
        let mut removed = Vec::new();
        let out = filter.score_list_runs(
            vec![
                block(RegionClass::Text, "Body."),
                block(
                    RegionClass::ListItem,
                    "[1] A. Smith, B. Jones. Title. Proc. CVPR, 2019, pp. 1-9.",
                ),
                block(RegionClass::ListItem, "[2] See Figure 3 for details."),
            ],
            &mut removed,
        );
        assert_eq!(summary(&out), vec![(RegionClass::Text, "Body.")]);
        assert_eq!(removed.len(), 2);
    }

    #[test]
    fn test_prose_run_kept_and_singles_demoted() {
        let config = ReferenceConfig::default();
        let filter = ReferenceFilter::new(&config);
        let mut removed = Vec::new();
        let out = filter.score_list_runs(
            vec![
                block(RegionClass::ListItem, "1. We recruited adults. They consented."),
                block(RegionClass::ListItem, "2. We measured outcomes. They were stable."),
                block(RegionClass::Text, "between"),
                block(RegionClass::ListItem, " 2. Methods "),
                block(RegionClass::Text, "between"),
                block(RegionClass::ListItem, "3. Outcomes were measured weekly."),
            ],
            &mut removed,
        );
        assert!(removed.is_empty());
        assert_eq!(
            summary(&out),
            vec![
                (RegionClass::ListItem, "1. We recruited adults. They consented."),
                (RegionClass::ListItem, "2. We measured outcomes. They were stable."),
                (RegionClass::Text, "between"),
                (RegionClass::SectionHeader, "2. Methods"),
                (RegionClass::Text, "between"),
                (RegionClass::Text, "3. Outcomes were measured weekly."),
            ]
        );
    }

    #[test]
    fn test_line_rules() {
        let config = ReferenceConfig::default();
        let filter = ReferenceFilter::new(&config);
        let mut removed = Vec::new();
        let out = filter.filter_lines(
            vec![
                block(RegionClass::ListItem, "Keywords:"),
                block(RegionClass::ListItem, "See [4] for the protocol we used"),
                block(RegionClass::ListItem, "Smith ( ) notes on the method"),
                block(RegionClass::Text, "Available from: the web [cited 2020 Jan 1]"),
                block(RegionClass::Text, "University of Somewhere, Dept. of Biology"),
                block(RegionClass::Text, "Patients were enrolled over two years."),
                block(RegionClass::Picture, "[1] 2019, pp. 1-9, doi:10.1/x"),
            ],
            &mut removed,
        );
        assert_eq!(
            summary(&out),
            vec![
                (RegionClass::ListItem, "Keywords:"),
                (RegionClass::Text, "Patients were enrolled over two years."),
                (RegionClass::Picture, "[1] 2019, pp. 1-9, doi:10.1/x"),
            ]
        );
        assert_eq!(removed.len(), 4);
    }

    #[test]
    fn test_comma_dense_list_item_removed() {
        let config = ReferenceConfig::default();
        let filter = ReferenceFilter::new(&config);
        let mut removed = Vec::new();
        let out = filter.filter_lines(
            vec![block(RegionClass::ListItem, "1. Li, Wu, Ma, Xu. a trial of things")],
            &mut removed,
        );
        assert!(out.is_empty());
        assert_eq!(removed.len(), 1);
    }

    #[test]
    fn test_full_filter_is_idempotent() {
        let config = ReferenceConfig::default();
        let filter = ReferenceFilter::new(&config);
        let input = vec![
            block(RegionClass::Title, "Paper title"),
            block(RegionClass::SectionHeader, "abstract"),
            block(RegionClass::Text, "We studied things carefully."),
            block(RegionClass::SectionHeader, "references"),
            block(RegionClass::ListItem, "[1] A. Smith. Paper. 2019."),
        ];
        let (once, removed) = filter.filter(input);
        assert_eq!(
            summary(&once),
            vec![
                (RegionClass::SectionHeader, "Abstract"),
                (RegionClass::Text, "We studied things carefully."),
            ]
        );
        assert_eq!(removed.len(), 3);

        let (twice, removed) = filter.filter(once.clone());
        assert_eq!(twice, once);
        assert!(removed.is_empty());
    }

    #[test]
    fn test_split_run_leaves_demoted_single_item() {
        let config = ReferenceConfig::default();
        let filter = ReferenceFilter::new(&config);
        let input = vec![
            block(RegionClass::ListItem, "1. We enrolled patients. They were old."),
            block(RegionClass::ListItem, "2. Outcomes ( ) were measured. They improved."),
        ];

        let (once, removed) = filter.filter(input);
        assert_eq!(
            summary(&once),
            vec![(RegionClass::Text, "1. We enrolled patients. They were old.")]
        );
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].content, "2. Outcomes ( ) were measured. They improved.");

        let (twice, removed) = filter.filter(once.clone());
        assert_eq!(twice, once);
        assert!(removed.is_empty());
    }

    #[test]
    fn test_internet_marker_anywhere_in_line() {
        let config = ReferenceConfig::default();
        let filter = ReferenceFilter::new(&config);
        let mut removed = Vec::new();
        let out = filter.filter_lines(
            vec![
                block(RegionClass::Text, "[internet] Available from the hospital archive"),
                block(RegionClass::Text, "Health statistics [internet] were consulted"),
                block(RegionClass::Text, "[Internet] access was provided to every ward"),
            ],
            &mut removed,
        );
        assert_eq!(
            summary(&out),
            vec![(RegionClass::Text, "[Internet] access was provided to every ward")]
        );
        assert_eq!(removed.len(), 2);
    }

    #[test]
    fn test_helpers() {
        assert!(is_bare_label("A.B."));
        assert!(!is_bare_label("..."));
        assert!(!is_bare_label("two words"));
        assert_eq!(prefix("héllo", 2), "hé");
        assert_eq!(prefix("hi", 10), "hi");
        assert_eq!(comma_density_before_period("1.  a,b. tail"), 1.0 / 3.0);
        assert_eq!(comma_density_before_period("abcd"), 0.0);
    }
}
