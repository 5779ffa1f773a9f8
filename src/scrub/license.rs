//! Excision of preprint license boilerplate.

use regex::Regex;

use crate::config::LicenseConfig;
use crate::error::Result;
use crate::model::Block;

/// Cuts license notices out of block text and records what was cut.
pub struct LicenseFilter<'a> {
    config: &'a LicenseConfig,
    preprint_span: Regex,
    cc_notice: Regex,
}

impl<'a> LicenseFilter<'a> {
    /// Create a filter, compiling the configured patterns.
    pub fn new(config: &'a LicenseConfig) -> Result<Self> {
        Ok(Self {
            config,
            preprint_span: Regex::new(&config.preprint_span_pattern)?,
            cc_notice: Regex::new(&config.cc_notice_pattern)?,
        })
    }

    /// Filter a document. Returns the cleaned blocks and one removed record
    /// per block that lost any text. Blocks left empty are dropped.
    pub fn filter(&self, blocks: Vec<Block>) -> (Vec<Block>, Vec<Block>) {
        let mut kept = Vec::with_capacity(blocks.len());
        let mut removed = Vec::new();

        for mut block in blocks {
            if block.class.is_asset() {
                kept.push(block);
                continue;
            }

            let (cleaned, parts) = self.clean(&block.content);
            if parts.is_empty() {
                kept.push(block);
                continue;
            }

            let record = parts
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            removed.push(block.derive(block.class, record));

            if cleaned.is_empty() {
                log::debug!("License filter emptied a {} block", block.class);
                continue;
            }
            block.content = cleaned;
            kept.push(block);
        }

        if !removed.is_empty() {
            log::debug!("License filter touched {} blocks", removed.len());
        }
        (kept, removed)
    }

    /// Clean one text. Returns the remaining text (trimmed) and the removed parts.
    pub fn clean(&self, text: &str) -> (String, Vec<String>) {
        let lower = text.to_lowercase();
        let is_short = text.chars().count() < self.config.short_block_len;
        if is_short
            && self
                .config
                .short_block_phrases
                .iter()
                .any(|phrase| lower.contains(phrase.as_str()))
        {
            return (String::new(), vec![text.to_string()]);
        }

        let mut removed = Vec::new();

        let spans: Vec<(usize, usize)> = self
            .preprint_span
            .find_iter(text)
            .filter(|m| self.is_license_span(m.as_str()))
            .map(|m| (m.start(), m.end()))
            .collect();
        let text = excise(text, &spans, &mut removed);

        let spans: Vec<(usize, usize)> = self
            .cc_notice
            .find_iter(&text)
            .map(|m| (m.start(), m.end()))
            .collect();
        let mut text = excise(&text, &spans, &mut removed);

        let phrase = self.config.granted_license_phrase.as_str();
        if !phrase.is_empty() && text.contains(phrase) {
            text = join_at_cuts(&text.split(phrase).collect::<Vec<_>>());
            removed.push(phrase.to_string());
        }

        (text.trim().to_string(), removed)
    }

    fn is_license_span(&self, span: &str) -> bool {
        let lower = span.to_lowercase();
        let archive = if self.config.accept_any_rxiv {
            "rxiv"
        } else {
            "medrxiv"
        };
        lower.contains("license") && lower.contains(archive)
    }
}

/// Remove non-overlapping, ascending byte ranges from `text`.
fn excise(text: &str, spans: &[(usize, usize)], removed: &mut Vec<String>) -> String {
    if spans.is_empty() {
        return text.to_string();
    }
    let mut pieces = Vec::with_capacity(spans.len() + 1);
    let mut last = 0;
    for &(start, end) in spans {
        pieces.push(&text[last..start]);
        removed.push(text[start..end].to_string());
        last = end;
    }
    pieces.push(&text[last..]);
    join_at_cuts(&pieces)
}

/// Join the text left around cuts with exactly one space at each cut.
/// Whitespace away from the cuts is left alone.
fn join_at_cuts(pieces: &[&str]) -> String {
    let mut out = String::new();
    for (i, piece) in pieces.iter().enumerate() {
        let mut piece = *piece;
        if i > 0 {
            piece = piece.trim_start();
        }
        if i + 1 < pieces.len() {
            piece = piece.trim_end();
        }
        if piece.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(piece);
    }
    out
}
