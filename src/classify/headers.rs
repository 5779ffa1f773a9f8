//! Promotion of embedded section-name lines to section headers.

use std::collections::HashSet;

use crate::model::{Block, RegionClass};

/// Split text and caption blocks around lines that exactly match a section
/// name. Text before the match and the remainder after it become separate
/// blocks of the original class; empty pieces are dropped.
pub(crate) fn promote_keyword_headers(blocks: Vec<Block>, vocabulary: &HashSet<&str>) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block.class {
            RegionClass::Text | RegionClass::Caption => split_block(block, vocabulary, &mut out),
            RegionClass::Title
            | RegionClass::SectionHeader
            | RegionClass::ListItem
            | RegionClass::Picture
            | RegionClass::Table
            | RegionClass::Formula
            | RegionClass::PageHeader
            | RegionClass::PageFooter
            | RegionClass::Footnote => out.push(block),
        }
    }
    out
}

fn split_block(block: Block, vocabulary: &HashSet<&str>, out: &mut Vec<Block>) {
    let has_header = block
        .content
        .lines()
        .any(|line| vocabulary.contains(line.trim()));
    if !has_header {
        out.push(block);
        return;
    }

    let mut pending: Vec<&str> = Vec::new();
    for line in block.content.trim().split('\n') {
        let candidate = line.trim();
        if vocabulary.contains(candidate) {
            flush(&block, &mut pending, out);
            out.push(block.derive(RegionClass::SectionHeader, candidate));
        } else {
            pending.push(line);
        }
    }
    flush(&block, &mut pending, out);
}

fn flush(source: &Block, pending: &mut Vec<&str>, out: &mut Vec<Block>) {
    let text = pending.join("\n");
    pending.clear();
    if !text.trim().is_empty() {
        out.push(source.derive(source.class, text));
    }
}
