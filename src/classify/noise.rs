//! Removal of page furniture and junk lines.

use crate::config::NoiseConfig;
use crate::model::{Block, RegionClass};

/// Drop page furniture, normalize headings, and strip junk lines from body
/// text (stray glyphs, letter-spaced ruler text, margin numbers).
pub(crate) fn filter_noise(blocks: Vec<Block>, config: &NoiseConfig) -> Vec<Block> {
    let mut out = Vec::with_capacity(blocks.len());
    for mut block in blocks {
        match block.class {
            RegionClass::PageHeader | RegionClass::PageFooter | RegionClass::Footnote => continue,
            RegionClass::Picture | RegionClass::Table | RegionClass::Formula => {
                block.content = block.content.trim().to_string();
                out.push(block);
            }
            RegionClass::Title | RegionClass::SectionHeader => {
                block.content = normalize_spaces(&block.content);
                out.push(block);
            }
            RegionClass::Text | RegionClass::Caption | RegionClass::ListItem => {
                let cleaned = clean_body(&block.content, config);
                if cleaned.chars().count() < config.min_block_len {
                    continue;
                }
                block.content = cleaned;
                out.push(block);
            }
        }
    }
    out
}

/// Collapse all whitespace runs to one space and trim.
pub(crate) fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn space_density(s: &str) -> f32 {
    let total = s.chars().count();
    if total == 0 {
        return 0.0;
    }
    s.chars().filter(|&c| c == ' ').count() as f32 / total as f32
}

fn clean_body(content: &str, config: &NoiseConfig) -> String {
    let joined = content.trim().replace("-\n", "");
    joined
        .split('\n')
        .map(normalize_spaces)
        .filter(|line| {
            line.chars().count() > config.max_short_line
                && space_density(line) <= config.max_space_density
                && line.chars().filter(|&c| c != ' ').count() >= config.min_visible_chars
        })
        .collect::<Vec<_>>()
        .join(" ")
}
