//! Markdown rendering for classified blocks.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::{Block, RegionClass};

lazy_static! {
    static ref RE_INLINE_SPACE: Regex = Regex::new(r"[ \t]+").unwrap();
    static ref RE_MULTI_NEWLINE: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Options for Markdown output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Prefix titles with `#` and section headers with `##`
    pub atx_headings: bool,
    /// List item marker
    pub list_marker: char,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            atx_headings: false,
            list_marker: '-',
        }
    }
}

impl MarkdownOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable `#` heading prefixes.
    pub fn with_atx_headings(mut self, enabled: bool) -> Self {
        self.atx_headings = enabled;
        self
    }

    /// Set the list item marker.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }
}

/// Convert blocks to Markdown with default options.
pub fn to_markdown(blocks: &[Block]) -> String {
    MarkdownRenderer::new(MarkdownOptions::default()).render(blocks)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: MarkdownOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    /// Render blocks in order. Page furniture is skipped.
    pub fn render(&self, blocks: &[Block]) -> String {
        let mut output = String::new();
        for block in blocks {
            self.render_block(&mut output, block);
        }
        output
    }

    fn render_block(&self, output: &mut String, block: &Block) {
        let content = block.content.trim();
        match block.class {
            RegionClass::Picture | RegionClass::Table | RegionClass::Formula => {
                let alt = match block.class {
                    RegionClass::Table => "Table",
                    RegionClass::Formula => "Formula",
                    _ => "Figure",
                };
                let name = Path::new(content)
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_default();
                output.push_str(&format!("![{} - {}]({})\n\n", alt, name, content));
            }
            RegionClass::Title | RegionClass::SectionHeader => {
                let prefix = match (self.options.atx_headings, block.class) {
                    (false, _) => "",
                    (true, RegionClass::Title) => "# ",
                    (true, _) => "## ",
                };
                output.push_str(&format!("\n\n{}{}\n\n", prefix, clean_text(content)));
            }
            RegionClass::Text => {
                output.push_str(&clean_text(content));
                output.push('\n');
            }
            RegionClass::Caption => {
                output.push_str(&clean_text(content));
                output.push_str("\n\n");
            }
            RegionClass::ListItem => {
                output.push(self.options.list_marker);
                output.push(' ');
                output.push_str(&clean_text(content));
                output.push('\n');
            }
            RegionClass::PageHeader | RegionClass::PageFooter | RegionClass::Footnote => {}
        }
    }
}

/// Normalize text for Markdown: NBSP to space, NFC, collapsed inline
/// whitespace, at most one blank line, hyphenated line breaks joined.
pub fn clean_text(text: &str) -> String {
    let text: String = text.replace('\u{a0}', " ").trim().nfc().collect();
    let text = RE_INLINE_SPACE.replace_all(&text, " ");
    let text = RE_MULTI_NEWLINE.replace_all(&text, "\n\n");
    text.replace("-\n", "")
}
