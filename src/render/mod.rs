//! Rendering module for converting processed documents to output formats.

mod json;
mod markdown;

pub use json::{from_jsonl, to_json, to_jsonl, JsonFormat};
pub use markdown::{clean_text, to_markdown, MarkdownOptions, MarkdownRenderer};
