//! JSON rendering for processed documents.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::ProcessedDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a whole document (blocks, removed records, stats) to JSON.
pub fn to_json(doc: &ProcessedDocument, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert records (blocks or regions) to JSON Lines, one compact object
/// per line.
pub fn to_jsonl<T: Serialize>(records: &[T]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        let line = serde_json::to_string(record)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Parse JSON Lines, skipping blank lines. Errors name the 1-based line.
pub fn from_jsonl<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| Error::InvalidRegion(format!("line {}: {}", i + 1, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Block, Region, RegionClass};

    fn block(content: &str) -> Block {
        Block::new(
            RegionClass::Text,
            content,
            BBox::new(1.0, 2.0, 3.0, 4.0).unwrap(),
            1,
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let doc = ProcessedDocument {
            blocks: vec![block("Hello")],
            ..Default::default()
        };
        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"blocks\""));
        assert!(json.contains("\"removed_references\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&ProcessedDocument::default(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_jsonl_block_shape() {
        let out = to_jsonl(&[block("a"), block("b")]).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["class"], "text");
        assert_eq!(value["content"], "a");
        assert_eq!(value["x0"], 1.0);
        assert_eq!(value["y1"], 4.0);
    }

    #[test]
    fn test_from_jsonl_regions() {
        let text = r#"{"class": "text", "x0": 0, "y0": 0, "x1": 10, "y1": 5, "conf": 0.9, "page": 1, "content": "hi"}

{"class": "Section-header", "x0": 0, "y0": 6, "x1": 10, "y1": 9, "confidence": 0.8, "page": 2, "content": "Results"}
"#;
        let regions: Vec<Region> = from_jsonl(text).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].confidence, 0.9);
        assert_eq!(regions[1].class, RegionClass::SectionHeader);
    }

    #[test]
    fn test_from_jsonl_reports_line() {
        let text = "{\"class\": \"text\", \"x0\": 5, \"y0\": 0, \"x1\": 5, \"y1\": 5, \"conf\": 0.9, \"page\": 1, \"content\": \"\"}\n";
        let err = from_jsonl::<Region>(text).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
