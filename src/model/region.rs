//! Detector-level types: layout classes, boxes, and regions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Layout class assigned by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum RegionClass {
    /// Body text
    Text,
    /// Document title
    Title,
    /// Section heading
    SectionHeader,
    /// Enumerated or bulleted list entry
    ListItem,
    /// Figure or table caption
    Caption,
    /// Figure or photo (asset)
    Picture,
    /// Table (asset)
    Table,
    /// Display formula (asset)
    Formula,
    /// Running page header
    PageHeader,
    /// Running page footer
    PageFooter,
    /// Footnote
    Footnote,
}

impl RegionClass {
    /// All classes, in declaration order.
    pub const ALL: [RegionClass; 11] = [
        RegionClass::Text,
        RegionClass::Title,
        RegionClass::SectionHeader,
        RegionClass::ListItem,
        RegionClass::Caption,
        RegionClass::Picture,
        RegionClass::Table,
        RegionClass::Formula,
        RegionClass::PageHeader,
        RegionClass::PageFooter,
        RegionClass::Footnote,
    ];

    /// Canonical label, as emitted in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionClass::Text => "text",
            RegionClass::Title => "title",
            RegionClass::SectionHeader => "section-header",
            RegionClass::ListItem => "list-item",
            RegionClass::Caption => "caption",
            RegionClass::Picture => "picture",
            RegionClass::Table => "table",
            RegionClass::Formula => "formula",
            RegionClass::PageHeader => "page-header",
            RegionClass::PageFooter => "page-footer",
            RegionClass::Footnote => "footnote",
        }
    }

    /// Image-like classes whose content is an asset reference, not text.
    pub fn is_asset(&self) -> bool {
        matches!(
            self,
            RegionClass::Picture | RegionClass::Table | RegionClass::Formula
        )
    }

    /// Title or section header.
    pub fn is_heading(&self) -> bool {
        matches!(self, RegionClass::Title | RegionClass::SectionHeader)
    }

    /// Page furniture that never reaches the output.
    pub fn is_furniture(&self) -> bool {
        matches!(
            self,
            RegionClass::PageHeader | RegionClass::PageFooter | RegionClass::Footnote
        )
    }
}

impl fmt::Display for RegionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionClass {
    type Err = Error;

    /// Parse a detector label. Case and `_`/`-` separators are ignored, so
    /// both `Section-header` and `section_header` are accepted.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        RegionClass::ALL
            .iter()
            .find(|c| c.as_str() == normalized)
            .copied()
            .ok_or_else(|| Error::UnknownClass(s.to_string()))
    }
}

impl TryFrom<String> for RegionClass {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Axis-aligned bounding box in page-pixel space, origin top-left.
///
/// Always satisfies `x1 > x0` and `y1 > y0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBox")]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

#[derive(Deserialize)]
struct RawBox {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl TryFrom<RawBox> for BBox {
    type Error = Error;

    fn try_from(raw: RawBox) -> Result<Self> {
        BBox::new(raw.x0, raw.y0, raw.x1, raw.y1)
    }
}

impl BBox {
    /// Create a validated box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Result<Self> {
        let finite = [x0, y0, x1, y1].iter().all(|v| v.is_finite());
        if !finite || x1 <= x0 || y1 <= y0 {
            return Err(Error::DegenerateBox { x0, y0, x1, y1 });
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Box area.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f32 {
        0.5 * (self.x0 + self.x1)
    }

    /// Vertical center.
    pub fn center_y(&self) -> f32 {
        0.5 * (self.y0 + self.y1)
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// Raw detector output: a classified box without content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Layout class
    pub class: RegionClass,
    /// Bounding box
    #[serde(flatten)]
    pub bbox: BBox,
    /// Detector confidence in `[0, 1]`
    #[serde(alias = "conf")]
    pub confidence: f32,
}

impl Detection {
    /// Create a detection, rejecting non-finite or negative confidence.
    pub fn new(class: RegionClass, bbox: BBox, confidence: f32) -> Result<Self> {
        validate_confidence(confidence)?;
        Ok(Self {
            class,
            bbox,
            confidence,
        })
    }
}

/// A detected region with its extracted content.
///
/// For asset classes `content` is a reference to the cropped image;
/// otherwise it is the text found inside the box. It may be empty but is
/// never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Layout class
    pub class: RegionClass,
    /// Bounding box
    #[serde(flatten)]
    pub bbox: BBox,
    /// Detector confidence in `[0, 1]`
    #[serde(alias = "conf")]
    pub confidence: f32,
    /// 1-indexed page number
    pub page: u32,
    /// Extracted text or asset reference
    pub content: String,
}

impl Region {
    /// Create a region.
    pub fn new(
        class: RegionClass,
        bbox: BBox,
        confidence: f32,
        page: u32,
        content: impl Into<String>,
    ) -> Result<Self> {
        validate_confidence(confidence)?;
        Ok(Self {
            class,
            bbox,
            confidence,
            page,
            content: content.into(),
        })
    }

    /// Attach content to a detection.
    pub fn from_detection(detection: Detection, page: u32, content: impl Into<String>) -> Self {
        Self {
            class: detection.class,
            bbox: detection.bbox,
            confidence: detection.confidence,
            page,
            content: content.into(),
        }
    }

    /// Re-check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        validate_confidence(self.confidence)
    }
}

fn validate_confidence(confidence: f32) -> Result<()> {
    if !confidence.is_finite() || confidence < 0.0 {
        return Err(Error::InvalidRegion(format!(
            "confidence must be a non-negative number, got {}",
            confidence
        )));
    }
    Ok(())
}
