//! Error types for docsift library.

use std::io;
use thiserror::Error;

/// Result type alias for docsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while processing detector output.
///
/// "Nothing to do" outcomes (no abstract anchor, no references section,
/// an empty page) are not errors; every stage treats them as a no-op.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error, including missing required fields.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A bounding box with zero or negative extent, or non-finite coordinates.
    #[error("Degenerate box ({x0}, {y0}, {x1}, {y1}): expected x1 > x0 and y1 > y0")]
    DegenerateBox {
        /// Left edge
        x0: f32,
        /// Top edge
        y0: f32,
        /// Right edge
        x1: f32,
        /// Bottom edge
        y1: f32,
    },

    /// The region class label is not one of the known layout classes.
    #[error("Unknown region class: {0:?}")]
    UnknownClass(String),

    /// A region record is otherwise malformed.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// Page metadata is malformed.
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// A configured pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The external layout detector or content extractor failed.
    #[error("Detector error: {0}")]
    Detector(String),

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}
