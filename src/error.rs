//! Structured error types for the export pipeline.
//!
//! Overflow during pagination is never an error; the engine resolves it
//! itself. What can actually fail is the boundary: parsing the input sheet,
//! writing output artifacts, and callers asking for pages that do not exist.

use thiserror::Error;

/// The unified error type returned by all public API functions.
#[derive(Debug, Error)]
pub enum Error {
    /// A page index outside `[1, page_count]` was requested.
    #[error("invalid page number")]
    InvalidPage,

    /// Opening, writing, or removing an output artifact failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Encoding a rasterized page to PNG/JPEG/WEBP failed.
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// JSON input failed to parse as a valid sheet document.
    #[error("failed to parse sheet: {0}")]
    Parse(#[from] serde_json::Error),
}
