//! # Quire
//!
//! A page-flow pagination engine for character sheets.
//!
//! A sheet is a stack of independently scrollable content blocks (traits,
//! skills, spells, equipment lists), each a sequence of rows with
//! externally measured heights. On screen those blocks scroll; for export
//! they have to be sliced into fixed-size pages. Quire makes that slice:
//! it decides where each block breaks across page boundaries, re-flows a
//! row-group to a fresh page when not even one row fits, and converges on
//! a page set whose geometry is stable and directly rasterizable.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]     — Sheet: block kinds, layout, measured rows
//!       ↓
//!   [paginate]  — Row-fit planning, page building, overflow re-flow
//!       ↓
//!   [render]    — Software canvas, color modes
//!       ↓
//!   [export]    — PDF writer + PNG/JPEG/WEBP page sequences
//! ```
//!
//! Quire does not do text layout. Rows are opaque measured bands; the
//! engine's whole job is deciding how many consecutive rows of each block
//! appear on which page.

pub mod block;
pub mod error;
pub mod export;
pub mod model;
pub mod paginate;
pub mod render;

pub use error::Error;
pub use export::{PageExporter, PageProvider};
pub use model::Sheet;

/// Paginate a sheet and render it to PDF bytes.
///
/// This is the primary entry point for callers that want the whole
/// pipeline in one call.
pub fn export_pdf(sheet: &Sheet) -> Result<Vec<u8>, Error> {
    PageExporter::new(sheet).export_pdf()
}

/// Parse a sheet described as JSON, paginate it, and render PDF bytes.
pub fn export_pdf_json(json: &str) -> Result<Vec<u8>, Error> {
    let sheet: Sheet = serde_json::from_str(json)?;
    export_pdf(&sheet)
}
