//! # Etiqueta
//!
//! A label-sheet layout and numbering engine.
//!
//! Given a single starting token like "JB-02721", a count, and a page
//! geometry, etiqueta derives a sequence of zero-padded identifiers,
//! expands a text template per label, packs the labels into a grid
//! (wrapping rows and breaking pages as space runs out), and emits one
//! draw-command batch per physical label slot. The engine computes
//! geometry and content only; painting is a backend concern, and the
//! bundled PDF writer is just the reference backend.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]     — SheetConfig: token, counts, geometry, template, QR options
//!   [sequence]  — prefix + zero-padded successors of the start token
//!   [template]  — {NAME} placeholder expansion per label
//!   [qr]        — payload string (plain, or URL with percent-encoded params)
//!       ↓
//!   [layout]    — cursor walk: column advance, row wrap, page break
//!       ↓
//!   [compose]   — one draw-command batch per slot, grouped into pages
//!       ↓
//!   [pdf]       — serialize the pages to PDF bytes (reference backend)
//! ```

pub mod compose;
pub mod error;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod qr;
pub mod sequence;
pub mod template;

pub use compose::{compose, compose_with};
pub use error::EtiquetaError;
pub use model::{DrawCommand, LabelSlot, Page, Sheet, SheetConfig};

use layout::Capacity;
use pdf::PdfWriter;

/// Advisory per-page capacity for a config: columns × rows.
///
/// Pre-flight reporting only; actual placement is the incremental walk,
/// which may diverge by one row or column.
pub fn capacity(config: &SheetConfig) -> Result<Capacity, EtiquetaError> {
    let metrics = config.validate()?;
    Ok(layout::estimate(&metrics))
}

/// Compose a sheet described as JSON.
pub fn compose_json(json: &str) -> Result<Sheet, EtiquetaError> {
    let config: SheetConfig = serde_json::from_str(json)?;
    compose(&config)
}

/// Render a sheet config to PDF bytes.
///
/// This is the primary entry point for callers that want the finished
/// document rather than the draw commands.
pub fn render(config: &SheetConfig) -> Result<Vec<u8>, EtiquetaError> {
    let sheet = compose(config)?;
    PdfWriter::new().write(&sheet)
}

/// Render a sheet config described as JSON to PDF bytes.
pub fn render_json(json: &str) -> Result<Vec<u8>, EtiquetaError> {
    let config: SheetConfig = serde_json::from_str(json)?;
    render(&config)
}
