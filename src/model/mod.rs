//! # Sheet Model
//!
//! The input representation for the engine and the draw-command output it
//! produces. A `SheetConfig` describes one generation run: the starting
//! identifier token, how many labels to number, the page and label
//! geometry, the text template, and the QR options. This is designed to be
//! easily produced by a form frontend or direct JSON construction.
//!
//! All layout happens in points (1/72 inch). Physical label geometry may
//! be authored in millimetres via [`Unit::Mm`]; font size and line spacing
//! are always typographic points.

use crate::error::EtiquetaError;
use crate::qr::QrPayload;
use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const MM: f64 = 72.0 / 25.4;

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    A4,
    A5,
    #[default]
    Letter,
    Legal,
    /// Explicit page dimensions in points, regardless of [`Unit`].
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// The unit in which label geometry fields are authored.
///
/// Applies to label dimensions, margins, padding, and QR size. Page sizes
/// are points (see [`PageSize`]), as are font size and line spacing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Pt,
    #[default]
    Mm,
}

impl Unit {
    /// Conversion factor from this unit to points.
    pub fn to_points(&self) -> f64 {
        match self {
            Unit::Pt => 1.0,
            Unit::Mm => MM,
        }
    }
}

/// Configuration for one generation run. Immutable once composition starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetConfig {
    /// Starting identifier token, e.g. "JB-02721". A trailing digit run
    /// becomes the auto-incrementing suffix; without one, every label
    /// carries the token unchanged.
    pub start: String,

    /// How many distinct identifiers to lay out.
    pub count: u32,

    /// How many consecutive slots each identifier occupies.
    #[serde(default = "default_one")]
    pub repetitions: u32,

    #[serde(default)]
    pub page: PageSize,

    #[serde(default)]
    pub unit: Unit,

    pub label_width: f64,
    pub label_height: f64,

    /// Horizontal gap between labels, also the left page margin.
    #[serde(default = "default_margin")]
    pub margin_x: f64,
    /// Vertical gap between labels, also the top/bottom page margin.
    #[serde(default = "default_margin")]
    pub margin_y: f64,

    /// Inset between the label border and its text / QR glyph.
    #[serde(default = "default_padding")]
    pub padding: f64,

    /// Font size in points.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Vertical advance between text lines, in points.
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f64,

    /// Template lines. `{NAME}` placeholders are substituted per label;
    /// blank lines are dropped.
    pub lines: Vec<String>,

    /// Whether to emit a QR glyph per label.
    #[serde(default = "default_true")]
    pub qr: bool,
    /// QR glyph side length. Ignored when `qr` is false; a zero size
    /// disables the glyph without error.
    #[serde(default = "default_qr_size")]
    pub qr_size: f64,
    /// How the QR payload string is built from the label's bindings.
    #[serde(default)]
    pub qr_payload: QrPayload,
}

fn default_one() -> u32 {
    1
}

fn default_margin() -> f64 {
    10.0
}

fn default_padding() -> f64 {
    5.0
}

fn default_font_size() -> f64 {
    6.0
}

fn default_line_spacing() -> f64 {
    8.0
}

fn default_qr_size() -> f64 {
    30.0
}

fn default_true() -> bool {
    true
}

/// Unit-resolved geometry, all in points. The only form the layout engine
/// and composer ever see.
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    pub page_width: f64,
    pub page_height: f64,
    pub label_width: f64,
    pub label_height: f64,
    pub margin_x: f64,
    pub margin_y: f64,
    pub padding: f64,
    pub qr_size: f64,
}

impl SheetConfig {
    /// Resolve the configured geometry to points.
    pub fn metrics(&self) -> Metrics {
        let scale = self.unit.to_points();
        let (page_width, page_height) = self.page.dimensions();
        Metrics {
            page_width,
            page_height,
            label_width: self.label_width * scale,
            label_height: self.label_height * scale,
            margin_x: self.margin_x * scale,
            margin_y: self.margin_y * scale,
            padding: self.padding * scale,
            qr_size: self.qr_size * scale,
        }
    }

    /// Validate the config and return its resolved metrics.
    ///
    /// Rejection happens here, synchronously, before any slot is placed.
    pub fn validate(&self) -> Result<Metrics, EtiquetaError> {
        if self.count == 0 {
            return Err(EtiquetaError::InvalidConfig(
                "count must be at least 1".to_string(),
            ));
        }
        if self.repetitions == 0 {
            return Err(EtiquetaError::InvalidConfig(
                "repetitions must be at least 1".to_string(),
            ));
        }
        if self.label_width <= 0.0 || self.label_height <= 0.0 {
            return Err(EtiquetaError::InvalidConfig(
                "label dimensions must be positive".to_string(),
            ));
        }
        if self.margin_x < 0.0 || self.margin_y < 0.0 || self.padding < 0.0 {
            return Err(EtiquetaError::InvalidConfig(
                "margins and padding cannot be negative".to_string(),
            ));
        }
        if self.font_size <= 0.0 || self.line_spacing <= 0.0 {
            return Err(EtiquetaError::InvalidConfig(
                "font size and line spacing must be positive".to_string(),
            ));
        }
        if self.qr && self.qr_size < 0.0 {
            return Err(EtiquetaError::InvalidConfig(
                "QR size cannot be negative".to_string(),
            ));
        }

        let m = self.metrics();
        if m.label_width + m.margin_x > m.page_width {
            return Err(EtiquetaError::InvalidConfig(format!(
                "label width {:.1}pt plus margin {:.1}pt exceeds page width {:.1}pt",
                m.label_width, m.margin_x, m.page_width
            )));
        }
        if m.label_height + m.margin_y > m.page_height {
            return Err(EtiquetaError::InvalidConfig(format!(
                "label height {:.1}pt plus margin {:.1}pt exceeds page height {:.1}pt",
                m.label_height, m.margin_y, m.page_height
            )));
        }
        Ok(m)
    }
}

/// One drawing primitive, in absolute page coordinates (origin bottom-left).
///
/// Produced by the composer, consumed by a rendering backend. The engine
/// never touches pixels or PDF bytes itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DrawCommand {
    /// Outline rectangle: the label border.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// One line of label text, anchored at its baseline start.
    Text {
        x: f64,
        y: f64,
        content: String,
        font_size: f64,
    },
    /// QR glyph: square of the given side length, encoding `payload`.
    Qr {
        x: f64,
        y: f64,
        size: f64,
        payload: String,
    },
}

/// The draw-command batch for one physical label slot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSlot {
    /// The identifier printed in this slot, kept for inspection.
    pub identifier: String,
    pub commands: Vec<DrawCommand>,
}

/// One laid-out physical page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Page {
    pub slots: Vec<LabelSlot>,
}

/// A fully composed sheet run: every page, every slot, in placement order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub page_width: f64,
    pub page_height: f64,
    pub pages: Vec<Page>,
}

impl Sheet {
    /// Total label slots across all pages.
    pub fn slot_count(&self) -> usize {
        self.pages.iter().map(|p| p.slots.len()).sum()
    }

    /// Page-break signals observed during composition.
    pub fn page_breaks(&self) -> usize {
        self.pages.len().saturating_sub(1)
    }

    /// All slots in placement order, ignoring page boundaries.
    pub fn slots(&self) -> impl Iterator<Item = &LabelSlot> {
        self.pages.iter().flat_map(|p| p.slots.iter())
    }
}
