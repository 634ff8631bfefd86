//! # Grid Packer
//!
//! The pagination engine: a deterministic cursor walk over fixed-size
//! label cells. Labels fill the page top-down, left-to-right; the cursor
//! advances one column per slot, wraps to the next row when the column
//! overflows, and signals a page break when the row overflows the bottom
//! margin.
//!
//! The walk is a two-state machine (`Placing`, `PageBreak`) with no
//! lookahead and no backtracking. The packer knows nothing about label
//! identity, only about consumed slots. A separate advisory estimate
//! (`estimate`) reports columns × rows per page for pre-flight capacity
//! display; the incremental walk can diverge from it by at most one
//! row/column due to floating rounding, and callers must tolerate that.

use crate::model::Metrics;

/// Horizontal overflow tolerance in points: a label whose right edge pokes
/// less than this past the page edge still fits.
const EDGE_TOLERANCE: f64 = 1.0;

/// One placement cell handed to the composer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Bottom-left corner of the label, absolute page coordinates.
    pub x: f64,
    pub y: f64,
    /// Zero-based page index.
    pub page: usize,
}

/// Mutable layout state, owned exclusively by the packer for one run.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    x: f64,
    y: f64,
    page: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Placing,
    PageBreak,
}

/// The pagination state machine.
#[derive(Debug)]
pub struct GridPacker {
    page_width: f64,
    page_height: f64,
    label_width: f64,
    label_height: f64,
    margin_x: f64,
    margin_y: f64,
    cursor: Cursor,
    state: State,
}

impl GridPacker {
    pub fn new(m: &Metrics) -> Self {
        GridPacker {
            page_width: m.page_width,
            page_height: m.page_height,
            label_width: m.label_width,
            label_height: m.label_height,
            margin_x: m.margin_x,
            margin_y: m.margin_y,
            cursor: Cursor {
                x: m.margin_x,
                y: m.page_height - m.label_height - m.margin_y,
                page: 0,
            },
            state: State::Placing,
        }
    }

    /// The cell for the next slot. Applies a pending page break first,
    /// then returns the cursor position and advances past it.
    pub fn next_cell(&mut self) -> Cell {
        if self.state == State::PageBreak {
            self.cursor.page += 1;
            self.cursor.x = self.margin_x;
            self.cursor.y = self.page_height - self.label_height - self.margin_y;
            self.state = State::Placing;
        }

        let cell = Cell {
            x: self.cursor.x,
            y: self.cursor.y,
            page: self.cursor.page,
        };
        self.advance();
        cell
    }

    /// Column advance, row wrap, page-break detection.
    fn advance(&mut self) {
        self.cursor.x += self.label_width + self.margin_x;
        if self.cursor.x + self.label_width > self.page_width - EDGE_TOLERANCE {
            self.cursor.x = self.margin_x;
            self.cursor.y -= self.label_height + self.margin_y;
            if self.cursor.y < self.margin_y {
                self.state = State::PageBreak;
            }
        }
    }
}

/// Advisory per-page capacity. Not used for placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub columns: u32,
    pub rows: u32,
}

impl Capacity {
    pub fn labels_per_page(&self) -> u32 {
        self.columns * self.rows
    }
}

/// Estimate columns × rows per page, each floored to at least 1.
pub fn estimate(m: &Metrics) -> Capacity {
    let columns = ((m.page_width - m.margin_x) / (m.label_width + m.margin_x)).floor();
    let rows = ((m.page_height - m.margin_y) / (m.label_height + m.margin_y)).floor();
    Capacity {
        columns: (columns.max(1.0)) as u32,
        rows: (rows.max(1.0)) as u32,
    }
}
