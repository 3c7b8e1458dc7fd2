//! # Measurable Blocks
//!
//! Everything the pagination engine knows about a content block comes
//! through the [`Block`] trait: a fixed per-page overhead (the header
//! band), a list of row heights, and a mutable draw range selecting which
//! contiguous slice of rows the block currently shows. Blocks never
//! paginate themselves: they are range-addressable content sources, and
//! the engine decides the ranges.

use crate::model::{BlockKind, Rect};
use crate::render::{Canvas, ColorMode, Paint};

/// Vertical space reserved between consecutive rows, in points. The
/// planner charges each row this on top of its reported height; the
/// painter uses it for the divider line.
pub const ROW_SPACING: f64 = 1.0;

/// Header band height for list blocks, in points.
pub const LIST_HEADER_HEIGHT: f64 = 16.0;

/// Height of the identity banner on the first page, in points.
pub const BANNER_HEIGHT: f64 = 72.0;

/// A content block the engine can measure and slice across pages.
///
/// Heights are in points and stay fixed for the duration of one export.
/// The draw range `[start, end_before)` selects which rows the block
/// renders; setting it changes what the next measure pass reports.
pub trait Block {
    /// Fixed vertical space the block consumes on every page it appears
    /// on, regardless of how many rows are shown.
    fn overhead_height(&self) -> f64;

    /// The height of every content row, in original order.
    fn row_heights(&self) -> &[f64];

    /// The currently drawn row range as `(start, end_before)`.
    fn draw_row_range(&self) -> (usize, usize);

    /// Restrict rendering to rows in `[start, end_before)`.
    fn set_draw_row_range(&mut self, start: usize, end_before: usize);

    /// The vertical space the block occupies with its current draw range:
    /// overhead plus the visible rows' heights. This is the measure pass,
    /// deterministic and derived entirely from the contract above.
    fn visible_height(&self) -> f64 {
        let (start, end_before) = self.draw_row_range();
        self.overhead_height() + self.row_heights()[start..end_before].iter().sum::<f64>()
    }
}

/// A block that can also paint itself onto a canvas. Pages own these.
pub trait SheetBlock: Block + Paint {}

impl<T: Block + Paint> SheetBlock for T {}

/// Produces a fresh block bound to the live document data for a kind.
/// Returns `None` when the kind has nothing to show.
pub trait BlockSource {
    fn block(&self, kind: BlockKind) -> Option<Box<dyn SheetBlock>>;
}

/// The standard list block: a titled header band over banded content rows.
/// All ten sheet block kinds are instances of this shape.
pub struct ListBlock {
    title: String,
    rows: Vec<String>,
    heights: Vec<f64>,
    overhead: f64,
    range: (usize, usize),
}

impl ListBlock {
    pub fn new(
        title: String,
        overhead: f64,
        rows: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        let (rows, heights): (Vec<String>, Vec<f64>) = rows.into_iter().unzip();
        let count = heights.len();
        Self {
            title,
            rows,
            heights,
            overhead,
            range: (0, count),
        }
    }
}

impl Block for ListBlock {
    fn overhead_height(&self) -> f64 {
        self.overhead
    }

    fn row_heights(&self) -> &[f64] {
        &self.heights
    }

    fn draw_row_range(&self) -> (usize, usize) {
        self.range
    }

    fn set_draw_row_range(&mut self, start: usize, end_before: usize) {
        debug_assert!(start <= end_before && end_before <= self.heights.len());
        self.range = (start, end_before);
    }
}

impl Paint for ListBlock {
    fn paint(&self, canvas: &mut Canvas, frame: Rect, mode: ColorMode) {
        let header = Rect {
            x: frame.x,
            y: frame.y,
            width: frame.width,
            height: self.overhead.min(frame.height),
        };
        canvas.fill_rect(header, mode.header());
        canvas.greek_line(
            &self.title,
            frame.x + 4.0,
            frame.y + self.overhead * 0.3,
            frame.width - 8.0,
            self.overhead * 0.4,
            mode.on_header(),
        );

        let (start, end_before) = self.range;
        let mut y = frame.y + self.overhead;
        for i in start..end_before {
            let height = self.heights[i];
            if i % 2 == 1 {
                canvas.fill_rect(
                    Rect {
                        x: frame.x,
                        y,
                        width: frame.width,
                        height,
                    },
                    mode.banding(),
                );
            }
            canvas.greek_line(
                &self.rows[i],
                frame.x + 4.0,
                y + height * 0.25,
                frame.width - 8.0,
                height * 0.5,
                mode.ink(),
            );
            // Divider sits inside the row's own band so painted geometry
            // never exceeds the measured height.
            canvas.fill_rect(
                Rect {
                    x: frame.x,
                    y: y + height - ROW_SPACING,
                    width: frame.width,
                    height: ROW_SPACING,
                },
                mode.divider(),
            );
            y += height;
        }
    }
}

/// The identity banner shown at the top of the first page.
pub struct SheetBanner {
    pub name: String,
    pub player: String,
    pub height: f64,
}

impl SheetBanner {
    pub fn new(name: String, player: String) -> Self {
        Self {
            name,
            player,
            height: BANNER_HEIGHT,
        }
    }
}

impl Paint for SheetBanner {
    fn paint(&self, canvas: &mut Canvas, frame: Rect, mode: ColorMode) {
        canvas.fill_rect(frame, mode.header());
        canvas.greek_line(
            &self.name,
            frame.x + 8.0,
            frame.y + frame.height * 0.2,
            frame.width - 16.0,
            frame.height * 0.3,
            mode.on_header(),
        );
        canvas.greek_line(
            &self.player,
            frame.x + 8.0,
            frame.y + frame.height * 0.62,
            (frame.width - 16.0) * 0.5,
            frame.height * 0.18,
            mode.on_header(),
        );
    }
}
