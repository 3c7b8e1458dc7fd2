//! # Row-Fit Planning
//!
//! Given how much vertical space is left below a row-group's top edge,
//! decide how many more rows of a block fit on the current page and where
//! the block resumes on the next one. This module encodes the one
//! deliberate policy quirk of the engine: a single row too tall for any
//! page is still placed, in full, on the page where it starts; it
//! overflows the bottom edge rather than deadlocking the planner.

use crate::block::{Block, ROW_SPACING};
use crate::model::BlockKind;

/// Immutable snapshot of one block taken while its row-group is being
/// considered for the current page. The planner works only on snapshots;
/// the orchestrator applies the results back to the placed blocks.
#[derive(Debug, Clone)]
pub struct PageState {
    pub kind: BlockKind,
    pub overhead: f64,
    pub heights: Vec<f64>,
    pub start: usize,
    pub end_before: usize,
    /// Smallest vertical space in which this block can still contribute:
    /// overhead plus its first remaining row. Below this, the whole
    /// row-group has to move to a fresh page.
    pub minimum: f64,
}

impl PageState {
    pub fn capture<B: Block + ?Sized>(kind: BlockKind, block: &B) -> Self {
        let (start, end_before) = block.draw_row_range();
        let heights = block.row_heights().to_vec();
        let mut minimum = block.overhead_height();
        if heights.len() > start {
            minimum += heights[start] + ROW_SPACING;
        }
        Self {
            kind,
            overhead: block.overhead_height(),
            heights,
            start,
            end_before,
            minimum,
        }
    }
}

/// The planner's verdict for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFit {
    /// Draw range end for the current page; the block resumes here on the
    /// next page when `overflowed` is set.
    pub end_before: usize,
    /// True when not all of the block's remaining rows fit.
    pub overflowed: bool,
}

/// Walk rows from the block's current start, charging each row its height
/// plus [`ROW_SPACING`], until the space below the row-group's top runs
/// out. The first row that does not fit becomes the cut point, unless it
/// is the very first remaining row, which is forced through whole.
pub fn fit_rows(remaining: f64, state: &PageState) -> RowFit {
    let mut allowed = remaining - state.overhead;
    for i in state.start..state.end_before {
        allowed -= state.heights[i] + ROW_SPACING;
        if allowed < 0.0 {
            // A first row taller than the page still ships on this page
            // and flows off its bottom edge. No sub-row splitting.
            let end_before = i.max(state.start + 1);
            return RowFit {
                end_before,
                overflowed: true,
            };
        }
    }
    RowFit {
        end_before: state.end_before,
        overflowed: false,
    }
}
