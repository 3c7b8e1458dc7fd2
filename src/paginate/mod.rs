//! # Page-Flow Pagination
//!
//! This is the heart of the crate: deciding how variable-height content
//! blocks flow into a sequence of fixed-size pages.
//!
//! The engine never lays content on an infinite canvas and slices it
//! afterwards. It builds each page directly:
//!
//! 1. Assemble the next row-group: one block per column, each showing
//!    all of its not-yet-placed rows.
//! 2. Measure the page. If nothing extends past the bottom edge, the
//!    row-group is accepted whole and this column group is done.
//! 3. If not even the first remaining row of some column fits below the
//!    row-group's top, move the whole row-group to a fresh page.
//! 4. Run the row-fit planner per column: trim each block's draw range to
//!    what fits, remember where it resumes.
//! 5. If anything was trimmed, open a new page and loop; the resumed
//!    rows start a fresh row-group there.
//! 6. Once every column group is exhausted, force one final layout pass
//!    per page at the fixed page size so stored geometry is consistent
//!    before rendering.
//!
//! Every row is placed exactly once, in order. Overflow is steady-state
//! control flow here, not an error: even a row taller than the page makes
//! forward progress (it is forced through and flows off the bottom edge).

pub mod row_fit;

use std::collections::HashMap;

use log::debug;

use crate::block::{BlockSource, SheetBanner, SheetBlock};
use crate::model::{BlockKind, BlockLayout, Edges, PageSettings, Rect, Size};
use crate::render::{Canvas, ColorMode, Paint};
use row_fit::{fit_rows, PageState};

/// Horizontal space between columns of a row-group, in points.
pub const COLUMN_SPACING: f64 = 1.0;

/// One block placed on a page, with the draw range the engine assigned it.
pub struct PlacedBlock {
    kind: BlockKind,
    block: Box<dyn SheetBlock>,
    frame: Rect,
}

impl PlacedBlock {
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn draw_row_range(&self) -> (usize, usize) {
        self.block.draw_row_range()
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }
}

/// One horizontal band on a page: the blocks of a column group placed
/// side by side with equal column widths.
pub struct RowGroup {
    blocks: Vec<PlacedBlock>,
    frame: Rect,
}

impl RowGroup {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            frame: Rect::default(),
        }
    }

    pub fn blocks(&self) -> &[PlacedBlock] {
        &self.blocks
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }
}

/// A page under construction or finished. All pages of one export share
/// the same fixed size; only the first carries the identity banner.
pub struct Page {
    size: Size,
    insets: Edges,
    banner: Option<SheetBanner>,
    row_groups: Vec<RowGroup>,
    force_layout: bool,
    preferred_height: f64,
}

impl Page {
    fn new(size: Size, insets: Edges) -> Self {
        Self {
            size,
            insets,
            banner: None,
            row_groups: Vec::new(),
            force_layout: false,
            preferred_height: insets.vertical(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn banner(&self) -> Option<&SheetBanner> {
        self.banner.as_ref()
    }

    pub fn row_groups(&self) -> &[RowGroup] {
        &self.row_groups
    }

    /// The page's measured height: insets, banner, and every row-group
    /// stacked top to bottom. May exceed the page size mid-pagination;
    /// that is exactly what the orchestrator watches for.
    pub fn preferred_height(&self) -> f64 {
        self.preferred_height
    }

    fn banner_frame(&self) -> Option<Rect> {
        self.banner.as_ref().map(|banner| Rect {
            x: self.insets.left,
            y: self.insets.top,
            width: self.size.width - self.insets.horizontal(),
            height: banner.height,
        })
    }

    /// Recompute every frame on the page from the current draw ranges.
    fn layout(&mut self) {
        let content_x = self.insets.left;
        let content_width = self.size.width - self.insets.horizontal();
        let mut y = self.insets.top;
        if let Some(banner) = &self.banner {
            y += banner.height;
        }
        for group in &mut self.row_groups {
            let columns = group.blocks.len();
            let column_width =
                (content_width - COLUMN_SPACING * (columns - 1) as f64) / columns as f64;
            let height = group
                .blocks
                .iter()
                .map(|placed| placed.block.visible_height())
                .fold(0.0_f64, f64::max);
            group.frame = Rect {
                x: content_x,
                y,
                width: content_width,
                height,
            };
            let mut x = content_x;
            for placed in &mut group.blocks {
                placed.frame = Rect {
                    x,
                    y,
                    width: column_width,
                    height,
                };
                x += column_width + COLUMN_SPACING;
            }
            y += height;
        }
        self.preferred_height = y + self.insets.bottom;
    }

    fn last_row_group_top(&self) -> f64 {
        self.row_groups
            .last()
            .map(|group| group.frame.y)
            .unwrap_or(self.insets.top)
    }

    /// The once-per-export final pass: mark the geometry authoritative and
    /// re-lay-out at the fixed page size.
    fn finalize(&mut self) {
        self.force_layout = true;
        self.layout();
    }

    /// Paint the page onto a canvas in the given color mode.
    pub fn draw(&self, canvas: &mut Canvas, mode: ColorMode) {
        debug_assert!(self.force_layout, "page drawn before finalization");
        canvas.fill_rect(
            Rect {
                x: 0.0,
                y: 0.0,
                width: self.size.width,
                height: self.size.height,
            },
            mode.background(),
        );
        if let (Some(banner), Some(frame)) = (&self.banner, self.banner_frame()) {
            banner.paint(canvas, frame, mode);
        }
        for group in &self.row_groups {
            for placed in &group.blocks {
                placed.block.paint(canvas, placed.frame, mode);
            }
        }
    }
}

/// Slice a sheet's blocks into pages.
///
/// Walks the layout's column groups in order, repeatedly instantiating
/// each group's blocks with the rows they have left and letting the
/// overflow machinery trim and re-flow until every row is placed. The
/// returned pages are finalized and ready to draw.
pub fn paginate(
    source: &dyn BlockSource,
    layout: &BlockLayout,
    settings: &PageSettings,
    banner: Option<SheetBanner>,
) -> Vec<Page> {
    let size = settings.page_size();
    let insets = settings.margin;
    let mut first = Page::new(size, insets);
    first.banner = banner;
    let mut pages = vec![first];

    for group in layout.groups() {
        // Where each block picks up on the next page; reset per column group.
        let mut resume: HashMap<BlockKind, usize> = HashMap::new();
        loop {
            let mut row_group = RowGroup::new();
            for &kind in group {
                let Some(mut block) = source.block(kind) else {
                    continue;
                };
                let start = resume.get(&kind).copied().unwrap_or(0);
                let count = block.row_heights().len();
                if count > start {
                    block.set_draw_row_range(start, count);
                    row_group.blocks.push(PlacedBlock {
                        kind,
                        block,
                        frame: Rect::default(),
                    });
                }
            }
            if row_group.blocks.is_empty() {
                break; // every block in this column group is fully placed
            }

            let mut last = pages.len() - 1;
            pages[last].row_groups.push(row_group);
            pages[last].layout();
            if pages[last].preferred_height - size.height <= 0.0 {
                break; // the whole remainder fit; on to the next column group
            }

            let mut remaining =
                (size.height - insets.bottom) - pages[last].last_row_group_top();
            let states: Vec<PageState> = pages[last]
                .row_groups
                .last()
                .expect("row-group was just pushed")
                .blocks
                .iter()
                .map(|placed| PageState::capture(placed.kind, placed.block.as_ref()))
                .collect();

            if states.iter().any(|state| remaining < state.minimum) {
                // Not even the first remaining row of some column fits below
                // the row-group's top: move the whole row-group to a fresh
                // page and re-measure there.
                let row_group = pages[last]
                    .row_groups
                    .pop()
                    .expect("row-group was just pushed");
                let mut fresh = Page::new(size, insets);
                fresh.row_groups.push(row_group);
                fresh.layout();
                pages.push(fresh);
                last += 1;
                if pages[last].preferred_height - size.height <= 0.0 {
                    break; // fits whole at the top of the new page
                }
                remaining =
                    (size.height - insets.bottom) - pages[last].last_row_group_top();
            }

            let mut start_new_page = false;
            let group_index = pages[last].row_groups.len() - 1;
            for (column, state) in states.iter().enumerate() {
                // Assume the rest fits; the planner overrides on overflow.
                resume.insert(state.kind, state.heights.len());
                let fit = fit_rows(remaining, state);
                if fit.overflowed {
                    pages[last].row_groups[group_index].blocks[column]
                        .block
                        .set_draw_row_range(state.start, fit.end_before);
                    resume.insert(state.kind, fit.end_before);
                    start_new_page = true;
                }
            }
            if start_new_page {
                debug!(
                    "page {} filled; resuming column group on page {}",
                    pages.len(),
                    pages.len() + 1
                );
                pages.push(Page::new(size, insets));
            }
        }
    }

    for page in &mut pages {
        page.finalize();
    }
    debug!("paginated into {} page(s)", pages.len());
    pages
}
