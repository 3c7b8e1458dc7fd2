//! # Sheet Document Model
//!
//! The input representation for the pagination engine. A sheet names its
//! character, chooses a page setup, and supplies content for some subset of
//! the standard block kinds. Content rows arrive pre-measured: whatever
//! produced the sheet (an editor, a generator, a test) reports each row's
//! height in points, and the engine never looks inside a row.
//!
//! This is deliberately not a rich document tree. The engine's job is
//! deciding *which rows land on which page*, so the model carries exactly
//! the geometry that decision needs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::block::{BlockSource, ListBlock, SheetBlock, LIST_HEADER_HEIGHT};

/// The block kinds that can appear on a sheet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Reactions,
    ConditionalModifiers,
    MeleeWeapons,
    RangedWeapons,
    Traits,
    Skills,
    Spells,
    Equipment,
    OtherEquipment,
    Notes,
}

impl BlockKind {
    /// Default display title for the block's header band.
    pub fn title(self) -> &'static str {
        match self {
            BlockKind::Reactions => "Reactions",
            BlockKind::ConditionalModifiers => "Conditional Modifiers",
            BlockKind::MeleeWeapons => "Melee Weapons",
            BlockKind::RangedWeapons => "Ranged Weapons",
            BlockKind::Traits => "Traits",
            BlockKind::Skills => "Skills",
            BlockKind::Spells => "Spells",
            BlockKind::Equipment => "Equipment",
            BlockKind::OtherEquipment => "Other Equipment",
            BlockKind::Notes => "Notes",
        }
    }
}

/// Which blocks appear where: an ordered list of column groups, each naming
/// the block kinds shown side by side in one horizontal band. The engine
/// keeps re-emitting a column group's blocks onto successive pages until
/// all of their rows are placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockLayout(pub Vec<Vec<BlockKind>>);

impl Default for BlockLayout {
    fn default() -> Self {
        BlockLayout(vec![
            vec![BlockKind::Reactions, BlockKind::ConditionalModifiers],
            vec![BlockKind::MeleeWeapons],
            vec![BlockKind::RangedWeapons],
            vec![BlockKind::Traits, BlockKind::Skills],
            vec![BlockKind::Spells],
            vec![BlockKind::Equipment],
            vec![BlockKind::OtherEquipment],
            vec![BlockKind::Notes],
        ])
    }
}

impl BlockLayout {
    pub fn groups(&self) -> impl Iterator<Item = &[BlockKind]> {
        self.0.iter().map(Vec::as_slice)
    }
}

/// Standard paper sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    Letter,
    Legal,
    Tabloid,
    A3,
    A4,
    A5,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PaperSize {
    /// Returns (width, height) in points, portrait orientation.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PaperSize::Letter => (612.0, 792.0),
            PaperSize::Legal => (612.0, 1008.0),
            PaperSize::Tabloid => (792.0, 1224.0),
            PaperSize::A3 => (841.89, 1190.55),
            PaperSize::A4 => (595.28, 841.89),
            PaperSize::A5 => (419.53, 595.28),
            PaperSize::Custom { width, height } => (*width, *height),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    fn apply(self, dims: (f64, f64)) -> (f64, f64) {
        match self {
            Orientation::Portrait => dims,
            Orientation::Landscape => (dims.1, dims.0),
        }
    }
}

/// Page setup shared by every page of one export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSettings {
    #[serde(default)]
    pub paper: PaperSize,
    #[serde(default)]
    pub orientation: Orientation,
    /// Page margins in points.
    #[serde(default = "default_margin")]
    pub margin: Edges,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            paper: PaperSize::Letter,
            orientation: Orientation::Portrait,
            margin: default_margin(),
        }
    }
}

fn default_margin() -> Edges {
    Edges::uniform(18.0) // quarter inch
}

impl PageSettings {
    /// The fixed page size for this export, in points.
    pub fn page_size(&self) -> Size {
        let (width, height) = self.orientation.apply(self.paper.dimensions());
        Size { width, height }
    }
}

/// Edge values (top, right, bottom, left) used for margins.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// A width × height pair in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// An axis-aligned rectangle in page coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A complete sheet ready for pagination and export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    /// Character name. Becomes the PDF title and the banner headline.
    #[serde(default)]
    pub name: String,
    /// Player name. Becomes the PDF author.
    #[serde(default)]
    pub player: String,
    #[serde(default)]
    pub page: PageSettings,
    #[serde(default)]
    pub layout: BlockLayout,
    /// Content per block kind. Kinds absent here simply do not appear.
    #[serde(default)]
    pub blocks: BTreeMap<BlockKind, BlockContent>,
}

/// The content of one block: an optional title override and measured rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockContent {
    #[serde(default)]
    pub title: Option<String>,
    pub rows: Vec<Row>,
}

/// One content row. The height is reported by whatever measured the row
/// upstream; the engine treats it as opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_row_height")]
    pub height: f64,
}

fn default_row_height() -> f64 {
    14.0
}

impl BlockSource for Sheet {
    fn block(&self, kind: BlockKind) -> Option<Box<dyn SheetBlock>> {
        let content = self.blocks.get(&kind)?;
        if content.rows.is_empty() {
            return None;
        }
        let title = content
            .title
            .clone()
            .unwrap_or_else(|| kind.title().to_string());
        Some(Box::new(ListBlock::new(
            title,
            LIST_HEADER_HEIGHT,
            content
                .rows
                .iter()
                .map(|row| (row.text.clone(), row.height)),
        )))
    }
}
