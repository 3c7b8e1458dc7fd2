//! Integration tests for the pagination and export pipeline.
//!
//! These exercise the full path from sheet input to output bytes:
//! - sheets paginate into the expected page sets
//! - draw ranges conserve every row across pages
//! - PDF output is structurally valid
//! - image-sequence export writes correctly named, correctly encoded files
//! - page bounds and color-mode scoping hold at the API surface

use std::collections::BTreeMap;

use quire::block::BANNER_HEIGHT;
use quire::error::Error;
use quire::model::{
    BlockContent, BlockKind, BlockLayout, Edges, Orientation, PageSettings, PaperSize, Row,
    Sheet, Size,
};
use quire::render::{Canvas, Color, ColorMode};
use quire::{PageExporter, PageProvider};

// ─── Helpers ────────────────────────────────────────────────────

fn rows(count: usize, height: f64) -> Vec<Row> {
    (0..count)
        .map(|i| Row {
            text: format!("Entry {i}"),
            height,
        })
        .collect()
}

/// A sheet with one Skills block on a small custom page, so tests stay
/// fast even through the 300 DPI PDF raster path.
fn small_sheet(row_count: usize) -> Sheet {
    let mut blocks = BTreeMap::new();
    blocks.insert(
        BlockKind::Skills,
        BlockContent {
            title: None,
            rows: rows(row_count, 14.0),
        },
    );
    Sheet {
        name: "Kessa Thornwood".into(),
        player: "Robin".into(),
        page: PageSettings {
            paper: PaperSize::Custom {
                width: 120.0,
                height: 160.0,
            },
            orientation: Orientation::Portrait,
            margin: Edges::uniform(6.0),
        },
        layout: BlockLayout(vec![vec![BlockKind::Skills]]),
        blocks,
    }
}

fn skills_ranges(exporter: &PageExporter) -> Vec<(usize, usize)> {
    exporter
        .pages()
        .iter()
        .flat_map(|page| page.row_groups())
        .flat_map(|group| group.blocks())
        .filter(|placed| placed.kind() == BlockKind::Skills)
        .map(|placed| placed.draw_row_range())
        .collect()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(
        bytes.windows(5).any(|w| w == b"%%EOF"),
        "Missing %%EOF marker"
    );
    assert!(bytes.windows(4).any(|w| w == b"xref"), "Missing xref table");
    assert!(
        bytes.windows(7).any(|w| w == b"trailer"),
        "Missing trailer"
    );
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

// ─── Pagination ─────────────────────────────────────────────────

#[test]
fn short_sheet_fits_on_one_page() {
    let exporter = PageExporter::new(&small_sheet(2));
    assert_eq!(exporter.page_count(), 1);
    assert_eq!(skills_ranges(&exporter), vec![(0, 2)]);
}

#[test]
fn tall_sheet_flows_onto_continuation_pages() {
    // Page 1 offers 76 points below the banner; overhead 16 leaves room
    // for four 14+1 rows. The remaining six rows fit page 2 whole.
    let exporter = PageExporter::new(&small_sheet(10));
    assert_eq!(exporter.page_count(), 2);
    assert_eq!(skills_ranges(&exporter), vec![(0, 4), (4, 10)]);
    assert!(exporter.pages()[0].banner().is_some());
    assert!(exporter.pages()[1].banner().is_none());
}

#[test]
fn every_row_lands_on_exactly_one_page() {
    let exporter = PageExporter::new(&small_sheet(100));
    let mut next = 0;
    for (start, end_before) in skills_ranges(&exporter) {
        assert_eq!(start, next, "gap or overlap at row {next}");
        assert!(end_before > start, "empty draw range emitted");
        next = end_before;
    }
    assert_eq!(next, 100);
}

#[test]
fn banner_occupies_the_top_of_the_first_page() {
    let exporter = PageExporter::new(&small_sheet(10));
    let first_group = &exporter.pages()[0].row_groups()[0];
    assert_eq!(first_group.frame().y, 6.0 + BANNER_HEIGHT);
}

// ─── PDF export ─────────────────────────────────────────────────

#[test]
fn pdf_export_is_structurally_valid() {
    let bytes = PageExporter::new(&small_sheet(2)).export_pdf().unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn pdf_page_count_matches_pagination() {
    let exporter = PageExporter::new(&small_sheet(10));
    let bytes = exporter.export_pdf().unwrap();
    assert_eq!(exporter.page_count(), 2);
    assert!(contains(&bytes, b"/Count 2"));
}

#[test]
fn pdf_carries_sheet_metadata() {
    let bytes = PageExporter::new(&small_sheet(2)).export_pdf().unwrap();
    assert!(contains(&bytes, b"/Title (Kessa Thornwood)"));
    assert!(contains(&bytes, b"/Author (Robin)"));
    assert!(contains(&bytes, b"/Keywords (Character Sheet)"));
}

#[test]
fn pdf_file_export_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.pdf");
    let exporter = PageExporter::new(&small_sheet(2));
    exporter.export_pdf_file(&path).unwrap();
    exporter.export_pdf_file(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn json_input_exports_end_to_end() {
    let json = r##"{
        "name": "Wren",
        "page": { "paper": { "Custom": { "width": 100.0, "height": 140.0 } } },
        "blocks": {
            "traits": { "rows": [ { "text": "Combat Reflexes" } ] }
        }
    }"##;
    let bytes = quire::export_pdf_json(json).unwrap();
    assert_valid_pdf(&bytes);
    assert!(contains(&bytes, b"/Title (Wren)"));
}

// ─── Image-sequence export ──────────────────────────────────────

#[test]
fn png_export_writes_one_file_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.png");
    let exporter = PageExporter::new(&small_sheet(10));
    exporter.export_pngs(&path).unwrap();
    for page_number in 1..=exporter.page_count() {
        let bytes = std::fs::read(dir.path().join(format!("sheet-{page_number}.png"))).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "bad PNG signature");
    }
    assert!(!dir.path().join("sheet-3.png").exists());
}

#[test]
fn jpeg_export_writes_jpeg_files() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = PageExporter::new(&small_sheet(2));
    exporter.export_jpegs(&dir.path().join("sheet.jpeg")).unwrap();
    let bytes = std::fs::read(dir.path().join("sheet-1.jpeg")).unwrap();
    assert!(bytes.starts_with(&[0xff, 0xd8]), "bad JPEG signature");
}

#[test]
fn webp_export_writes_webp_files() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = PageExporter::new(&small_sheet(2));
    exporter.export_webps(&dir.path().join("sheet.webp")).unwrap();
    let bytes = std::fs::read(dir.path().join("sheet-1.webp")).unwrap();
    assert!(bytes.starts_with(b"RIFF"), "bad RIFF header");
    assert_eq!(&bytes[8..12], b"WEBP", "bad WEBP fourcc");
}

// ─── Page bounds and theme scoping ──────────────────────────────

#[test]
fn page_bounds_are_one_indexed_and_checked() {
    let exporter = PageExporter::new(&small_sheet(2));
    let count = exporter.page_count();
    assert!(!exporter.has_page(0));
    assert!(exporter.has_page(1));
    assert!(exporter.has_page(count));
    assert!(!exporter.has_page(count + 1));
}

#[test]
fn drawing_an_out_of_range_page_fails_without_drawing() {
    let exporter = PageExporter::new(&small_sheet(2));
    let background = Color::rgb(1, 2, 3);
    let mut canvas = Canvas::new(
        Size {
            width: 120.0,
            height: 160.0,
        },
        1.0,
        background,
    );
    for bad in [0, exporter.page_count() + 1] {
        let err = exporter.draw_page(&mut canvas, bad).unwrap_err();
        assert!(matches!(err, Error::InvalidPage));
    }
    // Canvas untouched by the failed calls.
    assert!(canvas
        .rgb_bytes()
        .chunks_exact(3)
        .all(|px| px == [1u8, 2, 3].as_slice()));
}

#[test]
fn export_restores_the_editor_color_mode() {
    let exporter = PageExporter::new(&small_sheet(2)).with_color_mode(ColorMode::Dark);
    exporter.export_pdf().unwrap();
    assert_eq!(exporter.color_mode(), ColorMode::Dark);

    let dir = tempfile::tempdir().unwrap();
    exporter.export_pngs(&dir.path().join("sheet.png")).unwrap();
    assert_eq!(exporter.color_mode(), ColorMode::Dark);
}
