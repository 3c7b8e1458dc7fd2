//! # Export Pipeline
//!
//! Wraps a finalized page set behind the page-provider contract and
//! renders it out: one multi-page PDF, or one image file per page in
//! PNG, JPEG, or WEBP. The three raster encodings share a single drawing
//! loop parameterized only by the encoder; the PDF path streams pages
//! into a multi-page document writer instead.
//!
//! Rendering always runs in the light color mode so artifacts are
//! consistent regardless of the editor's on-screen theme. The mode is
//! flipped through a scoped guard and restored on every exit path,
//! including failures.

pub mod pdf;

use std::cell::Cell;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::{WebPEncoder, WebPQuality};
use image::ImageEncoder;
use log::info;

use crate::block::SheetBanner;
use crate::error::Error;
use crate::model::{Sheet, Size};
use crate::paginate::{paginate, Page};
use crate::render::{Canvas, ColorMode, ScopedColorMode};
use pdf::{PdfMetadata, PdfWriter};

/// Resolution PDF pages are rasterized at, in dots per inch.
pub const PDF_RASTER_DPI: f64 = 300.0;
/// PDF page-image encoding quality; above 100 means lossless.
pub const PDF_ENCODING_QUALITY: u8 = 101;
/// Default resolution for image-sequence export, in dots per inch.
pub const DEFAULT_IMAGE_RESOLUTION: u32 = 200;
/// Fixed quality for lossy JPEG export.
pub const JPEG_QUALITY: u8 = 80;
/// Fixed quality for lossy WEBP export.
pub const WEBP_QUALITY: u8 = 75;

/// The contract a rasterizer consumes: a 1-indexed, bounds-checked view
/// of the finished page set.
pub trait PageProvider {
    fn has_page(&self, page_number: usize) -> bool;
    fn page_size(&self) -> Size;
    fn draw_page(&self, canvas: &mut Canvas, page_number: usize) -> Result<(), Error>;
}

/// Paginates a sheet once and exports the resulting page set in any of
/// the supported encodings. One exporter serves one sheet snapshot;
/// nothing here is synchronized for concurrent use.
pub struct PageExporter {
    pages: Vec<Page>,
    page_size: Size,
    title: String,
    author: String,
    color_mode: Cell<ColorMode>,
    resolution: u32,
}

impl PageExporter {
    pub fn new(sheet: &Sheet) -> Self {
        let banner = SheetBanner::new(sheet.name.clone(), sheet.player.clone());
        let pages = paginate(sheet, &sheet.layout, &sheet.page, Some(banner));
        Self {
            pages,
            page_size: sheet.page.page_size(),
            title: sheet.name.clone(),
            author: sheet.player.clone(),
            color_mode: Cell::new(ColorMode::default()),
            resolution: DEFAULT_IMAGE_RESOLUTION,
        }
    }

    /// The editor's current on-screen color mode. Export forces `Light`
    /// for its own duration and restores this afterwards.
    pub fn with_color_mode(self, mode: ColorMode) -> Self {
        self.color_mode.set(mode);
        self
    }

    /// Raster resolution for image-sequence export, in dots per inch.
    pub fn with_resolution(mut self, dpi: u32) -> Self {
        self.resolution = dpi;
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode.get()
    }

    /// Export the whole page set as PDF bytes in memory.
    pub fn export_pdf(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        self.write_pdf(&mut buf)?;
        Ok(buf)
    }

    /// Export the whole page set as a PDF file, replacing any existing
    /// file at `path`.
    pub fn export_pdf_file(&self, path: &Path) -> Result<(), Error> {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        let file = fs::File::create(path)?;
        let mut out = BufWriter::new(file);
        self.write_pdf(&mut out)?;
        out.flush()?;
        info!("wrote {} page(s) to {}", self.pages.len(), path.display());
        Ok(())
    }

    fn write_pdf<W: Write>(&self, out: W) -> Result<(), Error> {
        let _mode = ScopedColorMode::light(&self.color_mode);
        let metadata = PdfMetadata {
            title: self.title.clone(),
            author: self.author.clone(),
            subject: self.title.clone(),
            keywords: "Character Sheet".into(),
            creator: "Quire".into(),
            raster_dpi: PDF_RASTER_DPI,
            encoding_quality: PDF_ENCODING_QUALITY,
        };
        let raster_dpi = metadata.raster_dpi;
        let mut writer = PdfWriter::begin(out, self.page_size, metadata)?;
        let mut page_number = 1;
        while self.has_page(page_number) {
            let mut canvas = self.raster_canvas(raster_dpi);
            self.draw_page(&mut canvas, page_number)?;
            writer.add_page(&canvas)?;
            page_number += 1;
        }
        writer.finish()
    }

    /// Export one PNG per page, named `<base>-<n>.png`.
    pub fn export_pngs(&self, path: &Path) -> Result<(), Error> {
        self.export_images(path, "png", encode_png)
    }

    /// Export one JPEG per page, named `<base>-<n>.jpeg`.
    pub fn export_jpegs(&self, path: &Path) -> Result<(), Error> {
        self.export_images(path, "jpeg", |canvas| encode_jpeg(canvas, JPEG_QUALITY))
    }

    /// Export one WEBP per page, named `<base>-<n>.webp`.
    pub fn export_webps(&self, path: &Path) -> Result<(), Error> {
        self.export_images(path, "webp", |canvas| encode_webp(canvas, WEBP_QUALITY))
    }

    /// Shared drawing loop for the raster encodings. Earlier pages already
    /// written are left behind if a later page fails; no cleanup of
    /// abandoned files is attempted.
    fn export_images(
        &self,
        path: &Path,
        extension: &str,
        encode: impl Fn(&Canvas) -> Result<Vec<u8>, Error>,
    ) -> Result<(), Error> {
        let path_str = path.to_string_lossy();
        let base = path_str
            .strip_suffix(&format!(".{extension}"))
            .unwrap_or(&path_str)
            .to_string();
        let _mode = ScopedColorMode::light(&self.color_mode);
        let mut page_number = 1;
        while self.has_page(page_number) {
            let mut canvas = self.raster_canvas(self.resolution as f64);
            self.draw_page(&mut canvas, page_number)?;
            let data = encode(&canvas)?;
            fs::write(format!("{base}-{page_number}.{extension}"), data)?;
            page_number += 1;
        }
        info!(
            "wrote {} {} file(s) to {}-*.{}",
            self.pages.len(),
            extension,
            base,
            extension
        );
        Ok(())
    }

    fn raster_canvas(&self, dpi: f64) -> Canvas {
        Canvas::new(
            self.page_size,
            dpi / 72.0,
            self.color_mode.get().background(),
        )
    }
}

impl PageProvider for PageExporter {
    fn has_page(&self, page_number: usize) -> bool {
        page_number > 0 && page_number <= self.pages.len()
    }

    fn page_size(&self) -> Size {
        self.page_size
    }

    fn draw_page(&self, canvas: &mut Canvas, page_number: usize) -> Result<(), Error> {
        if page_number == 0 || page_number > self.pages.len() {
            return Err(Error::InvalidPage);
        }
        self.pages[page_number - 1].draw(canvas, self.color_mode.get());
        Ok(())
    }
}

fn encode_png(canvas: &Canvas) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        canvas.rgb_bytes(),
        canvas.pixel_width(),
        canvas.pixel_height(),
        image::ColorType::Rgb8,
    )?;
    Ok(buf)
}

fn encode_jpeg(canvas: &Canvas, quality: u8) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode(
        canvas.rgb_bytes(),
        canvas.pixel_width(),
        canvas.pixel_height(),
        image::ColorType::Rgb8,
    )?;
    Ok(buf)
}

fn encode_webp(canvas: &Canvas, quality: u8) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    WebPEncoder::new_with_quality(&mut buf, WebPQuality::lossy(quality)).encode(
        canvas.rgb_bytes(),
        canvas.pixel_width(),
        canvas.pixel_height(),
        image::ColorType::Rgb8,
    )?;
    Ok(buf)
}
