//! # Streaming Multi-Page PDF Writer
//!
//! A from-scratch PDF 1.7 writer. Each page is a single full-bleed raster
//! image: the export pipeline draws the page onto a canvas at the
//! configured raster DPI and this module embeds it as an image XObject
//! scaled to the page's MediaBox. Writing is streaming: pages go out as
//! they are rendered, and only the catalog, page tree, info dictionary,
//! and cross-reference table wait for the end.
//!
//! ```text
//! %PDF-1.7             <- header
//! 3 0 obj ... endobj   <- per page: image, content stream, page dict
//! ...
//! 1 0 obj ... endobj   <- catalog (deferred)
//! 2 0 obj ... endobj   <- page tree (deferred; needs the kid list)
//! xref                 <- byte offsets of every object
//! trailer
//! %%EOF
//! ```

use std::io::Write;

use image::codecs::jpeg::JpegEncoder;
use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::Error;
use crate::model::Size;
use crate::render::Canvas;

/// Metadata for the PDF info dictionary plus the rasterization knobs.
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: String,
    pub creator: String,
    /// Resolution pages are rasterized at, in dots per inch.
    pub raster_dpi: f64,
    /// Page-image encoding quality. Values above 100 select lossless
    /// Flate compression; 100 and below select JPEG at that quality.
    pub encoding_quality: u8,
}

/// Writes one multi-page PDF to any byte sink.
pub struct PdfWriter<W: Write> {
    out: W,
    written: u64,
    /// Byte offset of every emitted object, indexed by object id.
    /// Ids 1 (catalog) and 2 (page tree) are reserved until `finish`.
    offsets: Vec<u64>,
    page_ids: Vec<usize>,
    page_size: Size,
    metadata: PdfMetadata,
}

impl<W: Write> PdfWriter<W> {
    /// Write the file header and return a writer ready for pages.
    pub fn begin(out: W, page_size: Size, metadata: PdfMetadata) -> Result<Self, Error> {
        let mut writer = Self {
            out,
            written: 0,
            offsets: vec![0, 0, 0],
            page_ids: Vec::new(),
            page_size,
            metadata,
        };
        writer.write_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n")?;
        Ok(writer)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.out.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    /// Start a new object, recording its byte offset. Returns its id.
    fn begin_object(&mut self) -> Result<usize, Error> {
        let id = self.offsets.len();
        self.offsets.push(self.written);
        self.write_bytes(format!("{id} 0 obj\n").as_bytes())?;
        Ok(id)
    }

    /// Append one rendered page.
    pub fn add_page(&mut self, canvas: &Canvas) -> Result<(), Error> {
        let width_px = canvas.pixel_width();
        let height_px = canvas.pixel_height();
        let (data, filter) = if self.metadata.encoding_quality > 100 {
            (compress_to_vec_zlib(canvas.rgb_bytes(), 6), "FlateDecode")
        } else {
            let mut jpeg = Vec::new();
            let mut encoder =
                JpegEncoder::new_with_quality(&mut jpeg, self.metadata.encoding_quality);
            encoder.encode(
                canvas.rgb_bytes(),
                width_px,
                height_px,
                image::ColorType::Rgb8,
            )?;
            (jpeg, "DCTDecode")
        };

        let image_id = self.begin_object()?;
        self.write_bytes(
            format!(
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /{} /Length {} >>\nstream\n",
                width_px,
                height_px,
                filter,
                data.len()
            )
            .as_bytes(),
        )?;
        self.write_bytes(&data)?;
        self.write_bytes(b"\nendstream\nendobj\n")?;

        let index = self.page_ids.len();
        let content = format!(
            "q\n{:.2} 0 0 {:.2} 0 0 cm\n/Im{} Do\nQ\n",
            self.page_size.width, self.page_size.height, index
        );
        let content_id = self.begin_object()?;
        self.write_bytes(
            format!("<< /Length {} >>\nstream\n{}endstream\nendobj\n", content.len(), content)
                .as_bytes(),
        )?;

        let page_id = self.begin_object()?;
        self.write_bytes(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /XObject << /Im{} {} 0 R >> >> >>\nendobj\n",
                self.page_size.width, self.page_size.height, content_id, index, image_id
            )
            .as_bytes(),
        )?;
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Emit the deferred objects, cross-reference table, and trailer.
    pub fn finish(mut self) -> Result<(), Error> {
        let info = format!(
            "<< /Title ({}) /Author ({}) /Subject ({}) /Keywords ({}) /Creator ({}) >>",
            escape_pdf_string(&self.metadata.title),
            escape_pdf_string(&self.metadata.author),
            escape_pdf_string(&self.metadata.subject),
            escape_pdf_string(&self.metadata.keywords),
            escape_pdf_string(&self.metadata.creator),
        );
        let info_id = self.begin_object()?;
        self.write_bytes(info.as_bytes())?;
        self.write_bytes(b"\nendobj\n")?;

        self.offsets[1] = self.written;
        self.write_bytes(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n")?;

        self.offsets[2] = self.written;
        let kids = self
            .page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");
        let pages = format!(
            "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
            kids,
            self.page_ids.len()
        );
        self.write_bytes(pages.as_bytes())?;

        let xref_at = self.written;
        let count = self.offsets.len();
        let mut xref = format!("xref\n0 {count}\n0000000000 65535 f \n");
        for offset in &self.offsets[1..] {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        self.write_bytes(xref.as_bytes())?;
        self.write_bytes(
            format!(
                "trailer\n<< /Size {count} /Root 1 0 R /Info {info_id} 0 R >>\n\
                 startxref\n{xref_at}\n%%EOF\n"
            )
            .as_bytes(),
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Escape characters with special meaning inside PDF literal strings.
fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}
