//! # Software Canvas and Color Modes
//!
//! A minimal RGB raster surface the export pipeline draws pages onto.
//! Content painting here is geometry-faithful rather than typographic:
//! blocks render header bands, row banding, dividers, and greeked text
//! placeholders. Real glyph rendering belongs to the host toolkit and is
//! out of scope; what matters for export is that every band lands exactly
//! where pagination placed it.

use std::cell::Cell;

use crate::model::{Rect, Size};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The visual theme content is painted in. Export always runs in `Light`
/// so artifacts look the same regardless of the editor's on-screen theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl ColorMode {
    pub fn background(self) -> Color {
        match self {
            ColorMode::Light => Color::rgb(0xff, 0xff, 0xff),
            ColorMode::Dark => Color::rgb(0x22, 0x24, 0x28),
        }
    }

    /// Fill for block header bands and the identity banner.
    pub fn header(self) -> Color {
        match self {
            ColorMode::Light => Color::rgb(0x2b, 0x31, 0x48),
            ColorMode::Dark => Color::rgb(0x12, 0x16, 0x24),
        }
    }

    /// Text placeholder color on header fills.
    pub fn on_header(self) -> Color {
        match self {
            ColorMode::Light => Color::rgb(0xe8, 0xe8, 0xec),
            ColorMode::Dark => Color::rgb(0xc2, 0xc4, 0xcc),
        }
    }

    /// Alternating row band fill.
    pub fn banding(self) -> Color {
        match self {
            ColorMode::Light => Color::rgb(0xee, 0xee, 0xe6),
            ColorMode::Dark => Color::rgb(0x30, 0x32, 0x38),
        }
    }

    pub fn divider(self) -> Color {
        match self {
            ColorMode::Light => Color::rgb(0xc8, 0xc8, 0xc8),
            ColorMode::Dark => Color::rgb(0x4a, 0x4c, 0x52),
        }
    }

    /// Text placeholder color on content rows.
    pub fn ink(self) -> Color {
        match self {
            ColorMode::Light => Color::rgb(0x30, 0x30, 0x34),
            ColorMode::Dark => Color::rgb(0xd0, 0xd2, 0xd8),
        }
    }
}

/// Forces `Light` mode for as long as the guard lives, restoring whatever
/// mode was current when it drops, on every exit path including errors.
pub struct ScopedColorMode<'a> {
    slot: &'a Cell<ColorMode>,
    saved: ColorMode,
}

impl<'a> ScopedColorMode<'a> {
    pub fn light(slot: &'a Cell<ColorMode>) -> Self {
        let saved = slot.replace(ColorMode::Light);
        Self { slot, saved }
    }
}

impl Drop for ScopedColorMode<'_> {
    fn drop(&mut self) {
        self.slot.set(self.saved);
    }
}

/// Anything that can paint itself into a frame on a canvas.
pub trait Paint {
    fn paint(&self, canvas: &mut Canvas, frame: Rect, mode: ColorMode);
}

/// An RGB8 pixel surface addressed in page coordinates (points). The
/// canvas applies its own scale factor, so callers draw at page geometry
/// and the raster resolution is purely a construction-time choice.
pub struct Canvas {
    px_width: u32,
    px_height: u32,
    scale: f64,
    pixels: Vec<u8>,
}

impl Canvas {
    /// A canvas covering `size` points at `scale` pixels per point,
    /// cleared to `background`.
    pub fn new(size: Size, scale: f64, background: Color) -> Self {
        let px_width = (size.width * scale).ceil().max(1.0) as u32;
        let px_height = (size.height * scale).ceil().max(1.0) as u32;
        let mut pixels = vec![0u8; px_width as usize * px_height as usize * 3];
        for px in pixels.chunks_exact_mut(3) {
            px[0] = background.r;
            px[1] = background.g;
            px[2] = background.b;
        }
        Self {
            px_width,
            px_height,
            scale,
            pixels,
        }
    }

    pub fn pixel_width(&self) -> u32 {
        self.px_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.px_height
    }

    /// The raw RGB8 pixel data, row-major.
    pub fn rgb_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Fill a rectangle given in page coordinates, clipped to the surface.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let x0 = ((rect.x * self.scale).round().max(0.0) as u32).min(self.px_width);
        let x1 = (((rect.x + rect.width) * self.scale).round().max(0.0) as u32)
            .min(self.px_width);
        let y0 = ((rect.y * self.scale).round().max(0.0) as u32).min(self.px_height);
        let y1 = (((rect.y + rect.height) * self.scale).round().max(0.0) as u32)
            .min(self.px_height);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        for y in y0..y1 {
            let row = (y as usize * self.px_width as usize + x0 as usize) * 3;
            let end = (y as usize * self.px_width as usize + x1 as usize) * 3;
            for px in self.pixels[row..end].chunks_exact_mut(3) {
                px[0] = color.r;
                px[1] = color.g;
                px[2] = color.b;
            }
        }
    }

    /// Draw a greeked text placeholder: a solid bar whose width is
    /// proportional to the text length, capped at `max_width`.
    pub fn greek_line(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: f64,
        height: f64,
        color: Color,
    ) {
        let width = (text.chars().count() as f64 * height * 0.55).min(max_width);
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.fill_rect(
            Rect {
                x,
                y,
                width,
                height,
            },
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(canvas: &Canvas, x: u32, y: u32) -> Color {
        let i = (y as usize * canvas.pixel_width() as usize + x as usize) * 3;
        let px = &canvas.rgb_bytes()[i..i + 3];
        Color::rgb(px[0], px[1], px[2])
    }

    #[test]
    fn fill_rect_is_clipped_to_surface() {
        let mut canvas = Canvas::new(
            Size {
                width: 10.0,
                height: 10.0,
            },
            1.0,
            Color::rgb(0, 0, 0),
        );
        let red = Color::rgb(0xff, 0, 0);
        canvas.fill_rect(
            Rect {
                x: -5.0,
                y: 8.0,
                width: 100.0,
                height: 100.0,
            },
            red,
        );
        assert_eq!(pixel(&canvas, 0, 9), red);
        assert_eq!(pixel(&canvas, 9, 9), red);
        assert_eq!(pixel(&canvas, 0, 7), Color::rgb(0, 0, 0));
    }

    #[test]
    fn scale_maps_points_to_pixels() {
        let mut canvas = Canvas::new(
            Size {
                width: 10.0,
                height: 10.0,
            },
            2.0,
            Color::rgb(0, 0, 0),
        );
        assert_eq!(canvas.pixel_width(), 20);
        let red = Color::rgb(0xff, 0, 0);
        canvas.fill_rect(
            Rect {
                x: 1.0,
                y: 1.0,
                width: 2.0,
                height: 2.0,
            },
            red,
        );
        assert_eq!(pixel(&canvas, 2, 2), red);
        assert_eq!(pixel(&canvas, 5, 5), red);
        assert_eq!(pixel(&canvas, 6, 6), Color::rgb(0, 0, 0));
    }

    #[test]
    fn scoped_color_mode_restores_on_drop() {
        let slot = Cell::new(ColorMode::Dark);
        {
            let _guard = ScopedColorMode::light(&slot);
            assert_eq!(slot.get(), ColorMode::Light);
        }
        assert_eq!(slot.get(), ColorMode::Dark);
    }
}
