//! Two-tone raster canvas.
//!
//! Drawing code targets the [`Canvas`] trait. Implementors only provide pixel
//! access; rectangles, lines and text are built on top and clip silently at
//! the canvas edges, so callers may pass coordinates that fall partly (or
//! entirely) outside.

use std::io::Cursor;
use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};

use crate::font::{CharBitmap, FONT_WIDTH};

/// Distance between consecutive characters of upward text.
#[allow(clippy::cast_possible_wrap)]
const FONT_ADVANCE: i64 = FONT_WIDTH as i64;

/// The only two colors a sheet may contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Luma 0.
    Black,
    /// Luma 255.
    White,
}

impl Tone {
    /// 8-bit luma value.
    #[must_use]
    pub const fn luma(self) -> u8 {
        match self {
            Self::Black => 0,
            Self::White => 255,
        }
    }

    /// Classify a luma value (anything below mid-gray is black).
    #[must_use]
    pub const fn from_luma(value: u8) -> Self {
        if value < 128 { Self::Black } else { Self::White }
    }
}

/// Drawing surface used by the marker renderer and the page layout.
///
/// All coordinates are device pixels and may be negative.
pub trait Canvas {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Read a pixel, or `None` outside the canvas.
    fn pixel(&self, x: i64, y: i64) -> Option<Tone>;

    /// Set a pixel. Out-of-bounds writes are ignored.
    fn put_pixel(&mut self, x: i64, y: i64, tone: Tone);

    /// Fill the inclusive rectangle spanning `(x1, y1)` to `(x2, y2)`.
    fn fill_rect(&mut self, x1: i64, y1: i64, x2: i64, y2: i64, tone: Tone) {
        let (x1, x2) = (x1.min(x2).max(0), x1.max(x2).min(i64::from(self.width()) - 1));
        let (y1, y2) = (y1.min(y2).max(0), y1.max(y2).min(i64::from(self.height()) - 1));
        for y in y1..=y2 {
            for x in x1..=x2 {
                self.put_pixel(x, y, tone);
            }
        }
    }

    /// Fill the whole canvas.
    fn clear(&mut self, tone: Tone) {
        let (w, h) = (i64::from(self.width()), i64::from(self.height()));
        self.fill_rect(0, 0, w - 1, h - 1, tone);
    }

    /// Draw a one pixel wide line between two inclusive endpoints.
    fn draw_line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64, tone: Tone) {
        // Bresenham over all octants.
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let (mut x, mut y) = (x1, y1);
        let mut err = dx + dy;
        loop {
            self.put_pixel(x, y, tone);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw text rotated a quarter turn counter-clockwise, reading bottom to
    /// top from `(x, y)`.
    ///
    /// Pixel `(cx, cy)` of the `k`-th character lands on
    /// `(x + cy, y - k * FONT_WIDTH - cx)`. Characters missing from the font
    /// leave a gap.
    fn draw_text_up(&mut self, x: i64, y: i64, text: &str, tone: Tone) {
        let mut base_y = y;
        for c in text.chars() {
            if let Some(bitmap) = CharBitmap::for_char(c) {
                for (cx, cy) in bitmap.pixels() {
                    let (Ok(cx), Ok(cy)) = (i64::try_from(cx), i64::try_from(cy)) else {
                        continue;
                    };
                    self.put_pixel(x + cy, base_y - cx, tone);
                }
            }
            base_y -= FONT_ADVANCE;
        }
    }
}

/// [`Canvas`] backed by an 8-bit grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayCanvas {
    image: GrayImage,
}

impl GrayCanvas {
    /// Allocate a white canvas.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::from_pixel(width, height, Luma([Tone::White.luma()])),
        }
    }

    /// Borrow the underlying image.
    #[must_use]
    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    /// Take the underlying image.
    #[must_use]
    pub fn into_image(self) -> GrayImage {
        self.image
    }

    /// Row-major pixel bytes.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Number of black pixels.
    #[must_use]
    pub fn count_black(&self) -> usize {
        self.image.as_raw().iter().filter(|&&v| v == Tone::Black.luma()).count()
    }

    /// Encode as PNG in memory.
    ///
    /// # Errors
    /// Propagates encoder failures.
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    /// Write as PNG to `path`.
    ///
    /// # Errors
    /// Propagates i/o and encoder failures.
    pub fn save_png(&self, path: &Path) -> Result<(), image::ImageError> {
        self.image.save_with_format(path, ImageFormat::Png)
    }

    /// Decode a PNG, converting it to grayscale.
    ///
    /// # Errors
    /// If `bytes` is not a readable PNG.
    pub fn decode_png(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_luma8();
        Ok(Self { image })
    }

    fn index(&self, x: i64, y: i64) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.image.width() && y < self.image.height()).then_some((x, y))
    }
}

impl Canvas for GrayCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    fn pixel(&self, x: i64, y: i64) -> Option<Tone> {
        let (x, y) = self.index(x, y)?;
        Some(Tone::from_luma(self.image.get_pixel(x, y).0[0]))
    }

    #[inline]
    fn put_pixel(&mut self, x: i64, y: i64, tone: Tone) {
        if let Some((x, y)) = self.index(x, y) {
            self.image.put_pixel(x, y, Luma([tone.luma()]));
        }
    }

    fn fill_rect(&mut self, x1: i64, y1: i64, x2: i64, y2: i64, tone: Tone) {
        let w = i64::from(self.image.width());
        let h = i64::from(self.image.height());
        let (x1, x2) = (x1.min(x2).max(0), x1.max(x2).min(w - 1));
        let (y1, y2) = (y1.min(y2).max(0), y1.max(y2).min(h - 1));
        if x1 > x2 || y1 > y2 {
            return;
        }
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let (x1, x2, stride) = (x1 as usize, x2 as usize, w as usize);
        let raw: &mut [u8] = &mut self.image;
        for y in y1..=y2 {
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            let row = y as usize * stride;
            raw[row + x1..=row + x2].fill(tone.luma());
        }
    }
}
