//! Decoded bitmap surfaces.
//!
//! The nine-patch analyzer only needs to sample pixels, so it works against
//! the [`Bitmap`] trait. [`RgbaBitmap`] is the owned, row-major RGBA8
//! implementation used by the software canvas and the CLI decoder.

use crate::color::Color;
use crate::error::{PatchworkError, Result};
use crate::geometry::{Rect, Size};

/// A decoded, RGBA-sampleable 2D surface.
pub trait Bitmap {
    /// Width in pixels.
    fn width(&self) -> u32;
    /// Height in pixels.
    fn height(&self) -> u32;

    /// Sample the pixel at `(x, y)`. Callers stay within bounds.
    fn pixel(&self, x: u32, y: u32) -> Color;

    /// Both dimensions as a [`Size`].
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

/// Owned row-major RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaBitmap {
    /// A bitmap filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * 4);
        for _ in 0..count {
            data.extend_from_slice(&[fill.r, fill.g, fill.b, fill.a]);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap an existing RGBA8 buffer.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(PatchworkError::Decode(format!(
                "RGBA buffer for {width}x{height} must be {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Raw row-major RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Write a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, c: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&[c.r, c.g, c.b, c.a]);
    }

    /// Copy `src_rect` of `src` into `dst_rect` of `self` with
    /// nearest-neighbour scaling. Destination pixels outside `self` are
    /// clipped; empty rectangles draw nothing.
    pub fn blit_scaled(&mut self, src: &dyn Bitmap, src_rect: Rect, dst_rect: Rect) {
        self.blit_tinted(src, src_rect, dst_rect, None);
    }

    /// [`blit_scaled`](Self::blit_scaled), recoloring every copied pixel
    /// with `tint` when one is given.
    pub fn blit_tinted(
        &mut self,
        src: &dyn Bitmap,
        src_rect: Rect,
        dst_rect: Rect,
        tint: Option<Color>,
    ) {
        if src_rect.is_empty() || dst_rect.is_empty() {
            return;
        }
        for dy in 0..dst_rect.h {
            let ty = dst_rect.y.saturating_add_unsigned(dy);
            if ty < 0 {
                continue;
            }
            if ty >= self.height as i32 {
                break;
            }
            let sy = src_rect.y as i64 + (dy as i64 * src_rect.h as i64) / dst_rect.h as i64;
            for dx in 0..dst_rect.w {
                let tx = dst_rect.x.saturating_add_unsigned(dx);
                if tx < 0 {
                    continue;
                }
                if tx >= self.width as i32 {
                    break;
                }
                let sx = src_rect.x as i64 + (dx as i64 * src_rect.w as i64) / dst_rect.w as i64;
                if sx < 0 || sy < 0 || sx >= src.width() as i64 || sy >= src.height() as i64 {
                    continue;
                }
                let mut c = src.pixel(sx as u32, sy as u32);
                if let Some(tint) = tint {
                    c = c.tinted(tint);
                }
                self.set_pixel(tx as u32, ty as u32, c);
            }
        }
    }

    /// Copy a sub-rectangle out into a new bitmap.
    pub fn crop(&self, rect: Rect) -> RgbaBitmap {
        let mut out = RgbaBitmap::new(rect.w, rect.h, Color::TRANSPARENT);
        out.blit_scaled(self, rect, Rect::new(0, 0, rect.w, rect.h));
        out
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

impl Bitmap for RgbaBitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let i = self.offset(x, y);
        Color::rgba(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        )
    }
}
