//! Shared test utilities for nine-patch tests.
//!
//! Provides builders for marker-bordered bitmaps and a [`RecordingSurface`]
//! that records every draw call for assertion.

use patchwork_types::bitmap::RgbaBitmap;
use patchwork_types::color::Color;
use patchwork_types::error::Result;
use patchwork_types::geometry::Rect;

use crate::surface::DrawSurface;

/// Marker flags of length `len` with `runs` (half-open) set.
pub fn marker_row(len: u32, runs: &[(u32, u32)]) -> Vec<bool> {
    (0..len)
        .map(|i| runs.iter().any(|&(s, e)| i >= s && i < e))
        .collect()
}

/// Distinct opaque color for interior pixel `(x, y)`.
pub fn interior_color(x: u32, y: u32) -> Color {
    Color::rgb((x * 17 % 256) as u8, (y * 29 % 256) as u8, 200)
}

/// A `(w + 2) x (h + 2)` nine-patch with a `w x h` patterned interior and
/// markers at the given interior-coordinate runs.
pub fn bordered(
    w: u32,
    h: u32,
    top: &[(u32, u32)],
    left: &[(u32, u32)],
    bottom: &[(u32, u32)],
    right: &[(u32, u32)],
) -> RgbaBitmap {
    let mut bmp = RgbaBitmap::new(w + 2, h + 2, Color::TRANSPARENT);
    for y in 0..h {
        for x in 0..w {
            bmp.set_pixel(x + 1, y + 1, interior_color(x, y));
        }
    }
    for (i, m) in marker_row(w, top).into_iter().enumerate() {
        if m {
            bmp.set_pixel(i as u32 + 1, 0, Color::BLACK);
        }
    }
    for (i, m) in marker_row(w, bottom).into_iter().enumerate() {
        if m {
            bmp.set_pixel(i as u32 + 1, h + 1, Color::BLACK);
        }
    }
    for (i, m) in marker_row(h, left).into_iter().enumerate() {
        if m {
            bmp.set_pixel(0, i as u32 + 1, Color::BLACK);
        }
    }
    for (i, m) in marker_row(h, right).into_iter().enumerate() {
        if m {
            bmp.set_pixel(w + 1, i as u32 + 1, Color::BLACK);
        }
    }
    bmp
}

/// A surface that records draw calls instead of rendering.
pub struct RecordingSurface {
    pub calls: Vec<(Rect, Rect)>,
    pub tints: Vec<Option<Color>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            tints: Vec::new(),
        }
    }
}

impl DrawSurface for RecordingSurface {
    type Image = RgbaBitmap;

    fn draw_image_region(
        &mut self,
        _image: &RgbaBitmap,
        source: Rect,
        dest: Rect,
        tint: Option<Color>,
    ) -> Result<()> {
        self.calls.push((source, dest));
        self.tints.push(tint);
        Ok(())
    }
}
