//! Nine-patch drawing through a platform drawing surface.

use std::sync::Arc;

use patchwork_types::bitmap::RgbaBitmap;
use patchwork_types::color::Color;
use patchwork_types::error::Result;
use patchwork_types::geometry::{Rect, Size};

use crate::compose::{DrawPlan, compose};
use crate::fill::{Fill, compose_fill};
use crate::region::PatchRegionSet;

/// A 2D surface that can copy a region of an image into a region of itself,
/// scaling as needed.
pub trait DrawSurface {
    /// The surface's image handle (texture, decoded bitmap, ...).
    type Image: ?Sized;

    /// Copy `source` of `image` into `dest`. With a `tint`, every copied
    /// pixel takes the tint's color and keeps its own coverage.
    fn draw_image_region(
        &mut self,
        image: &Self::Image,
        source: Rect,
        dest: Rect,
        tint: Option<Color>,
    ) -> Result<()>;
}

/// A stretchable image: an image handle plus its analyzed regions.
///
/// Fixed ranges render at their source size; stretch ranges absorb the
/// rest of the requested size. A region set with no stretch range is drawn
/// whole with the [`Fill`] mode instead.
pub struct NinePatch<'a, I: ?Sized> {
    pub image: &'a I,
    pub regions: Arc<PatchRegionSet>,
    /// Layout for images that cannot stretch.
    pub fill: Fill,
    /// Recolor the image; `None` draws it as is.
    pub tint: Option<Color>,
}

impl<'a, I: ?Sized> NinePatch<'a, I> {
    /// Create an untinted nine-patch with the default fill.
    pub fn new(image: &'a I, regions: Arc<PatchRegionSet>) -> Self {
        Self {
            image,
            regions,
            fill: Fill::default(),
            tint: None,
        }
    }

    /// Set the fill mode used when the image cannot stretch.
    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    /// Draw with every pixel recolored to `tint`.
    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = Some(tint);
        self
    }

    /// Plan a draw of `w x h` at the origin.
    pub fn plan(&self, w: u32, h: u32) -> DrawPlan {
        let target = Size::new(w, h);
        if self.regions.is_scalable() {
            compose(&self.regions, target)
        } else {
            compose_fill(&self.regions, target, self.fill)
        }
    }

    /// Draw the nine-patch at the given position and size. Returns the plan
    /// that was drawn.
    pub fn draw<S>(&self, surface: &mut S, x: i32, y: i32, w: u32, h: u32) -> Result<DrawPlan>
    where
        S: DrawSurface<Image = I> + ?Sized,
    {
        let mut plan = self.plan(w, h);
        plan.translate(x, y);
        for cell in plan.visible_cells() {
            surface.draw_image_region(self.image, cell.source, cell.dest, self.tint)?;
        }
        Ok(plan)
    }
}

/// Software surface: renders into an owned RGBA bitmap with
/// nearest-neighbour scaling.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub target: RgbaBitmap,
}

impl Canvas {
    /// A transparent canvas of `w x h`.
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            target: RgbaBitmap::new(w, h, Color::TRANSPARENT),
        }
    }

    /// Take the rendered pixels.
    pub fn into_bitmap(self) -> RgbaBitmap {
        self.target
    }
}

impl DrawSurface for Canvas {
    type Image = RgbaBitmap;

    fn draw_image_region(
        &mut self,
        image: &RgbaBitmap,
        source: Rect,
        dest: Rect,
        tint: Option<Color>,
    ) -> Result<()> {
        self.target.blit_tinted(image, source, dest, tint);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::test_utils::{RecordingSurface, bordered, interior_color};
    use patchwork_types::bitmap::Bitmap;
    use patchwork_types::geometry::Thickness;

    #[test]
    fn draw_skips_empty_cells_and_offsets() {
        let bmp = bordered(10, 10, &[], &[], &[], &[]);
        let np = NinePatch::new(&bmp, Arc::new(analyze(&bmp).unwrap()));
        let mut surface = RecordingSurface::new();
        let plan = np.draw(&mut surface, 100, 50, 10, 10).unwrap();
        assert_eq!(plan.cells.len(), 9);
        assert_eq!(surface.calls.len(), 4);
        assert_eq!(
            surface.calls[0],
            (Rect::new(1, 1, 5, 5), Rect::new(100, 50, 5, 5))
        );
        assert!(surface.tints.iter().all(Option::is_none));
    }

    #[test]
    fn canvas_reconstructs_interior_at_native_size() {
        let bmp = bordered(
            9,
            7,
            &[(2, 3), (5, 8)],
            &[(1, 4)],
            &[(1, 8)],
            &[(1, 6)],
        );
        let np = NinePatch::new(&bmp, Arc::new(analyze(&bmp).unwrap()));
        let mut canvas = Canvas::new(9, 7);
        np.draw(&mut canvas, 0, 0, 9, 7).unwrap();
        let out = canvas.into_bitmap();
        for y in 0..7 {
            for x in 0..9 {
                assert_eq!(out.pixel(x, y), interior_color(x, y), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn canvas_keeps_corners_when_stretched() {
        let bmp = bordered(6, 6, &[(2, 4)], &[(2, 4)], &[], &[]);
        let np = NinePatch::new(&bmp, Arc::new(analyze(&bmp).unwrap()));
        let mut canvas = Canvas::new(20, 12);
        np.draw(&mut canvas, 0, 0, 20, 12).unwrap();
        let out = canvas.target;
        assert_eq!(out.pixel(0, 0), interior_color(0, 0));
        assert_eq!(out.pixel(1, 1), interior_color(1, 1));
        assert_eq!(out.pixel(19, 11), interior_color(5, 5));
        assert_eq!(out.pixel(18, 10), interior_color(4, 4));
        // Stretched centre samples from the stretch range only.
        assert_eq!(out.pixel(10, 6), interior_color(3, 3));
    }

    #[test]
    fn cap_inset_image_draws_without_border() {
        let bmp = RgbaBitmap::new(8, 8, Color::rgb(1, 2, 3));
        let regions = PatchRegionSet::from_cap_insets(bmp.size(), Thickness::uniform(2));
        let np = NinePatch::new(&bmp, Arc::new(regions));
        let mut surface = RecordingSurface::new();
        np.draw(&mut surface, 0, 0, 16, 16).unwrap();
        assert_eq!(surface.calls.len(), 9);
        assert_eq!(surface.calls[4], (Rect::new(2, 2, 4, 4), Rect::new(2, 2, 12, 12)));
    }

    #[test]
    fn fixed_block_draws_with_fill_mode() {
        let bmp = RgbaBitmap::new(10, 20, Color::rgb(4, 5, 6));
        let regions = Arc::new(PatchRegionSet::fixed_block(bmp.size()));
        let mut surface = RecordingSurface::new();
        NinePatch::new(&bmp, Arc::clone(&regions))
            .draw(&mut surface, 0, 0, 100, 100)
            .unwrap();
        assert_eq!(
            surface.calls,
            vec![(Rect::new(0, 0, 10, 20), Rect::new(25, 0, 50, 100))]
        );

        let mut surface = RecordingSurface::new();
        let plan = NinePatch::new(&bmp, regions)
            .with_fill(Fill::Tile)
            .draw(&mut surface, 5, 5, 25, 20)
            .unwrap();
        assert_eq!(plan.columns(), 3);
        assert_eq!(surface.calls.len(), 3);
        assert_eq!(surface.calls[2].1, Rect::new(25, 5, 5, 20));
    }

    #[test]
    fn tint_reaches_surface_and_canvas() {
        let bmp = bordered(4, 4, &[(1, 3)], &[(1, 3)], &[], &[]);
        let blue = Color::rgb(0, 0, 255);
        let np = NinePatch::new(&bmp, Arc::new(analyze(&bmp).unwrap())).with_tint(blue);

        let mut surface = RecordingSurface::new();
        np.draw(&mut surface, 0, 0, 8, 8).unwrap();
        assert!(surface.tints.iter().all(|t| *t == Some(blue)));

        let mut canvas = Canvas::new(8, 8);
        np.draw(&mut canvas, 0, 0, 8, 8).unwrap();
        assert_eq!(canvas.target.pixel(0, 0), blue);
        assert_eq!(canvas.target.pixel(7, 7), blue);
    }
}
