//! Layout for images that cannot stretch.
//!
//! A region set with no stretch patch (a plain image, or the fallback for
//! an image that failed marker analysis) is drawn whole, fitted to the
//! target with one of the [`Fill`] modes.

use std::str::FromStr;

use patchwork_types::error::PatchworkError;
use patchwork_types::geometry::{Rect, Size};

use crate::compose::{DrawCell, DrawPlan, clamp_target, to_i32};
use crate::region::PatchRegionSet;

/// How a non-stretchable image covers its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fill {
    /// Scale uniformly to fit inside the target, centred; may letterbox.
    #[default]
    AspectFit,
    /// Scale uniformly to cover the target, cropping the source centre.
    AspectFill,
    /// Scale each axis independently to the target.
    Fill,
    /// Repeat at source size from the top-left corner, clipping the last
    /// row and column.
    Tile,
}

impl FromStr for Fill {
    type Err = PatchworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "aspectfit" => Ok(Fill::AspectFit),
            "aspectfill" => Ok(Fill::AspectFill),
            "fill" => Ok(Fill::Fill),
            "tile" => Ok(Fill::Tile),
            _ => Err(PatchworkError::Config(format!(
                "unknown fill mode '{s}' (aspect-fit, aspect-fill, fill, tile)"
            ))),
        }
    }
}

/// Lay out the whole source image of `set` over `target` using `fill`.
///
/// Stretch patches are ignored; call this for sets where
/// [`PatchRegionSet::is_scalable`] is false. A zero-size source or target
/// falls back to a single `Fill` cell.
pub fn compose_fill(set: &PatchRegionSet, target: Size, fill: Fill) -> DrawPlan {
    let target = clamp_target(target);
    let source = set.size();
    let inset = to_i32(set.inset());
    let whole = Rect::new(inset, inset, source.w, source.h);
    let everywhere = Rect::new(0, 0, target.w, target.h);

    if source.area() == 0 || target.area() == 0 {
        return single(target, whole, everywhere);
    }
    match fill {
        Fill::Fill => single(target, whole, everywhere),
        Fill::AspectFit => {
            let fit = fit_inside(source, target);
            single(target, whole, centred(fit, target, 0))
        }
        Fill::AspectFill => {
            let crop = fit_inside(target, source);
            single(target, centred(crop, source, inset), everywhere)
        }
        Fill::Tile => tile(target, source, inset),
    }
}

/// Largest size with the aspect ratio of `shape` that fits in `bounds`,
/// rounded to whole pixels.
fn fit_inside(shape: Size, bounds: Size) -> Size {
    let (sw, sh) = (shape.w as u64, shape.h as u64);
    let (bw, bh) = (bounds.w as u64, bounds.h as u64);
    if sw * bh <= bw * sh {
        let w = (sw * bh + sh / 2) / sh;
        Size::new(w.min(bw) as u32, bounds.h)
    } else {
        let h = (sh * bw + sw / 2) / sw;
        Size::new(bounds.w, h.min(bh) as u32)
    }
}

fn centred(inner: Size, outer: Size, offset: i32) -> Rect {
    Rect::new(
        to_i32((outer.w - inner.w) / 2).saturating_add(offset),
        to_i32((outer.h - inner.h) / 2).saturating_add(offset),
        inner.w,
        inner.h,
    )
}

fn single(target: Size, source: Rect, dest: Rect) -> DrawPlan {
    DrawPlan {
        target,
        widths: vec![dest.w],
        heights: vec![dest.h],
        cells: vec![DrawCell { source, dest }],
        warnings: Vec::new(),
    }
}

/// Repeat counts along one axis: full copies, then the clipped remainder.
fn tile_extents(source: u32, target: u32) -> Vec<u32> {
    let mut extents = vec![source; (target / source) as usize];
    if target % source > 0 {
        extents.push(target % source);
    }
    extents
}

fn tile(target: Size, source: Size, inset: i32) -> DrawPlan {
    let widths = tile_extents(source.w, target.w);
    let heights = tile_extents(source.h, target.h);
    let mut cells = Vec::new();
    let mut dy = 0i32;
    for &h in &heights {
        let mut dx = 0i32;
        for &w in &widths {
            cells.push(DrawCell {
                source: Rect::new(inset, inset, w, h),
                dest: Rect::new(dx, dy, w, h),
            });
            dx = dx.saturating_add_unsigned(w);
        }
        dy = dy.saturating_add_unsigned(h);
    }
    DrawPlan {
        target,
        widths,
        heights,
        cells,
        warnings: Vec::new(),
    }
}
