//! Stretch composition: from a [`PatchRegionSet`] and a target size to a
//! grid of source/destination rectangles.
//!
//! Per axis, fixed ranges keep their source extent and stretch ranges
//! share what is left equally (at the source's own size every range keeps
//! its extent, so the image draws unchanged). Integer pixels are handed out with
//! largest-remainder allocation so every axis sums exactly to the target.
//! When the target is smaller than the fixed ranges, the fixed ranges are
//! scaled down instead and a [`DegenerateSize`] diagnostic is reported.
//! Targets are capped at `i32::MAX` per axis so every destination edge fits
//! the signed rectangle origin.

use patchwork_types::geometry::{Rect, Size};

use crate::region::{Axis, Patch, PatchRegionSet};

/// One source-rect to destination-rect mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCell {
    /// Rectangle in bitmap coordinates (border inset applied).
    pub source: Rect,
    /// Rectangle in target coordinates.
    pub dest: Rect,
}

impl DrawCell {
    /// True when nothing would be drawn for this cell.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty() || self.dest.is_empty()
    }
}

/// The target was smaller than the fixed ranges on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegenerateSize {
    pub axis: Axis,
    /// Extent the fixed ranges need.
    pub fixed_sum: u32,
    /// Extent they were squeezed into.
    pub target: u32,
}

/// A complete, row-major draw plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawPlan {
    /// Size the plan was laid out for, after capping.
    pub target: Size,
    /// Destination width of each column (one per X patch).
    pub widths: Vec<u32>,
    /// Destination height of each row (one per Y patch).
    pub heights: Vec<u32>,
    /// `widths.len() * heights.len()` cells, top-to-bottom, left-to-right.
    pub cells: Vec<DrawCell>,
    /// Axes whose fixed ranges had to be squeezed.
    pub warnings: Vec<DegenerateSize>,
}

impl DrawPlan {
    /// Number of columns in the grid.
    pub fn columns(&self) -> usize {
        self.widths.len()
    }

    /// Number of rows in the grid.
    pub fn rows(&self) -> usize {
        self.heights.len()
    }

    /// Cells with a non-zero source and destination area.
    pub fn visible_cells(&self) -> impl Iterator<Item = &DrawCell> {
        self.cells.iter().filter(|c| !c.is_empty())
    }

    /// Cell at `(column, row)`.
    pub fn cell(&self, column: usize, row: usize) -> Option<&DrawCell> {
        if column >= self.columns() || row >= self.rows() {
            return None;
        }
        self.cells.get(row * self.columns() + column)
    }

    /// Move every destination rectangle by `(dx, dy)`.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for cell in &mut self.cells {
            cell.dest = cell.dest.translated(dx, dy);
        }
    }
}

/// Compose a draw plan for `set` stretched to `target`.
///
/// Pure and deterministic; safe to call from any thread.
pub fn compose(set: &PatchRegionSet, target: Size) -> DrawPlan {
    let target = clamp_target(target);
    let mut warnings = Vec::new();
    // A zero-length source axis still spans the target with one empty
    // source range, so the destinations keep tiling it.
    let placeholder = [Patch::fixed(0, 0)];
    let patches_x = match set.patches(Axis::X) {
        [] => &placeholder[..],
        patches => patches,
    };
    let patches_y = match set.patches(Axis::Y) {
        [] => &placeholder[..],
        patches => patches,
    };

    let (widths, warn_x) = distribute(patches_x, target.w);
    let (heights, warn_y) = distribute(patches_y, target.h);
    for (axis, warning) in [(Axis::X, warn_x), (Axis::Y, warn_y)] {
        if let Some(fixed_sum) = warning {
            let target = match axis {
                Axis::X => target.w,
                Axis::Y => target.h,
            };
            log::warn!(
                "Nine-patch target {target}px on {axis:?} is below the fixed extent {fixed_sum}px; scaling fixed ranges down"
            );
            warnings.push(DegenerateSize {
                axis,
                fixed_sum,
                target,
            });
        }
    }

    let inset = to_i32(set.inset());
    let mut cells = Vec::with_capacity(patches_x.len() * patches_y.len());
    let mut dy = 0i32;
    for (py, &h) in patches_y.iter().zip(&heights) {
        let mut dx = 0i32;
        for (px, &w) in patches_x.iter().zip(&widths) {
            cells.push(DrawCell {
                source: Rect::new(
                    to_i32(px.range.start).saturating_add(inset),
                    to_i32(py.range.start).saturating_add(inset),
                    px.len(),
                    py.len(),
                ),
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
        warnings,
    }
}

/// Largest per-axis target a plan is laid out for.
pub const MAX_TARGET_EXTENT: u32 = i32::MAX as u32;

/// Cap `target` so destination edges stay representable.
pub(crate) fn clamp_target(target: Size) -> Size {
    let capped = Size::new(
        target.w.min(MAX_TARGET_EXTENT),
        target.h.min(MAX_TARGET_EXTENT),
    );
    if capped != target {
        log::warn!(
            "Target {}x{} exceeds the drawable range; capped to {}x{}",
            target.w,
            target.h,
            capped.w,
            capped.h
        );
    }
    capped
}

pub(crate) fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Destination extent of each patch on one axis.
///
/// Returns the fixed sum as a diagnostic when it exceeds `target`. At the
/// source length every patch keeps its own extent. An axis with no stretch
/// patch at all scales every patch proportionally.
pub fn distribute(patches: &[Patch], target: u32) -> (Vec<u32>, Option<u32>) {
    let source_len: u32 = patches.iter().map(Patch::len).sum();
    if target == source_len {
        return (patches.iter().map(Patch::len).collect(), None);
    }
    let fixed_sum: u32 = patches
        .iter()
        .filter(|p| !p.is_stretch())
        .map(Patch::len)
        .sum();
    let stretch_count = patches.iter().filter(|p| p.is_stretch()).count();
    let degenerate = (fixed_sum > target).then_some(fixed_sum);

    if stretch_count == 0 {
        let weights: Vec<u64> = patches.iter().map(|p| p.len() as u64).collect();
        return (largest_remainder(target, &weights), degenerate);
    }

    let mut extents = vec![0u32; patches.len()];
    if fixed_sum > target {
        let fixed_idx: Vec<usize> = (0..patches.len())
            .filter(|&i| !patches[i].is_stretch())
            .collect();
        let weights: Vec<u64> = fixed_idx.iter().map(|&i| patches[i].len() as u64).collect();
        for (&i, share) in fixed_idx
            .iter()
            .zip(largest_remainder(target, &weights))
        {
            extents[i] = share;
        }
    } else {
        let leftover = target - fixed_sum;
        let shares = largest_remainder(leftover, &vec![1; stretch_count]);
        let mut shares = shares.into_iter();
        for (extent, patch) in extents.iter_mut().zip(patches) {
            *extent = if patch.is_stretch() {
                shares.next().unwrap_or(0)
            } else {
                patch.len()
            };
        }
    }
    (extents, degenerate)
}

/// Split `total` in proportion to `weights`, exactly.
///
/// Each share gets the floor of its quota; the pixels left over go to the
/// largest fractional remainders, earliest index first on ties. All-zero
/// weights split evenly.
pub fn largest_remainder(total: u32, weights: &[u64]) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }
    let weight_sum: u64 = weights.iter().sum();
    if weight_sum == 0 {
        return largest_remainder(total, &vec![1; weights.len()]);
    }

    let total_w = total as u128;
    let sum_w = weight_sum as u128;
    let mut shares = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    for (i, &w) in weights.iter().enumerate() {
        let quota = total_w * w as u128;
        shares.push((quota / sum_w) as u32);
        remainders.push((quota % sum_w, i));
    }
    let assigned: u64 = shares.iter().map(|&s| s as u64).sum();
    let left = (total as u64 - assigned) as usize;
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, i) in remainders.iter().take(left) {
        shares[i] += 1;
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{analyze, scan_axis};
    use crate::test_utils::{bordered, marker_row};
    use patchwork_types::geometry::{Range, Thickness};
    use std::sync::Arc;

    fn axis_extents(patches: &[Patch], target: u32) -> Vec<u32> {
        distribute(patches, target).0
    }

    #[test]
    fn thirty_pixel_row_to_one_hundred() {
        let patches = scan_axis(&marker_row(30, &[(5, 10), (20, 25)]));
        let (extents, warning) = distribute(&patches, 100);
        assert_eq!(extents, vec![5, 40, 10, 40, 5]);
        assert!(warning.is_none());
    }

    #[test]
    fn thirty_pixel_bitmap_to_one_hundred() {
        let bmp = bordered(30, 1, &[(5, 10), (20, 25)], &[(0, 1)], &[], &[]);
        let set = analyze(&bmp).unwrap();
        let plan = compose(&set, Size::new(100, 1));
        assert_eq!(plan.widths, vec![5, 40, 10, 40, 5]);
        assert_eq!(plan.heights, vec![1]);
        assert_eq!(plan.cells.len(), 5);
    }

    #[test]
    fn odd_leftover_goes_to_first_stretch() {
        let patches = scan_axis(&marker_row(30, &[(5, 10), (20, 25)]));
        assert_eq!(axis_extents(&patches, 101), vec![5, 41, 10, 40, 5]);
    }

    #[test]
    fn equal_split_ignores_source_stretch_size() {
        let patches = vec![
            Patch::stretch(0, 1),
            Patch::fixed(1, 3),
            Patch::stretch(3, 20),
        ];
        assert_eq!(axis_extents(&patches, 12), vec![5, 2, 5]);
    }

    #[test]
    fn midpoint_stretch_absorbs_everything() {
        let patches = scan_axis(&marker_row(10, &[]));
        assert_eq!(axis_extents(&patches, 50), vec![5, 40, 5]);
    }

    #[test]
    fn undersized_target_scales_fixed_down() {
        let patches = vec![
            Patch::fixed(0, 10),
            Patch::stretch(10, 12),
            Patch::fixed(12, 42),
        ];
        let (extents, warning) = distribute(&patches, 20);
        assert_eq!(extents, vec![5, 0, 15]);
        assert_eq!(warning, Some(40));
    }

    #[test]
    fn undersized_target_reports_diagnostic() {
        let bmp = bordered(10, 10, &[(4, 6)], &[(4, 6)], &[], &[]);
        let set = analyze(&bmp).unwrap();
        let plan = compose(&set, Size::new(4, 20));
        assert_eq!(plan.widths.iter().sum::<u32>(), 4);
        assert_eq!(
            plan.warnings,
            vec![DegenerateSize {
                axis: Axis::X,
                fixed_sum: 8,
                target: 4
            }]
        );
    }

    #[test]
    fn no_stretch_axis_scales_uniformly() {
        let set = PatchRegionSet::fixed_block(Size::new(10, 4));
        let plan = compose(&set, Size::new(25, 2));
        assert_eq!(plan.widths, vec![25]);
        assert_eq!(plan.heights, vec![2]);
        assert_eq!(plan.cells[0].source, Rect::new(0, 0, 10, 4));
        assert_eq!(plan.cells[0].dest, Rect::new(0, 0, 25, 2));
    }

    #[test]
    fn zero_target_yields_empty_extents() {
        let patches = scan_axis(&marker_row(9, &[(3, 6)]));
        assert_eq!(axis_extents(&patches, 0), vec![0, 0, 0]);
    }

    #[test]
    fn unequal_stretch_ranges_split_equally_off_native_size() {
        let patches = scan_axis(&marker_row(12, &[(1, 2), (5, 11)]));
        assert_eq!(axis_extents(&patches, 12), vec![1, 1, 3, 6, 1]);
        assert_eq!(axis_extents(&patches, 13), vec![1, 4, 3, 4, 1]);
    }

    #[test]
    fn identity_round_trip() {
        let bmp = bordered(
            12,
            9,
            &[(2, 3), (5, 9)],
            &[(3, 5)],
            &[(1, 11)],
            &[(1, 8)],
        );
        let set = analyze(&bmp).unwrap();
        let plan = compose(&set, set.size());
        assert!(plan.warnings.is_empty());
        for cell in &plan.cells {
            assert_eq!(cell.dest.size(), cell.source.size());
            assert_eq!(cell.dest.translated(1, 1), cell.source);
        }
    }

    #[test]
    fn row_major_order() {
        let set = PatchRegionSet::from_cap_insets(Size::new(30, 30), Thickness::uniform(10));
        let plan = compose(&set, Size::new(60, 90));
        assert_eq!(plan.columns(), 3);
        assert_eq!(plan.rows(), 3);
        assert_eq!(plan.cells[1].dest, Rect::new(10, 0, 40, 10));
        assert_eq!(plan.cells[3].dest, Rect::new(0, 10, 10, 70));
        assert_eq!(plan.cell(2, 2).unwrap().dest, Rect::new(50, 80, 10, 10));
        assert!(plan.cell(3, 0).is_none());
    }

    #[test]
    fn translate_moves_destinations_only() {
        let set = PatchRegionSet::from_cap_insets(Size::new(30, 30), Thickness::uniform(10));
        let mut plan = compose(&set, Size::new(30, 30));
        plan.translate(5, -3);
        assert_eq!(plan.cells[0].dest, Rect::new(5, -3, 10, 10));
        assert_eq!(plan.cells[0].source, Rect::new(0, 0, 10, 10));
    }

    #[test]
    fn visible_cells_skip_zero_width_stretch() {
        let bmp = bordered(10, 10, &[], &[], &[], &[]);
        let set = analyze(&bmp).unwrap();
        let plan = compose(&set, set.size());
        assert_eq!(plan.cells.len(), 9);
        assert_eq!(plan.visible_cells().count(), 4);
        assert_eq!(set.margin(Axis::X), Range::new(0, 10));
    }

    #[test]
    fn zero_width_source_still_tiles_target() {
        let plan = compose(&PatchRegionSet::fixed_block(Size::new(0, 5)), Size::new(10, 10));
        assert_eq!(plan.cells.len(), 1);
        assert_eq!(plan.cells[0].dest, Rect::new(0, 0, 10, 10));
        assert!(plan.cells[0].source.is_empty());
        assert_eq!(plan.visible_cells().count(), 0);

        let empty = PatchRegionSet::from_cap_insets(Size::new(0, 0), Thickness::uniform(2));
        let plan = compose(&empty, Size::new(7, 3));
        let area: u64 = plan.cells.iter().map(|c| c.dest.size().area()).sum();
        assert_eq!(area, 21);
        assert_eq!(plan.widths, vec![7]);
        assert_eq!(plan.heights, vec![3]);
    }

    #[test]
    fn oversized_target_is_capped_without_wrapping() {
        let set = PatchRegionSet::from_cap_insets(Size::new(30, 30), Thickness::uniform(10));
        let plan = compose(&set, Size::new(3_000_000_000, 30));
        assert_eq!(plan.target, Size::new(MAX_TARGET_EXTENT, 30));
        assert_eq!(plan.widths.iter().map(|&w| w as u64).sum::<u64>(), MAX_TARGET_EXTENT as u64);
        let last = plan.cell(2, 0).unwrap();
        assert!(last.dest.x > 0);
        assert_eq!(last.dest.right(), i32::MAX);
        assert!(plan.cells.iter().all(|c| c.dest.x >= 0 && c.dest.y >= 0));
    }

    #[test]
    fn plans_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PatchRegionSet>();
        assert_send_sync::<DrawPlan>();

        let set = Arc::new(PatchRegionSet::from_cap_insets(
            Size::new(30, 30),
            Thickness::uniform(10),
        ));
        let worker = Arc::clone(&set);
        let plan = std::thread::spawn(move || compose(&worker, Size::new(64, 48)))
            .join()
            .unwrap();
        assert_eq!(plan, compose(&set, Size::new(64, 48)));
    }

    #[test]
    fn largest_remainder_exact_and_fair() {
        assert_eq!(largest_remainder(10, &[1, 1, 1]), vec![4, 3, 3]);
        assert_eq!(largest_remainder(7, &[5, 10, 5]), vec![2, 3, 2]);
        assert_eq!(largest_remainder(5, &[0, 0]), vec![3, 2]);
        assert_eq!(largest_remainder(0, &[3, 4]), vec![0, 0]);
        assert!(largest_remainder(9, &[]).is_empty());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn axis_strategy() -> impl Strategy<Value = Vec<bool>> {
            proptest::collection::vec(any::<bool>(), 1..64)
        }

        proptest! {
            #[test]
            fn extents_sum_to_target(markers in axis_strategy(), target in 0u32..2000) {
                let patches = scan_axis(&markers);
                let extents = axis_extents(&patches, target);
                prop_assert_eq!(extents.iter().sum::<u32>(), target);
            }

            #[test]
            fn fixed_extents_invariant_above_fixed_sum(
                markers in axis_strategy(),
                extra in 0u32..1000,
            ) {
                let patches = scan_axis(&markers);
                let fixed_sum: u32 = patches.iter().filter(|p| !p.is_stretch()).map(Patch::len).sum();
                let extents = axis_extents(&patches, fixed_sum + extra);
                for (p, e) in patches.iter().zip(&extents) {
                    if !p.is_stretch() {
                        prop_assert_eq!(*e, p.len());
                    }
                }
            }

            #[test]
            fn destinations_tile_target(
                w_markers in axis_strategy(),
                h_markers in axis_strategy(),
                tw in 0u32..400,
                th in 0u32..400,
            ) {
                let patches_x = scan_axis(&w_markers);
                let patches_y = scan_axis(&h_markers);
                let set = PatchRegionSet::from_parts(
                    patches_x,
                    patches_y,
                    Range::new(0, w_markers.len() as u32),
                    Range::new(0, h_markers.len() as u32),
                    1,
                ).unwrap();
                let plan = compose(&set, Size::new(tw, th));
                let area: u64 = plan.cells.iter().map(|c| c.dest.size().area()).sum();
                prop_assert_eq!(area, tw as u64 * th as u64);
                for row in 0..plan.rows() {
                    let mut x = 0i32;
                    for col in 0..plan.columns() {
                        let cell = plan.cell(col, row).unwrap();
                        prop_assert_eq!(cell.dest.x, x);
                        x = cell.dest.right();
                    }
                    prop_assert_eq!(x, tw as i32);
                }
                for col in 0..plan.columns() {
                    let mut y = 0i32;
                    for row in 0..plan.rows() {
                        let cell = plan.cell(col, row).unwrap();
                        prop_assert_eq!(cell.dest.y, y);
                        y = cell.dest.bottom();
                    }
                    prop_assert_eq!(y, th as i32);
                }
            }
        }
    }
}
