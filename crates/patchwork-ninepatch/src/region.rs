//! Patch region sets: the fixed/stretch layout of a stretchable image.

use patchwork_types::error::{PatchworkError, Result};
use patchwork_types::geometry::{Range, Size, Thickness};

/// Image axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Whether a range is copied verbatim or scaled to absorb resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
    Fixed,
    Stretch,
}

/// One classified range along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Patch {
    pub range: Range,
    pub kind: PatchKind,
}

impl Patch {
    /// A range copied at its source size.
    pub fn fixed(start: u32, end: u32) -> Self {
        Self {
            range: Range::new(start, end),
            kind: PatchKind::Fixed,
        }
    }

    /// A range scaled to absorb resizing.
    pub fn stretch(start: u32, end: u32) -> Self {
        Self {
            range: Range::new(start, end),
            kind: PatchKind::Stretch,
        }
    }

    /// Source extent in pixels.
    pub fn len(&self) -> u32 {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// True for [`PatchKind::Stretch`].
    pub fn is_stretch(&self) -> bool {
        self.kind == PatchKind::Stretch
    }
}

/// End-cap insets for an ordinary image, one optional value per side.
///
/// Authored insets use a negative value for "unset"; an unset side has no
/// fixed cap. With every side unset the image is not stretchable at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CapInsets {
    pub left: Option<u32>,
    pub top: Option<u32>,
    pub right: Option<u32>,
    pub bottom: Option<u32>,
}

impl CapInsets {
    /// No side set.
    pub const UNSET: Self = Self {
        left: None,
        top: None,
        right: None,
        bottom: None,
    };

    /// Build from authored values, treating negatives as unset.
    pub fn from_signed(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let side = |v: i32| u32::try_from(v).ok();
        Self {
            left: side(left),
            top: side(top),
            right: side(right),
            bottom: side(bottom),
        }
    }

    /// True if at least one side carries a value.
    pub fn is_set(&self) -> bool {
        self.left.is_some() || self.top.is_some() || self.right.is_some() || self.bottom.is_some()
    }

    /// Concrete insets, unset sides as zero.
    pub fn resolve(&self) -> Thickness {
        Thickness::new(
            self.left.unwrap_or(0),
            self.top.unwrap_or(0),
            self.right.unwrap_or(0),
            self.bottom.unwrap_or(0),
        )
    }
}

impl From<Thickness> for CapInsets {
    fn from(t: Thickness) -> Self {
        Self {
            left: Some(t.left),
            top: Some(t.top),
            right: Some(t.right),
            bottom: Some(t.bottom),
        }
    }
}

/// Fixed and stretch ranges for both axes, plus the content margin.
///
/// Ranges are in interior coordinates: for a marker-bordered image, offset 0
/// is the first pixel inside the border. `inset` maps them back onto the
/// bitmap. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRegionSet {
    patches_x: Vec<Patch>,
    patches_y: Vec<Patch>,
    margin_x: Range,
    margin_y: Range,
    size: Size,
    inset: u32,
}

impl PatchRegionSet {
    /// Assemble a region set, checking that each axis is a contiguous,
    /// ordered cover of `[0, len)` and that the margins lie inside it.
    pub fn from_parts(
        patches_x: Vec<Patch>,
        patches_y: Vec<Patch>,
        margin_x: Range,
        margin_y: Range,
        inset: u32,
    ) -> Result<Self> {
        let w = check_axis(&patches_x, Axis::X)?;
        let h = check_axis(&patches_y, Axis::Y)?;
        if margin_x.end > w || margin_y.end > h {
            return Err(PatchworkError::InvalidFormat(format!(
                "content margin ({}..{}, {}..{}) exceeds {w}x{h}",
                margin_x.start, margin_x.end, margin_y.start, margin_y.end
            )));
        }
        Ok(Self {
            patches_x,
            patches_y,
            margin_x,
            margin_y,
            size: Size::new(w, h),
            inset,
        })
    }

    /// A single non-stretchable block covering the whole image.
    ///
    /// Used as the fallback when an image fails marker analysis.
    pub fn fixed_block(size: Size) -> Self {
        let axis = |len: u32| {
            if len == 0 {
                Vec::new()
            } else {
                vec![Patch::fixed(0, len)]
            }
        };
        Self {
            patches_x: axis(size.w),
            patches_y: axis(size.h),
            margin_x: Range::new(0, size.w),
            margin_y: Range::new(0, size.h),
            size,
            inset: 0,
        }
    }

    /// End-cap layout for an ordinary image: the insets stay fixed and the
    /// region between them stretches. Insets that leave no interior on an
    /// axis make that axis a plain fixed block. Entirely unset insets give
    /// [`fixed_block`](Self::fixed_block).
    pub fn from_cap_insets(size: Size, insets: impl Into<CapInsets>) -> Self {
        let insets = insets.into();
        if !insets.is_set() {
            return Self::fixed_block(size);
        }
        let insets = insets.resolve();
        let axis = |len: u32, lead: u32, trail: u32| -> (Vec<Patch>, Range) {
            if lead.saturating_add(trail) >= len {
                if len > 0 {
                    log::warn!("Cap insets {lead}+{trail} leave no stretch region in {len}px");
                }
                let patches = if len == 0 {
                    Vec::new()
                } else {
                    vec![Patch::fixed(0, len)]
                };
                return (patches, Range::new(0, len));
            }
            let mut patches = Vec::with_capacity(3);
            if lead > 0 {
                patches.push(Patch::fixed(0, lead));
            }
            patches.push(Patch::stretch(lead, len - trail));
            if trail > 0 {
                patches.push(Patch::fixed(len - trail, len));
            }
            (patches, Range::new(lead, len - trail))
        };
        let (patches_x, margin_x) = axis(size.w, insets.left, insets.right);
        let (patches_y, margin_y) = axis(size.h, insets.top, insets.bottom);
        Self {
            patches_x,
            patches_y,
            margin_x,
            margin_y,
            size,
            inset: 0,
        }
    }

    /// Ordered patches along `axis`.
    pub fn patches(&self, axis: Axis) -> &[Patch] {
        match axis {
            Axis::X => &self.patches_x,
            Axis::Y => &self.patches_y,
        }
    }

    /// Content-margin range (where foreground content is laid out).
    pub fn margin(&self, axis: Axis) -> Range {
        match axis {
            Axis::X => self.margin_x,
            Axis::Y => self.margin_y,
        }
    }

    /// Interior size of the source image.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Offset from interior coordinates to bitmap coordinates.
    pub fn inset(&self) -> u32 {
        self.inset
    }

    /// Content margin expressed as padding from each edge.
    pub fn content_padding(&self) -> Thickness {
        Thickness::new(
            self.margin_x.start,
            self.margin_y.start,
            self.size.w - self.margin_x.end,
            self.size.h - self.margin_y.end,
        )
    }

    /// Number of stretch patches along `axis`.
    pub fn stretch_count(&self, axis: Axis) -> usize {
        self.patches(axis).iter().filter(|p| p.is_stretch()).count()
    }

    /// True if either axis has a stretch patch. Sets without one are
    /// drawn with a [`Fill`](crate::fill::Fill) mode instead.
    pub fn is_scalable(&self) -> bool {
        self.stretch_count(Axis::X) + self.stretch_count(Axis::Y) > 0
    }

    /// Sum of fixed extents: the smallest size drawn without clamping.
    pub fn fixed_sum(&self, axis: Axis) -> u32 {
        self.patches(axis)
            .iter()
            .filter(|p| !p.is_stretch())
            .map(Patch::len)
            .sum()
    }

    /// Smallest target size that keeps every fixed range unscaled.
    pub fn min_size(&self) -> Size {
        Size::new(self.fixed_sum(Axis::X), self.fixed_sum(Axis::Y))
    }
}

fn check_axis(patches: &[Patch], axis: Axis) -> Result<u32> {
    let mut cursor = 0;
    for p in patches {
        if p.range.start != cursor {
            return Err(PatchworkError::InvalidFormat(format!(
                "{axis:?} patches are not contiguous at offset {cursor}"
            )));
        }
        cursor = p.range.end;
    }
    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_slice() -> Vec<Patch> {
        vec![Patch::fixed(0, 4), Patch::stretch(4, 6), Patch::fixed(6, 10)]
    }

    #[test]
    fn from_parts_derives_size() {
        let set = PatchRegionSet::from_parts(
            three_slice(),
            three_slice(),
            Range::new(2, 8),
            Range::new(1, 9),
            1,
        )
        .unwrap();
        assert_eq!(set.size(), Size::new(10, 10));
        assert_eq!(set.inset(), 1);
        assert_eq!(set.stretch_count(Axis::X), 1);
        assert_eq!(set.fixed_sum(Axis::Y), 8);
        assert_eq!(set.content_padding(), Thickness::new(2, 1, 2, 1));
    }

    #[test]
    fn from_parts_rejects_gap() {
        let gap = vec![Patch::fixed(0, 4), Patch::stretch(5, 6)];
        let err =
            PatchRegionSet::from_parts(gap, three_slice(), Range::default(), Range::default(), 0)
                .unwrap_err();
        assert!(format!("{err}").contains("not contiguous"));
    }

    #[test]
    fn from_parts_rejects_margin_outside() {
        let err = PatchRegionSet::from_parts(
            three_slice(),
            three_slice(),
            Range::new(0, 11),
            Range::new(0, 10),
            0,
        )
        .unwrap_err();
        assert!(format!("{err}").contains("content margin"));
    }

    #[test]
    fn fixed_block_has_no_stretch() {
        let set = PatchRegionSet::fixed_block(Size::new(16, 9));
        assert_eq!(set.patches(Axis::X), &[Patch::fixed(0, 16)]);
        assert_eq!(set.patches(Axis::Y), &[Patch::fixed(0, 9)]);
        assert_eq!(set.stretch_count(Axis::X), 0);
        assert!(!set.is_scalable());
        assert_eq!(set.content_padding(), Thickness::default());
        assert_eq!(set.min_size(), Size::new(16, 9));
    }

    #[test]
    fn cap_insets_three_slice() {
        let set = PatchRegionSet::from_cap_insets(Size::new(64, 32), Thickness::new(8, 4, 10, 6));
        assert_eq!(
            set.patches(Axis::X),
            &[Patch::fixed(0, 8), Patch::stretch(8, 54), Patch::fixed(54, 64)]
        );
        assert_eq!(
            set.patches(Axis::Y),
            &[Patch::fixed(0, 4), Patch::stretch(4, 26), Patch::fixed(26, 32)]
        );
        assert_eq!(set.content_padding(), Thickness::new(8, 4, 10, 6));
        assert_eq!(set.inset(), 0);
    }

    #[test]
    fn cap_insets_zero_edge_skips_empty_fixed() {
        let set = PatchRegionSet::from_cap_insets(Size::new(20, 20), Thickness::new(0, 0, 5, 0));
        assert_eq!(
            set.patches(Axis::X),
            &[Patch::stretch(0, 15), Patch::fixed(15, 20)]
        );
        assert_eq!(set.patches(Axis::Y), &[Patch::stretch(0, 20)]);
    }

    #[test]
    fn cap_insets_too_large_become_fixed() {
        let set = PatchRegionSet::from_cap_insets(Size::new(10, 10), Thickness::new(6, 2, 6, 2));
        assert_eq!(set.patches(Axis::X), &[Patch::fixed(0, 10)]);
        assert_eq!(set.stretch_count(Axis::Y), 1);
    }

    #[test]
    fn negative_cap_insets_are_unset() {
        let insets = CapInsets::from_signed(-1, 4, -1, 0);
        assert_eq!(insets.left, None);
        assert_eq!(insets.top, Some(4));
        assert!(insets.is_set());
        assert_eq!(insets.resolve(), Thickness::new(0, 4, 0, 0));

        let set = PatchRegionSet::from_cap_insets(Size::new(20, 20), insets);
        assert_eq!(set.patches(Axis::X), &[Patch::stretch(0, 20)]);
        assert_eq!(
            set.patches(Axis::Y),
            &[Patch::fixed(0, 4), Patch::stretch(4, 20)]
        );
        assert!(set.is_scalable());
    }

    #[test]
    fn unset_cap_insets_give_fixed_block() {
        assert!(!CapInsets::from_signed(-1, -1, -1, -1).is_set());
        let set = PatchRegionSet::from_cap_insets(Size::new(12, 8), CapInsets::UNSET);
        assert_eq!(set, PatchRegionSet::fixed_block(Size::new(12, 8)));
        assert!(!set.is_scalable());
    }
}
