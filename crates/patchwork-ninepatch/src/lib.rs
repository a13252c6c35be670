//! patchwork-ninepatch: stretchable-image decomposition and rendering plans.
//!
//! [`analyze`] reads the 1-pixel marker border of a nine-patch bitmap into a
//! [`PatchRegionSet`]. [`compose`] turns a region set and a target size into
//! a [`DrawPlan`] of source-to-destination cells; [`compose_fill`] lays out
//! images that cannot stretch. Drawing itself goes through
//! the [`DrawSurface`] trait -- no platform-specific code lives here.

pub mod analyzer;
pub mod cache;
pub mod compose;
pub mod fill;
pub mod region;
pub mod surface;

#[cfg(test)]
pub(crate) mod test_utils;

pub use analyzer::{analyze, analyze_or_fixed, scan_axis};
pub use cache::{CacheStats, ImageId, PatchCache};
pub use compose::{
    DegenerateSize, DrawCell, DrawPlan, MAX_TARGET_EXTENT, compose, distribute, largest_remainder,
};
pub use fill::{Fill, compose_fill};
pub use region::{Axis, CapInsets, Patch, PatchKind, PatchRegionSet};
pub use surface::{Canvas, DrawSurface, NinePatch};
