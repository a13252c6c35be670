//! Nine-patch marker analysis.
//!
//! A nine-patch bitmap carries a 1-pixel border around its real content.
//! Border pixels are either fully transparent or opaque black markers:
//!
//! - top row / left column: marker runs are the stretchable ranges,
//! - bottom row / right column: a single marker run is the content margin.
//!
//! Corner pixels are ignored. All ranges are reported in interior
//! coordinates (the pixel just inside the border is offset 0).

use patchwork_types::bitmap::Bitmap;
use patchwork_types::error::{PatchworkError, Result};
use patchwork_types::geometry::{Range, Size};

use crate::region::{Axis, Patch, PatchRegionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    fn name(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }
}

/// Classify one axis worth of marker flags into alternating fixed and
/// stretch patches.
///
/// An axis without any marker gets a zero-width stretch patch at its
/// midpoint so the compositor always has somewhere to put extra space.
pub fn scan_axis(markers: &[bool]) -> Vec<Patch> {
    let len = markers.len() as u32;
    let runs = marker_runs(markers);
    if runs.is_empty() {
        let mid = len / 2;
        let mut patches = Vec::with_capacity(3);
        if mid > 0 {
            patches.push(Patch::fixed(0, mid));
        }
        patches.push(Patch::stretch(mid, mid));
        if len > mid {
            patches.push(Patch::fixed(mid, len));
        }
        return patches;
    }

    let mut patches = Vec::with_capacity(runs.len() * 2 + 1);
    let mut cursor = 0;
    for run in runs {
        if run.start > cursor {
            patches.push(Patch::fixed(cursor, run.start));
        }
        patches.push(Patch::stretch(run.start, run.end));
        cursor = run.end;
    }
    if cursor < len {
        patches.push(Patch::fixed(cursor, len));
    }
    patches
}

/// Analyze the marker border of `bitmap`.
///
/// Fails with [`PatchworkError::InvalidFormat`] when the image is too small
/// to carry a border, when a border pixel is neither transparent nor a
/// marker, or when a content-margin edge has more than one marker run.
pub fn analyze(bitmap: &dyn Bitmap) -> Result<PatchRegionSet> {
    let (w, h) = (bitmap.width(), bitmap.height());
    if w < 3 || h < 3 {
        return Err(PatchworkError::InvalidFormat(format!(
            "{w}x{h} is too small for a marker border"
        )));
    }

    let top = read_edge(bitmap, Edge::Top)?;
    let left = read_edge(bitmap, Edge::Left)?;
    let bottom = read_edge(bitmap, Edge::Bottom)?;
    let right = read_edge(bitmap, Edge::Right)?;

    let patches_x = scan_axis(&top);
    let patches_y = scan_axis(&left);
    let margin_x = content_margin(&bottom, &top, &patches_x, Edge::Bottom)?;
    let margin_y = content_margin(&right, &left, &patches_y, Edge::Right)?;

    let set = PatchRegionSet::from_parts(patches_x, patches_y, margin_x, margin_y, 1)?;
    log::debug!(
        "Analyzed {}x{} nine-patch: {} x {} patches",
        set.size().w,
        set.size().h,
        set.patches(Axis::X).len(),
        set.patches(Axis::Y).len()
    );
    Ok(set)
}

/// [`analyze`], falling back to a whole-image fixed block on format errors.
pub fn analyze_or_fixed(bitmap: &dyn Bitmap) -> PatchRegionSet {
    match analyze(bitmap) {
        Ok(set) => set,
        Err(e) => {
            log::warn!("Treating image as a fixed block: {e}");
            PatchRegionSet::fixed_block(Size::new(bitmap.width(), bitmap.height()))
        }
    }
}

fn read_edge(bitmap: &dyn Bitmap, edge: Edge) -> Result<Vec<bool>> {
    let (w, h) = (bitmap.width(), bitmap.height());
    let len = match edge {
        Edge::Top | Edge::Bottom => w - 2,
        Edge::Left | Edge::Right => h - 2,
    };
    let mut markers = Vec::with_capacity(len as usize);
    for i in 0..len {
        let (x, y) = match edge {
            Edge::Top => (i + 1, 0),
            Edge::Bottom => (i + 1, h - 1),
            Edge::Left => (0, i + 1),
            Edge::Right => (w - 1, i + 1),
        };
        let c = bitmap.pixel(x, y);
        if c.is_marker() {
            markers.push(true);
        } else if c.is_transparent() {
            markers.push(false);
        } else {
            return Err(PatchworkError::InvalidFormat(format!(
                "{} border pixel {i} is {} (expected transparent or opaque black)",
                edge.name(),
                c.to_hex()
            )));
        }
    }
    Ok(markers)
}

/// Content margin for one axis from its padding edge.
///
/// Without padding markers the margin spans the stretch markers of the
/// opposite edge, or the whole axis when there are none.
fn content_margin(
    padding: &[bool],
    stretch_markers: &[bool],
    patches: &[Patch],
    edge: Edge,
) -> Result<Range> {
    let len = padding.len() as u32;
    let runs = marker_runs(padding);
    match runs.as_slice() {
        [] => {
            if !stretch_markers.contains(&true) {
                return Ok(Range::new(0, len));
            }
            let first = patches.iter().find(|p| p.is_stretch());
            let last = patches.iter().rev().find(|p| p.is_stretch());
            match (first, last) {
                (Some(a), Some(b)) => Ok(Range::new(a.range.start, b.range.end)),
                _ => Ok(Range::new(0, len)),
            }
        }
        [run] => Ok(*run),
        _ => Err(PatchworkError::InvalidFormat(format!(
            "{} edge has {} content markers; expected one contiguous run",
            edge.name(),
            runs.len()
        ))),
    }
}

fn marker_runs(markers: &[bool]) -> Vec<Range> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &m) in markers.iter().enumerate() {
        match (m, start) {
            (true, None) => start = Some(i as u32),
            (false, Some(s)) => {
                runs.push(Range::new(s, i as u32));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(Range::new(s, markers.len() as u32));
    }
    runs
}
