//! Platform-agnostic pointer and gesture events.
//!
//! Every host maps its native touch/mouse input to [`PointerEvent`]. The
//! gesture recognizer turns those into [`GestureEvent`]s; nothing above it
//! ever sees raw platform input.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A raw pointer sample from the host, in cell-local logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Finger / button went down.
    Down { at: Point, timestamp_ms: u64 },
    /// Pointer moved while down.
    Move { at: Point, timestamp_ms: u64 },
    /// Finger / button released.
    Up { at: Point, timestamp_ms: u64 },
    /// The host aborted the interaction (scroll steal, focus loss).
    Cancel { timestamp_ms: u64 },
}

impl PointerEvent {
    /// When the host sampled the event.
    pub fn timestamp_ms(&self) -> u64 {
        match *self {
            PointerEvent::Down { timestamp_ms, .. }
            | PointerEvent::Move { timestamp_ms, .. }
            | PointerEvent::Up { timestamp_ms, .. }
            | PointerEvent::Cancel { timestamp_ms } => timestamp_ms,
        }
    }
}

/// One sample of an in-progress or finished pan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanSample {
    /// Travel since the pan started.
    pub total: Point,
    /// Travel since the previous sample.
    pub delta: Point,
    pub timestamp_ms: u64,
}

impl PanSample {
    /// Create a sample from total and incremental travel.
    pub fn new(total: Point, delta: Point, timestamp_ms: u64) -> Self {
        Self {
            total,
            delta,
            timestamp_ms,
        }
    }

    /// A purely horizontal sample, the common case for swipe cells.
    pub fn horizontal(total_x: f32, delta_x: f32, timestamp_ms: u64) -> Self {
        Self::new(
            Point::new(total_x, 0.0),
            Point::new(delta_x, 0.0),
            timestamp_ms,
        )
    }
}

/// A completed tap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapEvent {
    pub at: Point,
    pub timestamp_ms: u64,
}

/// A press held in place past the long-press threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LongPressEvent {
    pub at: Point,
    /// Time since the pointer went down.
    pub held_ms: u64,
    pub timestamp_ms: u64,
}

/// A normalized gesture event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    Down(Point),
    Up(Point),
    /// Pan in progress.
    Panning(PanSample),
    /// Pan finished (pointer released).
    Panned(PanSample),
    Tapped(TapEvent),
    /// The threshold passed while the pointer is still down.
    LongPressing(LongPressEvent),
    /// A long press was released.
    LongPressed(LongPressEvent),
}

impl GestureEvent {
    /// True for the events that close a pointer interaction.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GestureEvent::Up(_)
                | GestureEvent::Panned(_)
                | GestureEvent::Tapped(_)
                | GestureEvent::LongPressed(_)
        )
    }
}
