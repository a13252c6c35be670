//! Pointer-to-gesture recognition.
//!
//! One pointer interaction (down .. up) yields a tap, a pan or a long
//! press, never more than one. A press becomes a pan once the pointer has
//! travelled more than `pan_slop` from where it went down; from then on
//! every move is a `Panning` sample and the release is a `Panned` sample.
//! A press held within the slop for `long_press_ms` becomes a long press
//! instead: `LongPressing` once the threshold passes, `LongPressed` on
//! release. Nothing here owns a timer; the host calls
//! [`poll`](GestureRecognizer::poll) from its frame loop so a held pointer
//! is noticed without further input.

use patchwork_types::config::GestureConfig;
use patchwork_types::geometry::Point;
use patchwork_types::input::{GestureEvent, LongPressEvent, PanSample, PointerEvent, TapEvent};

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Point,
    last: Point,
    down_ms: u64,
    panning: bool,
    long_press: bool,
}

impl Press {
    fn hold(&self, at: Point, now_ms: u64) -> LongPressEvent {
        LongPressEvent {
            at,
            held_ms: now_ms.saturating_sub(self.down_ms),
            timestamp_ms: now_ms,
        }
    }
}

/// Stateful pointer classifier. Feed it every [`PointerEvent`] for one
/// element via [`process`](Self::process).
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    config: GestureConfig,
    press: Option<Press>,
}

impl GestureRecognizer {
    /// Create a recognizer with the given thresholds.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// True between a down and the matching up / cancel.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// True once the current press has become a pan.
    pub fn is_panning(&self) -> bool {
        self.press.is_some_and(|p| p.panning)
    }

    /// True once the current press has become a long press.
    pub fn is_long_pressing(&self) -> bool {
        self.press.is_some_and(|p| p.long_press)
    }

    /// Forget the current interaction without emitting anything.
    pub fn reset(&mut self) {
        self.press = None;
    }

    /// Check a held pointer against the long-press threshold at `now_ms`.
    /// Emits `LongPressing` at most once per press.
    pub fn poll(&mut self, now_ms: u64) -> Option<GestureEvent> {
        let threshold = self.config.long_press_ms;
        let press = self.press.as_mut()?;
        if !long_press_due(press, now_ms, threshold) {
            return None;
        }
        press.long_press = true;
        log::trace!("Long press after {}ms", now_ms.saturating_sub(press.down_ms));
        Some(GestureEvent::LongPressing(press.hold(press.last, now_ms)))
    }

    /// Process one pointer sample, returning the gesture events it produces
    /// (possibly none).
    pub fn process(&mut self, event: PointerEvent) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        match event {
            PointerEvent::Down { at, timestamp_ms } => {
                // A down without an up in between: settle the stale pan first.
                if let Some(press) = self.press.take().filter(|p| p.panning) {
                    log::debug!("Pointer down during an open pan; closing it");
                    out.push(GestureEvent::Panned(PanSample::new(
                        press.last - press.origin,
                        Point::ZERO,
                        timestamp_ms,
                    )));
                }
                self.press = Some(Press {
                    origin: at,
                    last: at,
                    down_ms: timestamp_ms,
                    panning: false,
                    long_press: false,
                });
                out.push(GestureEvent::Down(at));
            }
            PointerEvent::Move { at, timestamp_ms } => {
                // The pointer sat still until now, so a due long press wins.
                out.extend(self.poll(timestamp_ms));
                let slop = self.config.pan_slop;
                let Some(press) = self.press.as_mut() else {
                    return out;
                };
                if press.long_press {
                    press.last = at;
                    return out;
                }
                let total = at - press.origin;
                if !press.panning && total.length() > slop {
                    press.panning = true;
                }
                if press.panning {
                    let delta = at - press.last;
                    out.push(GestureEvent::Panning(PanSample::new(
                        total,
                        delta,
                        timestamp_ms,
                    )));
                }
                press.last = at;
            }
            PointerEvent::Up { at, timestamp_ms } => {
                out.extend(self.poll(timestamp_ms));
                let Some(press) = self.press.take() else {
                    return out;
                };
                let total = at - press.origin;
                out.push(GestureEvent::Up(at));
                if press.long_press {
                    out.push(GestureEvent::LongPressed(press.hold(at, timestamp_ms)));
                } else if press.panning || total.length() > self.config.pan_slop {
                    out.push(GestureEvent::Panned(PanSample::new(
                        total,
                        at - press.last,
                        timestamp_ms,
                    )));
                } else {
                    out.push(GestureEvent::Tapped(TapEvent { at, timestamp_ms }));
                }
            }
            PointerEvent::Cancel { timestamp_ms } => {
                // A cancelled tap or long press is dropped; a cancelled pan
                // still settles.
                if let Some(press) = self.press.take().filter(|p| p.panning) {
                    out.push(GestureEvent::Panned(PanSample::new(
                        press.last - press.origin,
                        Point::ZERO,
                        timestamp_ms,
                    )));
                }
            }
        }
        out
    }
}

fn long_press_due(press: &Press, now_ms: u64, threshold_ms: u64) -> bool {
    !press.panning && !press.long_press && now_ms.saturating_sub(press.down_ms) >= threshold_ms
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
