//! Time-driven interpolation for swipe offsets.
//!
//! Nothing here owns a timer. The host calls `tick` from its frame loop and
//! the controller applies the returned value.

/// Easing curves over `t` in `[0, 1]` (input is clamped).
pub mod easing {
    /// Identity curve.
    pub fn linear(t: f32) -> f32 {
        t.clamp(0.0, 1.0)
    }

    /// Fast start, gentle landing.
    pub fn ease_out_cubic(t: f32) -> f32 {
        let u = 1.0 - t.clamp(0.0, 1.0);
        1.0 - u * u * u
    }
}

/// Interpolates one value from `from` to `to` over `duration_ms`.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration_ms: u32,
    elapsed_ms: u32,
    easing: fn(f32) -> f32,
}

impl Tween {
    /// Animate `from` to `to` over `duration_ms`.
    pub fn new(from: f32, to: f32, duration_ms: u32, easing: fn(f32) -> f32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            elapsed_ms: 0,
            easing,
        }
    }

    /// Advance by `dt_ms`, returning the new value.
    pub fn tick(&mut self, dt_ms: u32) -> f32 {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms).min(self.duration_ms);
        self.value()
    }

    /// Current value. Exactly `to` once finished.
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed_ms as f32 / self.duration_ms as f32;
        self.from + (self.to - self.from) * (self.easing)(t)
    }

    /// True once the duration has elapsed.
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_tween_hits_endpoints() {
        let mut tw = Tween::new(-180.0, 0.0, 400, easing::linear);
        assert_eq!(tw.value(), -180.0);
        assert_eq!(tw.tick(200), -90.0);
        assert!(!tw.is_finished());
        assert_eq!(tw.tick(500), 0.0);
        assert!(tw.is_finished());
        assert_eq!(tw.elapsed_ms(), 400);
    }

    #[test]
    fn zero_duration_is_already_done() {
        let tw = Tween::new(3.0, 7.0, 0, easing::linear);
        assert!(tw.is_finished());
        assert_eq!(tw.value(), 7.0);
    }

    #[test]
    fn ease_out_leads_linear() {
        let mut eased = Tween::new(0.0, 100.0, 100, easing::ease_out_cubic);
        let mut lin = Tween::new(0.0, 100.0, 100, easing::linear);
        assert!(eased.tick(30) > lin.tick(30));
    }

    #[test]
    fn easing_bounds() {
        for f in [easing::linear, easing::ease_out_cubic] {
            assert_eq!(f(0.0), 0.0);
            assert_eq!(f(1.0), 1.0);
            assert_eq!(f(-2.0), 0.0);
            assert_eq!(f(5.0), 1.0);
        }
    }
}
