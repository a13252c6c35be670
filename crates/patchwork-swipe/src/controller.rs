//! Swipe-action menu state machine for a single list cell.
//!
//! ```text
//!   Idle --pan past dead zone--> Tracking --release--> Revealed
//!                                   |   \--release--> Idle (put away)
//!                                   \--full swipe--> Executing --> Idle
//!   Revealed --tap button--> Executing --> Idle
//!   Revealed --closing pan / tap elsewhere--> Idle (put away)
//!   Revealed --pan further open--> Tracking
//! ```
//!
//! Offsets are in logical pixels. Positive `translation_x` moves the cell
//! content toward the end edge and exposes the start menu; negative exposes
//! the end menu. Only one side is ever open.

use patchwork_types::config::SwipeConfig;
use patchwork_types::input::{GestureEvent, PanSample};

use crate::action::{Side, SwipeAction, SwipeActivation};
use crate::animation::{Tween, easing};

/// Coarse controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipePhase {
    Idle,
    Tracking,
    Revealed,
    Executing,
}

/// Observable menu state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwipeMenuState {
    pub revealed_side: Option<Side>,
    /// Visible button slots, `0..=max_buttons`.
    pub button_count: u8,
    /// The last slot is the overflow ("more") button.
    pub overflow: bool,
    /// Content offset.
    pub translation_x: f32,
    /// An action has been triggered and the menu is about to park.
    pub committed: bool,
}

/// Visible horizontal extent of one action button, in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonFrame {
    /// Slot index; the action index unless this is the overflow slot.
    pub slot: usize,
    pub x: f32,
    pub width: f32,
}

impl ButtonFrame {
    pub fn contains(&self, x: f32) -> bool {
        x >= self.x && x < self.x + self.width
    }
}

/// Result of a tap on the cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// No menu was open: the tap belongs to the cell's item.
    Cell,
    /// A revealed button was pressed.
    Button(SwipeActivation),
    /// The tap missed the buttons and closed the menu.
    PutAway,
    /// Swallowed mid-gesture.
    Ignored,
}

pub type ActionHandler = Box<dyn FnMut(&SwipeActivation)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settle {
    Revealed,
    Park,
}

/// The one in-flight animation a cell may have.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    tween: Tween,
    settle: Settle,
    /// Park no earlier than this many ms after the animation started.
    hold_ms: u32,
    elapsed_ms: u32,
}

impl InFlight {
    fn new(tween: Tween, settle: Settle) -> Self {
        Self {
            tween,
            settle,
            hold_ms: 0,
            elapsed_ms: 0,
        }
    }

    fn is_done(&self) -> bool {
        self.tween.is_finished() && self.elapsed_ms >= self.hold_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    None,
    Active,
    /// The gesture closed the menu; its remaining samples are dropped.
    Ignored,
}

/// Swipe-to-reveal behavior for one list cell.
pub struct SwipeCellController {
    config: SwipeConfig,
    start_actions: Vec<SwipeAction>,
    end_actions: Vec<SwipeAction>,
    width: f32,
    phase: SwipePhase,
    state: SwipeMenuState,
    /// Offset the content was parked at when the current pan began.
    translate_on_up: f32,
    /// Unclamped travel toward the open side.
    travel: f32,
    full_swipe_armed: bool,
    gesture: Gesture,
    animation: Option<InFlight>,
    handler: Option<ActionHandler>,
}

impl std::fmt::Debug for SwipeCellController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeCellController")
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("width", &self.width)
            .field("animating", &self.animation.is_some())
            .finish()
    }
}

impl SwipeCellController {
    /// A closed cell with the given start and end menus.
    pub fn new(
        config: SwipeConfig,
        start_actions: Vec<SwipeAction>,
        end_actions: Vec<SwipeAction>,
    ) -> Self {
        Self {
            config,
            start_actions,
            end_actions,
            width: 0.0,
            phase: SwipePhase::Idle,
            state: SwipeMenuState::default(),
            translate_on_up: 0.0,
            travel: 0.0,
            full_swipe_armed: false,
            gesture: Gesture::None,
            animation: None,
            handler: None,
        }
    }

    /// Receive button and full-swipe activations.
    pub fn set_action_handler(&mut self, handler: ActionHandler) {
        self.handler = Some(handler);
    }

    /// Replace one side's actions. An open menu is parked first.
    pub fn set_actions(&mut self, side: Side, actions: Vec<SwipeAction>) {
        if self.state.revealed_side.is_some() {
            self.park();
        }
        match side {
            Side::Start => self.start_actions = actions,
            Side::End => self.end_actions = actions,
        }
    }

    /// Actions registered on `side`.
    pub fn actions(&self, side: Side) -> &[SwipeAction] {
        match side {
            Side::Start => &self.start_actions,
            Side::End => &self.end_actions,
        }
    }

    /// Cell width from the latest layout pass.
    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(0.0);
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Current phase.
    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    /// Snapshot of the public menu state.
    pub fn state(&self) -> SwipeMenuState {
        self.state
    }

    /// True while a tween is running.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Button slots `side` would show.
    pub fn button_count(&self, side: Side) -> u8 {
        self.actions(side).len().min(self.config.max_buttons as usize) as u8
    }

    /// Descriptors of the currently visible buttons, the overflow slot
    /// replaced by [`SwipeAction::more`].
    pub fn visible_buttons(&self) -> Vec<SwipeAction> {
        let Some(side) = self.state.revealed_side else {
            return Vec::new();
        };
        let n = self.state.button_count as usize;
        let mut buttons: Vec<SwipeAction> = self.actions(side).iter().take(n).cloned().collect();
        if self.state.overflow && buttons.pop().is_some() {
            buttons.push(SwipeAction::more());
        }
        buttons
    }

    /// Visible extent of each button. While tracking, button `k` (1-based)
    /// follows `k / n` of the travel; an armed full swipe (or an executing
    /// one) stretches the first button over the whole exposed strip.
    pub fn button_positions(&self) -> Vec<ButtonFrame> {
        let Some(side) = self.state.revealed_side else {
            return Vec::new();
        };
        let n = self.state.button_count as usize;
        if n == 0 {
            return Vec::new();
        }
        if self.full_swipe_armed || self.phase == SwipePhase::Executing {
            let exposed = match self.phase {
                SwipePhase::Executing => self.state.translation_x.abs(),
                _ => self.travel,
            }
            .min(self.width);
            return vec![self.strip(side, 0, 0.0, exposed)];
        }
        let exposed = self.state.translation_x.abs();
        (0..n)
            .map(|k| {
                let near = exposed * k as f32 / n as f32;
                let far = exposed * (k + 1) as f32 / n as f32;
                self.strip(side, k, near, far)
            })
            .collect()
    }

    /// Button slot under cell-local `x`, if any.
    pub fn button_at(&self, x: f32) -> Option<usize> {
        self.button_positions()
            .into_iter()
            .find(|f| f.width > 0.0 && f.contains(x))
            .map(|f| f.slot)
    }

    /// Frame spanning `near..far` measured inward from `side`'s edge.
    fn strip(&self, side: Side, slot: usize, near: f32, far: f32) -> ButtonFrame {
        let width = far - near;
        let x = match side {
            Side::Start => near,
            Side::End => self.width - far,
        };
        ButtonFrame { slot, x, width }
    }

    /// Feed an in-progress pan sample.
    pub fn pan(&mut self, sample: &PanSample) {
        if !self.begin_gesture() {
            return;
        }
        let dx = sample.total.x;
        match self.phase {
            SwipePhase::Executing => {}
            SwipePhase::Idle => {
                if dx.abs() <= self.config.dead_zone {
                    return;
                }
                let side = Side::from_travel(dx);
                if self.actions(side).is_empty() {
                    return;
                }
                self.open(side);
                self.track(sample);
            }
            SwipePhase::Tracking => self.track(sample),
            SwipePhase::Revealed => {
                let Some(side) = self.state.revealed_side else {
                    return;
                };
                if dx * side.direction() < -self.config.dead_zone {
                    log::debug!("Closing pan on open {side:?} menu");
                    self.put_away(true);
                    self.gesture = Gesture::Ignored;
                } else if dx.abs() > self.config.dead_zone {
                    self.phase = SwipePhase::Tracking;
                    self.track(sample);
                }
            }
        }
    }

    /// Feed the final sample of a pan (pointer released).
    pub fn pan_end(&mut self, sample: &PanSample) {
        let gesture = self.gesture;
        self.gesture = Gesture::None;
        if gesture == Gesture::Ignored || self.phase != SwipePhase::Tracking {
            return;
        }
        self.track(sample);
        let Some(side) = self.state.revealed_side else {
            return;
        };
        let retracting = sample.delta.x * side.direction() < 0.0;
        let reveal = self.config.reveal_distance(self.state.button_count);

        if self.full_swipe_ready(side, retracting) {
            self.execute_full_swipe(side);
        } else if self.travel >= reveal && !retracting {
            log::debug!("Revealing {} {side:?} buttons", self.state.button_count);
            self.phase = SwipePhase::Revealed;
            self.full_swipe_armed = false;
            let target = side.direction() * reveal;
            self.translate_on_up = target;
            self.animate_to(target, self.config.reveal_ms, easing::ease_out_cubic, Settle::Revealed);
        } else {
            self.put_away(true);
        }
    }

    /// Feed a completed tap at cell-local `x`.
    pub fn tap(&mut self, x: f32) -> TapOutcome {
        match self.phase {
            SwipePhase::Tracking | SwipePhase::Executing => return TapOutcome::Ignored,
            SwipePhase::Idle | SwipePhase::Revealed => {}
        }
        self.settle_animation();
        if self.phase != SwipePhase::Revealed {
            return TapOutcome::Cell;
        }
        match self.button_at(x) {
            Some(slot) => TapOutcome::Button(self.activate(slot)),
            None => {
                self.put_away(true);
                TapOutcome::PutAway
            }
        }
    }

    /// Feed a long press (held or released). It belongs to the cell's item
    /// only while no buttons are shown; otherwise it is swallowed and the
    /// menu stays as it is.
    pub fn long_press(&mut self) -> TapOutcome {
        if self.phase != SwipePhase::Idle {
            return TapOutcome::Ignored;
        }
        self.settle_animation();
        TapOutcome::Cell
    }

    /// Route a normalized gesture event. Returns `true` when the controller
    /// consumed it.
    pub fn handle(&mut self, event: &GestureEvent) -> bool {
        match event {
            GestureEvent::Panning(sample) => {
                self.pan(sample);
                self.gesture == Gesture::Ignored || self.phase != SwipePhase::Idle
            }
            GestureEvent::Panned(sample) => {
                let was_open = self.state.revealed_side.is_some();
                self.pan_end(sample);
                was_open
            }
            GestureEvent::Tapped(tap) => self.tap(tap.at.x) != TapOutcome::Cell,
            GestureEvent::LongPressing(_) | GestureEvent::LongPressed(_) => {
                self.long_press() != TapOutcome::Cell
            }
            GestureEvent::Down(_) | GestureEvent::Up(_) => false,
        }
    }

    /// The cell was rebound to another data item.
    pub fn rebind(&mut self) {
        self.gesture = Gesture::None;
        self.park();
    }

    /// Advance the in-flight animation. Returns `true` while one is running.
    pub fn tick(&mut self, dt_ms: u32) -> bool {
        let Some(anim) = self.animation.as_mut() else {
            return false;
        };
        anim.elapsed_ms = anim.elapsed_ms.saturating_add(dt_ms);
        self.state.translation_x = anim.tween.tick(dt_ms);
        if anim.is_done() {
            let settle = anim.settle;
            self.animation = None;
            self.finish(settle);
            return false;
        }
        true
    }

    /// Returns `false` when the current gesture is being dropped.
    fn begin_gesture(&mut self) -> bool {
        match self.gesture {
            Gesture::Ignored => false,
            Gesture::Active => true,
            Gesture::None => {
                self.gesture = Gesture::Active;
                if self.phase != SwipePhase::Executing {
                    self.settle_animation();
                }
                true
            }
        }
    }

    fn open(&mut self, side: Side) {
        let available = self.actions(side).len();
        let count = self.button_count(side);
        self.state = SwipeMenuState {
            revealed_side: Some(side),
            button_count: count,
            overflow: available > count as usize,
            translation_x: 0.0,
            committed: false,
        };
        self.translate_on_up = 0.0;
        self.phase = SwipePhase::Tracking;
        log::debug!("Tracking {side:?} menu with {count} buttons");
    }

    fn track(&mut self, sample: &PanSample) {
        let Some(side) = self.state.revealed_side else {
            return;
        };
        let dir = side.direction();
        let along = (sample.total.x + self.translate_on_up) * dir;
        let reveal = self.config.reveal_distance(self.state.button_count);
        self.travel = along.max(0.0);
        self.state.translation_x = dir * self.travel.min(reveal);
        let retracting = sample.delta.x * dir < 0.0;
        self.full_swipe_armed = self.full_swipe_ready(side, retracting);
    }

    fn full_swipe_ready(&self, side: Side, retracting: bool) -> bool {
        !retracting
            && self.travel >= self.config.full_swipe_threshold
            && self.actions(side).first().is_some_and(|a| a.swipe_activated)
    }

    fn execute_full_swipe(&mut self, side: Side) {
        log::debug!("Full swipe on {side:?} menu");
        self.phase = SwipePhase::Executing;
        self.state.committed = true;
        self.full_swipe_armed = false;
        self.invoke(&SwipeActivation::Action { side, index: 0 });
        let target = side.direction() * self.width.max(self.travel);
        self.animate_to(target, self.config.execute_ms, easing::linear, Settle::Park);
        if let Some(anim) = self.animation.as_mut() {
            anim.hold_ms = self.config.full_swipe_park_delay_ms;
        }
    }

    fn activate(&mut self, slot: usize) -> SwipeActivation {
        let side = self.state.revealed_side.unwrap_or(Side::End);
        let last = (self.state.button_count as usize).saturating_sub(1);
        let activation = if self.state.overflow && slot == last {
            SwipeActivation::Overflow {
                side,
                indices: (slot..self.actions(side).len()).collect(),
            }
        } else {
            SwipeActivation::Action { side, index: slot }
        };
        self.phase = SwipePhase::Executing;
        self.state.committed = true;
        self.invoke(&activation);
        self.park();
        activation
    }

    fn invoke(&mut self, activation: &SwipeActivation) {
        match self.handler.as_mut() {
            Some(handler) => handler(activation),
            None => log::warn!("Swipe action {activation:?} has no handler"),
        }
    }

    fn put_away(&mut self, animated: bool) {
        self.phase = SwipePhase::Idle;
        self.full_swipe_armed = false;
        self.translate_on_up = 0.0;
        if animated {
            self.animate_to(0.0, self.config.put_away_ms, easing::linear, Settle::Park);
        } else {
            self.park();
        }
    }

    /// Snap to the closed state, dropping any animation.
    fn park(&mut self) {
        self.animation = None;
        self.phase = SwipePhase::Idle;
        self.state = SwipeMenuState::default();
        self.translate_on_up = 0.0;
        self.travel = 0.0;
        self.full_swipe_armed = false;
    }

    /// Replace the in-flight animation (last writer wins).
    fn animate_to(&mut self, target: f32, duration_ms: u32, ease: fn(f32) -> f32, settle: Settle) {
        let tween = Tween::new(self.state.translation_x, target, duration_ms, ease);
        self.animation = Some(InFlight::new(tween, settle));
    }

    /// Jump the in-flight animation to its end state.
    fn settle_animation(&mut self) {
        if let Some(anim) = self.animation.take() {
            self.state.translation_x = anim.tween.to;
            self.finish(anim.settle);
        }
    }

    fn finish(&mut self, settle: Settle) {
        match settle {
            Settle::Revealed => {
                self.travel = self.state.translation_x.abs();
            }
            Settle::Park => self.park(),
        }
    }
}
