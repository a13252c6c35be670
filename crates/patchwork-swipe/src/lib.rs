//! patchwork-swipe: per-cell swipe-action menus.
//!
//! A [`SwipeCellController`] consumes pan and tap gestures for one list
//! cell and drives the content offset and the layout of the action buttons
//! revealed underneath it.

pub mod action;
pub mod animation;
pub mod controller;

pub use action::{Side, SwipeAction, SwipeActivation};
pub use animation::{Tween, easing};
pub use controller::{
    ActionHandler, ButtonFrame, SwipeCellController, SwipeMenuState, SwipePhase, TapOutcome,
};
