//! patchwork-gesture: from raw pointer samples to routed gesture events.
//!
//! [`GestureRecognizer`] classifies a pointer interaction as a tap or a pan.
//! [`GestureDispatcher`] routes the resulting events up an element tree,
//! deepest listener first.

pub mod dispatch;
pub mod recognizer;

pub use dispatch::{GestureDispatcher, GestureHandler, ListenerId, NodeId};
pub use recognizer::GestureRecognizer;
