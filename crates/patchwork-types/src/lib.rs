//! Foundation types for Patchwork.
//!
//! This crate contains the platform-agnostic types shared by all Patchwork
//! crates: geometry, colors, the bitmap sampling trait, pointer and gesture
//! events, configuration, and error types.

pub mod bitmap;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;

pub use bitmap::{Bitmap, RgbaBitmap};
pub use color::Color;
pub use config::{GestureConfig, PatchworkConfig, SwipeConfig};
pub use error::{PatchworkError, Result};
pub use geometry::{Point, Range, Rect, Size, Thickness};
pub use input::{GestureEvent, LongPressEvent, PanSample, PointerEvent, TapEvent};
