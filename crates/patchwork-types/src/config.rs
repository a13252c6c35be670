//! Runtime configuration, loaded from TOML.
//!
//! Every field has a default, so an empty document (or a missing section)
//! yields the stock list-view behavior.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PatchworkError, Result};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchworkConfig {
    #[serde(default)]
    pub swipe: SwipeConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
}

impl PatchworkConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.swipe.validate()?;
        self.gesture.validate()
    }
}

/// Swipe-action menu thresholds and animation timings (logical pixels, ms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeConfig {
    /// Horizontal travel before a pan starts revealing buttons.
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f32,
    /// Width of one revealed action button.
    #[serde(default = "default_button_width")]
    pub button_width: f32,
    /// Buttons shown per side; the last one becomes "more" on overflow.
    #[serde(default = "default_max_buttons")]
    pub max_buttons: u8,
    /// Release distance that triggers the first action directly.
    #[serde(default = "default_full_swipe_threshold")]
    pub full_swipe_threshold: f32,
    /// Parking-open animation.
    #[serde(default = "default_reveal_ms")]
    pub reveal_ms: u32,
    /// Put-away animation.
    #[serde(default = "default_put_away_ms")]
    pub put_away_ms: u32,
    /// Full-swipe slide-out animation.
    #[serde(default = "default_execute_ms")]
    pub execute_ms: u32,
    /// Minimum time from full-swipe release until the menu parks.
    #[serde(default = "default_full_swipe_park_delay_ms")]
    pub full_swipe_park_delay_ms: u32,
}

fn default_dead_zone() -> f32 {
    20.0
}
fn default_button_width() -> f32 {
    60.0
}
fn default_max_buttons() -> u8 {
    3
}
fn default_full_swipe_threshold() -> f32 {
    210.0
}
fn default_reveal_ms() -> u32 {
    300
}
fn default_put_away_ms() -> u32 {
    400
}
fn default_execute_ms() -> u32 {
    250
}
fn default_full_swipe_park_delay_ms() -> u32 {
    400
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            dead_zone: default_dead_zone(),
            button_width: default_button_width(),
            max_buttons: default_max_buttons(),
            full_swipe_threshold: default_full_swipe_threshold(),
            reveal_ms: default_reveal_ms(),
            put_away_ms: default_put_away_ms(),
            execute_ms: default_execute_ms(),
            full_swipe_park_delay_ms: default_full_swipe_park_delay_ms(),
        }
    }
}

impl SwipeConfig {
    /// Reject thresholds that would make the menu unreachable.
    pub fn validate(&self) -> Result<()> {
        if self.dead_zone.is_nan() || self.dead_zone < 0.0 {
            return Err(PatchworkError::Config(format!(
                "swipe.dead_zone must be >= 0, got {}",
                self.dead_zone
            )));
        }
        if self.button_width.is_nan() || self.button_width <= 0.0 {
            return Err(PatchworkError::Config(format!(
                "swipe.button_width must be > 0, got {}",
                self.button_width
            )));
        }
        if self.max_buttons == 0 {
            return Err(PatchworkError::Config(
                "swipe.max_buttons must be at least 1".into(),
            ));
        }
        if self.full_swipe_threshold < self.button_width * self.max_buttons as f32 {
            return Err(PatchworkError::Config(format!(
                "swipe.full_swipe_threshold ({}) must cover all buttons ({})",
                self.full_swipe_threshold,
                self.button_width * self.max_buttons as f32
            )));
        }
        Ok(())
    }

    /// Distance at which `count` buttons are fully revealed.
    pub fn reveal_distance(&self, count: u8) -> f32 {
        self.button_width * count as f32
    }
}

/// Pointer-to-gesture recognition thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Pointer travel before a press becomes a pan instead of a tap.
    #[serde(default = "default_pan_slop")]
    pub pan_slop: f32,
    /// Hold time before a still press becomes a long press.
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
}

fn default_pan_slop() -> f32 {
    8.0
}
fn default_long_press_ms() -> u64 {
    500
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pan_slop: default_pan_slop(),
            long_press_ms: default_long_press_ms(),
        }
    }
}

impl GestureConfig {
    /// Reject thresholds the recognizer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.pan_slop.is_nan() || self.pan_slop < 0.0 {
            return Err(PatchworkError::Config(format!(
                "gesture.pan_slop must be >= 0, got {}",
                self.pan_slop
            )));
        }
        if self.long_press_ms == 0 {
            return Err(PatchworkError::Config(
                "gesture.long_press_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
