//! Swipe-action descriptors and activations.

use serde::{Deserialize, Serialize};

use patchwork_types::color::Color;

/// Which edge of the cell a menu is revealed from.
///
/// `End` actions are revealed by dragging toward the start (leftwards in a
/// left-to-right layout) and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Start,
    End,
}

impl Side {
    /// Sign of the horizontal travel that reveals this side.
    pub fn direction(self) -> f32 {
        match self {
            Side::Start => 1.0,
            Side::End => -1.0,
        }
    }

    /// The side a horizontal travel of `dx` reveals.
    pub fn from_travel(dx: f32) -> Side {
        if dx < 0.0 { Side::End } else { Side::Start }
    }
}

/// One entry of a cell's swipe menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeAction {
    pub text: String,
    #[serde(default)]
    pub icon_text: Option<String>,
    #[serde(default = "default_background")]
    pub background_color: Color,
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    /// A long enough swipe triggers this action without a tap. Only
    /// honoured on the first action of a side.
    #[serde(default)]
    pub swipe_activated: bool,
}

fn default_background() -> Color {
    Color::GRAY
}

fn default_text_color() -> Color {
    Color::WHITE
}

impl SwipeAction {
    /// A plain button labelled `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon_text: None,
            background_color: default_background(),
            text_color: default_text_color(),
            swipe_activated: false,
        }
    }

    /// Override background and text colors.
    pub fn with_colors(mut self, background: Color, text: Color) -> Self {
        self.background_color = background;
        self.text_color = text;
        self
    }

    /// Attach an icon name.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon_text = Some(icon.into());
        self
    }

    /// Fire this action when the cell is swiped fully open.
    pub fn swipe_activated(mut self) -> Self {
        self.swipe_activated = true;
        self
    }

    /// The overflow button shown in the last slot when a side has more
    /// actions than slots.
    pub fn more() -> Self {
        Self::new("More").with_icon("\u{2022}\u{2022}\u{2022}")
    }
}

/// What a button press (or full swipe) asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeActivation {
    /// A single action, by index into its side's action list.
    Action { side: Side, index: usize },
    /// The overflow button: the host should offer the listed actions.
    Overflow { side: Side, indices: Vec<usize> },
}

impl SwipeActivation {
    pub fn side(&self) -> Side {
        match self {
            SwipeActivation::Action { side, .. } | SwipeActivation::Overflow { side, .. } => *side,
        }
    }
}
