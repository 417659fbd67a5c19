//! Preference keys and values

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::PreferenceError;

/// Value kinds a preference can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    /// Milliseconds, also accepted as a duration string such as `3s`
    DurationMs,
    Str,
}

/// A stored preference value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PreferenceValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, and ints widened to floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PreferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Every preference the overlay reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrefKey {
    FloatingButtons,
    GestureBox,
    BothModes,
    MoveModeEnabled,
    AlwaysVisible,
    Opacity,
    AutoHideDelay,
    CurrentButtonSize,
    GestureBoxWidth,
    GestureBoxHeight,
    FloatingButtonsX,
    FloatingButtonsY,
    GestureBoxX,
    GestureBoxY,
    DisplayDensity,
    VolumeStep,
    VolumeTool,
    Notify,
}

impl PrefKey {
    pub const ALL: [PrefKey; 18] = [
        Self::FloatingButtons,
        Self::GestureBox,
        Self::BothModes,
        Self::MoveModeEnabled,
        Self::AlwaysVisible,
        Self::Opacity,
        Self::AutoHideDelay,
        Self::CurrentButtonSize,
        Self::GestureBoxWidth,
        Self::GestureBoxHeight,
        Self::FloatingButtonsX,
        Self::FloatingButtonsY,
        Self::GestureBoxX,
        Self::GestureBoxY,
        Self::DisplayDensity,
        Self::VolumeStep,
        Self::VolumeTool,
        Self::Notify,
    ];

    /// Position keys cleared by a position reset
    pub const POSITIONS: [PrefKey; 4] = [
        Self::FloatingButtonsX,
        Self::FloatingButtonsY,
        Self::GestureBoxX,
        Self::GestureBoxY,
    ];

    /// Name used in the preferences file and on the command line
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FloatingButtons => "floating_buttons",
            Self::GestureBox => "gesture_box",
            Self::BothModes => "both_modes",
            Self::MoveModeEnabled => "move_mode_enabled",
            Self::AlwaysVisible => "always_visible",
            Self::Opacity => "opacity",
            Self::AutoHideDelay => "auto_hide_delay",
            Self::CurrentButtonSize => "current_button_size",
            Self::GestureBoxWidth => "gesture_box_width",
            Self::GestureBoxHeight => "gesture_box_height",
            Self::FloatingButtonsX => "floating_buttons_x",
            Self::FloatingButtonsY => "floating_buttons_y",
            Self::GestureBoxX => "gesture_box_x",
            Self::GestureBoxY => "gesture_box_y",
            Self::DisplayDensity => "display_density",
            Self::VolumeStep => "volume_step",
            Self::VolumeTool => "volume_tool",
            Self::Notify => "notify",
        }
    }

    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::FloatingButtons
            | Self::GestureBox
            | Self::BothModes
            | Self::MoveModeEnabled
            | Self::AlwaysVisible
            | Self::Notify => ValueKind::Bool,
            Self::Opacity | Self::DisplayDensity => ValueKind::Float,
            Self::AutoHideDelay => ValueKind::DurationMs,
            Self::VolumeTool => ValueKind::Str,
            _ => ValueKind::Int,
        }
    }

    /// Comma-separated list of valid key names
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for PrefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrefKey {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| PreferenceError::ValidationError {
                key: s.to_string(),
                message: format!("Unknown key. Valid keys: {}", Self::valid_names()),
            })
    }
}
