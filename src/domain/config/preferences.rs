//! Overlay preferences value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::PreferenceError;
use crate::domain::overlay::geometry::{
    clamp_button_size, clamp_gesture_box_edge, DEFAULT_BUTTON_SIZE_DP,
    DEFAULT_GESTURE_BOX_HEIGHT_DP, DEFAULT_GESTURE_BOX_WIDTH_DP,
};
use crate::domain::overlay::{Density, Position};
use crate::domain::timing::{Duration, DEFAULT_AUTO_HIDE_MS};

use super::keys::{PrefKey, PreferenceValue, ValueKind};

pub const DEFAULT_OPACITY: f64 = 0.8;
pub const MIN_OPACITY: f64 = 0.2;
pub const MAX_OPACITY: f64 = 1.0;

pub const DEFAULT_VOLUME_STEP: u8 = 5;
pub const MIN_VOLUME_STEP: u8 = 1;
pub const MAX_VOLUME_STEP: u8 = 25;

pub const DEFAULT_BUTTONS_POSITION: Position = Position::new(100, 100);
pub const DEFAULT_GESTURE_BOX_POSITION: Position = Position::new(50, 0);

/// Which control widgets exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlMode {
    FloatingButtons,
    GestureBox,
    Both,
    /// No mode flag set
    Disabled,
}

impl ControlMode {
    /// Resolve the three stored flags. Inconsistent flags yield the union.
    pub fn from_flags(floating_buttons: bool, gesture_box: bool, both: bool) -> Self {
        match (floating_buttons || both, gesture_box || both) {
            (true, true) => Self::Both,
            (true, false) => Self::FloatingButtons,
            (false, true) => Self::GestureBox,
            (false, false) => Self::Disabled,
        }
    }

    /// Radio-button flags (floating_buttons, gesture_box, both_modes)
    pub const fn flags(&self) -> (bool, bool, bool) {
        match self {
            Self::FloatingButtons => (true, false, false),
            Self::GestureBox => (false, true, false),
            Self::Both => (false, false, true),
            Self::Disabled => (false, false, false),
        }
    }

    pub const fn has_buttons(&self) -> bool {
        matches!(self, Self::FloatingButtons | Self::Both)
    }

    pub const fn has_gesture_box(&self) -> bool {
        matches!(self, Self::GestureBox | Self::Both)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FloatingButtons => "buttons",
            Self::GestureBox => "gesture-box",
            Self::Both => "both",
            Self::Disabled => "none",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlMode {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buttons" | "floating-buttons" | "floating_buttons" => Ok(Self::FloatingButtons),
            "gesture-box" | "gesture_box" | "gesture" => Ok(Self::GestureBox),
            "both" => Ok(Self::Both),
            _ => Err(PreferenceError::ValidationError {
                key: "mode".to_string(),
                message: format!("Invalid mode '{}'. Valid modes: buttons, gesture-box, both", s),
            }),
        }
    }
}

/// Stored overlay preferences.
/// All fields are optional to support partial files and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating_buttons: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gesture_box: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub both_modes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_mode_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_hide_delay: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_button_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gesture_box_width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gesture_box_height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating_buttons_x: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating_buttons_y: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gesture_box_x: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gesture_box_y: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_step: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_tool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<bool>,
}

impl Preferences {
    /// Preferences with every key at its default
    pub fn defaults() -> Self {
        Self {
            floating_buttons: Some(true),
            gesture_box: Some(false),
            both_modes: Some(false),
            move_mode_enabled: Some(false),
            always_visible: Some(false),
            opacity: Some(DEFAULT_OPACITY),
            auto_hide_delay: Some(DEFAULT_AUTO_HIDE_MS as i64),
            current_button_size: Some(DEFAULT_BUTTON_SIZE_DP as i64),
            gesture_box_width: Some(DEFAULT_GESTURE_BOX_WIDTH_DP as i64),
            gesture_box_height: Some(DEFAULT_GESTURE_BOX_HEIGHT_DP as i64),
            floating_buttons_x: Some(DEFAULT_BUTTONS_POSITION.x as i64),
            floating_buttons_y: Some(DEFAULT_BUTTONS_POSITION.y as i64),
            gesture_box_x: Some(DEFAULT_GESTURE_BOX_POSITION.x as i64),
            gesture_box_y: Some(DEFAULT_GESTURE_BOX_POSITION.y as i64),
            display_density: Some(1.0),
            volume_step: Some(DEFAULT_VOLUME_STEP as i64),
            volume_tool: Some("auto".to_string()),
            notify: Some(true),
        }
    }

    /// Create empty preferences (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge with another set, where other takes precedence.
    /// Only non-None values from other override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            floating_buttons: other.floating_buttons.or(self.floating_buttons),
            gesture_box: other.gesture_box.or(self.gesture_box),
            both_modes: other.both_modes.or(self.both_modes),
            move_mode_enabled: other.move_mode_enabled.or(self.move_mode_enabled),
            always_visible: other.always_visible.or(self.always_visible),
            opacity: other.opacity.or(self.opacity),
            auto_hide_delay: other.auto_hide_delay.or(self.auto_hide_delay),
            current_button_size: other.current_button_size.or(self.current_button_size),
            gesture_box_width: other.gesture_box_width.or(self.gesture_box_width),
            gesture_box_height: other.gesture_box_height.or(self.gesture_box_height),
            floating_buttons_x: other.floating_buttons_x.or(self.floating_buttons_x),
            floating_buttons_y: other.floating_buttons_y.or(self.floating_buttons_y),
            gesture_box_x: other.gesture_box_x.or(self.gesture_box_x),
            gesture_box_y: other.gesture_box_y.or(self.gesture_box_y),
            display_density: other.display_density.or(self.display_density),
            volume_step: other.volume_step.or(self.volume_step),
            volume_tool: other.volume_tool.or(self.volume_tool),
            notify: other.notify.or(self.notify),
        }
    }

    /// Stored value for a key, if set
    pub fn get(&self, key: PrefKey) -> Option<PreferenceValue> {
        use PreferenceValue::{Bool, Float, Int, Str};
        match key {
            PrefKey::FloatingButtons => self.floating_buttons.map(Bool),
            PrefKey::GestureBox => self.gesture_box.map(Bool),
            PrefKey::BothModes => self.both_modes.map(Bool),
            PrefKey::MoveModeEnabled => self.move_mode_enabled.map(Bool),
            PrefKey::AlwaysVisible => self.always_visible.map(Bool),
            PrefKey::Notify => self.notify.map(Bool),
            PrefKey::Opacity => self.opacity.map(Float),
            PrefKey::DisplayDensity => self.display_density.map(Float),
            PrefKey::AutoHideDelay => self.auto_hide_delay.map(Int),
            PrefKey::CurrentButtonSize => self.current_button_size.map(Int),
            PrefKey::GestureBoxWidth => self.gesture_box_width.map(Int),
            PrefKey::GestureBoxHeight => self.gesture_box_height.map(Int),
            PrefKey::FloatingButtonsX => self.floating_buttons_x.map(Int),
            PrefKey::FloatingButtonsY => self.floating_buttons_y.map(Int),
            PrefKey::GestureBoxX => self.gesture_box_x.map(Int),
            PrefKey::GestureBoxY => self.gesture_box_y.map(Int),
            PrefKey::VolumeStep => self.volume_step.map(Int),
            PrefKey::VolumeTool => self.volume_tool.clone().map(Str),
        }
    }

    /// Store a value, checking it matches the key's kind
    pub fn set(&mut self, key: PrefKey, value: PreferenceValue) -> Result<(), PreferenceError> {
        let mismatch = |expected: &str| PreferenceError::ValidationError {
            key: key.as_str().to_string(),
            message: format!("Expected {}, got '{}'", expected, value),
        };
        match key.kind() {
            ValueKind::Bool => {
                let v = value.as_bool().ok_or_else(|| mismatch("a boolean"))?;
                *self.bool_slot(key) = Some(v);
            }
            ValueKind::Int | ValueKind::DurationMs => {
                let v = value.as_int().ok_or_else(|| mismatch("an integer"))?;
                *self.int_slot(key) = Some(v);
            }
            ValueKind::Float => {
                let v = value.as_float().ok_or_else(|| mismatch("a number"))?;
                *self.float_slot(key) = Some(v);
            }
            ValueKind::Str => {
                let v = value.as_str().ok_or_else(|| mismatch("a string"))?;
                self.volume_tool = Some(v.to_string());
            }
        }
        Ok(())
    }

    /// Remove a key so its default applies again
    pub fn clear(&mut self, key: PrefKey) {
        match key.kind() {
            ValueKind::Bool => *self.bool_slot(key) = None,
            ValueKind::Int | ValueKind::DurationMs => *self.int_slot(key) = None,
            ValueKind::Float => *self.float_slot(key) = None,
            ValueKind::Str => self.volume_tool = None,
        }
    }

    fn bool_slot(&mut self, key: PrefKey) -> &mut Option<bool> {
        match key {
            PrefKey::FloatingButtons => &mut self.floating_buttons,
            PrefKey::GestureBox => &mut self.gesture_box,
            PrefKey::BothModes => &mut self.both_modes,
            PrefKey::MoveModeEnabled => &mut self.move_mode_enabled,
            PrefKey::AlwaysVisible => &mut self.always_visible,
            _ => &mut self.notify,
        }
    }

    fn int_slot(&mut self, key: PrefKey) -> &mut Option<i64> {
        match key {
            PrefKey::AutoHideDelay => &mut self.auto_hide_delay,
            PrefKey::CurrentButtonSize => &mut self.current_button_size,
            PrefKey::GestureBoxWidth => &mut self.gesture_box_width,
            PrefKey::GestureBoxHeight => &mut self.gesture_box_height,
            PrefKey::FloatingButtonsX => &mut self.floating_buttons_x,
            PrefKey::FloatingButtonsY => &mut self.floating_buttons_y,
            PrefKey::GestureBoxX => &mut self.gesture_box_x,
            PrefKey::GestureBoxY => &mut self.gesture_box_y,
            _ => &mut self.volume_step,
        }
    }

    fn float_slot(&mut self, key: PrefKey) -> &mut Option<f64> {
        match key {
            PrefKey::Opacity => &mut self.opacity,
            _ => &mut self.display_density,
        }
    }

    /// Active control widgets, from the three mode flags
    pub fn control_mode(&self) -> ControlMode {
        ControlMode::from_flags(
            self.floating_buttons.unwrap_or(true),
            self.gesture_box.unwrap_or(false),
            self.both_modes.unwrap_or(false),
        )
    }

    /// Opacity clamped to [0.2, 1.0]
    pub fn opacity_or_default(&self) -> f32 {
        let raw = self.opacity.filter(|v| v.is_finite()).unwrap_or(DEFAULT_OPACITY);
        raw.clamp(MIN_OPACITY, MAX_OPACITY) as f32
    }

    /// Auto-hide delay clamped to [1s, 10s]
    pub fn auto_hide_delay_or_default(&self) -> Duration {
        self.auto_hide_delay
            .map(|ms| Duration::from_millis(ms.max(0) as u64))
            .unwrap_or_else(Duration::default_auto_hide)
            .clamp_auto_hide()
    }

    pub fn button_size_or_default(&self) -> u32 {
        clamp_button_size(self.current_button_size.unwrap_or(DEFAULT_BUTTON_SIZE_DP as i64))
    }

    pub fn gesture_box_size_or_default(&self) -> (u32, u32) {
        (
            clamp_gesture_box_edge(
                self.gesture_box_width
                    .unwrap_or(DEFAULT_GESTURE_BOX_WIDTH_DP as i64),
            ),
            clamp_gesture_box_edge(
                self.gesture_box_height
                    .unwrap_or(DEFAULT_GESTURE_BOX_HEIGHT_DP as i64),
            ),
        )
    }

    pub fn buttons_position_or_default(&self) -> Position {
        Position::new(
            to_px(self.floating_buttons_x, DEFAULT_BUTTONS_POSITION.x),
            to_px(self.floating_buttons_y, DEFAULT_BUTTONS_POSITION.y),
        )
    }

    pub fn gesture_box_position_or_default(&self) -> Position {
        Position::new(
            to_px(self.gesture_box_x, DEFAULT_GESTURE_BOX_POSITION.x),
            to_px(self.gesture_box_y, DEFAULT_GESTURE_BOX_POSITION.y),
        )
    }

    pub fn density_or_default(&self) -> Density {
        Density::new(self.display_density.unwrap_or(1.0) as f32)
    }

    /// Volume step in percent, clamped to [1, 25]
    pub fn volume_step_or_default(&self) -> u8 {
        self.volume_step
            .unwrap_or(DEFAULT_VOLUME_STEP as i64)
            .clamp(MIN_VOLUME_STEP as i64, MAX_VOLUME_STEP as i64) as u8
    }

    pub fn volume_tool_or_default(&self) -> &str {
        self.volume_tool.as_deref().unwrap_or("auto")
    }

    pub fn move_mode_or_default(&self) -> bool {
        self.move_mode_enabled.unwrap_or(false)
    }

    pub fn always_visible_or_default(&self) -> bool {
        self.always_visible.unwrap_or(false)
    }

    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(true)
    }

    /// Resolve every key to a usable, clamped value
    pub fn snapshot(&self) -> PreferenceSnapshot {
        let (gesture_box_width_dp, gesture_box_height_dp) = self.gesture_box_size_or_default();
        PreferenceSnapshot {
            mode: self.control_mode(),
            opacity: self.opacity_or_default(),
            auto_hide_delay_ms: self.auto_hide_delay_or_default().as_millis(),
            button_size_dp: self.button_size_or_default(),
            gesture_box_width_dp,
            gesture_box_height_dp,
            buttons_position: self.buttons_position_or_default(),
            gesture_box_position: self.gesture_box_position_or_default(),
            move_mode_enabled: self.move_mode_or_default(),
            always_visible: self.always_visible_or_default(),
            density: self.density_or_default(),
            volume_step: self.volume_step_or_default(),
            volume_tool: self.volume_tool_or_default().to_string(),
            notify: self.notify_or_default(),
        }
    }
}

fn to_px(raw: Option<i64>, default: i32) -> i32 {
    raw.map(|v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        .unwrap_or(default)
}

/// Fully resolved preferences, read by the controller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceSnapshot {
    pub mode: ControlMode,
    pub opacity: f32,
    pub auto_hide_delay_ms: u64,
    pub button_size_dp: u32,
    pub gesture_box_width_dp: u32,
    pub gesture_box_height_dp: u32,
    pub buttons_position: Position,
    pub gesture_box_position: Position,
    pub move_mode_enabled: bool,
    pub always_visible: bool,
    pub density: Density,
    pub volume_step: u8,
    pub volume_tool: String,
    pub notify: bool,
}

impl Default for PreferenceSnapshot {
    fn default() -> Self {
        Preferences::empty().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let snapshot = Preferences::defaults().snapshot();
        assert_eq!(snapshot.mode, ControlMode::FloatingButtons);
        assert!((snapshot.opacity - 0.8).abs() < f32::EPSILON);
        assert_eq!(snapshot.auto_hide_delay_ms, 3000);
        assert_eq!(snapshot.button_size_dp, 60);
        assert_eq!(snapshot.gesture_box_width_dp, 200);
        assert_eq!(snapshot.gesture_box_height_dp, 100);
        assert_eq!(snapshot.buttons_position, Position::new(100, 100));
        assert_eq!(snapshot.gesture_box_position, Position::new(50, 0));
        assert!(!snapshot.move_mode_enabled);
        assert!(!snapshot.always_visible);
        assert_eq!(snapshot.volume_step, 5);
        assert_eq!(snapshot.volume_tool, "auto");
        assert!(snapshot.notify);
    }

    #[test]
    fn empty_resolves_like_defaults() {
        assert_eq!(Preferences::empty().snapshot(), Preferences::defaults().snapshot());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let prefs = Preferences {
            opacity: Some(5.0),
            auto_hide_delay: Some(50),
            current_button_size: Some(500),
            gesture_box_width: Some(1),
            gesture_box_height: Some(9999),
            display_density: Some(0.01),
            volume_step: Some(-3),
            ..Default::default()
        };
        let snapshot = prefs.snapshot();
        assert_eq!(snapshot.opacity, 1.0);
        assert_eq!(snapshot.auto_hide_delay_ms, 1000);
        assert_eq!(snapshot.button_size_dp, 120);
        assert_eq!(snapshot.gesture_box_width_dp, 40);
        assert_eq!(snapshot.gesture_box_height_dp, 400);
        assert_eq!(snapshot.density.value(), 0.5);
        assert_eq!(snapshot.volume_step, 1);
    }

    #[test]
    fn positions_are_not_clamped() {
        let prefs = Preferences {
            gesture_box_x: Some(-4000),
            gesture_box_y: Some(9000),
            ..Default::default()
        };
        assert_eq!(
            prefs.gesture_box_position_or_default(),
            Position::new(-4000, 9000)
        );
    }

    #[test]
    fn control_mode_from_flags() {
        assert_eq!(ControlMode::from_flags(true, false, false), ControlMode::FloatingButtons);
        assert_eq!(ControlMode::from_flags(false, true, false), ControlMode::GestureBox);
        assert_eq!(ControlMode::from_flags(false, false, true), ControlMode::Both);
        // Inconsistent flags yield the union
        assert_eq!(ControlMode::from_flags(true, true, false), ControlMode::Both);
        assert_eq!(ControlMode::from_flags(false, false, false), ControlMode::Disabled);
    }

    #[test]
    fn control_mode_flags_are_radio() {
        for mode in [ControlMode::FloatingButtons, ControlMode::GestureBox, ControlMode::Both] {
            let (a, b, c) = mode.flags();
            assert_eq!([a, b, c].iter().filter(|f| **f).count(), 1);
            assert_eq!(ControlMode::from_flags(a, b, c), mode);
        }
    }

    #[test]
    fn control_mode_parses() {
        assert_eq!("both".parse::<ControlMode>().unwrap(), ControlMode::Both);
        assert_eq!("gesture-box".parse::<ControlMode>().unwrap(), ControlMode::GestureBox);
        assert!("all".parse::<ControlMode>().is_err());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = Preferences {
            opacity: Some(0.5),
            current_button_size: Some(80),
            ..Default::default()
        };
        let other = Preferences {
            opacity: Some(0.9),
            ..Default::default()
        };
        let merged = base.merge(other);
        assert_eq!(merged.opacity, Some(0.9));
        assert_eq!(merged.current_button_size, Some(80));
    }

    #[test]
    fn set_and_get_by_key() {
        let mut prefs = Preferences::empty();
        prefs
            .set(PrefKey::GestureBoxX, PreferenceValue::Int(80))
            .unwrap();
        prefs
            .set(PrefKey::Opacity, PreferenceValue::Int(1))
            .unwrap();
        prefs
            .set(PrefKey::AlwaysVisible, PreferenceValue::Bool(true))
            .unwrap();
        assert_eq!(prefs.get(PrefKey::GestureBoxX), Some(PreferenceValue::Int(80)));
        assert_eq!(prefs.get(PrefKey::Opacity), Some(PreferenceValue::Float(1.0)));
        assert!(prefs.always_visible_or_default());
        assert_eq!(prefs.get(PrefKey::Notify), None);
    }

    #[test]
    fn set_rejects_wrong_kind() {
        let mut prefs = Preferences::empty();
        let err = prefs
            .set(PrefKey::Notify, PreferenceValue::Int(1))
            .unwrap_err();
        assert!(err.to_string().contains("notify"));
        assert!(prefs.notify.is_none());
    }

    #[test]
    fn clear_restores_default() {
        let mut prefs = Preferences {
            floating_buttons_x: Some(7),
            ..Default::default()
        };
        prefs.clear(PrefKey::FloatingButtonsX);
        assert_eq!(prefs.buttons_position_or_default(), DEFAULT_BUTTONS_POSITION);
    }

    #[test]
    fn toml_round_trip_skips_unset_keys() {
        let prefs = Preferences {
            opacity: Some(0.5),
            ..Default::default()
        };
        let text = toml::to_string(&prefs).unwrap();
        assert_eq!(text.trim(), "opacity = 0.5");
        let parsed: Preferences = toml::from_str(&text).unwrap();
        assert_eq!(parsed, prefs);
    }
}
