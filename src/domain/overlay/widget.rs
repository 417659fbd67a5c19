//! Overlay widgets: button cluster, gesture box and indicator dot

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidWidgetError;
use crate::domain::gesture::{Action, InteractionMode};

use super::geometry::{
    clamp_button_size, clamp_gesture_box_edge, scale_dp, Density, Gravity, Position,
    WindowFlags, WindowGeometry, BUTTON_GAP_DP, INDICATOR_SIZE_DP,
};

/// Which overlay window a widget lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    ButtonCluster,
    GestureBox,
    IndicatorDot,
}

impl WidgetKind {
    /// Short name used on the command line and in the control protocol
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ButtonCluster => "buttons",
            Self::GestureBox => "gesture-box",
            Self::IndicatorDot => "indicator",
        }
    }

    /// Whether this is one of the user-facing controls (not the dot)
    pub const fn is_control(&self) -> bool {
        !matches!(self, Self::IndicatorDot)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = InvalidWidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buttons" | "button-cluster" => Ok(Self::ButtonCluster),
            "gesture-box" | "gesture" => Ok(Self::GestureBox),
            "indicator" | "dot" => Ok(Self::IndicatorDot),
            _ => Err(InvalidWidgetError {
                input: s.to_string(),
            }),
        }
    }
}

/// Relative volume change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeDirection {
    Raise,
    Lower,
}

impl VolumeDirection {
    /// Screen-space sign of the feedback motion (up is negative y)
    pub const fn sign(&self) -> f32 {
        match self {
            Self::Raise => -1.0,
            Self::Lower => 1.0,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raise => "raise",
            Self::Lower => "lower",
        }
    }
}

impl fmt::Display for VolumeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state of one overlay widget.
///
/// Position is in pixels relative to the widget's gravity; width and height
/// are in dp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetState {
    pub kind: WidgetKind,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    pub opacity: f32,
}

impl WidgetState {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// What a widget should look like
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    /// Two stacked round buttons (raise on top, lower below)
    ButtonPair { button_px: u32, gap_px: u32 },
    /// Translucent rounded rectangle
    RoundedBox { corner_px: u32 },
    /// Small filled circle
    Dot,
}

/// Render description handed to the window adapter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Appearance {
    pub shape: Shape,
    pub opacity: f32,
    pub visible: bool,
}

/// Result of applying a classified action to a widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Position changed to the given value
    Moved(Position),
    /// Size recomputed; `changed` is false when clamping kept the old size
    Resized { changed: bool },
    /// The user asked for a volume change
    Volume(VolumeDirection),
    /// Plain activation (tap that maps to no command)
    Activated,
    /// Action does not apply to this widget in this mode
    Ignored,
}

/// Floating volume up/down buttons
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonCluster {
    state: WidgetState,
    button_size_dp: u32,
}

impl ButtonCluster {
    pub fn new(position: Position, button_size_dp: u32, opacity: f32) -> Self {
        let size = clamp_button_size(button_size_dp as i64);
        Self {
            state: WidgetState {
                kind: WidgetKind::ButtonCluster,
                x: position.x,
                y: position.y,
                width: size,
                height: Self::cluster_height(size),
                visible: true,
                opacity,
            },
            button_size_dp: size,
        }
    }

    pub fn button_size_dp(&self) -> u32 {
        self.button_size_dp
    }

    fn cluster_height(size: u32) -> u32 {
        size * 2 + BUTTON_GAP_DP
    }

    fn set_button_size(&mut self, size: u32) -> bool {
        if size == self.button_size_dp {
            return false;
        }
        self.button_size_dp = size;
        self.state.width = size;
        self.state.height = Self::cluster_height(size);
        true
    }

    /// Which button sits under an absolute screen y (TopStart gravity)
    fn button_at(&self, y: f32, density: Density) -> Option<VolumeDirection> {
        let local_y = y - self.state.y as f32;
        let button_px = density.dp_to_px(self.button_size_dp) as f32;
        let gap_px = density.dp_to_px(BUTTON_GAP_DP) as f32;
        if (0.0..button_px).contains(&local_y) {
            Some(VolumeDirection::Raise)
        } else if (button_px + gap_px..button_px * 2.0 + gap_px).contains(&local_y) {
            Some(VolumeDirection::Lower)
        } else {
            None
        }
    }
}

/// Swipe area for volume gestures
#[derive(Debug, Clone, PartialEq)]
pub struct GestureBox {
    state: WidgetState,
}

impl GestureBox {
    pub fn new(position: Position, width_dp: u32, height_dp: u32, opacity: f32) -> Self {
        Self {
            state: WidgetState {
                kind: WidgetKind::GestureBox,
                x: position.x,
                y: position.y,
                width: clamp_gesture_box_edge(width_dp as i64),
                height: clamp_gesture_box_edge(height_dp as i64),
                visible: true,
                opacity,
            },
        }
    }

    /// Set both edges, clamped. Returns whether anything changed.
    pub fn set_size(&mut self, width: i64, height: i64) -> bool {
        let width = clamp_gesture_box_edge(width);
        let height = clamp_gesture_box_edge(height);
        if width == self.state.width && height == self.state.height {
            return false;
        }
        self.state.width = width;
        self.state.height = height;
        true
    }
}

/// Compact dot shown while the controls are hidden
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorDot {
    state: WidgetState,
}

impl IndicatorDot {
    pub fn new() -> Self {
        Self {
            state: WidgetState {
                kind: WidgetKind::IndicatorDot,
                x: 0,
                y: 0,
                width: INDICATOR_SIZE_DP,
                height: INDICATOR_SIZE_DP,
                visible: false,
                opacity: 1.0,
            },
        }
    }
}

impl Default for IndicatorDot {
    fn default() -> Self {
        Self::new()
    }
}

/// Any overlay widget
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    ButtonCluster(ButtonCluster),
    GestureBox(GestureBox),
    IndicatorDot(IndicatorDot),
}

impl Widget {
    pub fn kind(&self) -> WidgetKind {
        self.state().kind
    }

    pub fn state(&self) -> &WidgetState {
        match self {
            Self::ButtonCluster(w) => &w.state,
            Self::GestureBox(w) => &w.state,
            Self::IndicatorDot(w) => &w.state,
        }
    }

    pub fn state_mut(&mut self) -> &mut WidgetState {
        match self {
            Self::ButtonCluster(w) => &mut w.state,
            Self::GestureBox(w) => &mut w.state,
            Self::IndicatorDot(w) => &mut w.state,
        }
    }

    fn gravity(&self) -> Gravity {
        match self {
            Self::ButtonCluster(_) => Gravity::TopStart,
            Self::GestureBox(_) => Gravity::EndCenterVertical,
            Self::IndicatorDot(_) => Gravity::StartCenterVertical,
        }
    }

    /// Window geometry in pixels
    pub fn current_geometry(&self, density: Density) -> WindowGeometry {
        let state = self.state();
        WindowGeometry {
            width: density.dp_to_px(state.width),
            height: density.dp_to_px(state.height),
            x: state.x,
            y: state.y,
            gravity: self.gravity(),
            flags: WindowFlags::NOT_FOCUSABLE,
        }
    }

    /// What the window adapter should draw
    pub fn render(&self, density: Density) -> Appearance {
        let shape = match self {
            Self::ButtonCluster(w) => Shape::ButtonPair {
                button_px: density.dp_to_px(w.button_size_dp),
                gap_px: density.dp_to_px(BUTTON_GAP_DP),
            },
            Self::GestureBox(_) => Shape::RoundedBox {
                corner_px: density.dp_to_px(12),
            },
            Self::IndicatorDot(_) => Shape::Dot,
        };
        let state = self.state();
        Appearance {
            shape,
            opacity: state.opacity,
            visible: state.visible,
        }
    }

    /// Apply a classified action to this widget's own state.
    ///
    /// Side effects (persistence, window updates, volume) are left to the
    /// caller, driven by the returned outcome.
    pub fn handle_gesture(
        &mut self,
        action: &Action,
        mode: InteractionMode,
        density: Density,
    ) -> GestureOutcome {
        match (self, action) {
            (Self::IndicatorDot(_), Action::Tap { .. }) => GestureOutcome::Activated,
            (Self::IndicatorDot(_), _) => GestureOutcome::Ignored,

            (widget, Action::Drag { dx, dy }) if mode.is_move() => {
                let state = widget.state_mut();
                let moved = state.position().offset(*dx, *dy);
                state.x = moved.x;
                state.y = moved.y;
                GestureOutcome::Moved(moved)
            }

            (Self::ButtonCluster(w), Action::PinchResize { scale }) if mode.is_move() => {
                let size = clamp_button_size(scale_dp(w.button_size_dp, *scale));
                GestureOutcome::Resized {
                    changed: w.set_button_size(size),
                }
            }
            (Self::GestureBox(w), Action::PinchResize { scale }) if mode.is_move() => {
                let width = scale_dp(w.state.width, *scale);
                let height = scale_dp(w.state.height, *scale);
                GestureOutcome::Resized {
                    changed: w.set_size(width, height),
                }
            }

            (Self::GestureBox(_), Action::SwipeUp) if !mode.is_move() => {
                GestureOutcome::Volume(VolumeDirection::Raise)
            }
            (Self::GestureBox(_), Action::SwipeDown) if !mode.is_move() => {
                GestureOutcome::Volume(VolumeDirection::Lower)
            }

            (Self::ButtonCluster(w), Action::Tap { y, .. }) if !mode.is_move() => {
                match w.button_at(*y, density) {
                    Some(direction) => GestureOutcome::Volume(direction),
                    None => GestureOutcome::Activated,
                }
            }
            (_, Action::Tap { .. }) => GestureOutcome::Activated,

            _ => GestureOutcome::Ignored,
        }
    }
}
