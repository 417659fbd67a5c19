//! Window geometry, density conversion and size bounds

use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest button edge in dp
pub const MIN_BUTTON_SIZE_DP: u32 = 40;
/// Largest button edge in dp
pub const MAX_BUTTON_SIZE_DP: u32 = 120;
/// Default button edge in dp
pub const DEFAULT_BUTTON_SIZE_DP: u32 = 60;

/// Smallest gesture box edge in dp (both axes)
pub const MIN_GESTURE_BOX_DP: u32 = 40;
/// Largest gesture box edge in dp (both axes)
pub const MAX_GESTURE_BOX_DP: u32 = 400;
/// Default gesture box width in dp
pub const DEFAULT_GESTURE_BOX_WIDTH_DP: u32 = 200;
/// Default gesture box height in dp
pub const DEFAULT_GESTURE_BOX_HEIGHT_DP: u32 = 100;

/// Vertical gap between the two volume buttons in dp
pub const BUTTON_GAP_DP: u32 = 8;
/// Indicator dot edge in dp
pub const INDICATOR_SIZE_DP: u32 = 12;

/// Clamp a raw button size into [40, 120] dp
pub fn clamp_button_size(raw: i64) -> u32 {
    raw.clamp(MIN_BUTTON_SIZE_DP as i64, MAX_BUTTON_SIZE_DP as i64) as u32
}

/// Clamp a raw gesture box edge into [40, 400] dp
pub fn clamp_gesture_box_edge(raw: i64) -> u32 {
    raw.clamp(MIN_GESTURE_BOX_DP as i64, MAX_GESTURE_BOX_DP as i64) as u32
}

/// Multiply a dp size by a scale factor, truncating toward zero.
///
/// Non-finite factors saturate (NaN becomes 0) so the caller's clamp
/// always receives a usable number.
pub fn scale_dp(current: u32, factor: f32) -> i64 {
    (current as f64 * factor as f64) as i64
}

/// Display density: pixels per density-independent unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Density(f32);

impl Density {
    pub const MIN: f32 = 0.5;
    pub const MAX: f32 = 4.0;

    /// Create a density, clamped into [0.5, 4.0]
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(Self::MIN, Self::MAX))
        } else {
            Self::default()
        }
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Convert dp to whole pixels (truncating)
    pub fn dp_to_px(&self, dp: u32) -> u32 {
        (dp as f32 * self.0) as u32
    }

    /// Convert a dp threshold to fractional pixels
    pub fn dp_to_px_f(&self, dp: f32) -> f32 {
        dp * self.0
    }
}

impl Default for Density {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Screen position in pixels, relative to the window's gravity anchor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by an offset
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Anchor a window's (x, y) offsets are measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gravity {
    /// x from the left edge, y from the top edge
    TopStart,
    /// x from the right edge, y from the vertical center
    EndCenterVertical,
    /// x from the left edge, y from the vertical center
    StartCenterVertical,
}

impl Gravity {
    /// Top-left corner of a `width`×`height` window in absolute screen pixels
    pub fn origin(&self, position: Position, width: u32, height: u32, screen: (u32, u32)) -> Position {
        let (screen_w, screen_h) = (
            screen.0.min(i32::MAX as u32) as i32,
            screen.1.min(i32::MAX as u32) as i32,
        );
        let width = width.min(i32::MAX as u32) as i32;
        let height = height.min(i32::MAX as u32) as i32;
        let center_y = screen_h.saturating_sub(height) / 2;
        match self {
            Self::TopStart => position,
            Self::EndCenterVertical => Position::new(
                screen_w.saturating_sub(width).saturating_sub(position.x),
                center_y.saturating_add(position.y),
            ),
            Self::StartCenterVertical => {
                Position::new(position.x, center_y.saturating_add(position.y))
            }
        }
    }
}

/// Window behavior flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowFlags(u32);

impl WindowFlags {
    /// Window never takes keyboard focus
    pub const NOT_FOCUSABLE: Self = Self(1 << 0);
    /// Window lets input fall through to what is below it
    pub const NOT_TOUCHABLE: Self = Self(1 << 1);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }
}

/// Geometry of one overlay window, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
    pub gravity: Gravity,
    pub flags: WindowFlags,
}

impl WindowGeometry {
    /// Position part of the geometry
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Absolute top-left corner on a screen of the given size
    pub fn origin(&self, screen: (u32, u32)) -> Position {
        self.gravity
            .origin(self.position(), self.width, self.height, screen)
    }
}
