//! Raw pointer input

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidPointerPhase;
use crate::domain::timing::Millis;

/// Absolute screen coordinates in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Phase of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerPhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Move => "move",
            Self::Up => "up",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for PointerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointerPhase {
    type Err = InvalidPointerPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "down" => Ok(Self::Down),
            "move" => Ok(Self::Move),
            "up" => Ok(Self::Up),
            "cancel" => Ok(Self::Cancel),
            _ => Err(InvalidPointerPhase {
                input: s.to_string(),
            }),
        }
    }
}

/// One pointer event delivered to a widget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    /// Primary pointer position
    pub position: Point,
    /// Second pointer position while two pointers are down
    pub secondary: Option<Point>,
    pub time_ms: Millis,
}

impl PointerEvent {
    /// Single-pointer event
    pub fn new(phase: PointerPhase, x: f32, y: f32, time_ms: Millis) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
            secondary: None,
            time_ms,
        }
    }

    /// Attach a second pointer
    pub fn with_secondary(mut self, x: f32, y: f32) -> Self {
        self.secondary = Some(Point::new(x, y));
        self
    }

    /// Number of active pointers
    pub fn pointer_count(&self) -> usize {
        if self.secondary.is_some() {
            2
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_parses_case_insensitively() {
        assert_eq!("DOWN".parse::<PointerPhase>().unwrap(), PointerPhase::Down);
        assert_eq!(" cancel ".parse::<PointerPhase>().unwrap(), PointerPhase::Cancel);
        assert!("tap".parse::<PointerPhase>().is_err());
    }

    #[test]
    fn pointer_count_follows_secondary() {
        let event = PointerEvent::new(PointerPhase::Move, 0.0, 0.0, 0);
        assert_eq!(event.pointer_count(), 1);
        assert_eq!(event.with_secondary(3.0, 4.0).pointer_count(), 2);
    }

    #[test]
    fn distance() {
        assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
    }
}
