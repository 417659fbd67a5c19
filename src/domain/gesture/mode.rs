use std::fmt;

use serde::{Deserialize, Serialize};

/// Global interaction mode of the overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Controls adjust volume and auto-hide
    #[default]
    Normal,
    /// Controls can be dragged and pinched; volume gestures and hiding are off
    Move,
}

impl InteractionMode {
    pub const fn from_move_enabled(enabled: bool) -> Self {
        if enabled {
            Self::Move
        } else {
            Self::Normal
        }
    }

    pub const fn is_move(&self) -> bool {
        matches!(self, Self::Move)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Move => "move",
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
