//! Visibility state machine for the overlay controls

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::gesture::InteractionMode;
use crate::domain::overlay::animation::{FADE_OUT_MS, ZOOM_ENTRANCE_MS};
use crate::domain::timing::{AutoHideTimer, Millis};

/// Settled visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

/// Visibility states of the control group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum VisibilityState {
    #[default]
    Visible,
    Hidden,
    /// Animating toward `target`, settles at `until_ms`
    Transitioning { target: Visibility, until_ms: Millis },
}

impl VisibilityState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Transitioning {
                target: Visibility::Visible,
                ..
            } => "revealing",
            Self::Transitioning {
                target: Visibility::Hidden,
                ..
            } => "hiding",
        }
    }

    /// Where the state is heading (itself when settled)
    pub const fn target(&self) -> Visibility {
        match self {
            Self::Visible => Visibility::Visible,
            Self::Hidden => Visibility::Hidden,
            Self::Transitioning { target, .. } => *target,
        }
    }
}

impl fmt::Display for VisibilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid visibility transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: VisibilityState,
    pub action: String,
}

/// Something the owner of the manager must act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEvent {
    /// Auto-hide fired and hiding is currently permitted
    HideDue,
    /// A transition reached its deadline
    Settled(Visibility),
}

/// Visibility group shared by all control widgets.
///
/// State machine:
///   VISIBLE -> HIDING (begin_hide) -> HIDDEN (poll)
///   HIDDEN -> REVEALING (begin_reveal) -> VISIBLE (poll)
///
/// One auto-hide timer serves the whole group. A fire while in Move mode,
/// with always-visible set, or while not visible is consumed and dropped.
#[derive(Debug)]
pub struct VisibilityManager {
    state: VisibilityState,
    timer: AutoHideTimer,
    delay_ms: u64,
    always_visible: bool,
    mode: InteractionMode,
}

impl VisibilityManager {
    /// Create a manager in the visible state with nothing scheduled
    pub fn new(delay_ms: u64, always_visible: bool, mode: InteractionMode) -> Self {
        Self {
            state: VisibilityState::Visible,
            timer: AutoHideTimer::new(),
            delay_ms,
            always_visible,
            mode,
        }
    }

    /// Get the current state
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Hidden or on the way there
    pub fn is_hidden(&self) -> bool {
        self.state.target() == Visibility::Hidden
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn timer(&self) -> &AutoHideTimer {
        &self.timer
    }

    /// Whether an auto-hide fire may hide the controls right now
    pub fn hide_permitted(&self) -> bool {
        !self.mode.is_move() && !self.always_visible
    }

    /// Switch interaction mode. Leaving Move restarts auto-hide timing from
    /// `now`.
    pub fn set_mode(&mut self, mode: InteractionMode, now: Millis) {
        let leaving_move = self.mode.is_move() && !mode.is_move();
        self.mode = mode;
        if leaving_move {
            self.refresh(now);
        }
    }

    /// Re-arm auto-hide `delay_ms` from `now`, replacing any pending fire
    pub fn refresh(&mut self, now: Millis) {
        self.timer.arm(now, self.delay_ms);
    }

    /// Transition VISIBLE -> HIDING
    pub fn begin_hide(&mut self, now: Millis) -> Result<(), InvalidStateTransition> {
        if self.is_hidden() {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "hide".to_string(),
            });
        }
        if !self.hide_permitted() {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: format!("hide in {} mode", self.mode),
            });
        }
        self.state = VisibilityState::Transitioning {
            target: Visibility::Hidden,
            until_ms: now.saturating_add(FADE_OUT_MS),
        };
        Ok(())
    }

    /// Transition HIDDEN -> REVEALING
    pub fn begin_reveal(&mut self, now: Millis) -> Result<(), InvalidStateTransition> {
        if !self.is_hidden() {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "reveal".to_string(),
            });
        }
        self.state = VisibilityState::Transitioning {
            target: Visibility::Visible,
            until_ms: now.saturating_add(ZOOM_ENTRANCE_MS),
        };
        Ok(())
    }

    /// Advance time: settle finished transitions and consume a due timer fire
    pub fn poll(&mut self, now: Millis) -> Vec<VisibilityEvent> {
        let mut events = Vec::new();
        if let VisibilityState::Transitioning { target, until_ms } = self.state {
            if now >= until_ms {
                self.state = match target {
                    Visibility::Visible => VisibilityState::Visible,
                    Visibility::Hidden => VisibilityState::Hidden,
                };
                events.push(VisibilityEvent::Settled(target));
            }
        }
        if self.timer.fire_if_due(now) && self.hide_permitted() && !self.is_hidden() {
            events.push(VisibilityEvent::HideDue);
        }
        events
    }

    /// Earliest instant `poll` has work to do
    pub fn next_wakeup(&self) -> Option<Millis> {
        let transition = match self.state {
            VisibilityState::Transitioning { until_ms, .. } => Some(until_ms),
            _ => None,
        };
        match (self.timer.deadline(), transition) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Drop the pending fire
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }
}
