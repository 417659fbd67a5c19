//! Gesture classification
//!
//! Turns ordered pointer events for a single widget into high-level actions.
//! The classifier holds no state beyond the live touch session.

mod classifier;
mod mode;
mod pointer;

pub use classifier::{
    Action, ClassifyContext, GestureClassifier, GestureSession, PinchDetector, DRAG_THRESHOLD_PX,
    SWIPE_THRESHOLD_DP, TAP_TIMEOUT_MS,
};
pub use mode::InteractionMode;
pub use pointer::{Point, PointerEvent, PointerPhase};
