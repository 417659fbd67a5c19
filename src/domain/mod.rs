//! Domain layer - Core overlay logic
//!
//! Contains value objects, the gesture classifier, the visibility state
//! machine and domain errors. This layer has no dependencies on external
//! systems.

pub mod config;
pub mod error;
pub mod gesture;
pub mod overlay;
pub mod timing;
pub mod visibility;

// Re-export common types
pub use config::{ControlMode, PrefKey, PreferenceSnapshot, PreferenceValue, Preferences};
pub use error::*;
pub use gesture::{Action, GestureClassifier, InteractionMode, PointerEvent, PointerPhase};
pub use overlay::{VolumeDirection, Widget, WidgetKind};
pub use timing::{Duration, Millis};
pub use visibility::{VisibilityManager, VisibilityState};
