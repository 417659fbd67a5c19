//! Preference keys, values and snapshots

mod keys;
mod preferences;

pub use keys::{PrefKey, PreferenceValue, ValueKind};
pub use preferences::{
    ControlMode, PreferenceSnapshot, Preferences, DEFAULT_OPACITY, MAX_OPACITY, MAX_VOLUME_STEP,
    MIN_OPACITY, MIN_VOLUME_STEP,
};
