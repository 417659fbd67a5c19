//! In-memory preference store

use crate::application::ports::PreferenceStore;
use crate::domain::config::{PrefKey, PreferenceValue, Preferences};
use crate::domain::error::PreferenceError;

/// Preference store that never touches disk.
///
/// Used by `--headless` runs with `--no-persist` and by tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    prefs: Preferences,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of preferences
    pub fn with_preferences(prefs: Preferences) -> Self {
        Self { prefs }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences, PreferenceError> {
        Ok(self.prefs.clone())
    }

    fn put(&mut self, key: PrefKey, value: PreferenceValue) -> Result<(), PreferenceError> {
        self.prefs.set(key, value)
    }

    fn remove(&mut self, key: PrefKey) -> Result<(), PreferenceError> {
        self.prefs.clear(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_load() {
        let mut store = MemoryPreferenceStore::new();
        store.put_int(PrefKey::CurrentButtonSize, 90).unwrap();
        assert_eq!(store.load().unwrap().current_button_size, Some(90));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut store = MemoryPreferenceStore::new();
        assert!(store.put_bool(PrefKey::Opacity, true).is_err());
    }

    #[test]
    fn starts_from_given_preferences() {
        let store = MemoryPreferenceStore::with_preferences(Preferences::defaults());
        assert_eq!(store.load().unwrap().gesture_box_width, Some(200));
    }
}
