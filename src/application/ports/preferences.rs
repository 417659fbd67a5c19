//! Preference storage port interface

use crate::domain::config::{PrefKey, PreferenceValue, Preferences};
use crate::domain::error::PreferenceError;

/// Port for durable key/value preferences.
///
/// Every write is its own commit; nothing spans several keys.
pub trait PreferenceStore: Send {
    /// Load everything that is stored (unset keys stay None)
    fn load(&self) -> Result<Preferences, PreferenceError>;

    /// Store one value
    fn put(&mut self, key: PrefKey, value: PreferenceValue) -> Result<(), PreferenceError>;

    /// Remove one key so its default applies again
    fn remove(&mut self, key: PrefKey) -> Result<(), PreferenceError>;

    fn put_bool(&mut self, key: PrefKey, value: bool) -> Result<(), PreferenceError> {
        self.put(key, PreferenceValue::Bool(value))
    }

    fn put_int(&mut self, key: PrefKey, value: i64) -> Result<(), PreferenceError> {
        self.put(key, PreferenceValue::Int(value))
    }
}

/// Blanket implementation for boxed stores
impl PreferenceStore for Box<dyn PreferenceStore> {
    fn load(&self) -> Result<Preferences, PreferenceError> {
        self.as_ref().load()
    }

    fn put(&mut self, key: PrefKey, value: PreferenceValue) -> Result<(), PreferenceError> {
        self.as_mut().put(key, value)
    }

    fn remove(&mut self, key: PrefKey) -> Result<(), PreferenceError> {
        self.as_mut().remove(key)
    }
}
