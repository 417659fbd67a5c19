//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: preference
//! files, command-line volume mixers, desktop notifications and the
//! headless window manager.

pub mod notification;
pub mod preferences;
pub mod volume;
pub mod window;

// Re-export adapters
pub use notification::{create_notifier, NoOpNotifier, NotifyRustNotifier};
pub use preferences::{MemoryPreferenceStore, TomlPreferenceStore};
pub use volume::{create_volume_actuator, NoOpVolume, VolumeTool, VolumeToolPreference};
pub use window::HeadlessWindowManager;
