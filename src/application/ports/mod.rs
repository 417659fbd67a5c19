//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod notifier;
pub mod preferences;
pub mod volume;
pub mod window;

// Re-export common types
pub use notifier::{Notice, NotificationError, NotificationIcon, Notifier};
pub use preferences::PreferenceStore;
pub use volume::{VolumeActuator, VolumeError};
pub use window::{WindowError, WindowManager};
