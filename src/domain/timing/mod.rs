//! Time values and the auto-hide timer

mod duration;
mod timer;

pub use duration::{Duration, DEFAULT_AUTO_HIDE_MS, MAX_AUTO_HIDE_MS, MIN_AUTO_HIDE_MS};
pub use timer::AutoHideTimer;

/// Milliseconds since the hosting daemon started.
///
/// Every controller operation takes the current instant explicitly so that
/// timer behavior is a pure function of its inputs.
pub type Millis = u64;
