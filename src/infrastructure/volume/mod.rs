//! Volume infrastructure module
//!
//! Relative volume changes through the desktop's command-line mixers.

mod amixer;
mod command;
mod factory;
mod noop;
mod pactl;
mod wpctl;

pub use amixer::AmixerVolume;
pub use factory::{
    create_volume_actuator, detect_volume_tool, VolumeTool, VolumeToolPreference,
};
pub use noop::NoOpVolume;
pub use pactl::PactlVolume;
pub use wpctl::WpctlVolume;
