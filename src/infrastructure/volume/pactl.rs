//! PulseAudio volume adapter (pactl)

use crate::application::ports::{VolumeActuator, VolumeError};
use crate::domain::overlay::VolumeDirection;

use super::command::spawn_tool;

/// Adjusts the default PulseAudio sink through `pactl`
pub struct PactlVolume {
    step: u8,
}

impl PactlVolume {
    pub fn new(step: u8) -> Self {
        Self { step }
    }

    fn args(&self, direction: VolumeDirection) -> Vec<String> {
        let sign = match direction {
            VolumeDirection::Raise => '+',
            VolumeDirection::Lower => '-',
        };
        vec![
            "set-sink-volume".to_string(),
            "@DEFAULT_SINK@".to_string(),
            format!("{}{}%", sign, self.step),
        ]
    }
}

impl VolumeActuator for PactlVolume {
    fn adjust(&self, direction: VolumeDirection) -> Result<(), VolumeError> {
        spawn_tool("pactl", self.args(direction))
    }
}
