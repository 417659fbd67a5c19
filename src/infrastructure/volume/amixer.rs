//! ALSA volume adapter (amixer)

use crate::application::ports::{VolumeActuator, VolumeError};
use crate::domain::overlay::VolumeDirection;

use super::command::spawn_tool;

/// Adjusts the ALSA `Master` control through `amixer`
pub struct AmixerVolume {
    step: u8,
}

impl AmixerVolume {
    pub fn new(step: u8) -> Self {
        Self { step }
    }

    fn args(&self, direction: VolumeDirection) -> Vec<String> {
        let sign = match direction {
            VolumeDirection::Raise => '+',
            VolumeDirection::Lower => '-',
        };
        vec![
            "-q".to_string(),
            "sset".to_string(),
            "Master".to_string(),
            format!("{}%{}", self.step, sign),
        ]
    }
}

impl VolumeActuator for AmixerVolume {
    fn adjust(&self, direction: VolumeDirection) -> Result<(), VolumeError> {
        spawn_tool("amixer", self.args(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_target_master() {
        let amixer = AmixerVolume::new(3);
        assert_eq!(
            amixer.args(VolumeDirection::Raise),
            ["-q", "sset", "Master", "3%+"]
        );
    }
}
