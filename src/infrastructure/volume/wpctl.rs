//! PipeWire volume adapter (wpctl)

use crate::application::ports::{VolumeActuator, VolumeError};
use crate::domain::overlay::VolumeDirection;

use super::command::spawn_tool;

/// Adjusts the default PipeWire sink through `wpctl`
pub struct WpctlVolume {
    step: u8,
}

impl WpctlVolume {
    pub fn new(step: u8) -> Self {
        Self { step }
    }

    fn args(&self, direction: VolumeDirection) -> Vec<String> {
        let sign = match direction {
            VolumeDirection::Raise => '+',
            VolumeDirection::Lower => '-',
        };
        vec![
            "set-volume".to_string(),
            "-l".to_string(),
            "1.0".to_string(),
            "@DEFAULT_AUDIO_SINK@".to_string(),
            format!("{}%{}", self.step, sign),
        ]
    }
}

impl VolumeActuator for WpctlVolume {
    fn adjust(&self, direction: VolumeDirection) -> Result<(), VolumeError> {
        spawn_tool("wpctl", self.args(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_use_default_sink_and_limit() {
        let wpctl = WpctlVolume::new(5);
        assert_eq!(
            wpctl.args(VolumeDirection::Raise),
            ["set-volume", "-l", "1.0", "@DEFAULT_AUDIO_SINK@", "5%+"]
        );
        assert_eq!(wpctl.args(VolumeDirection::Lower).last().unwrap(), "5%-");
    }
}
