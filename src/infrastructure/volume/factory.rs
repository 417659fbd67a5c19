//! Volume tool factory with automatic detection

use std::fmt;
use std::process::Stdio;
use std::str::FromStr;

use tokio::process::Command;

use crate::application::ports::{VolumeActuator, VolumeError};

use super::amixer::AmixerVolume;
use super::noop::NoOpVolume;
use super::pactl::PactlVolume;
use super::wpctl::WpctlVolume;

/// Concrete volume tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeTool {
    /// PipeWire
    Wpctl,
    /// PulseAudio (also served by pipewire-pulse)
    Pactl,
    /// ALSA
    Amixer,
    /// Log only
    None,
}

impl fmt::Display for VolumeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeTool::Wpctl => write!(f, "wpctl"),
            VolumeTool::Pactl => write!(f, "pactl"),
            VolumeTool::Amixer => write!(f, "amixer"),
            VolumeTool::None => write!(f, "none"),
        }
    }
}

/// User preference for volume tool selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VolumeToolPreference {
    /// First available of wpctl, pactl, amixer
    #[default]
    Auto,
    Wpctl,
    Pactl,
    Amixer,
    None,
}

impl fmt::Display for VolumeToolPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeToolPreference::Auto => write!(f, "auto"),
            VolumeToolPreference::Wpctl => write!(f, "wpctl"),
            VolumeToolPreference::Pactl => write!(f, "pactl"),
            VolumeToolPreference::Amixer => write!(f, "amixer"),
            VolumeToolPreference::None => write!(f, "none"),
        }
    }
}

/// Error type for parsing volume tool preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVolumeToolError {
    pub value: String,
}

impl fmt::Display for ParseVolumeToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid volume tool '{}'. Valid options: {}",
            self.value,
            VolumeToolPreference::VALID_OPTIONS
        )
    }
}

impl std::error::Error for ParseVolumeToolError {}

impl VolumeToolPreference {
    pub const VALID_OPTIONS: &'static str = "auto, wpctl, pactl, amixer, none";
}

impl FromStr for VolumeToolPreference {
    type Err = ParseVolumeToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(VolumeToolPreference::Auto),
            "wpctl" => Ok(VolumeToolPreference::Wpctl),
            "pactl" => Ok(VolumeToolPreference::Pactl),
            "amixer" => Ok(VolumeToolPreference::Amixer),
            "none" => Ok(VolumeToolPreference::None),
            _ => Err(ParseVolumeToolError {
                value: s.to_string(),
            }),
        }
    }
}

/// Check if a tool binary is available using `which`
async fn is_tool_available(tool: &str) -> bool {
    Command::new("which")
        .arg(tool)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Detect the best available volume tool.
///
/// Priority is wpctl → pactl → amixer.
pub async fn detect_volume_tool() -> Option<VolumeTool> {
    for tool in [VolumeTool::Wpctl, VolumeTool::Pactl, VolumeTool::Amixer] {
        if is_tool_available(&tool.to_string()).await {
            return Some(tool);
        }
    }
    None
}

/// Create a volume adapter for the given preference and step (percent).
///
/// `Auto` falls back to the no-op adapter when nothing is installed; an
/// explicitly requested tool that is missing is an error.
pub async fn create_volume_actuator(
    preference: VolumeToolPreference,
    step: u8,
) -> Result<(Box<dyn VolumeActuator>, VolumeTool), VolumeError> {
    let tool = match preference {
        VolumeToolPreference::Auto => detect_volume_tool().await.unwrap_or(VolumeTool::None),
        VolumeToolPreference::None => VolumeTool::None,
        explicit => {
            let tool = match explicit {
                VolumeToolPreference::Wpctl => VolumeTool::Wpctl,
                VolumeToolPreference::Pactl => VolumeTool::Pactl,
                _ => VolumeTool::Amixer,
            };
            if !is_tool_available(&tool.to_string()).await {
                return Err(VolumeError::ToolNotFound(tool.to_string()));
            }
            tool
        }
    };
    Ok((create_specific_tool(tool, step), tool))
}

/// Create a specific volume tool adapter
fn create_specific_tool(tool: VolumeTool, step: u8) -> Box<dyn VolumeActuator> {
    match tool {
        VolumeTool::Wpctl => Box::new(WpctlVolume::new(step)),
        VolumeTool::Pactl => Box::new(PactlVolume::new(step)),
        VolumeTool::Amixer => Box::new(AmixerVolume::new(step)),
        VolumeTool::None => Box::new(NoOpVolume::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_tool_display() {
        assert_eq!(VolumeTool::Wpctl.to_string(), "wpctl");
        assert_eq!(VolumeTool::Pactl.to_string(), "pactl");
        assert_eq!(VolumeTool::Amixer.to_string(), "amixer");
        assert_eq!(VolumeTool::None.to_string(), "none");
    }

    #[test]
    fn preference_from_str() {
        assert_eq!(
            "AUTO".parse::<VolumeToolPreference>().unwrap(),
            VolumeToolPreference::Auto
        );
        assert_eq!(
            "pactl".parse::<VolumeToolPreference>().unwrap(),
            VolumeToolPreference::Pactl
        );
        assert_eq!(
            "none".parse::<VolumeToolPreference>().unwrap(),
            VolumeToolPreference::None
        );
    }

    #[test]
    fn preference_from_str_invalid() {
        let err = "alsa".parse::<VolumeToolPreference>().unwrap_err();
        assert_eq!(err.value, "alsa");
        assert!(err.to_string().contains("wpctl"));
    }

    #[test]
    fn preference_default_is_auto() {
        assert_eq!(VolumeToolPreference::default(), VolumeToolPreference::Auto);
    }

    #[tokio::test]
    async fn none_preference_never_fails() {
        let (_, tool) = create_volume_actuator(VolumeToolPreference::None, 5)
            .await
            .unwrap();
        assert_eq!(tool, VolumeTool::None);
    }
}
