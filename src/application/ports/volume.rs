//! Volume actuator port interface

use thiserror::Error;

use crate::domain::overlay::VolumeDirection;

/// Volume errors
#[derive(Debug, Clone, Error)]
pub enum VolumeError {
    #[error("{0} not found. Please install it or set volume_tool.")]
    ToolNotFound(String),

    #[error("Failed to adjust volume: {0}")]
    CommandFailed(String),

    #[error("No async runtime available to run the volume command")]
    NoRuntime,
}

/// Port for relative volume changes on the default output.
///
/// `adjust` returns as soon as the change is dispatched; completion is not
/// awaited.
pub trait VolumeActuator: Send {
    fn adjust(&self, direction: VolumeDirection) -> Result<(), VolumeError>;
}

/// Blanket implementation for boxed actuators
impl VolumeActuator for Box<dyn VolumeActuator> {
    fn adjust(&self, direction: VolumeDirection) -> Result<(), VolumeError> {
        self.as_ref().adjust(direction)
    }
}
