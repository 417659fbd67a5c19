//! Volume adapter that only logs

use tracing::info;

use crate::application::ports::{VolumeActuator, VolumeError};
use crate::domain::overlay::VolumeDirection;

/// Used when no volume tool is available or `volume_tool = "none"`
pub struct NoOpVolume;

impl NoOpVolume {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl VolumeActuator for NoOpVolume {
    fn adjust(&self, direction: VolumeDirection) -> Result<(), VolumeError> {
        info!(%direction, "Volume change requested (no volume tool configured)");
        Ok(())
    }
}
