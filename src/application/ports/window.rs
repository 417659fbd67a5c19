//! Overlay window port interface

use thiserror::Error;

use crate::domain::overlay::{Animation, Appearance, WidgetKind, WindowGeometry};

/// Window manager errors
#[derive(Debug, Clone, Error)]
pub enum WindowError {
    #[error("Overlay surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("No overlay window for {0}")]
    UnknownWindow(WidgetKind),

    #[error("Overlay window for {0} already exists")]
    AlreadyExists(WidgetKind),

    #[error("Overlay surface disconnected")]
    Disconnected,
}

/// Port for always-on-top overlay windows.
///
/// One window per widget kind. Calls never block on animations.
pub trait WindowManager: Send {
    /// Create a window and show it with the given appearance
    fn add_overlay(
        &mut self,
        kind: WidgetKind,
        geometry: WindowGeometry,
        appearance: Appearance,
    ) -> Result<(), WindowError>;

    /// Move or resize an existing window
    fn update_geometry(
        &mut self,
        kind: WidgetKind,
        geometry: WindowGeometry,
    ) -> Result<(), WindowError>;

    /// Destroy a window
    fn remove_overlay(&mut self, kind: WidgetKind) -> Result<(), WindowError>;

    /// Map or unmap a window without destroying it
    fn set_visible(&mut self, kind: WidgetKind, visible: bool) -> Result<(), WindowError>;

    /// Start a fire-and-forget animation on a window
    fn animate(&mut self, kind: WidgetKind, animation: Animation) -> Result<(), WindowError>;
}

/// Blanket implementation for boxed window managers
impl WindowManager for Box<dyn WindowManager> {
    fn add_overlay(
        &mut self,
        kind: WidgetKind,
        geometry: WindowGeometry,
        appearance: Appearance,
    ) -> Result<(), WindowError> {
        self.as_mut().add_overlay(kind, geometry, appearance)
    }

    fn update_geometry(
        &mut self,
        kind: WidgetKind,
        geometry: WindowGeometry,
    ) -> Result<(), WindowError> {
        self.as_mut().update_geometry(kind, geometry)
    }

    fn remove_overlay(&mut self, kind: WidgetKind) -> Result<(), WindowError> {
        self.as_mut().remove_overlay(kind)
    }

    fn set_visible(&mut self, kind: WidgetKind, visible: bool) -> Result<(), WindowError> {
        self.as_mut().set_visible(kind, visible)
    }

    fn animate(&mut self, kind: WidgetKind, animation: Animation) -> Result<(), WindowError> {
        self.as_mut().animate(kind, animation)
    }
}
