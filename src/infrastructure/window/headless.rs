//! Window manager without a display
//!
//! Keeps overlay windows in memory and logs every change. Used when no
//! layer-shell compositor is available and for `--headless` runs, where
//! pointer input arrives over the control socket.

use std::collections::BTreeMap;

use tracing::debug;

use crate::application::ports::{WindowError, WindowManager};
use crate::domain::overlay::{Animation, Appearance, WidgetKind, WindowGeometry};

/// Last known state of one headless window
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessWindow {
    pub geometry: WindowGeometry,
    pub appearance: Appearance,
    pub visible: bool,
    pub last_animation: Option<Animation>,
}

#[derive(Debug, Default)]
pub struct HeadlessWindowManager {
    windows: BTreeMap<WidgetKind, HeadlessWindow>,
}

impl HeadlessWindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self, kind: WidgetKind) -> Option<&HeadlessWindow> {
        self.windows.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn get_mut(&mut self, kind: WidgetKind) -> Result<&mut HeadlessWindow, WindowError> {
        self.windows
            .get_mut(&kind)
            .ok_or(WindowError::UnknownWindow(kind))
    }
}

impl WindowManager for HeadlessWindowManager {
    fn add_overlay(
        &mut self,
        kind: WidgetKind,
        geometry: WindowGeometry,
        appearance: Appearance,
    ) -> Result<(), WindowError> {
        if self.windows.contains_key(&kind) {
            return Err(WindowError::AlreadyExists(kind));
        }
        debug!(window = %kind, ?geometry, visible = appearance.visible, "Window added");
        self.windows.insert(
            kind,
            HeadlessWindow {
                geometry,
                appearance,
                visible: appearance.visible,
                last_animation: None,
            },
        );
        Ok(())
    }

    fn update_geometry(
        &mut self,
        kind: WidgetKind,
        geometry: WindowGeometry,
    ) -> Result<(), WindowError> {
        self.get_mut(kind)?.geometry = geometry;
        debug!(window = %kind, x = geometry.x, y = geometry.y, width = geometry.width, height = geometry.height, "Window updated");
        Ok(())
    }

    fn remove_overlay(&mut self, kind: WidgetKind) -> Result<(), WindowError> {
        self.windows
            .remove(&kind)
            .ok_or(WindowError::UnknownWindow(kind))?;
        debug!(window = %kind, "Window removed");
        Ok(())
    }

    fn set_visible(&mut self, kind: WidgetKind, visible: bool) -> Result<(), WindowError> {
        self.get_mut(kind)?.visible = visible;
        debug!(window = %kind, visible, "Window visibility changed");
        Ok(())
    }

    fn animate(&mut self, kind: WidgetKind, animation: Animation) -> Result<(), WindowError> {
        let window = self.get_mut(kind)?;
        window.last_animation = Some(animation);
        if let Some(opacity) = animation.sample(animation.duration_ms()).opacity {
            window.appearance.opacity = opacity;
        }
        debug!(window = %kind, ?animation, "Animation started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::overlay::{Gravity, Shape, VolumeDirection, WindowFlags};

    fn geometry() -> WindowGeometry {
        WindowGeometry {
            width: 60,
            height: 128,
            x: 100,
            y: 100,
            gravity: Gravity::TopStart,
            flags: WindowFlags::NOT_FOCUSABLE,
        }
    }

    fn appearance() -> Appearance {
        Appearance {
            shape: Shape::Dot,
            opacity: 0.8,
            visible: true,
        }
    }

    #[test]
    fn add_update_remove() {
        let mut wm = HeadlessWindowManager::new();
        wm.add_overlay(WidgetKind::ButtonCluster, geometry(), appearance())
            .unwrap();
        assert_eq!(wm.len(), 1);

        let mut moved = geometry();
        moved.x = 5;
        wm.update_geometry(WidgetKind::ButtonCluster, moved).unwrap();
        assert_eq!(wm.window(WidgetKind::ButtonCluster).unwrap().geometry.x, 5);

        wm.remove_overlay(WidgetKind::ButtonCluster).unwrap();
        assert!(wm.is_empty());
    }

    #[test]
    fn duplicate_add_fails() {
        let mut wm = HeadlessWindowManager::new();
        wm.add_overlay(WidgetKind::GestureBox, geometry(), appearance())
            .unwrap();
        let err = wm
            .add_overlay(WidgetKind::GestureBox, geometry(), appearance())
            .unwrap_err();
        assert!(matches!(err, WindowError::AlreadyExists(WidgetKind::GestureBox)));
    }

    #[test]
    fn unknown_window_fails() {
        let mut wm = HeadlessWindowManager::new();
        assert!(matches!(
            wm.remove_overlay(WidgetKind::IndicatorDot),
            Err(WindowError::UnknownWindow(WidgetKind::IndicatorDot))
        ));
        assert!(wm.set_visible(WidgetKind::IndicatorDot, true).is_err());
    }

    #[test]
    fn animation_settles_opacity() {
        let mut wm = HeadlessWindowManager::new();
        wm.add_overlay(WidgetKind::GestureBox, geometry(), appearance())
            .unwrap();
        wm.animate(WidgetKind::GestureBox, Animation::fade_out(0.8))
            .unwrap();
        let window = wm.window(WidgetKind::GestureBox).unwrap();
        assert_eq!(window.appearance.opacity, 0.0);
        assert_eq!(window.last_animation, Some(Animation::fade_out(0.8)));
    }

    #[test]
    fn bounce_keeps_opacity() {
        let mut wm = HeadlessWindowManager::new();
        wm.add_overlay(WidgetKind::GestureBox, geometry(), appearance())
            .unwrap();
        wm.animate(
            WidgetKind::GestureBox,
            Animation::swipe_feedback(VolumeDirection::Lower),
        )
        .unwrap();
        assert_eq!(
            wm.window(WidgetKind::GestureBox).unwrap().appearance.opacity,
            0.8
        );
    }
}
