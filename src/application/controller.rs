//! Overlay interaction use case
//!
//! Owns every overlay widget, routes classified gestures to them and drives
//! the shared visibility group. All methods take the current instant so the
//! controller is deterministic; the daemon loop supplies wall-clock time.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::config::{ControlMode, PrefKey, PreferenceSnapshot, Preferences};
use crate::domain::error::PreferenceError;
use crate::domain::gesture::{
    Action, ClassifyContext, GestureClassifier, InteractionMode, PointerEvent,
};
use crate::domain::overlay::geometry::clamp_gesture_box_edge;
use crate::domain::overlay::{
    Animation, ButtonCluster, GestureBox, GestureOutcome, IndicatorDot, VolumeDirection, Widget,
    WidgetKind, WidgetState,
};
use crate::domain::timing::Millis;
use crate::domain::visibility::{VisibilityEvent, VisibilityManager};

pub use super::ports::Notice;
use super::ports::{
    NotificationIcon, PreferenceStore, VolumeActuator, WindowError, WindowManager,
};

const MOVE_ON_MESSAGE: &str = "Move Mode ON: Drag to reposition controls. Pinch to resize.";
const MOVE_OFF_MESSAGE: &str = "Move Mode OFF: Controls are now locked in position.";

/// Errors from the overlay controller
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Preferences error: {0}")]
    Preference(#[from] PreferenceError),

    #[error("Window error: {0}")]
    Window(#[from] WindowError),
}

/// Serializable view of the controller
#[derive(Debug, Clone, Serialize)]
pub struct ControllerStatus {
    pub running: bool,
    pub mode: InteractionMode,
    pub control_mode: ControlMode,
    pub visibility: String,
    pub auto_hide_deadline_ms: Option<Millis>,
    pub widgets: Vec<WidgetState>,
}

/// Service-lifetime state owned by the controller
#[derive(Debug)]
pub struct ControllerState {
    prefs: PreferenceSnapshot,
    mode: InteractionMode,
    widgets: BTreeMap<WidgetKind, Widget>,
    classifiers: BTreeMap<WidgetKind, GestureClassifier>,
    visibility: VisibilityManager,
    /// Widget whose current touch revealed the hidden controls
    revealing_touch: Option<WidgetKind>,
    running: bool,
}

impl ControllerState {
    fn new(prefs: PreferenceSnapshot) -> Self {
        let mode = InteractionMode::from_move_enabled(prefs.move_mode_enabled);
        let visibility = VisibilityManager::new(prefs.auto_hide_delay_ms, prefs.always_visible, mode);
        Self {
            prefs,
            mode,
            widgets: BTreeMap::new(),
            classifiers: BTreeMap::new(),
            visibility,
            revealing_touch: None,
            running: false,
        }
    }

    fn control_kinds(&self) -> Vec<WidgetKind> {
        self.widgets
            .keys()
            .copied()
            .filter(|kind| kind.is_control())
            .collect()
    }
}

/// Overlay interaction controller
pub struct OverlayController<W, P, V>
where
    W: WindowManager,
    P: PreferenceStore,
    V: VolumeActuator,
{
    windows: W,
    store: P,
    volume: V,
    state: ControllerState,
    notices: Vec<Notice>,
}

impl<W, P, V> OverlayController<W, P, V>
where
    W: WindowManager,
    P: PreferenceStore,
    V: VolumeActuator,
{
    /// Create a controller; nothing is shown until `start`
    pub fn new(windows: W, store: P, volume: V) -> Self {
        Self {
            windows,
            store,
            volume,
            state: ControllerState::new(PreferenceSnapshot::default()),
            notices: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn mode(&self) -> InteractionMode {
        self.state.mode
    }

    pub fn preferences(&self) -> &PreferenceSnapshot {
        &self.state.prefs
    }

    pub fn widget(&self, kind: WidgetKind) -> Option<&Widget> {
        self.state.widgets.get(&kind)
    }

    pub fn visibility(&self) -> &VisibilityManager {
        &self.state.visibility
    }

    pub fn windows(&self) -> &W {
        &self.windows
    }

    /// Swap the volume backend after the tool or step preference changed
    pub fn replace_volume(&mut self, volume: V) {
        self.volume = volume;
    }

    /// Service start: create the hidden indicator, build widgets from the
    /// stored preferences, show them and arm auto-hide.
    pub fn start(&mut self, now: Millis) -> Result<(), ControllerError> {
        if self.state.running {
            self.teardown();
        }
        let prefs = self.load_preferences();
        self.state = ControllerState::new(prefs);
        self.build_widgets()?;
        self.state.running = true;
        self.state.visibility.refresh(now);
        info!(
            mode = %self.state.mode,
            controls = %self.state.prefs.mode,
            "Overlay started"
        );
        Ok(())
    }

    /// Settings changed externally: tear everything down and rebuild
    pub fn update_settings(&mut self, now: Millis) -> Result<(), ControllerError> {
        self.teardown();
        let previous_mode = self.state.mode;
        let prefs = self.load_preferences();
        self.state = ControllerState::new(prefs);
        self.build_widgets()?;
        self.state.running = true;
        self.state.visibility.refresh(now);
        if previous_mode != self.state.mode {
            debug!(from = %previous_mode, to = %self.state.mode, "Interaction mode changed by settings");
        }
        info!(controls = %self.state.prefs.mode, "Overlay rebuilt from settings");
        Ok(())
    }

    /// Service stop: cancel the timer and remove every window
    pub fn shutdown(&mut self) {
        self.state.visibility.cancel();
        self.teardown();
        self.state.running = false;
        info!("Overlay stopped");
    }

    /// Feed one raw pointer event for a widget
    pub fn handle_pointer(&mut self, kind: WidgetKind, event: &PointerEvent, now: Millis) {
        if !self.state.running {
            return;
        }
        let Some(widget) = self.state.widgets.get(&kind) else {
            debug!(widget = %kind, "Pointer event for absent widget ignored");
            return;
        };
        let widget_state = widget.state();
        let ctx = ClassifyContext {
            mode: self.state.mode,
            kind,
            widget_position: widget_state.position(),
            widget_size: (widget_state.width, widget_state.height),
            density: self.state.prefs.density,
        };
        let actions = self
            .state
            .classifiers
            .entry(kind)
            .or_default()
            .classify(event, &ctx);
        for action in actions {
            self.apply_action(kind, action, now);
        }
    }

    /// Apply one classified action to a widget
    pub fn apply_action(&mut self, kind: WidgetKind, action: Action, now: Millis) {
        if !self.state.widgets.contains_key(&kind) {
            return;
        }
        debug!(widget = %kind, ?action, "Gesture");

        if kind == WidgetKind::IndicatorDot {
            if matches!(action, Action::Tap { .. }) {
                self.reveal(now);
            }
            return;
        }

        if self.state.visibility.is_hidden() {
            // Any touch on hidden controls brings them back
            self.reveal(now);
            match action {
                Action::StartSession => {
                    self.state.revealing_touch = Some(kind);
                    return;
                }
                Action::Tap { .. } => return,
                _ => {}
            }
        }

        match action {
            // A new touch on visible controls is never the revealing one
            Action::StartSession => self.state.revealing_touch = None,
            // The touch that revealed the controls never presses a button
            Action::Tap { .. } if self.state.revealing_touch == Some(kind) => {
                self.refresh(now);
                return;
            }
            Action::EndSession if self.state.revealing_touch == Some(kind) => {
                self.state.revealing_touch = None;
            }
            _ => {}
        }

        let mode = self.state.mode;
        let density = self.state.prefs.density;
        let Some(widget) = self.state.widgets.get_mut(&kind) else {
            return;
        };
        let outcome = widget.handle_gesture(&action, mode, density);

        match (action, outcome) {
            (Action::Drag { .. }, GestureOutcome::Moved(position)) => {
                let (x_key, y_key) = position_keys(kind);
                self.push_geometry(kind);
                self.persist_int(x_key, position.x as i64);
                self.persist_int(y_key, position.y as i64);
            }
            (Action::PinchResize { .. }, GestureOutcome::Resized { changed: true }) => {
                self.push_geometry(kind);
                self.persist_size(kind);
            }
            (Action::SwipeUp | Action::SwipeDown, GestureOutcome::Volume(direction)) => {
                self.adjust_volume(direction);
                self.animate(kind, Animation::swipe_feedback(direction));
            }
            (Action::Tap { .. }, GestureOutcome::Volume(direction)) => {
                self.adjust_volume(direction);
                self.animate(kind, Animation::button_bounce(direction));
            }
            _ => {}
        }

        self.refresh(now);
    }

    /// Advance timers: settle transitions and hide when auto-hide fires
    pub fn tick(&mut self, now: Millis) {
        if !self.state.running {
            return;
        }
        for event in self.state.visibility.poll(now) {
            match event {
                VisibilityEvent::HideDue => self.hide(now),
                VisibilityEvent::Settled(visibility) => {
                    debug!(visibility = visibility.as_str(), "Visibility transition finished");
                }
            }
        }
    }

    /// Earliest instant `tick` has work to do
    pub fn next_wakeup(&self) -> Option<Millis> {
        if !self.state.running {
            return None;
        }
        self.state.visibility.next_wakeup()
    }

    /// Bring hidden controls back, or refresh visible ones
    pub fn reveal(&mut self, now: Millis) {
        match self.state.visibility.begin_reveal(now) {
            Ok(()) => {
                let opacity = self.state.prefs.opacity;
                for kind in self.state.control_kinds() {
                    if let Some(widget) = self.state.widgets.get_mut(&kind) {
                        let state = widget.state_mut();
                        state.opacity = opacity;
                        state.visible = true;
                    }
                    self.animate(kind, Animation::zoom_entrance(opacity));
                }
                self.set_indicator_visible(false);
                self.state.visibility.refresh(now);
                debug!("Controls revealed");
            }
            Err(_) => self.refresh(now),
        }
    }

    /// Toggle Normal/Move mode, persist it and queue a notice
    pub fn set_mode(&mut self, mode: InteractionMode, now: Millis) {
        if mode == self.state.mode {
            return;
        }
        self.state.mode = mode;
        self.state.visibility.set_mode(mode, now);
        for classifier in self.state.classifiers.values_mut() {
            *classifier = GestureClassifier::new();
        }
        self.persist_bool(PrefKey::MoveModeEnabled, mode.is_move());
        self.state.prefs.move_mode_enabled = mode.is_move();

        let message = if mode.is_move() {
            MOVE_ON_MESSAGE
        } else {
            MOVE_OFF_MESSAGE
        };
        info!(mode = %mode, "Interaction mode changed");
        if self.state.prefs.notify {
            self.notices
                .push(Notice::new("Volux", message, NotificationIcon::Move));
        }
    }

    /// Set a custom gesture box size; both edges clamped to [40, 400] dp
    pub fn set_gesture_box_size(
        &mut self,
        width: i64,
        height: i64,
        now: Millis,
    ) -> Result<(u32, u32), ControllerError> {
        let size = (clamp_gesture_box_edge(width), clamp_gesture_box_edge(height));
        self.state.prefs.gesture_box_width_dp = size.0;
        self.state.prefs.gesture_box_height_dp = size.1;

        let changed = match self.state.widgets.get_mut(&WidgetKind::GestureBox) {
            Some(Widget::GestureBox(gesture_box)) => {
                gesture_box.set_size(size.0 as i64, size.1 as i64)
            }
            _ => false,
        };
        if changed {
            self.push_geometry(WidgetKind::GestureBox);
        }
        self.store.put_int(PrefKey::GestureBoxWidth, size.0 as i64)?;
        self.store.put_int(PrefKey::GestureBoxHeight, size.1 as i64)?;
        if self.state.running {
            self.refresh(now);
        }
        Ok(size)
    }

    /// Drain queued notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Queue a notice from outside the controller
    pub fn push_notice(&mut self, title: &str, message: &str, icon: NotificationIcon) {
        if self.state.prefs.notify {
            self.notices.push(Notice::new(title, message, icon));
        }
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            running: self.state.running,
            mode: self.state.mode,
            control_mode: self.state.prefs.mode,
            visibility: self.state.visibility.state().to_string(),
            auto_hide_deadline_ms: self.state.visibility.timer().deadline(),
            widgets: self
                .state
                .widgets
                .values()
                .map(|w| w.state().clone())
                .collect(),
        }
    }

    fn load_preferences(&self) -> PreferenceSnapshot {
        match self.store.load() {
            Ok(prefs) => Preferences::defaults().merge(prefs).snapshot(),
            Err(e) => {
                warn!(error = %e, "Failed to load preferences, using defaults");
                Preferences::defaults().snapshot()
            }
        }
    }

    fn build_widgets(&mut self) -> Result<(), ControllerError> {
        let prefs = &self.state.prefs;
        let mut widgets = vec![Widget::IndicatorDot(IndicatorDot::new())];
        if prefs.mode.has_buttons() {
            widgets.push(Widget::ButtonCluster(ButtonCluster::new(
                prefs.buttons_position,
                prefs.button_size_dp,
                prefs.opacity,
            )));
        }
        if prefs.mode.has_gesture_box() {
            widgets.push(Widget::GestureBox(GestureBox::new(
                prefs.gesture_box_position,
                prefs.gesture_box_width_dp,
                prefs.gesture_box_height_dp,
                prefs.opacity,
            )));
        }
        if prefs.mode == ControlMode::Disabled {
            warn!("No control mode enabled; only the indicator is created");
        }

        let density = prefs.density;
        for widget in widgets {
            let kind = widget.kind();
            self.windows
                .add_overlay(kind, widget.current_geometry(density), widget.render(density))?;
            self.state.classifiers.insert(kind, GestureClassifier::new());
            self.state.widgets.insert(kind, widget);
        }
        Ok(())
    }

    /// Remove every window; failures are logged and teardown continues
    fn teardown(&mut self) {
        let kinds: Vec<WidgetKind> = self.state.widgets.keys().copied().collect();
        for kind in kinds {
            if let Err(e) = self.windows.remove_overlay(kind) {
                warn!(widget = %kind, error = %e, "Failed to remove overlay window");
            }
        }
        self.state.widgets.clear();
        self.state.classifiers.clear();
    }

    fn hide(&mut self, now: Millis) {
        if let Err(e) = self.state.visibility.begin_hide(now) {
            debug!(error = %e, "Auto-hide skipped");
            return;
        }
        for kind in self.state.control_kinds() {
            let Some(widget) = self.state.widgets.get_mut(&kind) else {
                continue;
            };
            let state = widget.state_mut();
            let from = state.opacity;
            state.opacity = 0.0;
            self.animate(kind, Animation::fade_out(from));
        }
        self.set_indicator_visible(true);
        debug!("Controls hidden");
    }

    /// Re-arm auto-hide and restore drifted opacity
    fn refresh(&mut self, now: Millis) {
        self.state.visibility.refresh(now);
        let target = self.state.prefs.opacity;
        for kind in self.state.control_kinds() {
            let Some(widget) = self.state.widgets.get_mut(&kind) else {
                continue;
            };
            let state = widget.state_mut();
            if (state.opacity - target).abs() > f32::EPSILON {
                let from = state.opacity;
                state.opacity = target;
                self.animate(kind, Animation::fade_in(from, target));
            }
        }
    }

    fn set_indicator_visible(&mut self, visible: bool) {
        if let Some(dot) = self.state.widgets.get_mut(&WidgetKind::IndicatorDot) {
            dot.state_mut().visible = visible;
            if let Err(e) = self.windows.set_visible(WidgetKind::IndicatorDot, visible) {
                warn!(error = %e, "Failed to toggle indicator");
            }
        }
    }

    fn push_geometry(&mut self, kind: WidgetKind) {
        let Some(widget) = self.state.widgets.get(&kind) else {
            return;
        };
        let geometry = widget.current_geometry(self.state.prefs.density);
        if let Err(e) = self.windows.update_geometry(kind, geometry) {
            warn!(widget = %kind, error = %e, "Failed to update overlay window");
        }
    }

    fn animate(&mut self, kind: WidgetKind, animation: Animation) {
        if let Err(e) = self.windows.animate(kind, animation) {
            warn!(widget = %kind, error = %e, "Failed to start animation");
        }
    }

    fn adjust_volume(&mut self, direction: VolumeDirection) {
        if let Err(e) = self.volume.adjust(direction) {
            warn!(%direction, error = %e, "Volume adjustment failed");
        }
    }

    fn persist_size(&mut self, kind: WidgetKind) {
        let Some(widget) = self.state.widgets.get(&kind) else {
            return;
        };
        match widget {
            Widget::ButtonCluster(cluster) => {
                let size = cluster.button_size_dp();
                self.state.prefs.button_size_dp = size;
                self.persist_int(PrefKey::CurrentButtonSize, size as i64);
            }
            Widget::GestureBox(_) => {
                let (width, height) = (widget.state().width, widget.state().height);
                self.state.prefs.gesture_box_width_dp = width;
                self.state.prefs.gesture_box_height_dp = height;
                self.persist_int(PrefKey::GestureBoxWidth, width as i64);
                self.persist_int(PrefKey::GestureBoxHeight, height as i64);
            }
            _ => {}
        }
    }

    fn persist_int(&mut self, key: PrefKey, value: i64) {
        if let Err(e) = self.store.put_int(key, value) {
            warn!(%key, error = %e, "Failed to save preference");
        }
    }

    fn persist_bool(&mut self, key: PrefKey, value: bool) {
        if let Err(e) = self.store.put_bool(key, value) {
            warn!(%key, error = %e, "Failed to save preference");
        }
    }
}

fn position_keys(kind: WidgetKind) -> (PrefKey, PrefKey) {
    match kind {
        WidgetKind::GestureBox => (PrefKey::GestureBoxX, PrefKey::GestureBoxY),
        _ => (PrefKey::FloatingButtonsX, PrefKey::FloatingButtonsY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::VolumeError;
    use crate::domain::config::PreferenceValue;
    use crate::domain::gesture::PointerPhase;
    use crate::domain::overlay::{Appearance, Position, WindowGeometry};
    use crate::domain::visibility::VisibilityState;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Add(WidgetKind, Appearance),
        Update(WidgetKind, WindowGeometry),
        Remove(WidgetKind),
        Visible(WidgetKind, bool),
        Animate(WidgetKind, Animation),
    }

    #[derive(Default)]
    struct MockWindows {
        calls: Vec<Call>,
        open: BTreeSet<WidgetKind>,
        fail_remove: Option<WidgetKind>,
    }

    impl MockWindows {
        fn animations(&self, kind: WidgetKind) -> Vec<Animation> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Animate(k, a) if *k == kind => Some(*a),
                    _ => None,
                })
                .collect()
        }

        fn updates(&self, kind: WidgetKind) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Update(k, _) if *k == kind))
                .count()
        }

        fn last_visible(&self, kind: WidgetKind) -> Option<bool> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Visible(k, v) if *k == kind => Some(*v),
                _ => None,
            })
        }
    }

    impl WindowManager for MockWindows {
        fn add_overlay(
            &mut self,
            kind: WidgetKind,
            _geometry: WindowGeometry,
            appearance: Appearance,
        ) -> Result<(), WindowError> {
            self.open.insert(kind);
            self.calls.push(Call::Add(kind, appearance));
            Ok(())
        }

        fn update_geometry(
            &mut self,
            kind: WidgetKind,
            geometry: WindowGeometry,
        ) -> Result<(), WindowError> {
            self.calls.push(Call::Update(kind, geometry));
            Ok(())
        }

        fn remove_overlay(&mut self, kind: WidgetKind) -> Result<(), WindowError> {
            self.calls.push(Call::Remove(kind));
            if self.fail_remove == Some(kind) {
                return Err(WindowError::Disconnected);
            }
            self.open.remove(&kind);
            Ok(())
        }

        fn set_visible(&mut self, kind: WidgetKind, visible: bool) -> Result<(), WindowError> {
            self.calls.push(Call::Visible(kind, visible));
            Ok(())
        }

        fn animate(&mut self, kind: WidgetKind, animation: Animation) -> Result<(), WindowError> {
            self.calls.push(Call::Animate(kind, animation));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MockStore {
        prefs: Arc<Mutex<Preferences>>,
        puts: Arc<Mutex<Vec<(PrefKey, PreferenceValue)>>>,
        fail_writes: bool,
    }

    impl MockStore {
        fn with(prefs: Preferences) -> Self {
            Self {
                prefs: Arc::new(Mutex::new(prefs)),
                ..Default::default()
            }
        }

        fn puts_of(&self, key: PrefKey) -> Vec<PreferenceValue> {
            self.puts
                .lock()
                .unwrap()
                .iter()
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .collect()
        }
    }

    impl PreferenceStore for MockStore {
        fn load(&self) -> Result<Preferences, PreferenceError> {
            Ok(self.prefs.lock().unwrap().clone())
        }

        fn put(&mut self, key: PrefKey, value: PreferenceValue) -> Result<(), PreferenceError> {
            if self.fail_writes {
                return Err(PreferenceError::WriteError("disk full".to_string()));
            }
            self.prefs.lock().unwrap().set(key, value.clone())?;
            self.puts.lock().unwrap().push((key, value));
            Ok(())
        }

        fn remove(&mut self, key: PrefKey) -> Result<(), PreferenceError> {
            self.prefs.lock().unwrap().clear(key);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MockVolume {
        raised: Arc<AtomicUsize>,
        lowered: Arc<AtomicUsize>,
        fail: bool,
    }

    impl VolumeActuator for MockVolume {
        fn adjust(&self, direction: VolumeDirection) -> Result<(), VolumeError> {
            if self.fail {
                return Err(VolumeError::CommandFailed("no sink".to_string()));
            }
            match direction {
                VolumeDirection::Raise => self.raised.fetch_add(1, Ordering::SeqCst),
                VolumeDirection::Lower => self.lowered.fetch_add(1, Ordering::SeqCst),
            };
            Ok(())
        }
    }

    type TestController = OverlayController<MockWindows, MockStore, MockVolume>;

    fn buttons_prefs() -> Preferences {
        Preferences::empty()
    }

    fn gesture_box_prefs() -> Preferences {
        Preferences {
            floating_buttons: Some(false),
            gesture_box: Some(true),
            ..Default::default()
        }
    }

    fn started(prefs: Preferences) -> (TestController, MockStore, MockVolume) {
        let store = MockStore::with(prefs);
        let volume = MockVolume::default();
        let mut controller =
            OverlayController::new(MockWindows::default(), store.clone(), volume.clone());
        controller.start(0).unwrap();
        (controller, store, volume)
    }

    fn pointer(
        controller: &mut TestController,
        kind: WidgetKind,
        phase: PointerPhase,
        x: f32,
        y: f32,
        t: Millis,
    ) {
        controller.handle_pointer(kind, &PointerEvent::new(phase, x, y, t), t);
    }

    fn hide(controller: &mut TestController) {
        let deadline = controller.next_wakeup().unwrap();
        controller.tick(deadline);
        assert!(controller.visibility().is_hidden());
    }

    #[test]
    fn start_creates_hidden_indicator_and_controls() {
        let (controller, _, _) = started(buttons_prefs());
        let windows = controller.windows();
        assert!(windows.open.contains(&WidgetKind::IndicatorDot));
        assert!(windows.open.contains(&WidgetKind::ButtonCluster));
        assert!(!windows.open.contains(&WidgetKind::GestureBox));

        let indicator_add = windows
            .calls
            .iter()
            .find_map(|c| match c {
                Call::Add(WidgetKind::IndicatorDot, appearance) => Some(*appearance),
                _ => None,
            })
            .unwrap();
        assert!(!indicator_add.visible);
        assert_eq!(controller.next_wakeup(), Some(3000));
        assert!(controller.is_running());
    }

    #[test]
    fn both_mode_creates_both_controls() {
        let (controller, _, _) = started(Preferences {
            both_modes: Some(true),
            ..Default::default()
        });
        assert!(controller.widget(WidgetKind::ButtonCluster).is_some());
        assert!(controller.widget(WidgetKind::GestureBox).is_some());
    }

    #[test]
    fn no_mode_flag_creates_only_indicator() {
        let (controller, _, _) = started(Preferences {
            floating_buttons: Some(false),
            ..Default::default()
        });
        assert_eq!(controller.windows().open.len(), 1);
        assert!(controller.widget(WidgetKind::IndicatorDot).is_some());
    }

    #[test]
    fn auto_hide_fades_out_and_shows_indicator() {
        let (mut controller, _, _) = started(buttons_prefs());

        controller.tick(2999);
        assert!(!controller.visibility().is_hidden());

        controller.tick(3000);
        let windows = controller.windows();
        assert_eq!(
            windows.animations(WidgetKind::ButtonCluster),
            vec![Animation::fade_out(0.8)]
        );
        assert_eq!(windows.last_visible(WidgetKind::IndicatorDot), Some(true));
        let buttons = controller.widget(WidgetKind::ButtonCluster).unwrap();
        assert_eq!(buttons.state().opacity, 0.0);
        assert!(controller.widget(WidgetKind::IndicatorDot).unwrap().state().visible);

        controller.tick(3300);
        assert_eq!(controller.visibility().state(), VisibilityState::Hidden);
    }

    #[test]
    fn indicator_tap_reveals_with_preference_opacity() {
        let (mut controller, _, _) = started(Preferences {
            opacity: Some(0.6),
            ..Default::default()
        });
        hide(&mut controller);

        pointer(&mut controller, WidgetKind::IndicatorDot, PointerPhase::Down, 5.0, 400.0, 4000);
        pointer(&mut controller, WidgetKind::IndicatorDot, PointerPhase::Up, 5.0, 400.0, 4050);

        assert!(!controller.visibility().is_hidden());
        let buttons = controller.widget(WidgetKind::ButtonCluster).unwrap();
        assert!((buttons.state().opacity - 0.6).abs() < f32::EPSILON);
        let windows = controller.windows();
        assert_eq!(
            windows.animations(WidgetKind::ButtonCluster).last(),
            Some(&Animation::zoom_entrance(0.6))
        );
        assert_eq!(windows.last_visible(WidgetKind::IndicatorDot), Some(false));
        assert_eq!(controller.next_wakeup(), Some(4050 + 400));
    }

    #[test]
    fn touch_on_hidden_controls_reveals_without_pressing() {
        let (mut controller, _, volume) = started(buttons_prefs());
        hide(&mut controller);

        pointer(&mut controller, WidgetKind::ButtonCluster, PointerPhase::Down, 120.0, 110.0, 5000);
        assert!(!controller.visibility().is_hidden());
        pointer(&mut controller, WidgetKind::ButtonCluster, PointerPhase::Up, 120.0, 110.0, 5050);
        assert_eq!(volume.raised.load(Ordering::SeqCst), 0);

        // Next tap is a real button press
        pointer(&mut controller, WidgetKind::ButtonCluster, PointerPhase::Down, 120.0, 110.0, 6000);
        pointer(&mut controller, WidgetKind::ButtonCluster, PointerPhase::Up, 120.0, 110.0, 6050);
        assert_eq!(volume.raised.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn restarted_session_after_reveal_presses_buttons() {
        let (mut controller, _, volume) = started(buttons_prefs());
        hide(&mut controller);

        // Revealing touch never lifts; a fresh down replaces it
        pointer(&mut controller, WidgetKind::ButtonCluster, PointerPhase::Down, 120.0, 110.0, 5000);
        pointer(&mut controller, WidgetKind::ButtonCluster, PointerPhase::Down, 120.0, 110.0, 5400);
        pointer(&mut controller, WidgetKind::ButtonCluster, PointerPhase::Up, 120.0, 110.0, 5450);
        assert_eq!(volume.raised.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn button_taps_adjust_volume_and_bounce() {
        let (mut controller, _, volume) = started(buttons_prefs());

        pointer(&mut controller, WidgetKind::ButtonCluster, PointerPhase::Down, 120.0, 170.0, 100);
        pointer(&mut controller, WidgetKind::ButtonCluster, PointerPhase::Up, 120.0, 170.0, 150);

        assert_eq!(volume.lowered.load(Ordering::SeqCst), 1);
        assert_eq!(
            controller.windows().animations(WidgetKind::ButtonCluster),
            vec![Animation::button_bounce(VolumeDirection::Lower)]
        );
        assert_eq!(controller.next_wakeup(), Some(150 + 3000));
    }

    #[test]
    fn swipe_up_raises_volume_and_refreshes() {
        let (mut controller, _, volume) = started(gesture_box_prefs());

        pointer(&mut controller, WidgetKind::GestureBox, PointerPhase::Down, 900.0, 500.0, 1000);
        pointer(&mut controller, WidgetKind::GestureBox, PointerPhase::Move, 900.0, 475.0, 1040);

        assert_eq!(volume.raised.load(Ordering::SeqCst), 1);
        assert_eq!(
            controller.windows().animations(WidgetKind::GestureBox),
            vec![Animation::swipe_feedback(VolumeDirection::Raise)]
        );
        assert_eq!(controller.next_wakeup(), Some(1040 + 3000));

        // Reference reset to 475: another 25px up triggers again
        pointer(&mut controller, WidgetKind::GestureBox, PointerPhase::Move, 900.0, 450.0, 1080);
        assert_eq!(volume.raised.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn volume_failure_still_refreshes() {
        let store = MockStore::with(gesture_box_prefs());
        let volume = MockVolume {
            fail: true,
            ..Default::default()
        };
        let mut controller = OverlayController::new(MockWindows::default(), store, volume);
        controller.start(0).unwrap();

        pointer(&mut controller, WidgetKind::GestureBox, PointerPhase::Down, 0.0, 500.0, 2000);
        pointer(&mut controller, WidgetKind::GestureBox, PointerPhase::Move, 0.0, 530.0, 2100);

        assert_eq!(controller.next_wakeup(), Some(2100 + 3000));
        assert_eq!(
            controller.windows().animations(WidgetKind::GestureBox),
            vec![Animation::swipe_feedback(VolumeDirection::Lower)]
        );
    }

    #[test]
    fn drag_in_move_mode_moves_persists_and_refreshes() {
        let (mut controller, store, _) = started(Preferences {
            move_mode_enabled: Some(true),
            ..gesture_box_prefs()
        });

        controller.apply_action(WidgetKind::GestureBox, Action::Drag { dx: 30, dy: -10 }, 1500);

        let state = controller.widget(WidgetKind::GestureBox).unwrap().state();
        assert_eq!(state.position(), Position::new(80, -10));
        assert_eq!(store.puts_of(PrefKey::GestureBoxX), vec![PreferenceValue::Int(80)]);
        assert_eq!(store.puts_of(PrefKey::GestureBoxY), vec![PreferenceValue::Int(-10)]);
        assert_eq!(controller.windows().updates(WidgetKind::GestureBox), 1);
        assert_eq!(controller.visibility().timer().deadline(), Some(1500 + 3000));
    }

    #[test]
    fn drag_ignored_in_normal_mode() {
        let (mut controller, store, _) = started(gesture_box_prefs());
        controller.apply_action(WidgetKind::GestureBox, Action::Drag { dx: 30, dy: -10 }, 100);
        assert!(store.puts_of(PrefKey::GestureBoxX).is_empty());
        assert_eq!(controller.windows().updates(WidgetKind::GestureBox), 0);
    }

    #[test]
    fn pinch_clamps_and_persists_once() {
        let (mut controller, store, _) = started(Preferences {
            move_mode_enabled: Some(true),
            ..Default::default()
        });
        let kind = WidgetKind::ButtonCluster;
        let two = |x2: f32, t: Millis| {
            PointerEvent::new(PointerPhase::Move, 100.0, 100.0, t).with_secondary(x2, 100.0)
        };

        pointer(&mut controller, kind, PointerPhase::Down, 100.0, 100.0, 0);
        controller.handle_pointer(kind, &two(200.0, 10), 10);
        controller.handle_pointer(kind, &two(350.0, 20), 20);

        let Some(Widget::ButtonCluster(cluster)) = controller.widget(kind) else {
            panic!("button cluster missing");
        };
        assert_eq!(cluster.button_size_dp(), 120);
        assert_eq!(
            store.puts_of(PrefKey::CurrentButtonSize),
            vec![PreferenceValue::Int(120)]
        );

        // Another 2.5x still clamps to 120: nothing new is pushed or stored
        controller.handle_pointer(kind, &two(725.0, 30), 30);
        assert_eq!(store.puts_of(PrefKey::CurrentButtonSize).len(), 1);
        assert_eq!(controller.windows().updates(kind), 1);
    }

    #[test]
    fn pinch_resize_bounds_hold_for_any_factor() {
        let (mut controller, _, _) = started(Preferences {
            move_mode_enabled: Some(true),
            both_modes: Some(true),
            ..Default::default()
        });
        for scale in [0.01, 1000.0, 0.5, 3.0, f32::INFINITY, 0.0, 1.7] {
            controller.apply_action(WidgetKind::ButtonCluster, Action::PinchResize { scale }, 0);
            controller.apply_action(WidgetKind::GestureBox, Action::PinchResize { scale }, 0);

            let buttons = controller.widget(WidgetKind::ButtonCluster).unwrap().state();
            assert!((40..=120).contains(&buttons.width));
            let gesture_box = controller.widget(WidgetKind::GestureBox).unwrap().state();
            assert!((40..=400).contains(&gesture_box.width));
            assert!((40..=400).contains(&gesture_box.height));
        }
    }

    #[test]
    fn move_mode_suspends_auto_hide() {
        let (mut controller, store, _) = started(buttons_prefs());
        controller.set_mode(InteractionMode::Move, 100);

        controller.tick(3000);
        controller.tick(100_000);
        assert!(!controller.visibility().is_hidden());
        assert_eq!(
            store.puts_of(PrefKey::MoveModeEnabled),
            vec![PreferenceValue::Bool(true)]
        );

        let notices = controller.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.starts_with("Move Mode ON"));
        assert!(controller.take_notices().is_empty());
    }

    #[test]
    fn entering_move_while_hidden_never_hides_again() {
        let (mut controller, _, _) = started(buttons_prefs());
        hide(&mut controller);
        controller.set_mode(InteractionMode::Move, 4000);

        for t in [5000, 10_000, 60_000] {
            controller.tick(t);
        }
        assert_eq!(controller.next_wakeup(), None);
        let fades = controller
            .windows()
            .animations(WidgetKind::ButtonCluster)
            .iter()
            .filter(|a| **a == Animation::fade_out(0.8))
            .count();
        assert_eq!(fades, 1);
    }

    #[test]
    fn leaving_move_resumes_auto_hide_from_now() {
        let (mut controller, _, _) = started(Preferences {
            move_mode_enabled: Some(true),
            ..Default::default()
        });
        controller.tick(10_000);
        controller.set_mode(InteractionMode::Normal, 20_000);
        assert_eq!(controller.next_wakeup(), Some(23_000));

        let notices = controller.take_notices();
        assert!(notices[0].message.starts_with("Move Mode OFF"));
    }

    #[test]
    fn notices_respect_notify_preference() {
        let (mut controller, _, _) = started(Preferences {
            notify: Some(false),
            ..Default::default()
        });
        controller.set_mode(InteractionMode::Move, 0);
        assert!(controller.take_notices().is_empty());
    }

    #[test]
    fn update_settings_swaps_widgets() {
        let (mut controller, store, _) = started(buttons_prefs());
        *store.prefs.lock().unwrap() = gesture_box_prefs();

        controller.update_settings(500).unwrap();

        let windows = controller.windows();
        assert!(windows.calls.contains(&Call::Remove(WidgetKind::ButtonCluster)));
        assert!(windows.open.contains(&WidgetKind::GestureBox));
        assert!(!windows.open.contains(&WidgetKind::ButtonCluster));
        assert!(windows.open.contains(&WidgetKind::IndicatorDot));
        assert_eq!(controller.next_wakeup(), Some(3500));
    }

    #[test]
    fn teardown_continues_after_removal_failure() {
        let store = MockStore::with(Preferences {
            both_modes: Some(true),
            ..Default::default()
        });
        let windows = MockWindows {
            fail_remove: Some(WidgetKind::ButtonCluster),
            ..Default::default()
        };
        let mut controller = OverlayController::new(windows, store, MockVolume::default());
        controller.start(0).unwrap();

        controller.shutdown();

        let windows = controller.windows();
        for kind in [
            WidgetKind::ButtonCluster,
            WidgetKind::GestureBox,
            WidgetKind::IndicatorDot,
        ] {
            assert!(windows.calls.contains(&Call::Remove(kind)));
        }
        assert!(!windows.open.contains(&WidgetKind::GestureBox));
        assert!(!windows.open.contains(&WidgetKind::IndicatorDot));
        assert!(!controller.is_running());
        assert_eq!(controller.next_wakeup(), None);
    }

    #[test]
    fn preference_write_failure_keeps_state() {
        let store = MockStore {
            fail_writes: true,
            ..MockStore::with(Preferences {
                move_mode_enabled: Some(true),
                ..Default::default()
            })
        };
        let mut controller =
            OverlayController::new(MockWindows::default(), store, MockVolume::default());
        controller.start(0).unwrap();

        controller.apply_action(WidgetKind::ButtonCluster, Action::Drag { dx: 5, dy: 7 }, 10);
        let state = controller.widget(WidgetKind::ButtonCluster).unwrap().state();
        assert_eq!(state.position(), Position::new(105, 107));
    }

    #[test]
    fn gesture_box_size_is_clamped_and_persisted() {
        let (mut controller, store, _) = started(gesture_box_prefs());
        let size = controller.set_gesture_box_size(10, 1000, 100).unwrap();
        assert_eq!(size, (40, 400));

        let state = controller.widget(WidgetKind::GestureBox).unwrap().state();
        assert_eq!((state.width, state.height), (40, 400));
        assert_eq!(store.puts_of(PrefKey::GestureBoxWidth), vec![PreferenceValue::Int(40)]);
        assert_eq!(store.puts_of(PrefKey::GestureBoxHeight), vec![PreferenceValue::Int(400)]);
        assert_eq!(controller.windows().updates(WidgetKind::GestureBox), 1);
    }

    #[test]
    fn pointer_events_before_start_are_ignored() {
        let store = MockStore::default();
        let volume = MockVolume::default();
        let mut controller =
            OverlayController::new(MockWindows::default(), store, volume.clone());
        pointer(&mut controller, WidgetKind::ButtonCluster, PointerPhase::Down, 0.0, 0.0, 0);
        assert!(controller.windows().calls.is_empty());
        assert_eq!(controller.next_wakeup(), None);
    }

    #[test]
    fn reveal_on_visible_controls_refreshes() {
        let (mut controller, _, _) = started(buttons_prefs());
        controller.reveal(2000);
        assert_eq!(controller.visibility().state(), VisibilityState::Visible);
        assert_eq!(controller.next_wakeup(), Some(5000));
    }

    #[test]
    fn status_serializes() {
        let (controller, _, _) = started(buttons_prefs());
        let json = serde_json::to_string(&controller.status()).unwrap();
        assert!(json.contains("\"running\":true"));
        assert!(json.contains("\"mode\":\"normal\""));
        assert!(json.contains("\"control_mode\":\"floating-buttons\""));
        assert!(json.contains("\"visibility\":\"visible\""));
        assert!(json.contains("\"kind\":\"button-cluster\""));
    }
}
