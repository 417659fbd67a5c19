//! Wayland layer-shell overlay windows
//!
//! Uses smithay-client-toolkit to create one layer-shell surface per widget
//! that:
//! - Renders on the overlay layer (always on top)
//! - Never takes keyboard focus
//! - Doesn't appear in the taskbar
//! - Reports pointer and touch input back to the daemon in screen pixels
//!
//! The Wayland connection lives on its own thread. The daemon talks to it
//! through [`LayerShellWindowManager`], which forwards every call as a
//! [`SurfaceCommand`] and never blocks on the compositor.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Instant;

use smithay_client_toolkit::{
    compositor::{CompositorHandler, CompositorState},
    delegate_compositor, delegate_layer, delegate_output, delegate_pointer, delegate_registry,
    delegate_seat, delegate_shm, delegate_touch,
    output::{OutputHandler, OutputState},
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
    seat::{
        pointer::{PointerEvent as SeatPointerEvent, PointerEventKind, PointerHandler, BTN_LEFT},
        touch::TouchHandler,
        Capability, SeatHandler, SeatState,
    },
    shell::{
        wlr_layer::{
            Anchor, KeyboardInteractivity, Layer, LayerShell, LayerShellHandler, LayerSurface,
            LayerSurfaceConfigure,
        },
        WaylandSurface,
    },
    shm::{
        slot::{Buffer, SlotPool},
        Shm, ShmHandler,
    },
};
use tokio::sync::mpsc as async_mpsc;
use tracing::{debug, error, info, warn};
use wayland_client::{
    globals::registry_queue_init,
    protocol::{wl_output, wl_pointer, wl_seat, wl_shm, wl_surface, wl_touch},
    Connection, EventQueue, Proxy, QueueHandle,
};

use super::render::{copy_to_argb, render};
use crate::application::ports::{WindowError, WindowManager};
use crate::domain::gesture::{PointerEvent, PointerPhase};
use crate::domain::overlay::{Animation, Appearance, Position, WidgetKind, WindowGeometry};

/// Screen size assumed until an output reports its logical size
const FALLBACK_SCREEN: (u32, u32) = (1920, 1080);

/// Poll timeout while idle
const IDLE_POLL_MS: u16 = 50;

/// Poll timeout while animating or tracking a press
const ACTIVE_POLL_MS: u16 = 16;

/// Error type for the layer-shell surface thread
#[derive(Debug, thiserror::Error)]
pub enum LayerShellError {
    #[error("Failed to connect to Wayland: {0}")]
    Connection(#[from] wayland_client::ConnectError),
    #[error("Failed to initialize registry: {0}")]
    Registry(#[from] wayland_client::globals::GlobalError),
    #[error("Layer shell not available (compositor doesn't support wlr-layer-shell)")]
    LayerShellNotAvailable,
    #[error("Wayland dispatch error: {0}")]
    Dispatch(#[from] wayland_client::DispatchError),
    #[error("Wayland error: {0}")]
    Wayland(#[from] wayland_client::backend::WaylandError),
    #[error("Failed to create buffer pool: {0}")]
    BufferPool(String),
}

impl From<LayerShellError> for WindowError {
    fn from(e: LayerShellError) -> Self {
        WindowError::SurfaceUnavailable(e.to_string())
    }
}

/// Pointer input from an overlay window, in absolute screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub kind: WidgetKind,
    pub event: PointerEvent,
}

/// Requests from the daemon to the surface thread
#[derive(Debug)]
enum SurfaceCommand {
    Add {
        kind: WidgetKind,
        geometry: WindowGeometry,
        appearance: Appearance,
    },
    Update {
        kind: WidgetKind,
        geometry: WindowGeometry,
    },
    Remove(WidgetKind),
    SetVisible(WidgetKind, bool),
    Animate(WidgetKind, Animation),
    Shutdown,
}

/// Window manager backed by wlr-layer-shell surfaces
pub struct LayerShellWindowManager {
    commands: mpsc::Sender<SurfaceCommand>,
    known: BTreeSet<WidgetKind>,
    thread: Option<JoinHandle<()>>,
}

impl LayerShellWindowManager {
    /// Connect to the compositor and start the surface thread.
    ///
    /// `clock` is the daemon's time origin; pointer events are stamped in
    /// milliseconds since it. Fails with `SurfaceUnavailable` when there is
    /// no Wayland display or it lacks layer-shell.
    pub fn spawn(
        clock: Instant,
        pointer_tx: async_mpsc::UnboundedSender<PointerInput>,
    ) -> Result<Self, WindowError> {
        let (commands, command_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread = std::thread::Builder::new()
            .name("volux-wayland".to_string())
            .spawn(move || {
                let setup = connect(clock, command_rx, pointer_tx);
                let (mut event_queue, mut surfaces) = match setup {
                    Ok(parts) => {
                        let _ = ready_tx.send(Ok(()));
                        parts
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                if let Err(e) = run_surfaces(&mut event_queue, &mut surfaces) {
                    error!(error = %e, "Overlay surface thread stopped");
                }
            })
            .map_err(|e| WindowError::SurfaceUnavailable(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!("Layer-shell overlay connected");
                Ok(Self {
                    commands,
                    known: BTreeSet::new(),
                    thread: Some(thread),
                })
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e.into())
            }
            Err(_) => Err(WindowError::Disconnected),
        }
    }

    fn send(&self, command: SurfaceCommand) -> Result<(), WindowError> {
        self.commands
            .send(command)
            .map_err(|_| WindowError::Disconnected)
    }

    fn ensure_known(&self, kind: WidgetKind) -> Result<(), WindowError> {
        if self.known.contains(&kind) {
            Ok(())
        } else {
            Err(WindowError::UnknownWindow(kind))
        }
    }
}

impl Drop for LayerShellWindowManager {
    fn drop(&mut self) {
        let _ = self.commands.send(SurfaceCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl WindowManager for LayerShellWindowManager {
    fn add_overlay(
        &mut self,
        kind: WidgetKind,
        geometry: WindowGeometry,
        appearance: Appearance,
    ) -> Result<(), WindowError> {
        if self.known.contains(&kind) {
            return Err(WindowError::AlreadyExists(kind));
        }
        self.send(SurfaceCommand::Add {
            kind,
            geometry,
            appearance,
        })?;
        self.known.insert(kind);
        Ok(())
    }

    fn update_geometry(
        &mut self,
        kind: WidgetKind,
        geometry: WindowGeometry,
    ) -> Result<(), WindowError> {
        self.ensure_known(kind)?;
        self.send(SurfaceCommand::Update { kind, geometry })
    }

    fn remove_overlay(&mut self, kind: WidgetKind) -> Result<(), WindowError> {
        if !self.known.remove(&kind) {
            return Err(WindowError::UnknownWindow(kind));
        }
        self.send(SurfaceCommand::Remove(kind))
    }

    fn set_visible(&mut self, kind: WidgetKind, visible: bool) -> Result<(), WindowError> {
        self.ensure_known(kind)?;
        self.send(SurfaceCommand::SetVisible(kind, visible))
    }

    fn animate(&mut self, kind: WidgetKind, animation: Animation) -> Result<(), WindowError> {
        self.ensure_known(kind)?;
        self.send(SurfaceCommand::Animate(kind, animation))
    }
}

fn connect(
    clock: Instant,
    commands: mpsc::Receiver<SurfaceCommand>,
    pointer_tx: async_mpsc::UnboundedSender<PointerInput>,
) -> Result<(EventQueue<OverlaySurfaces>, OverlaySurfaces), LayerShellError> {
    let conn = Connection::connect_to_env()?;
    let (globals, mut event_queue) = registry_queue_init(&conn)?;
    let qh = event_queue.handle();

    let mut surfaces = OverlaySurfaces::new(&globals, &qh, clock, commands, pointer_tx)?;

    // Initial roundtrip to get outputs and seats
    event_queue.roundtrip(&mut surfaces)?;
    Ok((event_queue, surfaces))
}

fn run_surfaces(
    event_queue: &mut EventQueue<OverlaySurfaces>,
    surfaces: &mut OverlaySurfaces,
) -> Result<(), LayerShellError> {
    let qh = event_queue.handle();
    loop {
        if !surfaces.process_commands(&qh) {
            debug!("Overlay surface thread shutting down");
            return Ok(());
        }
        surfaces.draw_dirty();

        event_queue.flush()?;
        if let Some(guard) = event_queue.prepare_read() {
            let timeout = if surfaces.is_active() {
                ACTIVE_POLL_MS
            } else {
                IDLE_POLL_MS
            };
            let fd = guard.connection_fd();
            let mut poll_fds = [nix::poll::PollFd::new(fd, nix::poll::PollFlags::POLLIN)];
            let _ = nix::poll::poll(&mut poll_fds, nix::poll::PollTimeout::from(timeout));
            if let Err(e) = guard.read() {
                match e {
                    wayland_client::backend::WaylandError::Io(ref io_err)
                        if io_err.kind() == std::io::ErrorKind::WouldBlock => {}
                    other => return Err(LayerShellError::Wayland(other)),
                }
            }
        }
        event_queue.dispatch_pending(surfaces)?;
    }
}

/// One widget's window on the surface thread
struct OverlayWindow {
    geometry: WindowGeometry,
    appearance: Appearance,
    /// Absolute top-left corner, for converting surface-local input
    origin: Position,
    layer: Option<LayerSurface>,
    configured: bool,
    dirty: bool,
    animation: Option<(Animation, Instant)>,
    buffer: Option<Buffer>,
}

impl OverlayWindow {
    fn is_animating(&self) -> bool {
        self.animation.is_some()
    }
}

/// A finger currently on one of the windows
#[derive(Debug, Clone, Copy)]
struct TouchPoint {
    id: i32,
    kind: WidgetKind,
    x: f32,
    y: f32,
}

struct OverlaySurfaces {
    registry_state: RegistryState,
    seat_state: SeatState,
    output_state: OutputState,
    compositor_state: CompositorState,
    shm: Shm,
    layer_shell: LayerShell,
    pool: SlotPool,

    clock: Instant,
    commands: mpsc::Receiver<SurfaceCommand>,
    pointer_tx: async_mpsc::UnboundedSender<PointerInput>,

    windows: BTreeMap<WidgetKind, OverlayWindow>,

    pointer: Option<wl_pointer::WlPointer>,
    touch: Option<wl_touch::WlTouch>,
    /// Widget holding the left button, if any
    pressed: Option<WidgetKind>,
    /// Fingers in the order they went down
    touches: Vec<TouchPoint>,
}

impl OverlaySurfaces {
    fn new(
        globals: &wayland_client::globals::GlobalList,
        qh: &QueueHandle<Self>,
        clock: Instant,
        commands: mpsc::Receiver<SurfaceCommand>,
        pointer_tx: async_mpsc::UnboundedSender<PointerInput>,
    ) -> Result<Self, LayerShellError> {
        let registry_state = RegistryState::new(globals);
        let seat_state = SeatState::new(globals, qh);
        let output_state = OutputState::new(globals, qh);
        let compositor_state = CompositorState::bind(globals, qh)
            .map_err(|_| LayerShellError::LayerShellNotAvailable)?;
        let shm = Shm::bind(globals, qh).map_err(|_| LayerShellError::LayerShellNotAvailable)?;
        let layer_shell =
            LayerShell::bind(globals, qh).map_err(|_| LayerShellError::LayerShellNotAvailable)?;

        // Grows on demand when a larger buffer is requested
        let pool = SlotPool::new(256 * 256 * 4, &shm)
            .map_err(|e| LayerShellError::BufferPool(e.to_string()))?;

        Ok(Self {
            registry_state,
            seat_state,
            output_state,
            compositor_state,
            shm,
            layer_shell,
            pool,
            clock,
            commands,
            pointer_tx,
            windows: BTreeMap::new(),
            pointer: None,
            touch: None,
            pressed: None,
            touches: Vec::new(),
        })
    }

    fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    fn is_active(&self) -> bool {
        self.pressed.is_some()
            || !self.touches.is_empty()
            || self.windows.values().any(OverlayWindow::is_animating)
    }

    fn screen_size(&self) -> (u32, u32) {
        self.output_state
            .outputs()
            .next()
            .and_then(|output| self.output_state.info(&output))
            .and_then(|info| info.logical_size)
            .and_then(|(w, h)| Some((u32::try_from(w).ok()?, u32::try_from(h).ok()?)))
            .unwrap_or(FALLBACK_SCREEN)
    }

    /// Apply queued commands. Returns false once the thread should exit.
    fn process_commands(&mut self, qh: &QueueHandle<Self>) -> bool {
        loop {
            let command = match self.commands.try_recv() {
                Ok(command) => command,
                Err(mpsc::TryRecvError::Empty) => return true,
                Err(mpsc::TryRecvError::Disconnected) => return false,
            };
            match command {
                SurfaceCommand::Add {
                    kind,
                    geometry,
                    appearance,
                } => {
                    let origin = geometry.origin(self.screen_size());
                    self.windows.insert(
                        kind,
                        OverlayWindow {
                            geometry,
                            appearance,
                            origin,
                            layer: None,
                            configured: false,
                            dirty: true,
                            animation: None,
                            buffer: None,
                        },
                    );
                    if appearance.visible {
                        self.map_window(qh, kind);
                    }
                }
                SurfaceCommand::Update { kind, geometry } => {
                    let screen = self.screen_size();
                    if let Some(window) = self.windows.get_mut(&kind) {
                        window.geometry = geometry;
                        window.origin = geometry.origin(screen);
                        window.dirty = true;
                        if let Some(layer) = &window.layer {
                            place(layer, window.origin, &geometry);
                            layer.commit();
                        }
                    }
                }
                SurfaceCommand::Remove(kind) => {
                    self.windows.remove(&kind);
                    if self.pressed == Some(kind) {
                        self.pressed = None;
                    }
                    self.touches.retain(|t| t.kind != kind);
                }
                SurfaceCommand::SetVisible(kind, visible) => {
                    if let Some(window) = self.windows.get_mut(&kind) {
                        window.appearance.visible = visible;
                        if !visible {
                            window.layer = None;
                            window.configured = false;
                            window.buffer = None;
                        }
                    }
                    if visible {
                        self.map_window(qh, kind);
                    }
                }
                SurfaceCommand::Animate(kind, animation) => {
                    if let Some(window) = self.windows.get_mut(&kind) {
                        window.animation = Some((animation, Instant::now()));
                        window.dirty = true;
                    }
                }
                SurfaceCommand::Shutdown => return false,
            }
        }
    }

    fn map_window(&mut self, qh: &QueueHandle<Self>, kind: WidgetKind) {
        let Some(window) = self.windows.get_mut(&kind) else {
            return;
        };
        if window.layer.is_some() {
            return;
        }

        let surface = self.compositor_state.create_surface(qh);
        let layer = self.layer_shell.create_layer_surface(
            qh,
            surface,
            Layer::Overlay,
            Some(format!("volux-{}", kind)),
            None, // Use default output
        );

        // Always anchored top-left; gravity is resolved into the margins
        layer.set_anchor(Anchor::TOP | Anchor::LEFT);
        place(&layer, window.origin, &window.geometry);
        layer.set_keyboard_interactivity(KeyboardInteractivity::None);
        layer.set_exclusive_zone(-1);
        layer.commit();

        window.layer = Some(layer);
        window.configured = false;
        window.dirty = true;
    }

    fn draw_dirty(&mut self) {
        let now = Instant::now();
        for (kind, window) in self.windows.iter_mut() {
            let frame = match window.animation {
                Some((animation, started)) => {
                    let elapsed = now.duration_since(started).as_millis() as u64;
                    if elapsed >= animation.duration_ms() {
                        // Keep the final opacity of fades once they end
                        if let Some(opacity) = animation.sample(animation.duration_ms()).opacity {
                            window.appearance.opacity = opacity;
                        }
                        window.animation = None;
                        window.dirty = true;
                        None
                    } else {
                        window.dirty = true;
                        Some(animation.sample(elapsed))
                    }
                }
                None => None,
            };

            if !window.dirty || !window.configured {
                continue;
            }
            let Some(layer) = window.layer.as_ref() else {
                continue;
            };

            let (width, height) = (window.geometry.width, window.geometry.height);
            let Some(pixmap) = render(&window.appearance, frame, width, height) else {
                continue;
            };
            let (buffer, canvas) = match self.pool.create_buffer(
                width as i32,
                height as i32,
                (width * 4) as i32,
                wl_shm::Format::Argb8888,
            ) {
                Ok(parts) => parts,
                Err(e) => {
                    warn!(window = %kind, error = %e, "Failed to allocate overlay buffer");
                    continue;
                }
            };
            copy_to_argb(&pixmap, canvas);

            if let Err(e) = buffer.attach_to(layer.wl_surface()) {
                warn!(window = %kind, error = %e, "Failed to attach overlay buffer");
                continue;
            }
            layer
                .wl_surface()
                .damage_buffer(0, 0, width as i32, height as i32);
            layer.commit();

            // Keep the buffer alive until the next draw
            window.buffer = Some(buffer);
            window.dirty = false;
        }
    }

    fn kind_for_surface(&self, surface: &wl_surface::WlSurface) -> Option<WidgetKind> {
        self.windows.iter().find_map(|(kind, window)| {
            window
                .layer
                .as_ref()
                .filter(|layer| layer.wl_surface().id() == surface.id())
                .map(|_| *kind)
        })
    }

    /// Surface-local position to absolute screen pixels
    fn to_screen(&self, kind: WidgetKind, local: (f64, f64)) -> (f32, f32) {
        let origin = self
            .windows
            .get(&kind)
            .map(|w| w.origin)
            .unwrap_or_default();
        (origin.x as f32 + local.0 as f32, origin.y as f32 + local.1 as f32)
    }

    fn emit(&self, kind: WidgetKind, event: PointerEvent) {
        if self.pointer_tx.send(PointerInput { kind, event }).is_err() {
            debug!("Pointer receiver dropped");
        }
    }

    /// Emit the current touch state for `kind` with the given phase
    fn emit_touches(&self, kind: WidgetKind, phase: PointerPhase) {
        let mut on_widget = self.touches.iter().filter(|t| t.kind == kind);
        let Some(primary) = on_widget.next() else {
            return;
        };
        let mut event = PointerEvent::new(phase, primary.x, primary.y, self.now_ms());
        if let Some(second) = on_widget.next() {
            event = event.with_secondary(second.x, second.y);
        }
        self.emit(kind, event);
    }
}

/// Apply size and margins for an absolute origin
fn place(layer: &LayerSurface, origin: Position, geometry: &WindowGeometry) {
    layer.set_size(geometry.width, geometry.height);
    layer.set_margin(origin.y, 0, 0, origin.x);
}

// SCTK delegate implementations

impl CompositorHandler for OverlaySurfaces {
    fn scale_factor_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_factor: i32,
    ) {
        self.windows.values_mut().for_each(|w| w.dirty = true);
    }

    fn transform_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_transform: wl_output::Transform,
    ) {
    }

    fn frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _time: u32,
    ) {
    }

    fn surface_enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }

    fn surface_leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }
}

impl OutputHandler for OverlaySurfaces {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    fn new_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }

    fn update_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
        // Gravity depends on the screen size
        let screen = self.screen_size();
        for window in self.windows.values_mut() {
            window.origin = window.geometry.origin(screen);
            if let Some(layer) = &window.layer {
                place(layer, window.origin, &window.geometry);
                layer.commit();
            }
        }
    }

    fn output_destroyed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }
}

impl LayerShellHandler for OverlaySurfaces {
    fn closed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, layer: &LayerSurface) {
        for (kind, window) in self.windows.iter_mut() {
            let closed = window
                .layer
                .as_ref()
                .is_some_and(|l| l.wl_surface().id() == layer.wl_surface().id());
            if closed {
                warn!(window = %kind, "Compositor closed overlay surface");
                window.layer = None;
                window.configured = false;
                window.buffer = None;
            }
        }
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        layer: &LayerSurface,
        _configure: LayerSurfaceConfigure,
        _serial: u32,
    ) {
        for window in self.windows.values_mut() {
            let matches = window
                .layer
                .as_ref()
                .is_some_and(|l| l.wl_surface().id() == layer.wl_surface().id());
            if matches {
                window.configured = true;
                window.dirty = true;
            }
        }
        layer.wl_surface().commit();
    }
}

impl SeatHandler for OverlaySurfaces {
    fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    fn new_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _seat: wl_seat::WlSeat) {}

    fn new_capability(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        if capability == Capability::Pointer && self.pointer.is_none() {
            match self.seat_state.get_pointer(qh, &seat) {
                Ok(pointer) => self.pointer = Some(pointer),
                Err(e) => warn!(error = %e, "Failed to bind pointer"),
            }
        }
        if capability == Capability::Touch && self.touch.is_none() {
            match self.seat_state.get_touch(qh, &seat) {
                Ok(touch) => self.touch = Some(touch),
                Err(e) => warn!(error = %e, "Failed to bind touch"),
            }
        }
    }

    fn remove_capability(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _seat: wl_seat::WlSeat,
        capability: Capability,
    ) {
        if capability == Capability::Pointer {
            if let Some(pointer) = self.pointer.take() {
                pointer.release();
            }
            self.pressed = None;
        }
        if capability == Capability::Touch {
            if let Some(touch) = self.touch.take() {
                touch.release();
            }
            self.touches.clear();
        }
    }

    fn remove_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _seat: wl_seat::WlSeat) {}
}

impl PointerHandler for OverlaySurfaces {
    fn pointer_frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _pointer: &wl_pointer::WlPointer,
        events: &[SeatPointerEvent],
    ) {
        for event in events {
            let Some(kind) = self.kind_for_surface(&event.surface) else {
                continue;
            };
            let (x, y) = self.to_screen(kind, event.position);
            let now = self.now_ms();
            match event.kind {
                PointerEventKind::Press { button, .. } if button == BTN_LEFT => {
                    self.pressed = Some(kind);
                    self.emit(kind, PointerEvent::new(PointerPhase::Down, x, y, now));
                }
                PointerEventKind::Motion { .. } if self.pressed == Some(kind) => {
                    self.emit(kind, PointerEvent::new(PointerPhase::Move, x, y, now));
                }
                PointerEventKind::Release { button, .. }
                    if button == BTN_LEFT && self.pressed == Some(kind) =>
                {
                    self.pressed = None;
                    self.emit(kind, PointerEvent::new(PointerPhase::Up, x, y, now));
                }
                PointerEventKind::Leave { .. } if self.pressed == Some(kind) => {
                    self.pressed = None;
                    self.emit(kind, PointerEvent::new(PointerPhase::Cancel, x, y, now));
                }
                _ => {}
            }
        }
    }
}

impl TouchHandler for OverlaySurfaces {
    fn down(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _touch: &wl_touch::WlTouch,
        _serial: u32,
        _time: u32,
        surface: wl_surface::WlSurface,
        id: i32,
        position: (f64, f64),
    ) {
        let Some(kind) = self.kind_for_surface(&surface) else {
            return;
        };
        let (x, y) = self.to_screen(kind, position);
        let first = !self.touches.iter().any(|t| t.kind == kind);
        self.touches.push(TouchPoint { id, kind, x, y });
        let phase = if first {
            PointerPhase::Down
        } else {
            PointerPhase::Move
        };
        self.emit_touches(kind, phase);
    }

    fn up(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _touch: &wl_touch::WlTouch,
        _serial: u32,
        _time: u32,
        id: i32,
    ) {
        let Some(index) = self.touches.iter().position(|t| t.id == id) else {
            return;
        };
        let lifted = self.touches[index];
        let last = self.touches.iter().filter(|t| t.kind == lifted.kind).count() == 1;
        if last {
            self.emit_touches(lifted.kind, PointerPhase::Up);
            self.touches.remove(index);
        } else {
            self.touches.remove(index);
            self.emit_touches(lifted.kind, PointerPhase::Move);
        }
    }

    fn motion(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _touch: &wl_touch::WlTouch,
        _time: u32,
        id: i32,
        position: (f64, f64),
    ) {
        let Some(index) = self.touches.iter().position(|t| t.id == id) else {
            return;
        };
        let kind = self.touches[index].kind;
        let (x, y) = self.to_screen(kind, position);
        self.touches[index].x = x;
        self.touches[index].y = y;
        self.emit_touches(kind, PointerPhase::Move);
    }

    fn shape(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _touch: &wl_touch::WlTouch,
        _id: i32,
        _major: f64,
        _minor: f64,
    ) {
    }

    fn orientation(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _touch: &wl_touch::WlTouch,
        _id: i32,
        _orientation: f64,
    ) {
    }

    fn cancel(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _touch: &wl_touch::WlTouch) {
        let kinds: BTreeSet<WidgetKind> = self.touches.iter().map(|t| t.kind).collect();
        for kind in kinds {
            self.emit_touches(kind, PointerPhase::Cancel);
        }
        self.touches.clear();
    }
}

impl ShmHandler for OverlaySurfaces {
    fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm
    }
}

impl ProvidesRegistryState for OverlaySurfaces {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    registry_handlers![OutputState, SeatState];
}

delegate_compositor!(OverlaySurfaces);
delegate_output!(OverlaySurfaces);
delegate_shm!(OverlaySurfaces);
delegate_seat!(OverlaySurfaces);
delegate_pointer!(OverlaySurfaces);
delegate_touch!(OverlaySurfaces);
delegate_layer!(OverlaySurfaces);
delegate_registry!(OverlaySurfaces);
