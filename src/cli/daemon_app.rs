//! Daemon app runner

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::sleep_until;
use tracing::{debug, info, warn};

use crate::application::ports::{
    NotificationIcon, Notifier, PreferenceStore, VolumeActuator, WindowManager,
};
use crate::application::OverlayController;
use crate::domain::config::{PreferenceSnapshot, Preferences};
use crate::domain::gesture::InteractionMode;
use crate::domain::timing::Millis;
use crate::infrastructure::{
    create_notifier, create_volume_actuator, HeadlessWindowManager, MemoryPreferenceStore,
    NoOpVolume, TomlPreferenceStore, VolumeToolPreference,
};

#[cfg(target_os = "linux")]
use crate::gui::{LayerShellWindowManager, PointerInput};

use super::args::DaemonOptions;
use super::ipc::{create_ipc_server, IpcServer};
use super::pid_file::{PidFile, PidFileError};
use super::presenter::Presenter;
use super::signals::{DaemonCommand, DaemonSignalHandler};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

#[cfg(not(target_os = "linux"))]
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    pub kind: crate::domain::overlay::WidgetKind,
    pub event: crate::domain::gesture::PointerEvent,
}

type DaemonController =
    OverlayController<Box<dyn WindowManager>, Box<dyn PreferenceStore>, Box<dyn VolumeActuator>>;

/// Milliseconds since the daemon clock started
fn elapsed(clock: Instant) -> Millis {
    clock.elapsed().as_millis() as Millis
}

/// Run daemon mode
pub async fn run_daemon(options: DaemonOptions) -> ExitCode {
    let presenter = Presenter::new();

    // Acquire PID file
    let pid_file = PidFile::new();
    if let Err(e) = pid_file.acquire() {
        match e {
            PidFileError::AlreadyRunning(pid) => {
                presenter.error(&format!("Another daemon is already running (PID: {})", pid));
            }
            _ => {
                presenter.error(&e.to_string());
            }
        }
        return ExitCode::from(EXIT_ERROR);
    }

    // Setup signal handler (returns handler + sender for the socket server)
    let (mut signals, command_tx) = match DaemonSignalHandler::new().await {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Setup socket server
    let mut server = create_ipc_server();
    if let Err(e) = server.bind() {
        presenter.error(&format!("Failed to bind socket: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    let socket_display = server.path();
    let server: Arc<dyn IpcServer> = Arc::from(server);
    let server_task = {
        let server = Arc::clone(&server);
        tokio::spawn(async move {
            if let Err(e) = server.run(command_tx).await {
                warn!(error = %e, "Socket server stopped");
            }
        })
    };

    let clock = Instant::now();
    let store = create_store(options.no_persist);
    let initial = match store.load() {
        Ok(prefs) => Preferences::defaults().merge(prefs).snapshot(),
        Err(e) => {
            warn!(error = %e, "Failed to load preferences, using defaults");
            PreferenceSnapshot::default()
        }
    };

    let (pointer_tx, mut pointer_rx) = mpsc::unbounded_channel::<PointerInput>();
    let (windows, fallback) = create_windows(options.headless, clock, pointer_tx);
    let volume = build_volume(&initial).await;
    let mut notifier = create_notifier(initial.notify);

    let mut controller: DaemonController = OverlayController::new(windows, store, volume);
    if let Err(e) = controller.start(elapsed(clock)) {
        presenter.error(&format!("Failed to start overlay: {}", e));
        server.cleanup();
        server_task.abort();
        return ExitCode::from(EXIT_ERROR);
    }
    if let Some(reason) = fallback {
        controller.push_notice("Volux", &reason, NotificationIcon::Warning);
    }

    presenter.daemon_status("Started, waiting for commands...");
    presenter.info(&format!(
        "PID: {} | Socket: {} | SIGINT: exit",
        std::process::id(),
        socket_display
    ));

    let mut pointer_open = true;
    let clean = loop {
        drain_notices(&mut controller, notifier.as_ref()).await;

        let wakeup = controller.next_wakeup();
        let deadline =
            tokio::time::Instant::from_std(clock + Duration::from_millis(wakeup.unwrap_or(0)));

        tokio::select! {
            command = signals.recv() => {
                let Some(command) = command else {
                    break false;
                };
                let now = elapsed(clock);
                match command {
                    DaemonCommand::UpdateSettings => {
                        let before = controller.preferences().clone();
                        if let Err(e) = controller.update_settings(now) {
                            presenter.error(&format!("Failed to apply settings: {}", e));
                            continue;
                        }
                        let after = controller.preferences().clone();
                        if before.volume_tool != after.volume_tool
                            || before.volume_step != after.volume_step
                        {
                            controller.replace_volume(build_volume(&after).await);
                        }
                        if before.notify != after.notify {
                            notifier = create_notifier(after.notify);
                        }
                        presenter.daemon_status("Settings reloaded");
                    }
                    DaemonCommand::Show => controller.reveal(now),
                    DaemonCommand::SetMove(enabled) => {
                        controller.set_mode(InteractionMode::from_move_enabled(enabled), now);
                        presenter.daemon_status(&format!("Mode: {}", controller.mode()));
                    }
                    DaemonCommand::SetGestureBoxSize(width, height) => {
                        match controller.set_gesture_box_size(width, height, now) {
                            Ok((w, h)) => {
                                presenter.daemon_status(&format!("Gesture box: {}x{} dp", w, h));
                            }
                            Err(e) => {
                                presenter.error(&format!("Failed to resize gesture box: {}", e));
                            }
                        }
                    }
                    DaemonCommand::Pointer(kind, mut event) => {
                        event.time_ms = now;
                        controller.handle_pointer(kind, &event, now);
                    }
                    DaemonCommand::Status(reply) => {
                        let line = serde_json::to_string(&controller.status())
                            .unwrap_or_else(|e| format!("error: {}", e));
                        let _ = reply.send(line);
                    }
                    DaemonCommand::Shutdown => {
                        presenter.daemon_status("Shutting down...");
                        controller.shutdown();
                        break true;
                    }
                }
            }
            input = pointer_rx.recv(), if pointer_open => {
                match input {
                    Some(input) => {
                        controller.handle_pointer(input.kind, &input.event, elapsed(clock));
                    }
                    None => {
                        debug!("Surface thread closed its pointer channel");
                        pointer_open = false;
                    }
                }
            }
            _ = sleep_until(deadline), if wakeup.is_some() => {
                controller.tick(elapsed(clock));
            }
        }
    };

    drain_notices(&mut controller, notifier.as_ref()).await;
    server.cleanup();
    server_task.abort();
    let _ = pid_file.release();

    if clean {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// File-backed store, or an in-memory copy of it with `--no-persist`
fn create_store(no_persist: bool) -> Box<dyn PreferenceStore> {
    let file = TomlPreferenceStore::new();
    if !no_persist {
        return Box::new(file);
    }
    match file.load() {
        Ok(prefs) => Box::new(MemoryPreferenceStore::with_preferences(prefs)),
        Err(e) => {
            warn!(error = %e, "Failed to read preferences, starting from defaults");
            Box::new(MemoryPreferenceStore::new())
        }
    }
}

/// Layer-shell surfaces when a compositor is available.
///
/// Falls back to in-memory windows and returns the reason for a notice.
#[cfg(target_os = "linux")]
fn create_windows(
    headless: bool,
    clock: Instant,
    pointer_tx: mpsc::UnboundedSender<PointerInput>,
) -> (Box<dyn WindowManager>, Option<String>) {
    if headless {
        info!("Running headless");
        return (Box::new(HeadlessWindowManager::new()), None);
    }
    match LayerShellWindowManager::spawn(clock, pointer_tx) {
        Ok(manager) => (Box::new(manager), None),
        Err(e) => {
            warn!(error = %e, "Overlay surfaces unavailable, running headless");
            (
                Box::new(HeadlessWindowManager::new()),
                Some(format!("Overlay unavailable: {}", e)),
            )
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn create_windows(
    headless: bool,
    _clock: Instant,
    _pointer_tx: mpsc::UnboundedSender<PointerInput>,
) -> (Box<dyn WindowManager>, Option<String>) {
    if headless {
        return (Box::new(HeadlessWindowManager::new()), None);
    }
    (
        Box::new(HeadlessWindowManager::new()),
        Some("Overlay unavailable: no layer-shell support on this platform".to_string()),
    )
}

async fn build_volume(prefs: &PreferenceSnapshot) -> Box<dyn VolumeActuator> {
    let preference = prefs
        .volume_tool
        .parse::<VolumeToolPreference>()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Unknown volume tool, detecting automatically");
            VolumeToolPreference::Auto
        });
    match create_volume_actuator(preference, prefs.volume_step).await {
        Ok((actuator, tool)) => {
            info!(%tool, step = prefs.volume_step, "Volume backend ready");
            actuator
        }
        Err(e) => {
            warn!(error = %e, "Volume backend unavailable, adjustments are logged only");
            Box::new(NoOpVolume::new())
        }
    }
}

async fn drain_notices(controller: &mut DaemonController, notifier: &dyn Notifier) {
    for notice in controller.take_notices() {
        if let Err(e) = notifier.notify(&notice).await {
            warn!(error = %e, "Notification failed");
        }
    }
}
