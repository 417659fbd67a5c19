//! Daemon command channel and OS signal handlers

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use crate::domain::gesture::PointerEvent;
use crate::domain::overlay::WidgetKind;

/// Commands consumed by the daemon loop
#[derive(Debug)]
pub enum DaemonCommand {
    /// Reload preferences and rebuild every widget
    UpdateSettings,
    /// Reveal hidden controls
    Show,
    /// Turn Move mode on or off
    SetMove(bool),
    /// Pointer event on a widget; the daemon stamps the time on receipt
    Pointer(WidgetKind, PointerEvent),
    /// Resize the gesture box (dp, unclamped)
    SetGestureBoxSize(i64, i64),
    /// Reply with the status line
    Status(oneshot::Sender<String>),
    /// Tear down and exit (SIGINT/SIGTERM or `ctl stop`)
    Shutdown,
}

/// Daemon signal handler
///
/// Handles OS signals and provides a channel for receiving daemon commands
/// from other sources (e.g., socket server).
pub struct DaemonSignalHandler {
    receiver: mpsc::Receiver<DaemonCommand>,
}

impl DaemonSignalHandler {
    /// Create a new daemon signal handler and start listening for signals.
    ///
    /// SIGINT and SIGTERM shut down; SIGHUP reloads preferences. Returns the
    /// handler and a sender that other sources use to reach the daemon loop.
    pub async fn new() -> Result<(Self, mpsc::Sender<DaemonCommand>), std::io::Error> {
        let (tx, rx) = mpsc::channel(64);

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            sigint.recv().await;
            info!("Received SIGINT (shutdown)");
            let _ = tx_int.send(DaemonCommand::Shutdown).await;
        });

        let tx_term = tx.clone();
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            sigterm.recv().await;
            info!("Received SIGTERM (shutdown)");
            let _ = tx_term.send(DaemonCommand::Shutdown).await;
        });

        let tx_hup = tx.clone();
        let mut sighup = signal(SignalKind::hangup())?;
        tokio::spawn(async move {
            while sighup.recv().await.is_some() {
                info!("Received SIGHUP (reload)");
                if tx_hup.send(DaemonCommand::UpdateSettings).await.is_err() {
                    break;
                }
            }
        });

        Ok((Self { receiver: rx }, tx))
    }

    /// Wait for the next command
    pub async fn recv(&mut self) -> Option<DaemonCommand> {
        self.receiver.recv().await
    }
}
