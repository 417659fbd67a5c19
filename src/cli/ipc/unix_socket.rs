//! Unix Domain Socket communication for daemon control

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::{IpcClient, IpcServer, Request, RESPONSE_OK};
use crate::cli::signals::DaemonCommand;

const SOCKET_NAME: &str = "volux.sock";

/// Socket path resolver
#[derive(Debug, Clone)]
pub struct SocketPath {
    path: PathBuf,
}

impl SocketPath {
    /// Create socket path, preferring XDG_RUNTIME_DIR
    pub fn new() -> Self {
        let path = std::env::var("XDG_RUNTIME_DIR")
            .map(|dir| PathBuf::from(dir).join(SOCKET_NAME))
            .unwrap_or_else(|_| std::env::temp_dir().join(SOCKET_NAME));
        Self { path }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the socket path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if socket file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove socket file if it exists
    pub fn cleanup(&self) -> io::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for SocketPath {
    fn default() -> Self {
        Self::new()
    }
}

/// Unix Domain Socket server for daemon commands
pub struct UnixSocketServer {
    socket_path: SocketPath,
    listener: Option<UnixListener>,
}

impl UnixSocketServer {
    /// Create a new socket server
    pub fn new(socket_path: SocketPath) -> Self {
        Self {
            socket_path,
            listener: None,
        }
    }
}

impl Drop for UnixSocketServer {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[async_trait]
impl IpcServer for UnixSocketServer {
    fn bind(&mut self) -> io::Result<()> {
        // Remove stale socket file if it exists
        self.socket_path.cleanup()?;

        let listener = UnixListener::bind(self.socket_path.path())?;
        self.listener = Some(listener);
        Ok(())
    }

    fn path(&self) -> String {
        self.socket_path.path().to_string_lossy().to_string()
    }

    async fn run(&self, tx: mpsc::Sender<DaemonCommand>) -> io::Result<()> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Socket not bound"))?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, tx).await {
                            warn!(error = %e, "Socket connection error");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Socket accept error");
                }
            }
        }
    }

    fn cleanup(&self) {
        let _ = self.socket_path.cleanup();
    }
}

/// Handle a single client connection
async fn handle_connection(stream: UnixStream, tx: mpsc::Sender<DaemonCommand>) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    reader.read_line(&mut line).await?;
    debug!(command = line.trim(), "Control command received");

    let response = respond(line.trim(), &tx).await;

    writer.write_all(format!("{}\n", response).as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}

/// Turn one request line into a daemon command and produce the reply line
async fn respond(line: &str, tx: &mpsc::Sender<DaemonCommand>) -> String {
    let request = match line.parse::<Request>() {
        Ok(request) => request,
        Err(e) => return format!("error: {}", e),
    };

    let command = match request {
        Request::Status => {
            let (reply_tx, reply_rx) = oneshot::channel();
            if tx.send(DaemonCommand::Status(reply_tx)).await.is_err() {
                return "error: daemon is shutting down".to_string();
            }
            return reply_rx
                .await
                .unwrap_or_else(|_| "error: daemon is shutting down".to_string());
        }
        Request::UpdateSettings => DaemonCommand::UpdateSettings,
        Request::Show => DaemonCommand::Show,
        Request::Move(on) => DaemonCommand::SetMove(on),
        Request::Pointer(kind, event) => DaemonCommand::Pointer(kind, event),
        Request::GestureBoxSize(w, h) => DaemonCommand::SetGestureBoxSize(w, h),
        Request::Stop => DaemonCommand::Shutdown,
    };

    match tx.send(command).await {
        Ok(()) => RESPONSE_OK.to_string(),
        Err(_) => "error: daemon is shutting down".to_string(),
    }
}

/// Unix Domain Socket client for sending commands to daemon
pub struct UnixSocketClient {
    socket_path: SocketPath,
}

impl UnixSocketClient {
    /// Create a new socket client
    pub fn new(socket_path: SocketPath) -> Self {
        Self { socket_path }
    }
}

#[async_trait]
impl IpcClient for UnixSocketClient {
    fn is_daemon_running(&self) -> bool {
        self.socket_path.exists()
    }

    async fn send_command(&self, cmd: &str) -> io::Result<String> {
        let stream = UnixStream::connect(self.socket_path.path()).await?;
        let (reader, mut writer) = stream.into_split();

        writer.write_all(format!("{}\n", cmd).as_bytes()).await?;
        writer.flush().await?;

        let mut reader = BufReader::new(reader);
        let mut response = String::new();
        reader.read_line(&mut response).await?;

        Ok(response)
    }
}
