//! IPC (Inter-Process Communication) module for daemon control
//!
//! One line-oriented command per connection, one response line. Unix
//! Domain Sockets carry the traffic.

mod unix_socket;

pub use unix_socket::{SocketPath, UnixSocketClient, UnixSocketServer};

use std::io;
use std::str::FromStr;

use tokio::sync::mpsc;

use super::signals::DaemonCommand;
use crate::domain::gesture::{PointerEvent, PointerPhase};
use crate::domain::overlay::WidgetKind;

/// Response sent for accepted commands
pub const RESPONSE_OK: &str = "ok";

/// A parsed control request
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    UpdateSettings,
    Show,
    Move(bool),
    Pointer(WidgetKind, PointerEvent),
    /// Custom gesture box width and height in dp, clamped by the daemon
    GestureBoxSize(i64, i64),
    Status,
    Stop,
}

impl FromStr for Request {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".to_string());
        };
        let args: Vec<&str> = words.collect();

        match (verb, args.as_slice()) {
            ("update-settings", []) => Ok(Self::UpdateSettings),
            ("show", []) => Ok(Self::Show),
            ("status", []) => Ok(Self::Status),
            ("stop", []) => Ok(Self::Stop),
            ("move", ["on"]) => Ok(Self::Move(true)),
            ("move", ["off"]) => Ok(Self::Move(false)),
            ("move", _) => Err("usage: move <on|off>".to_string()),
            ("pointer", [widget, phase, coords @ ..]) if coords.len() == 2 || coords.len() == 4 => {
                let kind: WidgetKind = widget.parse().map_err(|e| format!("{}", e))?;
                let phase: PointerPhase = phase.parse().map_err(|e| format!("{}", e))?;
                let numbers = coords
                    .iter()
                    .map(|c| c.parse::<f32>().ok().filter(|v| v.is_finite()))
                    .collect::<Option<Vec<f32>>>()
                    .ok_or_else(|| "coordinates must be numbers".to_string())?;
                let mut event = PointerEvent::new(phase, numbers[0], numbers[1], 0);
                if let [_, _, x2, y2] = numbers.as_slice() {
                    event = event.with_secondary(*x2, *y2);
                }
                Ok(Self::Pointer(kind, event))
            }
            ("gesture-box-size", [width, height]) => {
                match (width.parse::<i64>(), height.parse::<i64>()) {
                    (Ok(w), Ok(h)) => Ok(Self::GestureBoxSize(w, h)),
                    _ => Err("Please enter valid numbers".to_string()),
                }
            }
            ("gesture-box-size", _) => Err("usage: gesture-box-size <width> <height>".to_string()),
            ("pointer", _) => {
                Err("usage: pointer <widget> <down|move|up|cancel> <x> <y> [<x2> <y2>]".to_string())
            }
            _ => Err("unknown command".to_string()),
        }
    }
}

/// Trait for IPC servers that listen for daemon commands
#[async_trait::async_trait]
pub trait IpcServer: Send + Sync {
    /// Bind to the IPC endpoint
    fn bind(&mut self) -> io::Result<()>;

    /// Get the path/name of the IPC endpoint
    fn path(&self) -> String;

    /// Accept and handle connections
    ///
    /// This runs in a loop, accepting connections and forwarding each
    /// command to the provided channel.
    async fn run(&self, tx: mpsc::Sender<DaemonCommand>) -> io::Result<()>;

    /// Cleanup IPC resources
    fn cleanup(&self);
}

/// Trait for IPC clients that send commands to the daemon
#[async_trait::async_trait]
pub trait IpcClient: Send + Sync {
    /// Check if daemon appears to be running (endpoint exists)
    fn is_daemon_running(&self) -> bool;

    /// Send a command and receive response
    async fn send_command(&self, cmd: &str) -> io::Result<String>;
}

/// Create the IPC server
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(UnixSocketServer::new(SocketPath::new()))
}

/// Create the IPC client
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(UnixSocketClient::new(SocketPath::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_commands() {
        assert_eq!("update-settings".parse::<Request>(), Ok(Request::UpdateSettings));
        assert_eq!("show".parse::<Request>(), Ok(Request::Show));
        assert_eq!("status".parse::<Request>(), Ok(Request::Status));
        assert_eq!(" stop ".parse::<Request>(), Ok(Request::Stop));
        assert_eq!("move on".parse::<Request>(), Ok(Request::Move(true)));
        assert_eq!("move off".parse::<Request>(), Ok(Request::Move(false)));
        assert_eq!(
            "gesture-box-size 300 -5".parse::<Request>(),
            Ok(Request::GestureBoxSize(300, -5))
        );
    }

    #[test]
    fn parses_pointer() {
        let request: Request = "pointer gesture-box down 500 500".parse().unwrap();
        assert_eq!(
            request,
            Request::Pointer(
                WidgetKind::GestureBox,
                PointerEvent::new(PointerPhase::Down, 500.0, 500.0, 0)
            )
        );
    }

    #[test]
    fn parses_two_pointer_move() {
        let request: Request = "pointer buttons move 0 0 100 0".parse().unwrap();
        let Request::Pointer(kind, event) = request else {
            panic!("expected pointer request");
        };
        assert_eq!(kind, WidgetKind::ButtonCluster);
        assert_eq!(event.pointer_count(), 2);
    }

    #[test]
    fn rejects_bad_requests() {
        assert!("".parse::<Request>().is_err());
        assert!("toggle".parse::<Request>().is_err());
        assert!("move sideways".parse::<Request>().is_err());
        assert!("status now".parse::<Request>().is_err());
        assert!("pointer window down 1 2".parse::<Request>().is_err());
        assert!("pointer buttons tap 1 2".parse::<Request>().is_err());
        assert!("pointer buttons down x 2".parse::<Request>().is_err());
        assert!("pointer buttons down 1 2 3".parse::<Request>().is_err());
        assert_eq!(
            "gesture-box-size wide 100".parse::<Request>(),
            Err("Please enter valid numbers".to_string())
        );
        assert!("gesture-box-size 100".parse::<Request>().is_err());
    }
}
