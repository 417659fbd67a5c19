//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

/// Volux - floating volume controls for Wayland desktops
#[derive(Parser, Debug)]
#[command(name = "volux")]
#[command(version)]
#[command(about = "Floating volume buttons and a swipe gesture box with auto-hide")]
#[command(long_about = None)]
pub struct Cli {
    /// Run without a Wayland surface (windows are tracked in memory only)
    #[arg(long)]
    pub headless: bool,

    /// Keep preference changes in memory instead of writing them to disk
    #[arg(long)]
    pub no_persist: bool,

    /// Enable debug logging (RUST_LOG is honored)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Send commands to the running daemon
    Ctl {
        #[command(subcommand)]
        action: CtlAction,
    },
}

/// Daemon control actions
#[derive(Subcommand, Debug, Clone)]
pub enum CtlAction {
    /// Reload preferences and rebuild the widgets
    UpdateSettings,
    /// Reveal hidden controls
    Show,
    /// Show daemon status as JSON
    Status,
    /// Stop the daemon
    Stop,
    /// Turn Move mode on or off
    Move {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Resize the gesture box on the running overlay (dp, clamped to 40..400)
    GestureBoxSize {
        #[arg(allow_negative_numbers = true)]
        width: i64,
        #[arg(allow_negative_numbers = true)]
        height: i64,
    },
    /// Inject a pointer event (screen pixels)
    Pointer {
        /// buttons, gesture-box or indicator
        widget: String,
        /// down, move, up or cancel
        phase: String,
        #[arg(allow_negative_numbers = true)]
        x: f32,
        #[arg(allow_negative_numbers = true)]
        y: f32,
        /// Second pointer x, for pinches
        #[arg(allow_negative_numbers = true, requires = "y2")]
        x2: Option<f32>,
        /// Second pointer y
        #[arg(allow_negative_numbers = true)]
        y2: Option<f32>,
    },
}

impl CtlAction {
    /// Line sent over the control socket
    pub fn to_command(&self) -> String {
        match self {
            Self::UpdateSettings => "update-settings".to_string(),
            Self::Show => "show".to_string(),
            Self::Status => "status".to_string(),
            Self::Stop => "stop".to_string(),
            Self::Move { state } => format!("move {}", state.as_str()),
            Self::GestureBoxSize { width, height } => {
                format!("gesture-box-size {} {}", width, height)
            }
            Self::Pointer {
                widget,
                phase,
                x,
                y,
                x2,
                y2,
            } => {
                let mut line = format!("pointer {} {} {} {}", widget, phase, x, y);
                if let (Some(x2), Some(y2)) = (x2, y2) {
                    line.push_str(&format!(" {} {}", x2, y2));
                }
                line
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create preferences file with defaults
    Init,
    /// Set a preference value
    Set {
        /// Preference key (or `mode`)
        key: String,
        /// Preference value
        value: String,
    },
    /// Get a preference value
    Get {
        /// Preference key (or `mode`)
        key: String,
    },
    /// List all preference values
    List,
    /// Show preferences file path
    Path,
    /// Forget saved positions and restore default sizes
    ResetPositions,
    /// Set the gesture box size in dp
    GestureBoxSize {
        /// Width in dp
        width: String,
        /// Height in dp
        height: String,
    },
}

/// Options for running the daemon
#[derive(Debug, Clone, Copy, Default)]
pub struct DaemonOptions {
    pub headless: bool,
    pub no_persist: bool,
}

/// Pseudo-key selecting the control mode as a radio group
pub const MODE_KEY: &str = "mode";
