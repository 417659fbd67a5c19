//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! the control socket and the daemon runner.

pub mod args;
pub mod config_cmd;
pub mod ctl_cmd;
pub mod daemon_app;
pub mod ipc;
pub mod logging;
pub mod pid_file;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use args::{Cli, Commands, ConfigAction, CtlAction, DaemonOptions};
pub use config_cmd::handle_config_command;
pub use ctl_cmd::{handle_ctl_command, notify_settings_changed};
pub use daemon_app::{run_daemon, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use presenter::Presenter;
