//! CLI presenter for output formatting
//!
//! Status lines go to stderr prefixed with a colored marker; values a
//! script may want to capture (`config get`, `ctl status`) go to stdout
//! unadorned.

use colored::{ColoredString, Colorize};

#[derive(Debug, Default)]
pub struct Presenter;

impl Presenter {
    pub fn new() -> Self {
        Self
    }

    fn status(&self, marker: ColoredString, message: &str) {
        eprintln!("{} {}", marker, message);
    }

    pub fn info(&self, message: &str) {
        self.status("ℹ".cyan(), message);
    }

    pub fn success(&self, message: &str) {
        self.status("✓".green(), message);
    }

    pub fn warn(&self, message: &str) {
        self.status("⚠".yellow(), message);
    }

    pub fn error(&self, message: &str) {
        self.status("✗".red(), message);
    }

    /// Lifecycle line from the running daemon
    pub fn daemon_status(&self, state: &str) {
        self.status("●".cyan(), &format!("volux: {}", state));
    }

    /// Captured output
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// One `config list` row
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}
