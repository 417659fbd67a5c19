//! PID file management for daemon mode

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process;

use nix::sys::signal::kill;
use nix::unistd::Pid;

const PID_FILE_NAME: &str = "volux.pid";

/// PID file for daemon mode
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Create a PID file manager at `$XDG_RUNTIME_DIR/volux.pid` (temp dir
    /// when unset)
    pub fn new() -> Self {
        let dir = std::env::var_os("XDG_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        Self {
            path: dir.join(PID_FILE_NAME),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the PID file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// PID of a live daemon holding the file, removing stale files
    pub fn is_running(&self) -> Option<u32> {
        let mut file = File::open(&self.path).ok()?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).ok()?;
        let pid: u32 = contents.trim().parse().ok()?;

        if pid == process::id() {
            return Some(pid);
        }

        // Signal 0 only checks that the process exists
        match kill(Pid::from_raw(pid as i32), None) {
            Ok(_) => Some(pid),
            Err(nix::errno::Errno::ESRCH) => {
                let _ = fs::remove_file(&self.path);
                None
            }
            Err(_) => None,
        }
    }

    /// Acquire the PID file (fails if another daemon is running)
    pub fn acquire(&self) -> Result<(), PidFileError> {
        if let Some(pid) = self.is_running() {
            return Err(PidFileError::AlreadyRunning(pid));
        }

        let mut file = File::create(&self.path).map_err(|e| {
            PidFileError::WriteFailed(format!("Failed to create PID file: {}", e))
        })?;

        write!(file, "{}", process::id())
            .map_err(|e| PidFileError::WriteFailed(format!("Failed to write PID: {}", e)))?;

        Ok(())
    }

    /// Release the PID file
    pub fn release(&self) -> Result<(), PidFileError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                PidFileError::RemoveFailed(format!("Failed to remove PID file: {}", e))
            })?;
        }
        Ok(())
    }
}

impl Default for PidFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.release();
    }
}

/// PID file errors
#[derive(Debug, thiserror::Error)]
pub enum PidFileError {
    #[error("Another daemon is already running (PID: {0})")]
    AlreadyRunning(u32),

    #[error("Failed to write PID file: {0}")]
    WriteFailed(String),

    #[error("Failed to remove PID file: {0}")]
    RemoveFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_path_ends_with_file_name() {
        let pid_file = PidFile::new();
        assert!(pid_file.path().ends_with(PID_FILE_NAME));
    }

    #[test]
    fn is_running_returns_none_for_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let pid_file = PidFile::with_path(dir.path().join("nonexistent.pid"));
        assert!(pid_file.is_running().is_none());
    }

    #[test]
    fn acquire_writes_own_pid_and_release_removes_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("volux.pid");
        let pid_file = PidFile::with_path(&path);

        pid_file.acquire().unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, process::id().to_string());
        assert_eq!(pid_file.is_running(), Some(process::id()));

        pid_file.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn garbage_pid_file_is_not_running() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("volux.pid");
        fs::write(&path, "not-a-pid").unwrap();
        assert!(PidFile::with_path(&path).is_running().is_none());
    }
}
