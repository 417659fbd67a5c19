//! Shared runner for volume command-line tools

use std::process::Stdio;

use tokio::process::Command;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::application::ports::VolumeError;

/// Run `program args` in the background on the current tokio runtime.
///
/// Returns once the command is spawned; its outcome is only logged.
pub(super) fn spawn_tool(program: &'static str, args: Vec<String>) -> Result<(), VolumeError> {
    let handle = Handle::try_current().map_err(|_| VolumeError::NoRuntime)?;
    handle.spawn(async move {
        match run_tool(program, &args).await {
            Ok(()) => debug!(tool = program, ?args, "Volume adjusted"),
            Err(e) => warn!(tool = program, error = %e, "Volume command failed"),
        }
    });
    Ok(())
}

pub(super) async fn run_tool(program: &str, args: &[String]) -> Result<(), VolumeError> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VolumeError::ToolNotFound(program.to_string())
            } else {
                VolumeError::CommandFailed(e.to_string())
            }
        })?;

    if !status.success() {
        return Err(VolumeError::CommandFailed(format!(
            "{} exited with status: {}",
            program, status
        )));
    }

    Ok(())
}
