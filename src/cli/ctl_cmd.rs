//! Ctl command handler - sends commands to running daemon via IPC

use super::args::CtlAction;
use super::ipc::{create_ipc_client, RESPONSE_OK};
use super::presenter::Presenter;

/// Handle ctl subcommand
pub async fn handle_ctl_command(action: CtlAction, presenter: &Presenter) -> Result<(), String> {
    let client = create_ipc_client();

    if !client.is_daemon_running() {
        return Err("No daemon running. Start with: volux".to_string());
    }

    let cmd = action.to_command();
    let response = client
        .send_command(&cmd)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))?;
    let response = response.trim();

    if let Some(stripped) = response.strip_prefix("error:") {
        return Err(stripped.trim().to_string());
    }

    match action {
        CtlAction::Status => presenter.output(response),
        CtlAction::Move { state } => {
            presenter.success(&format!("Move mode {}", state.as_str()));
        }
        CtlAction::GestureBoxSize { .. } if response == RESPONSE_OK => {
            presenter.success("Gesture box resize sent");
        }
        _ if response == RESPONSE_OK => presenter.success(&format!("Command sent: {}", cmd)),
        _ => presenter.warn(&format!("Unexpected reply: {}", response)),
    }

    Ok(())
}

/// Ask a running daemon to reload preferences.
///
/// Returns false when no daemon is listening.
pub async fn notify_settings_changed(presenter: &Presenter) -> bool {
    let client = create_ipc_client();
    if !client.is_daemon_running() {
        return false;
    }
    match client.send_command("update-settings").await {
        Ok(reply) if reply.trim() == RESPONSE_OK => {
            presenter.info("Running daemon reloaded preferences");
            true
        }
        Ok(reply) => {
            presenter.warn(&format!("Daemon did not reload: {}", reply.trim()));
            false
        }
        Err(e) => {
            presenter.warn(&format!("Could not reach daemon: {}", e));
            false
        }
    }
}
