//! Volux CLI entry point

use std::process::ExitCode;

use clap::Parser;

use volux::cli::{
    args::{Cli, Commands, DaemonOptions},
    config_cmd::handle_config_command,
    ctl_cmd::{handle_ctl_command, notify_settings_changed},
    daemon_app::{run_daemon, EXIT_ERROR, EXIT_USAGE_ERROR},
    ipc::Request,
    logging,
    presenter::Presenter,
};
use volux::infrastructure::TomlPreferenceStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let presenter = Presenter::new();

    match cli.command {
        Some(Commands::Config { action }) => {
            let mut store = TomlPreferenceStore::new();
            match handle_config_command(action, &mut store, &presenter) {
                Ok(true) => {
                    notify_settings_changed(&presenter).await;
                    ExitCode::SUCCESS
                }
                Ok(false) => ExitCode::SUCCESS,
                Err(e) => {
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
        Some(Commands::Ctl { action }) => {
            // Reject malformed requests before touching the socket
            if let Err(e) = action.to_command().parse::<Request>() {
                presenter.error(&e);
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
            if let Err(e) = handle_ctl_command(action, &presenter).await {
                presenter.error(&e);
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        None => {
            let options = DaemonOptions {
                headless: cli.headless,
                no_persist: cli.no_persist,
            };
            run_daemon(options).await
        }
    }
}
