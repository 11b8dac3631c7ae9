use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use vscls_application::{CommandOutcome, CreateSessionOptions};
use vscls_infrastructure::paths::VsclsPaths;

mod bootstrap;
mod logging;
mod terminal;

use bootstrap::BootstrapOptions;

#[derive(Parser)]
#[command(name = "vscls", version)]
#[command(about = "Publish and join collaboration session links through a shared PocketBase")]
#[command(long_about = None)]
struct Cli {
    /// Use this config.toml instead of the one in the config directory
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend base URL, overriding backend.url
    #[arg(long, global = true, env = "VSCLS_BACKEND_URL")]
    url: Option<String>,

    /// Keep credentials in memory, seeded from VSCLS_LOGIN_IDENTIFIER and VSCLS_LOGIN_SECRET
    #[arg(long, global = true)]
    no_keyring: bool,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the backend admin login and check it
    ConfigureServer,
    /// Remove the stored login
    ClearCredentials,
    /// Start sharing and publish the session link
    CreateSession {
        /// Device name to publish under (skips the prompt)
        #[arg(long)]
        device_name: Option<String>,
        /// Project name to publish under (skips the prompt)
        #[arg(long)]
        project_name: Option<String>,
    },
    /// Pick a session from another device and join it
    ListSessions,
    /// Pick a published session and delete it
    DeleteSession,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let paths = VsclsPaths::new(None).context("Failed to resolve the config directory")?;
    let _log_guard = logging::init(cli.verbose, Some(&paths.logs_dir()))?;

    let options = BootstrapOptions {
        config: cli.config,
        url: cli.url,
        no_keyring: cli.no_keyring,
    };
    let commands = bootstrap::build(&paths, &options)?;

    let outcome = match cli.command {
        Commands::ConfigureServer => commands.configure_server().await,
        Commands::ClearCredentials => commands.clear_credentials().await,
        Commands::CreateSession {
            device_name,
            project_name,
        } => {
            commands
                .create_session(CreateSessionOptions {
                    device_name,
                    project_name,
                })
                .await
        }
        Commands::ListSessions => commands.list_sessions().await,
        Commands::DeleteSession => commands.delete_session().await,
    };

    Ok(exit_code(&outcome))
}

/// Only failures exit non-zero; the error was already shown.
fn exit_code(outcome: &CommandOutcome) -> ExitCode {
    if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
