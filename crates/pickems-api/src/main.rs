//! Pickems admin CLI entry point.
//!
//! Binary name: `pickems`
//!
//! Parses CLI arguments, loads config, wires the document store, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use pickems_infra::config::load_config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "pickems", &mut std::io::stdout());
        return Ok(());
    }

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,pickems=debug",
        _ => "trace",
    };

    // Config decides whether spans are exported, so it is loaded under a
    // temporary stderr subscriber to keep its warnings visible.
    let config = {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_env_filter(pickems_observe::tracing_setup::env_filter(filter))
                .with_writer(std::io::stderr)
                .with_target(false)
                .finish(),
        );
        load_config(&cli.config).await
    };

    if let Err(e) = pickems_observe::tracing_setup::init_tracing(filter, config.enable_otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let state = AppState::new(config);
    let result = run(cli, &state).await;
    pickems_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli, state: &AppState) -> anyhow::Result<()> {
    let (json, quiet) = (cli.json, cli.quiet);

    match cli.command {
        Commands::Init { tenant } => cli::tenant::init(state, &tenant, json, quiet).await,
        Commands::Bootstrap { tenant } => cli::tenant::bootstrap(state, &tenant, json, quiet).await,
        Commands::Get { tenant, kind } => cli::document::get(state, &tenant, kind, json).await,
        Commands::Set { tenant, kind, value } => {
            cli::document::set(state, &tenant, kind, &value, json, quiet).await
        }
        Commands::PublishSettings { tenant } => {
            cli::tenant::publish_settings(state, &tenant, json, quiet).await
        }
        Commands::Status { tenant } => cli::status::status(state, &tenant, json).await,
        Commands::Completions { .. } => Ok(()),
    }
}
