pub mod api;
pub mod args;
pub mod commands;
pub mod view;

pub use api::OperatorApi;
pub use args::*;

use clap::Parser;

/// Shared async entrypoint used by the CLI binary.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_parsed(cli).await
}

/// Execute the CLI given a pre-parsed argument struct.
pub async fn run_parsed(cli: Cli) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let api = OperatorApi::new(
        client,
        cli.globals.controller_url.clone(),
        cli.globals.operator_token.clone(),
    );
    let json = cli.globals.json;

    match cli.command {
        Commands::Sites { command } => commands::handle_sites(&api, json, command).await?,
        Commands::Status { command } => commands::handle_status(&api, json, command).await?,
    }

    Ok(())
}
