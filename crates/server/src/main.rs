mod api;
mod cli;
mod router;
mod startup;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // .env must be loaded before clap reads env-backed flags.
    pooltask_core::config::load_dotenv();
    let cli = Cli::parse();
    let config = cli.load_config();

    match cli.selected_command() {
        Command::Serve => startup::serve(&config).await?,
        Command::Config => println!("{}", serde_json::to_string_pretty(&config)?),
    }

    Ok(())
}
