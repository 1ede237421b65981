use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use platform_config::cli::{Cli, Commands};
use platform_config::command;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve { backend, json } => command::run_resolve(backend, json).await,
        Commands::Mode { backend } => command::run_mode(backend).await,
    }
}
