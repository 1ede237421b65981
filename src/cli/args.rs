use clap::{Args, Parser, Subcommand};

use crate::api::DEFAULT_TIMEOUT_SECS;

/// platform-config - resolve platform settings and licensing mode
#[derive(Parser)]
#[command(name = "platform-config")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings backend connection options
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Base URL of the platform API
    #[arg(long, env = "PLATFORM_SETTINGS_URL")]
    pub settings_url: String,

    /// API key sent as a bearer token
    #[arg(long, env = "PLATFORM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the platform configuration and print it
    Resolve {
        #[command(flatten)]
        backend: BackendArgs,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved platform mode
    Mode {
        #[command(flatten)]
        backend: BackendArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "platform-config",
            "resolve",
            "--settings-url",
            "https://settings.example.com",
            "--json",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Resolve { backend, json } => {
                assert!(json);
                assert_eq!(backend.settings_url, "https://settings.example.com");
                assert_eq!(backend.timeout_secs, DEFAULT_TIMEOUT_SECS);
            }
            Commands::Mode { .. } => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_parse_mode_with_timeout() {
        let cli = Cli::try_parse_from([
            "platform-config",
            "mode",
            "--settings-url",
            "http://localhost:3000",
            "--timeout-secs",
            "5",
        ])
        .unwrap();

        match cli.command {
            Commands::Mode { backend } => assert_eq!(backend.timeout_secs, 5),
            Commands::Resolve { .. } => panic!("expected mode"),
        }
    }
}
