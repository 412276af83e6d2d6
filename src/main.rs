//! Nreal/XREAL Air MCU Driver CLI
//!
//! Reads status reports from the glasses and prints the decoded events.

use air_driver::DriverConfig;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;

fn init_logging(verbose: bool) {
    let default = if verbose {
        "air_driver=debug,air_transport=debug"
    } else {
        "air_driver=info,air_transport=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = DriverConfig::resolve(cli.config.as_deref())?;
    debug!("Effective config: {:?}", config);

    match cli.command {
        None => {
            // Default: show attached glasses
            commands::utility::list(&config, false)?;
        }
        Some(Commands::List { all }) => {
            commands::utility::list(&config, all)?;
        }
        Some(Commands::Watch {
            timeout_ms,
            count,
            no_drain,
            no_init,
        }) => {
            let mut config = config;
            if let Some(ms) = timeout_ms {
                config.poll_timeout_ms = ms;
            }
            if no_drain {
                config.drain_before_poll = false;
            }
            if no_init {
                config.send_init = false;
            }
            commands::watch::watch(&config, cli.format, count)?;
        }
        Some(Commands::Drain) => {
            commands::watch::drain(&config, cli.format)?;
        }
        Some(Commands::Decode { reports }) => {
            commands::replay::decode(&reports, cli.format)?;
        }
        Some(Commands::Replay { file }) => {
            commands::replay::replay(&file, cli.format)?;
        }
        Some(Commands::Config { save }) => {
            commands::utility::config(&config, save.as_deref())?;
        }
    }

    Ok(())
}
