// CLI definitions using clap

use air_driver::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "air_driver")]
#[command(author, version, about = "Nreal/XREAL Air MCU status driver")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ~/.config/air-driver/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for decoded events
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List HID interfaces of attached glasses
    #[command(visible_alias = "ls")]
    List {
        /// Show every HID interface, not only the MCU one
        #[arg(long)]
        all: bool,
    },

    /// Poll the MCU interface and print events until Ctrl-C
    #[command(visible_aliases = ["monitor", "w"])]
    Watch {
        /// Read timeout per poll in milliseconds (overrides config)
        #[arg(short, long)]
        timeout_ms: Option<i32>,
        /// Stop after this many events
        #[arg(short = 'n', long)]
        count: Option<u64>,
        /// Skip the initial drain
        #[arg(long)]
        no_drain: bool,
        /// Do not write the init command after opening
        #[arg(long)]
        no_init: bool,
    },

    /// Flush one pending report without blocking
    Drain,

    /// Decode hex reports offline (state carries across reports)
    Decode {
        /// 64-byte reports in hex, e.g. "0a000000 09 19 0000 68656c6c6f00..."
        #[arg(required = true)]
        reports: Vec<String>,
    },

    /// Decode a file of hex reports, one per line ('#' starts a comment)
    Replay {
        /// Input file
        file: PathBuf,
    },

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to this path
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
    },
}
