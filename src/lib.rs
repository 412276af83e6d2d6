// Nreal/XREAL Air MCU driver - shared library
// Configuration and event formatting used by the CLI

pub mod config;
pub mod output;

pub use config::DriverConfig;
pub use output::{format_event, OutputFormat};
