//! Offline decoding command handlers.

use super::CommandResult;
use air_driver::{format_event, OutputFormat};
use air_transport::{Device, Event, EventSink, HexReport, McuError, ReplaySource};
use anyhow::Context;
use std::path::Path;
use tracing::warn;

/// Decode reports given on the command line
pub fn decode(reports: &[String], format: OutputFormat) -> CommandResult {
    let parsed = reports
        .iter()
        .map(|r| r.parse::<HexReport>().map(|h| h.0))
        .collect::<Result<Vec<_>, _>>()
        .map_err(anyhow::Error::msg)?;

    run(ReplaySource::new(parsed), format);
    Ok(())
}

/// Decode a file with one hex report per line
pub fn replay(file: &Path, format: OutputFormat) -> CommandResult {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let reports = parse_report_lines(&content)?;
    println!("Replaying {} reports from {}", reports.len(), file.display());

    run(ReplaySource::new(reports), format);
    Ok(())
}

/// Parse non-empty, non-comment lines as hex reports
pub fn parse_report_lines(content: &str) -> anyhow::Result<Vec<Vec<u8>>> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.split('#').next().unwrap_or("").trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(lineno, line)| {
            line.parse::<HexReport>()
                .map(|h| h.0)
                .map_err(|e| anyhow::anyhow!("line {lineno}: {e}"))
        })
        .collect()
}

/// Feed every queued report through one device; decode errors are printed
/// and the next report is decoded.
fn run(source: ReplaySource, format: OutputFormat) {
    let mut device = Device::new(|event: &Event| println!("{}", format_event(event, format)));

    for (index, e) in replay_all(&source, &mut device) {
        eprintln!("report {index}: {e}");
    }

    println!(
        "Final state: display {}, brightness {}",
        if device.is_active() { "on" } else { "off" },
        device.brightness()
    );
}

/// Decode until the source is exhausted, collecting per-report errors
/// (1-based index). An empty report is skipped, not treated as the end.
fn replay_all<S: EventSink>(
    source: &ReplaySource,
    device: &mut Device<S>,
) -> Vec<(usize, McuError)> {
    let mut errors = Vec::new();
    let mut index = 0usize;

    while source.remaining() > 0 {
        index += 1;
        match device.poll(source, 0) {
            Ok(true) => {}
            Ok(false) => warn!("report {index}: empty, skipped"),
            Err(e @ McuError::Decode(_)) => errors.push((index, e)),
            Err(e @ McuError::Transport(_)) => {
                errors.push((index, e));
                break;
            }
        }
    }
    errors
}
