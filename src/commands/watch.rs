//! Live polling command handlers.

use super::{open_mcu, setup_shutdown_flag, CommandResult};
use air_driver::{format_event, DriverConfig, OutputFormat};
use air_transport::{run_poll_loop, Device, Event, McuError, TransportError};
use anyhow::Context;
use std::sync::atomic::Ordering;
use tracing::{info, warn};

/// Poll the glasses and print events until Ctrl-C or `count` events
pub fn watch(config: &DriverConfig, format: OutputFormat, count: Option<u64>) -> CommandResult {
    let mut handle = open_mcu(config);
    if let Some(transport) = handle.transport() {
        let info = transport.device_info();
        info!(
            "Watching VID={:04X} PID={:04X} if={} (Ctrl-C to stop)",
            info.vid, info.pid, info.interface_number
        );
    }

    let shutdown = setup_shutdown_flag();
    let stop = shutdown.clone();
    let mut seen = 0u64;

    let mut device = Device::new(|event: &Event| {
        println!("{}", format_event(event, format));
        seen += 1;
        if count.is_some_and(|n| seen >= n) {
            stop.store(true, Ordering::SeqCst);
        }
    });

    let result = run_poll_loop(&handle, &mut device, &shutdown, &config.poll_config());
    let (active, brightness) = (device.is_active(), device.brightness());
    drop(device);

    if handle.transport().is_some_and(|t| !t.is_connected()) {
        warn!("Glasses no longer respond; were they unplugged?");
    }
    handle.close();

    let stats = match result {
        Err(TransportError::Unallocated) => {
            anyhow::bail!("MCU interface not available (see log for the open failure)")
        }
        other => other.context("Polling stopped")?,
    };

    info!(
        "Stopped after {} events: {} reports, {} timeouts, {} decode errors, {} read errors",
        seen, stats.reports, stats.timeouts, stats.decode_errors, stats.transport_errors
    );
    info!(
        "Final state: display {}, brightness {}",
        if active { "on" } else { "off" },
        brightness
    );
    Ok(())
}

/// Flush one pending report without blocking
pub fn drain(config: &DriverConfig, format: OutputFormat) -> CommandResult {
    let handle = open_mcu(config);
    let mut device = Device::new(|event: &Event| println!("{}", format_event(event, format)));

    match device.drain(&handle) {
        Ok(true) => println!("Drained one report"),
        Ok(false) => println!("Nothing pending"),
        Err(McuError::Decode(e)) => println!("Drained one malformed report: {e}"),
        Err(McuError::Transport(TransportError::Unallocated)) => {
            anyhow::bail!("MCU interface not available (see log for the open failure)")
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
