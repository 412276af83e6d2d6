//! Command handlers for the CLI application.
//!
//! - `watch`: live polling (watch, drain)
//! - `replay`: offline decoding (decode, replay)
//! - `utility`: list, config

pub mod replay;
pub mod utility;
pub mod watch;

use air_driver::DriverConfig;
use air_transport::{HidDiscovery, HidMcuTransport, McuHandle, TransportError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Build a discovery for the configured VID/PID/interface
pub fn discovery(config: &DriverConfig) -> Result<HidDiscovery, TransportError> {
    let mut discovery = HidDiscovery::new()?;
    discovery.add_device(config.vendor_id, config.product_id);
    discovery.set_interface(config.interface);
    Ok(discovery)
}

/// Open the MCU interface best-effort.
///
/// Any failure (hidapi init, no device, open, init write) is logged and
/// yields an unallocated handle.
pub fn open_mcu(config: &DriverConfig) -> McuHandle {
    match discovery(config) {
        Ok(discovery) => discovery.open_degraded(config.send_init),
        Err(e) => McuHandle::from(Err::<HidMcuTransport, _>(e)),
    }
}

/// Set up a Ctrl-C handler that raises the returned shutdown flag.
pub fn setup_shutdown_flag() -> Arc<AtomicBool> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = Arc::clone(&shutdown);

    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .ok();

    shutdown
}
