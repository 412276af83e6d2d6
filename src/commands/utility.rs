//! Utility command handlers.

use super::{discovery, CommandResult};
use air_driver::DriverConfig;
use air_transport::is_mcu_interface;
use std::path::Path;

/// List glasses HID interfaces
pub fn list(config: &DriverConfig, all: bool) -> CommandResult {
    let discovery = discovery(config)?;

    if all {
        println!("All HID devices:");
        for d in discovery.api().device_list() {
            let marker = if is_mcu_interface(d.vendor_id(), d.product_id(), d.interface_number()) {
                " [MCU]"
            } else {
                ""
            };
            println!(
                "  VID={:04x} PID={:04x} usage={:04x} page={:04x} if={}{} path={}",
                d.vendor_id(),
                d.product_id(),
                d.usage(),
                d.usage_page(),
                d.interface_number(),
                marker,
                d.path().to_string_lossy(),
            );
        }
        return Ok(());
    }

    let devices = discovery.list_devices();
    if devices.is_empty() {
        println!(
            "No MCU interface found (VID={:04X} PID={:04X} if={})",
            config.vendor_id, config.product_id, config.interface
        );
        return Ok(());
    }

    for (i, dev) in devices.iter().enumerate() {
        println!(
            "  [{}] VID={:04X} PID={:04X} if={} path={}",
            i, dev.vid, dev.pid, dev.interface_number, dev.device_path
        );
        if let Some(name) = &dev.product_name {
            println!("      Name:   {name}");
        }
        if let Some(serial) = &dev.serial {
            println!("      Serial: {serial}");
        }
    }
    Ok(())
}

/// Print (and optionally save) the effective configuration
pub fn config(config: &DriverConfig, save: Option<&Path>) -> CommandResult {
    print!("{}", config.to_toml()?);
    if let Some(path) = save {
        config.save(path)?;
        println!("# saved to {}", path.display());
    }
    Ok(())
}
