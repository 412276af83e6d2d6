//! Device discovery for the MCU interface

use std::ffi::CString;

use hidapi::HidApi;
use tracing::{debug, info};

use crate::device_registry::{self, MCU_INTERFACE, VENDOR_ID};
use crate::error::TransportError;
use crate::hid_mcu::{HidMcuTransport, McuHandle};
use crate::types::McuDeviceInfo;

/// HID discovery for the glasses' MCU interface
pub struct HidDiscovery {
    api: HidApi,
    /// Known VID/PID pairs to look for
    known_devices: Vec<(u16, u16)>,
    /// Interface number carrying status reports
    interface: i32,
}

impl HidDiscovery {
    /// Initialize hidapi and look for the registry's known devices
    pub fn new() -> Result<Self, TransportError> {
        let api = HidApi::new()?;
        Ok(Self {
            api,
            known_devices: device_registry::MCU_PIDS
                .iter()
                .map(|&pid| (VENDOR_ID, pid))
                .collect(),
            interface: MCU_INTERFACE,
        })
    }

    /// Add a VID/PID pair to discover
    pub fn add_device(&mut self, vid: u16, pid: u16) {
        if !self.known_devices.contains(&(vid, pid)) {
            self.known_devices.push((vid, pid));
        }
    }

    /// Override the interface number (default 3)
    pub fn set_interface(&mut self, interface: i32) {
        self.interface = interface;
    }

    pub fn api(&self) -> &HidApi {
        &self.api
    }

    fn is_target(&self, device_info: &hidapi::DeviceInfo) -> bool {
        self.known_devices
            .contains(&(device_info.vendor_id(), device_info.product_id()))
            && device_info.interface_number() == self.interface
    }

    /// List MCU interfaces currently attached
    pub fn list_devices(&self) -> Vec<McuDeviceInfo> {
        let devices: Vec<_> = self
            .api
            .device_list()
            .filter(|d| self.is_target(d))
            .map(|d| McuDeviceInfo {
                vid: d.vendor_id(),
                pid: d.product_id(),
                interface_number: d.interface_number(),
                device_path: d.path().to_string_lossy().to_string(),
                serial: d.serial_number().map(|s| s.to_string()),
                product_name: d.product_string().map(|s| s.to_string()),
            })
            .collect();

        for dev in &devices {
            debug!(
                "Found MCU interface: VID={:04X} PID={:04X} if={} path={}",
                dev.vid, dev.pid, dev.interface_number, dev.device_path
            );
        }
        devices
    }

    /// Open a specific interface, optionally sending the init command
    pub fn open_device(
        &self,
        info: &McuDeviceInfo,
        send_init: bool,
    ) -> Result<HidMcuTransport, TransportError> {
        let path = CString::new(info.device_path.clone())
            .map_err(|e| TransportError::HidError(e.to_string()))?;
        let device = self.api.open_path(&path)?;
        let transport = HidMcuTransport::new(device, info.clone());

        if send_init {
            transport.send_init()?;
        }

        info!(
            "Opened MCU interface VID={:04X} PID={:04X} at {}",
            info.vid, info.pid, info.device_path
        );
        Ok(transport)
    }

    /// Open the first MCU interface found
    pub fn open_first(&self, send_init: bool) -> Result<HidMcuTransport, TransportError> {
        let devices = self.list_devices();
        let first = devices.first().ok_or_else(|| {
            TransportError::DeviceNotFound(format!(
                "no HID interface {} on {:04X?}",
                self.interface, self.known_devices
            ))
        })?;
        self.open_device(first, send_init)
    }

    /// Best-effort open: failures produce an unallocated handle
    pub fn open_degraded(&self, send_init: bool) -> McuHandle {
        McuHandle::from(self.open_first(send_init))
    }
}
