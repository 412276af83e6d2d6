//! HID transport for the MCU interface

use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::protocol::{INIT_PAYLOAD, REPORT_SIZE};
use crate::types::McuDeviceInfo;
use crate::ReportSource;

/// Open MCU interface backed by a hidraw handle
pub struct HidMcuTransport {
    device: Mutex<HidDevice>,
    info: McuDeviceInfo,
}

impl HidMcuTransport {
    /// Wrap an already opened HID device
    pub fn new(device: HidDevice, info: McuDeviceInfo) -> Self {
        Self {
            device: Mutex::new(device),
            info,
        }
    }

    /// Write the one-time initialization command.
    ///
    /// A short write is reported as [`TransportError::InitFailed`].
    pub fn send_init(&self) -> Result<(), TransportError> {
        let device = self.device.lock();
        let written = device.write(&INIT_PAYLOAD)?;
        debug!("Init payload: wrote {} bytes: {:02X?}", written, INIT_PAYLOAD);
        if written != INIT_PAYLOAD.len() {
            return Err(TransportError::InitFailed {
                written,
                expected: INIT_PAYLOAD.len(),
            });
        }
        Ok(())
    }

    pub fn device_info(&self) -> &McuDeviceInfo {
        &self.info
    }

    /// Check if the handle still answers
    pub fn is_connected(&self) -> bool {
        self.device.lock().get_product_string().is_ok()
    }
}

impl ReportSource for HidMcuTransport {
    fn read_report(&self, timeout_ms: i32) -> Result<Option<Vec<u8>>, TransportError> {
        let mut buf = [0u8; REPORT_SIZE];
        let len = self.device.lock().read_timeout(&mut buf, timeout_ms)?;
        if len == 0 {
            return Ok(None);
        }
        Ok(Some(buf[..len].to_vec()))
    }
}

/// MCU handle that may have failed to open.
///
/// Opening the glasses is best-effort: enumeration, open, and init failures
/// are logged and yield a handle whose reads fail with
/// [`TransportError::Unallocated`] instead of aborting the caller.
pub struct McuHandle {
    transport: Option<HidMcuTransport>,
}

impl McuHandle {
    pub fn allocated(transport: HidMcuTransport) -> Self {
        Self {
            transport: Some(transport),
        }
    }

    pub fn unallocated() -> Self {
        Self { transport: None }
    }

    pub fn is_allocated(&self) -> bool {
        self.transport.is_some()
    }

    pub fn transport(&self) -> Option<&HidMcuTransport> {
        self.transport.as_ref()
    }

    /// Close the handle; later reads fail with `Unallocated`
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            debug!("MCU handle closed");
        }
    }
}

impl From<Result<HidMcuTransport, TransportError>> for McuHandle {
    fn from(result: Result<HidMcuTransport, TransportError>) -> Self {
        match result {
            Ok(transport) => Self::allocated(transport),
            Err(e) => {
                warn!("MCU interface unavailable: {}", e);
                Self::unallocated()
            }
        }
    }
}

impl ReportSource for McuHandle {
    fn read_report(&self, timeout_ms: i32) -> Result<Option<Vec<u8>>, TransportError> {
        match &self.transport {
            Some(transport) => transport.read_report(timeout_ms),
            None => Err(TransportError::Unallocated),
        }
    }
}
