//! Report decoder and transport for the Nreal/XREAL Air MCU interface
//!
//! The glasses publish status reports (display toggle, brightness buttons,
//! firmware messages) on HID interface 3. This crate provides:
//!
//! - `protocol`: the 64-byte report layout and action/button codes
//! - `decoder`: the per-session [`Device`] state and report decoder
//! - HID transport, discovery, and a polling loop that feed the decoder

pub mod decoder;
pub mod device_registry;
pub mod error;
pub mod event_reader;
pub mod protocol;
pub mod replay;
pub mod types;

mod discovery;
mod hid_mcu;

pub use decoder::{decode, drain, Device, EventSink};
pub use device_registry::{is_mcu_interface, is_mcu_pid, MCU_INTERFACE, MCU_PIDS, VENDOR_ID};
pub use discovery::HidDiscovery;
pub use error::{DecodeError, McuError, TransportError};
pub use event_reader::{run_poll_loop, BroadcastSink, EventReader, PollConfig, PollStats};
pub use hid_mcu::{HidMcuTransport, McuHandle};
pub use protocol::{Action, Button, Payload, RawReport, REPORT_SIZE, TEXT_HEADER_GAP};
pub use replay::{HexReport, ReplaySource};
pub use types::{Event, EventKind, McuDeviceInfo};

/// Source of raw MCU reports.
///
/// Implemented by the HID transport and by in-memory sources for replay.
pub trait ReportSource {
    /// Read one report, waiting at most `timeout_ms` (0 = non-blocking,
    /// -1 = block).
    ///
    /// Returns `None` on timeout. The buffer is passed through untouched so
    /// the decoder can reject reads of the wrong size.
    fn read_report(&self, timeout_ms: i32) -> Result<Option<Vec<u8>>, TransportError>;
}
