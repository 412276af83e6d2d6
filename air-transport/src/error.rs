//! Decoder and transport error types

use thiserror::Error;

/// Errors from decoding a single MCU report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The transport handed over a buffer that is not exactly one report
    #[error("Report size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Active-poll text disagrees with the declared length field
    #[error("Message length mismatch: declared {declared}, computed {actual}")]
    LengthMismatch { declared: u8, actual: usize },
}

/// Errors that can occur while talking to the MCU interface
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Device disconnected")]
    Disconnected,

    /// Handle was never opened (enumeration, open, or init failed earlier)
    #[error("Device handle not allocated")]
    Unallocated,

    #[error("Initialization write failed: wrote {written} of {expected} bytes")]
    InitFailed { written: usize, expected: usize },

    // HID-specific errors
    #[error("HID error: {0}")]
    HidError(String),

    #[error("HID permission denied: {0}")]
    HidPermissionDenied(String),

    /// The reader thread panicked; carries the panic message
    #[error("Event reader thread panicked: {0}")]
    ReaderPanicked(String),
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") {
            TransportError::HidPermissionDenied(msg)
        } else {
            TransportError::HidError(msg)
        }
    }
}

/// Either half of a poll: the read or the decode
#[derive(Error, Debug)]
pub enum McuError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}
