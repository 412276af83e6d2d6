//! Wire layout and code tables for the MCU status interface
//!
//! Every report on the MCU interface is a fixed 64-byte record:
//!
//! | Offset | Field     | Size | Meaning                                   |
//! |--------|-----------|------|-------------------------------------------|
//! | 0      | timestamp | 4    | device timestamp, little-endian           |
//! | 4      | length    | 1    | declared payload length (active-poll)     |
//! | 5      | action    | 1    | action code, see [`action`]               |
//! | 6      | reserved  | 2    | unused                                    |
//! | 8      | payload   | 56   | action-dependent bytes or NUL-terminated text |

use std::borrow::Cow;

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::DecodeError;

/// Size of one MCU report in bytes
pub const REPORT_SIZE: usize = 64;

/// Byte offset of the declared length field
pub const LENGTH_OFFSET: usize = 4;
/// Byte offset of the action code
pub const ACTION_OFFSET: usize = 5;
/// Byte offset of the data/text region
pub const PAYLOAD_OFFSET: usize = 8;
/// Size of the data/text region
pub const PAYLOAD_SIZE: usize = REPORT_SIZE - PAYLOAD_OFFSET;

/// Distance between the length field and the start of the text.
///
/// Active-poll reports declare `length == TEXT_HEADER_GAP + strlen(text)`.
pub const TEXT_HEADER_GAP: usize = PAYLOAD_OFFSET - LENGTH_OFFSET;

/// Offsets inside the payload region
pub mod offset {
    /// Brightness level in a brightness-command report
    pub const BRIGHTNESS_COMMAND_LEVEL: usize = 1;
    /// Button code in a manual-poll-click report
    pub const CLICK_BUTTON: usize = 0;
    /// Brightness level after the click
    pub const CLICK_LEVEL: usize = 8;
}

/// Action codes (byte 5 of every report)
pub mod action {
    pub const BRIGHTNESS_COMMAND: u8 = 0x03;
    pub const MANUAL_POLL_CLICK: u8 = 0x05;
    pub const PASSIVE_POLL_START: u8 = 0x17;
    pub const ACTIVE_POLL: u8 = 0x19;
    pub const PASSIVE_POLL_END: u8 = 0x2A;

    /// Get human-readable name for an action byte
    pub fn name(action: u8) -> &'static str {
        match action {
            BRIGHTNESS_COMMAND => "BRIGHTNESS_COMMAND",
            MANUAL_POLL_CLICK => "MANUAL_POLL_CLICK",
            PASSIVE_POLL_START => "PASSIVE_POLL_START",
            ACTIVE_POLL => "ACTIVE_POLL",
            PASSIVE_POLL_END => "PASSIVE_POLL_END",
            _ => "UNKNOWN",
        }
    }
}

/// Button codes carried by manual-poll-click reports
pub mod button {
    pub const DISPLAY_TOGGLE: u8 = 0x01;
    pub const BRIGHTNESS_UP: u8 = 0x06;
    pub const BRIGHTNESS_DOWN: u8 = 0x07;
}

/// One-time command written after open to set the initial brightness/power state
pub const INIT_PAYLOAD: [u8; 16] = [
    0xfd, 0x1e, 0xb9, 0xf0, 0x68, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x03,
];

/// Decoded action code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PassivePollStart,
    BrightnessCommand,
    ManualPollClick,
    ActivePoll,
    PassivePollEnd,
    /// Any byte outside the known vocabulary
    Other(u8),
}

impl Action {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            action::PASSIVE_POLL_START => Self::PassivePollStart,
            action::BRIGHTNESS_COMMAND => Self::BrightnessCommand,
            action::MANUAL_POLL_CLICK => Self::ManualPollClick,
            action::ACTIVE_POLL => Self::ActivePoll,
            action::PASSIVE_POLL_END => Self::PassivePollEnd,
            other => Self::Other(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Self::PassivePollStart => action::PASSIVE_POLL_START,
            Self::BrightnessCommand => action::BRIGHTNESS_COMMAND,
            Self::ManualPollClick => action::MANUAL_POLL_CLICK,
            Self::ActivePoll => action::ACTIVE_POLL,
            Self::PassivePollEnd => action::PASSIVE_POLL_END,
            Self::Other(byte) => byte,
        }
    }
}

/// Decoded button code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    DisplayToggle,
    BrightnessUp,
    BrightnessDown,
    Other(u8),
}

impl Button {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            button::DISPLAY_TOGGLE => Self::DisplayToggle,
            button::BRIGHTNESS_UP => Self::BrightnessUp,
            button::BRIGHTNESS_DOWN => Self::BrightnessDown,
            other => Self::Other(other),
        }
    }
}

/// The 56-byte data/text region.
///
/// The same storage is read either as raw bytes or as a NUL-terminated
/// string; which one applies is decided by the report's action code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(transparent)]
pub struct Payload([u8; PAYLOAD_SIZE]);

impl Payload {
    pub fn as_bytes(&self) -> &[u8; PAYLOAD_SIZE] {
        &self.0
    }

    /// Bytes up to (not including) the first NUL, or the whole region if
    /// the text is unterminated.
    pub fn text_bytes(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(PAYLOAD_SIZE);
        &self.0[..end]
    }

    /// Length of the text in bytes (C `strlen` semantics, capped at the region)
    pub fn text_len(&self) -> usize {
        self.text_bytes().len()
    }

    /// Text view of the payload; invalid UTF-8 is replaced
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.text_bytes())
    }
}

/// One raw MCU report, laid out exactly as on the wire.
///
/// Fields are private; use [`RawReport::parse`] for received buffers and the
/// `with_*` builders to construct reports for replay and tests.
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct RawReport {
    timestamp: U32,
    length: u8,
    action: u8,
    _reserved: [u8; 2],
    payload: Payload,
}

impl RawReport {
    /// Interpret a buffer received from the transport.
    ///
    /// Anything other than exactly [`REPORT_SIZE`] bytes is refused.
    pub fn parse(buf: &[u8]) -> Result<Self, DecodeError> {
        let mismatch = DecodeError::SizeMismatch {
            expected: REPORT_SIZE,
            actual: buf.len(),
        };
        if buf.len() != REPORT_SIZE {
            return Err(mismatch);
        }
        Self::read_from_bytes(buf).map_err(|_| mismatch)
    }

    /// Zeroed report with the given action code
    pub fn new(action: u8) -> Self {
        Self {
            timestamp: U32::new(0),
            length: 0,
            action,
            _reserved: [0; 2],
            payload: Payload([0; PAYLOAD_SIZE]),
        }
    }

    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = U32::new(timestamp);
        self
    }

    pub fn with_length(mut self, length: u8) -> Self {
        self.length = length;
        self
    }

    /// Set a single payload byte; out-of-range indices are ignored
    pub fn with_byte(mut self, index: usize, value: u8) -> Self {
        if let Some(slot) = self.payload.0.get_mut(index) {
            *slot = value;
        }
        self
    }

    /// Copy `data` into the start of the payload, truncated to the region
    pub fn with_data(mut self, data: &[u8]) -> Self {
        let n = data.len().min(PAYLOAD_SIZE);
        self.payload.0[..n].copy_from_slice(&data[..n]);
        self
    }

    /// Write NUL-terminated text and set a consistent length field.
    ///
    /// Text longer than the region minus its terminator is truncated.
    pub fn with_text(mut self, text: &str) -> Self {
        let bytes = text.as_bytes();
        let n = bytes.len().min(PAYLOAD_SIZE - 1);
        self.payload.0 = [0; PAYLOAD_SIZE];
        self.payload.0[..n].copy_from_slice(&bytes[..n]);
        // n <= 55, so the sum always fits
        self.length = (TEXT_HEADER_GAP + n) as u8;
        self
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp.get()
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn action(&self) -> u8 {
        self.action
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Wire bytes of this report
    pub fn to_bytes(&self) -> [u8; REPORT_SIZE] {
        let mut out = [0u8; REPORT_SIZE];
        out.copy_from_slice(IntoBytes::as_bytes(self));
        out
    }
}
