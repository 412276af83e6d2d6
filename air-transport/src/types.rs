//! Common types for the decoder and transport layers

use serde::Serialize;

/// What a decoded report means
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "text", rename_all = "snake_case")]
pub enum EventKind {
    /// Display switched on via the toggle button
    ScreenOn,
    /// Display switched off via the toggle button
    ScreenOff,
    /// Brightness set by the host/firmware
    BrightnessSet,
    /// Brightness raised via the hardware button
    BrightnessUp,
    /// Brightness lowered via the hardware button
    BrightnessDown,
    /// Status text from an active-poll report
    Message(String),
    /// Report with an action code outside the known vocabulary
    Unknown,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScreenOn => "screen_on",
            Self::ScreenOff => "screen_off",
            Self::BrightnessSet => "brightness_set",
            Self::BrightnessUp => "brightness_up",
            Self::BrightnessDown => "brightness_down",
            Self::Message(_) => "message",
            Self::Unknown => "unknown",
        }
    }
}

/// A decoded report as delivered to an [`EventSink`](crate::EventSink)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Device timestamp from the report header
    pub timestamp: u32,
    /// Device brightness at emission time
    pub brightness: u8,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    /// Brightness level carried by the brightness variants
    pub fn level(&self) -> Option<u8> {
        match self.kind {
            EventKind::BrightnessSet | EventKind::BrightnessUp | EventKind::BrightnessDown => {
                Some(self.brightness)
            }
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Message(text) => Some(text),
            _ => None,
        }
    }
}

/// Identification of an MCU HID interface
#[derive(Debug, Clone)]
pub struct McuDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// USB interface number
    pub interface_number: i32,
    /// hidraw path
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}
