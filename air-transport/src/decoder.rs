//! Report decoder and per-session device state
//!
//! A [`Device`] carries the only state the protocol needs: whether the
//! display is on and the last reported brightness. Each call to
//! [`Device::decode`] turns one raw report into at most one [`Event`],
//! delivered synchronously to the device's [`EventSink`].

use tracing::{debug, warn};

use crate::error::{DecodeError, McuError};
use crate::protocol::{self, offset, Action, Button, RawReport, TEXT_HEADER_GAP};
use crate::types::{Event, EventKind};
use crate::ReportSource;

/// Receiver for decoded events.
///
/// Any `FnMut(&Event)` closure is a sink.
pub trait EventSink {
    fn notify(&mut self, event: &Event);
}

impl<F> EventSink for F
where
    F: FnMut(&Event),
{
    fn notify(&mut self, event: &Event) {
        self(event)
    }
}

/// Collects every event, in decode order
impl EventSink for Vec<Event> {
    fn notify(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

/// One open MCU session.
///
/// Not internally synchronized: callers polling from several threads must
/// wrap it in their own lock.
pub struct Device<S> {
    active: bool,
    brightness: u8,
    notifier: S,
}

impl<S: EventSink> Device<S> {
    /// Fresh session: display off, brightness 0
    pub fn new(notifier: S) -> Self {
        Self {
            active: false,
            brightness: 0,
            notifier,
        }
    }

    /// Whether the display is currently on
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last known brightness level
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn notifier(&self) -> &S {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut S {
        &mut self.notifier
    }

    pub fn into_sink(self) -> S {
        self.notifier
    }

    /// Decode one raw report, updating state and notifying the sink.
    ///
    /// Errors never produce an event. A rejected active-poll report still
    /// leaves the display marked active.
    pub fn decode(&mut self, buf: &[u8]) -> Result<(), DecodeError> {
        let report = RawReport::parse(buf)?;
        let timestamp = report.timestamp();

        debug!(
            "MCU report ts={} action=0x{:02X} ({}) len={}",
            timestamp,
            report.action(),
            protocol::action::name(report.action()),
            report.length()
        );

        match Action::from_byte(report.action()) {
            Action::PassivePollStart | Action::PassivePollEnd => {}

            Action::BrightnessCommand => {
                self.brightness = report.payload().as_bytes()[offset::BRIGHTNESS_COMMAND_LEVEL];
                self.emit(timestamp, EventKind::BrightnessSet);
            }

            Action::ManualPollClick => {
                let data = report.payload().as_bytes();
                let level = data[offset::CLICK_LEVEL];

                match Button::from_byte(data[offset::CLICK_BUTTON]) {
                    Button::DisplayToggle => {
                        self.active = !self.active;
                        let kind = if self.active {
                            EventKind::ScreenOn
                        } else {
                            EventKind::ScreenOff
                        };
                        self.emit(timestamp, kind);
                    }
                    Button::BrightnessUp => {
                        self.brightness = level;
                        self.emit(timestamp, EventKind::BrightnessUp);
                    }
                    Button::BrightnessDown => {
                        self.brightness = level;
                        self.emit(timestamp, EventKind::BrightnessDown);
                    }
                    Button::Other(code) => {
                        debug!("Ignoring click with unknown button 0x{:02X}", code);
                    }
                }
            }

            Action::ActivePoll => {
                let payload = report.payload();
                let computed = TEXT_HEADER_GAP + payload.text_len();

                self.active = true;

                if computed != usize::from(report.length()) {
                    warn!(
                        "Active-poll length mismatch: declared {}, computed {}",
                        report.length(),
                        computed
                    );
                    return Err(DecodeError::LengthMismatch {
                        declared: report.length(),
                        actual: computed,
                    });
                }

                let text = payload.as_text().into_owned();
                self.emit(timestamp, EventKind::Message(text));
            }

            Action::Other(code) => {
                debug!("Unknown action 0x{:02X}", code);
                self.emit(timestamp, EventKind::Unknown);
            }
        }

        Ok(())
    }

    /// Read one report with `timeout_ms` and decode it.
    ///
    /// Returns `Ok(false)` when the read timed out without data.
    pub fn poll<R>(&mut self, source: &R, timeout_ms: i32) -> Result<bool, McuError>
    where
        R: ReportSource + ?Sized,
    {
        match source.read_report(timeout_ms)? {
            Some(buf) if !buf.is_empty() => {
                self.decode(&buf)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Consume a pending report without blocking.
    ///
    /// Used to clear transport buffers before regular polling starts.
    pub fn drain<R>(&mut self, source: &R) -> Result<bool, McuError>
    where
        R: ReportSource + ?Sized,
    {
        self.poll(source, 0)
    }

    fn emit(&mut self, timestamp: u32, kind: EventKind) {
        let event = Event {
            timestamp,
            brightness: self.brightness,
            kind,
        };
        self.notifier.notify(&event);
    }
}

/// Free-function form of [`Device::decode`]
pub fn decode<S: EventSink>(device: &mut Device<S>, report: &[u8]) -> Result<(), DecodeError> {
    device.decode(report)
}

/// Free-function form of [`Device::drain`]
pub fn drain<S, R>(device: &mut Device<S>, source: &R) -> Result<bool, McuError>
where
    S: EventSink,
    R: ReportSource + ?Sized,
{
    device.drain(source)
}
