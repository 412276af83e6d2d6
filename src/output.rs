//! Event formatting for the terminal

use air_transport::{Event, EventKind};
use crossterm::style::{style, Color, Stylize};

/// Output format for decoded events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Render one event as a single line
pub fn format_event(event: &Event, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string(event).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
        }
        OutputFormat::Text => {
            let (label, color) = match &event.kind {
                EventKind::ScreenOn => ("SCREEN ON", Color::Green),
                EventKind::ScreenOff => ("SCREEN OFF", Color::DarkGrey),
                EventKind::BrightnessSet => ("BRIGHTNESS SET", Color::Cyan),
                EventKind::BrightnessUp => ("BRIGHTNESS UP", Color::Cyan),
                EventKind::BrightnessDown => ("BRIGHTNESS DOWN", Color::Cyan),
                EventKind::Message(_) => ("MESSAGE", Color::Yellow),
                EventKind::Unknown => ("UNKNOWN", Color::Red),
            };
            // Pad before styling; escape codes would break the width
            let name = style(format!("{label:<16}")).with(color);
            match event.text() {
                Some(text) => format!(
                    "[{:>10}] {} brightness={:<3} {:?}",
                    event.timestamp, name, event.brightness, text
                ),
                None => format!(
                    "[{:>10}] {} brightness={}",
                    event.timestamp, name, event.brightness
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_contains_fields() {
        let event = Event {
            timestamp: 4242,
            brightness: 3,
            kind: EventKind::Message("hello".into()),
        };
        let line = format_event(&event, OutputFormat::Text);
        assert!(line.contains("4242"));
        assert!(line.contains("MESSAGE"));
        assert!(line.contains("\"hello\""));
    }

    #[test]
    fn test_json_line() {
        let event = Event {
            timestamp: 1,
            brightness: 2,
            kind: EventKind::BrightnessUp,
        };
        assert_eq!(
            format_event(&event, OutputFormat::Json),
            r#"{"timestamp":1,"brightness":2,"event":"brightness_up"}"#
        );
    }
}
