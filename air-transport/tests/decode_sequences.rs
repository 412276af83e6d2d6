//! Integration tests for report sequences.
//!
//! These drive the public API the way the driver does: raw 64-byte buffers
//! from a `ReportSource` into a `Device`, events out through a sink.

use std::time::{Duration, Instant};

use air_transport::protocol::{action, button, offset};
use air_transport::{
    decode, drain, DecodeError, Device, Event, EventKind, EventReader, McuError, PollConfig,
    RawReport, ReplaySource, ReportSource, REPORT_SIZE, TEXT_HEADER_GAP,
};

fn brightness_command(timestamp: u32, level: u8) -> [u8; REPORT_SIZE] {
    RawReport::new(action::BRIGHTNESS_COMMAND)
        .with_timestamp(timestamp)
        .with_byte(offset::BRIGHTNESS_COMMAND_LEVEL, level)
        .to_bytes()
}

fn click(timestamp: u32, code: u8, level: u8) -> [u8; REPORT_SIZE] {
    RawReport::new(action::MANUAL_POLL_CLICK)
        .with_timestamp(timestamp)
        .with_byte(offset::CLICK_BUTTON, code)
        .with_byte(offset::CLICK_LEVEL, level)
        .to_bytes()
}

// ── Properties over the decoder ──

#[test]
fn brightness_command_sets_level_for_every_value() {
    for level in [0u8, 1, 2, 7, 128, 255] {
        let mut device = Device::new(Vec::new());
        decode(&mut device, &brightness_command(3, level)).unwrap();

        assert_eq!(device.brightness(), level);
        let events = device.into_sink();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::BrightnessSet);
        assert_eq!(events[0].level(), Some(level));
    }
}

#[test]
fn identical_reports_are_not_deduplicated() {
    let mut device = Device::new(Vec::new());
    let report = brightness_command(100, 4);

    decode(&mut device, &report).unwrap();
    decode(&mut device, &report).unwrap();

    let events = device.into_sink();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], events[1]);
}

#[test]
fn display_toggle_keeps_brightness() {
    let mut device = Device::new(Vec::new());
    decode(&mut device, &brightness_command(1, 3)).unwrap();

    decode(&mut device, &click(2, button::DISPLAY_TOGGLE, 250)).unwrap();
    decode(&mut device, &click(3, button::DISPLAY_TOGGLE, 250)).unwrap();
    decode(&mut device, &click(4, button::DISPLAY_TOGGLE, 250)).unwrap();

    assert!(device.is_active());
    assert_eq!(device.brightness(), 3);
    let kinds: Vec<_> = device.into_sink().into_iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::BrightnessSet,
            EventKind::ScreenOn,
            EventKind::ScreenOff,
            EventKind::ScreenOn,
        ]
    );
}

#[test]
fn active_poll_length_must_match_text() {
    for declared in 0u8..=20 {
        let mut device = Device::new(Vec::new());
        let report = RawReport::new(action::ACTIVE_POLL)
            .with_text("status")
            .with_length(declared)
            .to_bytes();

        let result = decode(&mut device, &report);

        if usize::from(declared) == TEXT_HEADER_GAP + 6 {
            assert!(result.is_ok());
            assert_eq!(device.notifier()[0].text(), Some("status"));
        } else {
            assert_eq!(
                result,
                Err(DecodeError::LengthMismatch {
                    declared,
                    actual: TEXT_HEADER_GAP + 6
                })
            );
            assert!(device.notifier().is_empty());
        }
        assert!(device.is_active());
    }
}

#[test]
fn unknown_actions_leave_state_alone() {
    let known = [
        action::PASSIVE_POLL_START,
        action::BRIGHTNESS_COMMAND,
        action::MANUAL_POLL_CLICK,
        action::ACTIVE_POLL,
        action::PASSIVE_POLL_END,
    ];

    for code in (0u8..=255).filter(|c| !known.contains(c)) {
        let mut device = Device::new(Vec::new());
        decode(&mut device, &brightness_command(0, 9)).unwrap();

        let report = RawReport::new(code)
            .with_timestamp(u32::from(code))
            .with_data(&[button::DISPLAY_TOGGLE; 16])
            .to_bytes();
        decode(&mut device, &report).unwrap();

        assert!(!device.is_active());
        assert_eq!(device.brightness(), 9);
        assert_eq!(
            device.notifier().last(),
            Some(&Event {
                timestamp: u32::from(code),
                brightness: 9,
                kind: EventKind::Unknown,
            })
        );
    }
}

#[test]
fn raw_bytes_decode_like_builder_reports() {
    // Hand-assembled click: ts=0x01020304, brightness-up to level 5
    let mut buf = [0u8; REPORT_SIZE];
    buf[0..4].copy_from_slice(&[0x04, 0x03, 0x02, 0x01]);
    buf[5] = action::MANUAL_POLL_CLICK;
    buf[8] = button::BRIGHTNESS_UP;
    buf[16] = 5;

    let mut device = Device::new(Vec::new());
    decode(&mut device, &buf).unwrap();

    assert_eq!(
        device.into_sink(),
        vec![Event {
            timestamp: 0x0102_0304,
            brightness: 5,
            kind: EventKind::BrightnessUp,
        }]
    );
}

#[test]
fn passive_start_then_message() {
    let source = ReplaySource::new(vec![
        RawReport::new(action::PASSIVE_POLL_START)
            .with_timestamp(10)
            .to_bytes()
            .to_vec(),
        RawReport::new(action::ACTIVE_POLL)
            .with_timestamp(11)
            .with_length((TEXT_HEADER_GAP + 5) as u8)
            .with_data(b"hello\0")
            .to_bytes()
            .to_vec(),
    ]);
    let mut device = Device::new(Vec::new());

    assert!(device.poll(&source, 0).unwrap());
    assert!(device.poll(&source, 0).unwrap());
    assert!(!device.poll(&source, 0).unwrap());

    assert!(device.is_active());
    assert_eq!(
        device.into_sink(),
        vec![Event {
            timestamp: 11,
            brightness: 0,
            kind: EventKind::Message("hello".into()),
        }]
    );
}

// ── Transport-facing behavior ──

#[test]
fn short_read_is_size_mismatch() {
    let source = ReplaySource::new(vec![vec![0u8; 20]]);
    let mut device = Device::new(Vec::new());

    let err = device.poll(&source, 0).unwrap_err();

    assert!(matches!(
        err,
        McuError::Decode(DecodeError::SizeMismatch {
            expected: 64,
            actual: 20
        })
    ));
}

#[test]
fn drain_on_idle_source_returns_false() {
    let source = ReplaySource::default();
    let mut device = Device::new(Vec::new());

    assert!(!drain(&mut device, &source).unwrap());
    assert!(device.notifier().is_empty());
}

#[test]
fn drain_consumes_exactly_one_report() {
    let source = ReplaySource::new(vec![
        brightness_command(1, 2).to_vec(),
        brightness_command(2, 3).to_vec(),
    ]);
    let mut device = Device::new(Vec::new());

    assert!(drain(&mut device, &source).unwrap());
    assert_eq!(device.brightness(), 2);
    assert_eq!(source.remaining(), 1);
}

#[test]
fn broadcast_sink_publishes_in_order() {
    let source = ReplaySource::new(vec![
        brightness_command(1, 1).to_vec(),
        click(2, button::BRIGHTNESS_UP, 2).to_vec(),
        click(3, button::DISPLAY_TOGGLE, 0).to_vec(),
    ]);

    // Subscribe before any report is decoded
    let sink = air_transport::BroadcastSink::new();
    let mut rx = sink.subscribe();
    let mut device = Device::new(sink);
    while device.poll(&source, 0).unwrap() {}

    let timestamps: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|e| e.timestamp)
        .collect();
    assert_eq!(timestamps, vec![1, 2, 3]);
}

#[test]
fn event_reader_delivers_every_event_in_order() {
    let source = ReplaySource::new(vec![
        brightness_command(1, 1).to_vec(),
        click(2, button::BRIGHTNESS_UP, 2).to_vec(),
        click(3, button::DISPLAY_TOGGLE, 0).to_vec(),
        RawReport::new(action::ACTIVE_POLL)
            .with_timestamp(4)
            .with_text("ready")
            .to_bytes()
            .to_vec(),
    ]);
    let config = PollConfig {
        read_timeout_ms: 0,
        error_sleep_ms: 0,
        drain_first: false,
        name: "test",
    };

    // The reader starts decoding immediately; the returned receiver
    // already exists, so nothing is lost
    let (reader, mut rx) = EventReader::spawn(source, config).unwrap();

    let mut events = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    while events.len() < 4 && Instant::now() < deadline {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(_) => std::thread::sleep(Duration::from_millis(1)),
        }
    }
    let stats = reader.stop().unwrap();

    let kinds: Vec<_> = events.iter().map(|e| (e.timestamp, e.kind.clone())).collect();
    assert_eq!(
        kinds,
        vec![
            (1, EventKind::BrightnessSet),
            (2, EventKind::BrightnessUp),
            (3, EventKind::ScreenOn),
            (4, EventKind::Message("ready".into())),
        ]
    );
    assert_eq!(stats.reports, 4);
}

#[test]
fn event_json_shape() {
    let event = Event {
        timestamp: 5,
        brightness: 3,
        kind: EventKind::Message("hi".into()),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"timestamp": 5, "brightness": 3, "event": "message", "text": "hi"})
    );

    let event = Event {
        timestamp: 1,
        brightness: 0,
        kind: EventKind::ScreenOn,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "screen_on");
}

#[test]
fn report_source_is_object_safe() {
    let source: Box<dyn ReportSource> = Box::new(ReplaySource::new(vec![
        brightness_command(1, 8).to_vec(),
    ]));
    let mut device = Device::new(Vec::new());

    assert!(device.poll(source.as_ref(), 0).unwrap());
    assert_eq!(device.brightness(), 8);
}
