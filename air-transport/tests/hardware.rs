//! Integration tests against real glasses.
//!
//! These tests require Air glasses plugged in with access to hidraw.
//! Run with: cargo test -p air-transport --test hardware -- --ignored --nocapture

use std::time::Duration;

use air_transport::{Device, EventReader, HidDiscovery, PollConfig, ReportSource};

fn open_glasses() -> air_transport::HidMcuTransport {
    let discovery = HidDiscovery::new().expect("hidapi init failed");
    discovery
        .open_first(true)
        .expect("No glasses found - plug in a supported device")
}

#[test]
#[ignore] // requires hardware
fn enumerates_mcu_interface() {
    let discovery = HidDiscovery::new().expect("hidapi init failed");
    let devices = discovery.list_devices();
    assert!(!devices.is_empty(), "no MCU interface enumerated");
    for info in &devices {
        println!("{:04x}:{:04x} if={} {}", info.vid, info.pid, info.interface_number, info.device_path);
        assert_eq!(info.interface_number, air_transport::MCU_INTERFACE);
    }
}

#[test]
#[ignore] // requires hardware
fn reads_are_full_reports() {
    let transport = open_glasses();
    assert!(transport.is_connected());
    // The MCU reports roughly once per second after init
    for _ in 0..5 {
        if let Some(report) = transport.read_report(1000).expect("read failed") {
            assert_eq!(report.len(), air_transport::REPORT_SIZE);
        }
    }
}

#[test]
#[ignore] // requires hardware
fn drain_then_poll_decodes() {
    let transport = open_glasses();
    let mut device = Device::new(Vec::new());

    device.drain(&transport).expect("drain failed");
    for _ in 0..5 {
        match device.poll(&transport, 1000) {
            Ok(_) => {}
            Err(e) => println!("decode error: {e}"),
        }
    }
    for event in device.notifier() {
        println!("{event:?}");
    }
}

#[test]
#[ignore] // requires hardware
fn event_reader_stops_cleanly() {
    let transport = open_glasses();
    let (reader, mut rx) = EventReader::spawn(
        transport,
        PollConfig {
            read_timeout_ms: 100,
            ..Default::default()
        },
    )
    .expect("spawn failed");

    std::thread::sleep(Duration::from_secs(2));
    let stats = reader.stop().expect("reader failed");
    while let Ok(event) = rx.try_recv() {
        println!("{event:?}");
    }
    println!("{stats:?}");
}
