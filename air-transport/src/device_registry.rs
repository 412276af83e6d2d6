//! Device registry - USB identity of the MCU interface
//!
//! The glasses expose several HID interfaces; status reports arrive only on
//! the MCU interface, which is selected by interface number.

/// Nreal/XREAL vendor ID
pub const VENDOR_ID: u16 = 0x3318;

/// Known product IDs carrying the MCU interface
pub const MCU_PIDS: &[u16] = &[
    0x0424, // Air
];

/// HID interface number of the MCU endpoint
pub const MCU_INTERFACE: i32 = 3;

/// Check if PID is a known glasses model
#[inline]
pub fn is_mcu_pid(pid: u16) -> bool {
    MCU_PIDS.contains(&pid)
}

/// Check if an enumerated interface is the MCU endpoint of a known device
#[inline]
pub fn is_mcu_interface(vid: u16, pid: u16, interface_number: i32) -> bool {
    vid == VENDOR_ID && is_mcu_pid(pid) && interface_number == MCU_INTERFACE
}
