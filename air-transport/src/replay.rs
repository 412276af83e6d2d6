//! In-memory report source for offline decoding

use std::collections::VecDeque;
use std::str::FromStr;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::ReportSource;

/// Hands out queued reports in order, then behaves like an idle device
/// (every read times out).
#[derive(Default)]
pub struct ReplaySource {
    reports: Mutex<VecDeque<Vec<u8>>>,
}

impl ReplaySource {
    pub fn new<I>(reports: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self {
            reports: Mutex::new(reports.into_iter().collect()),
        }
    }

    pub fn push(&self, report: Vec<u8>) {
        self.reports.lock().push_back(report);
    }

    pub fn remaining(&self) -> usize {
        self.reports.lock().len()
    }
}

impl ReportSource for ReplaySource {
    fn read_report(&self, _timeout_ms: i32) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self.reports.lock().pop_front())
    }
}

/// One report written as hex, e.g. `"e8 03 00 00 05 19 ..."`.
///
/// Whitespace, `:` and `,` separators are ignored. Input without any hex
/// digits is rejected. No size check happens here; a short line decodes to a
/// size mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexReport(pub Vec<u8>);

impl FromStr for HexReport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ':' && *c != ',')
            .collect();
        let digits = digits.strip_prefix("0x").unwrap_or(&digits);

        if digits.is_empty() {
            return Err("Empty report".to_string());
        }
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(format!("Invalid hex digit '{}'", c));
        }
        if digits.len() % 2 != 0 {
            return Err(format!("Odd number of hex digits: {}", digits.len()));
        }

        (0..digits.len())
            .step_by(2)
            .map(|i| {
                u8::from_str_radix(&digits[i..i + 2], 16)
                    .map_err(|e| format!("Invalid hex byte '{}': {}", &digits[i..i + 2], e))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(HexReport)
    }
}
