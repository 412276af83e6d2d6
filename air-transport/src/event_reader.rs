//! Polling loop and broadcast fan-out for decoded events
//!
//! [`run_poll_loop`] drives a [`Device`] from any [`ReportSource`] until a
//! shutdown flag is raised. [`EventReader`] runs that loop on its own thread
//! and publishes events on a tokio broadcast channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use crate::decoder::{Device, EventSink};
use crate::error::{McuError, TransportError};
use crate::types::Event;
use crate::ReportSource;

/// Broadcast channel capacity for decoded events
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Configuration for the poll loop
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Read timeout in milliseconds (also how often shutdown is checked)
    pub read_timeout_ms: i32,
    /// Sleep duration on transport error before retrying
    pub error_sleep_ms: u64,
    /// Drain one pending report before polling
    pub drain_first: bool,
    /// Name prefix for thread and debug logging
    pub name: &'static str,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 1000,
            error_sleep_ms: 100,
            drain_first: true,
            name: "MCU",
        }
    }
}

/// Counters collected by one run of the poll loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Reports decoded successfully
    pub reports: u64,
    /// Reads that timed out without data
    pub timeouts: u64,
    /// Reports rejected by the decoder
    pub decode_errors: u64,
    /// Recoverable transport errors
    pub transport_errors: u64,
}

/// Poll `source` into `device` until `shutdown` is set.
///
/// Decode errors and transient transport errors are logged and counted, then
/// polling continues. A handle that is unallocated or disconnected ends the
/// loop with an error.
pub fn run_poll_loop<R, S>(
    source: &R,
    device: &mut Device<S>,
    shutdown: &AtomicBool,
    config: &PollConfig,
) -> Result<PollStats, TransportError>
where
    R: ReportSource + ?Sized,
    S: EventSink,
{
    let mut stats = PollStats::default();
    debug!("{} poll loop started", config.name);

    if config.drain_first {
        match device.drain(source) {
            Ok(drained) => debug!("{} drain consumed report: {}", config.name, drained),
            Err(McuError::Transport(e)) => return Err(e),
            Err(McuError::Decode(e)) => debug!("{} drained malformed report: {}", config.name, e),
        }
    }

    while !shutdown.load(Ordering::Relaxed) {
        match device.poll(source, config.read_timeout_ms) {
            Ok(true) => stats.reports += 1,
            Ok(false) => stats.timeouts += 1,
            Err(McuError::Decode(e)) => {
                warn!("{} decode error: {}", config.name, e);
                stats.decode_errors += 1;
            }
            Err(McuError::Transport(
                e @ (TransportError::Unallocated | TransportError::Disconnected),
            )) => {
                return Err(e);
            }
            Err(McuError::Transport(e)) => {
                warn!("{} read error: {}", config.name, e);
                stats.transport_errors += 1;
                std::thread::sleep(Duration::from_millis(config.error_sleep_ms));
            }
        }
    }

    debug!("{} poll loop exiting: {:?}", config.name, stats);
    Ok(stats)
}

/// Sink that republishes events on a broadcast channel
#[derive(Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<Event>,
}

impl BroadcastSink {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for BroadcastSink {
    fn notify(&mut self, event: &Event) {
        // No receivers is fine
        let _ = self.tx.send(event.clone());
    }
}

/// Poll loop running on a dedicated thread.
///
/// Dropping the reader raises the shutdown flag and joins the thread; the
/// thread notices within one read timeout.
pub struct EventReader {
    sink: BroadcastSink,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<PollStats, TransportError>>>,
}

impl EventReader {
    /// Spawn the reader thread for `source`.
    ///
    /// Returns the reader and a receiver subscribed before the first read,
    /// so no event decoded by the thread is missed.
    pub fn spawn<R>(
        source: R,
        config: PollConfig,
    ) -> std::io::Result<(Self, broadcast::Receiver<Event>)>
    where
        R: ReportSource + Send + 'static,
    {
        let sink = BroadcastSink::new();
        let rx = sink.subscribe();
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_sink = sink.clone();
        let thread_shutdown = Arc::clone(&shutdown);
        let handle = std::thread::Builder::new()
            .name(format!("{}-event-reader", config.name))
            .spawn(move || {
                let mut device = Device::new(thread_sink);
                run_poll_loop(&source, &mut device, &thread_shutdown, &config)
            })?;

        let reader = Self {
            sink,
            shutdown,
            handle: Some(handle),
        };
        Ok((reader, rx))
    }

    /// Additional receiver; only sees events decoded after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sink.subscribe()
    }

    /// Whether the reader thread has exited on its own
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop the thread and collect its result
    pub fn stop(mut self) -> Result<PollStats, TransportError> {
        self.join()
    }

    fn join(&mut self) -> Result<PollStats, TransportError> {
        self.shutdown.store(true, Ordering::SeqCst);
        let Some(handle) = self.handle.take() else {
            return Ok(PollStats::default());
        };
        handle.join().unwrap_or_else(|payload| {
            let msg = panic_message(payload.as_ref());
            error!("Event reader thread panicked: {}", msg);
            Err(TransportError::ReaderPanicked(msg))
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        if self.handle.is_some() {
            debug!("EventReader dropped, signaling shutdown");
            let _ = self.join();
        }
    }
}
