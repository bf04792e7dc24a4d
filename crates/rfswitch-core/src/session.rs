//! Device session: one open `/dev/rfkill` handle, one worker thread.
//!
//! The worker owns the device and is the only writer of the switch table. Everybody else
//! (queries, listeners, block/unblock) talks to it through a zero-capacity request channel,
//! so at most one drain or write is in flight at any time and every requester sees the
//! table at least as fresh as the drain it asked for.
//!
//! Event callbacks run on their own short-lived threads. Two callbacks, even for
//! consecutive events, may run in any order relative to each other; each one only starts
//! after its event has been applied to the table.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rfswitch_logging::targets::T_RFKILL;
use tracing::{debug, info, trace, warn};

use crate::cancel::{cancel_sleep, check_cancel, CancelFlag};
use crate::config::RfkillConfig;
use crate::device::{open_device, Device};
use crate::error::{Result, RfkillError};
use crate::event::{Event, EVENT_SIZE};
use crate::filter::Filter;
use crate::switch::Switch;
use crate::table::{SwitchState, SwitchTable};
use crate::types::{RfkillOp, RfkillType};

/// Shared event handler. Invoked on a fresh thread per event.
pub type EventCallback = Arc<dyn Fn(Event) + Send + Sync + 'static>;

/// Outcome of one drain cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Records applied to the table.
    pub applied: usize,
    /// Records discarded because they did not apply (unknown index or op).
    pub rejected: usize,
}

enum Request {
    Drain(SyncSender<Result<DrainReport>>),
    Send(Event, SyncSender<Result<()>>),
}

pub(crate) struct Shared {
    config: RfkillConfig,
    requests: SyncSender<Request>,
    table: RwLock<SwitchTable>,
    global_callback: Mutex<Option<EventCallback>>,
    switch_callbacks: Mutex<HashMap<u32, EventCallback>>,
    stop: CancelFlag,
    listeners: Mutex<Vec<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    pub(crate) fn config(&self) -> &RfkillConfig {
        &self.config
    }

    /// Ask the worker for a drain cycle and wait for it to finish.
    pub(crate) fn request_drain(&self) -> Result<DrainReport> {
        check_cancel(&self.stop)?;
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        self.requests
            .send(Request::Drain(reply_tx))
            .map_err(|_| RfkillError::SessionClosed)?;
        reply_rx.recv().map_err(|_| RfkillError::SessionClosed)?
    }

    /// Have the worker write one record to the device.
    pub(crate) fn send(&self, event: Event) -> Result<()> {
        check_cancel(&self.stop)?;
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        self.requests
            .send(Request::Send(event, reply_tx))
            .map_err(|_| RfkillError::SessionClosed)?;
        reply_rx.recv().map_err(|_| RfkillError::SessionClosed)?
    }

    pub(crate) fn set_switch_callback(&self, idx: u32, callback: EventCallback) {
        lock(&self.switch_callbacks).insert(idx, callback);
    }

    fn set_global_callback(&self, callback: EventCallback) {
        *lock(&self.global_callback) = Some(callback);
    }

    fn snapshot(&self) -> Vec<SwitchState> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.iter().copied().collect()
    }

    /// Start a thread that requests a drain, then sleeps `interval`, until the session stops.
    pub(crate) fn spawn_listener(self: &Arc<Self>, label: String, interval: Duration) {
        let shared = Arc::clone(self);
        let thread_label = label.clone();
        let spawned = thread::Builder::new().name(label).spawn(move || {
            debug!(target: T_RFKILL, listener = %thread_label, "rfkill_listener_start");
            loop {
                match shared.request_drain() {
                    Ok(report) => {
                        if report.applied > 0 || report.rejected > 0 {
                            trace!(
                                target: T_RFKILL,
                                listener = %thread_label,
                                applied = report.applied,
                                rejected = report.rejected,
                                "rfkill_listener_drain"
                            );
                        }
                    }
                    Err(RfkillError::SessionClosed) => break,
                    Err(err) => {
                        warn!(target: T_RFKILL, listener = %thread_label, "rfkill drain failed: {err}");
                    }
                }
                if cancel_sleep(&shared.stop, interval, shared.config.stop_tick).is_err() {
                    break;
                }
            }
            debug!(target: T_RFKILL, listener = %thread_label, "rfkill_listener_stop");
        });

        match spawned {
            Ok(handle) => lock(&self.listeners).push(handle),
            Err(err) => warn!(target: T_RFKILL, "Failed to spawn rfkill listener: {err}"),
        }
    }

    /// Hand `event` to the registered callbacks. Never blocks on the callbacks themselves.
    fn dispatch(&self, event: Event) {
        let per_switch = {
            let mut callbacks = lock(&self.switch_callbacks);
            if event.op == RfkillOp::Del {
                callbacks.remove(&event.idx)
            } else {
                callbacks.get(&event.idx).cloned()
            }
        };
        let global = lock(&self.global_callback).clone();

        for callback in [per_switch, global].into_iter().flatten() {
            if let Err(err) = thread::Builder::new()
                .name("rfkill-callback".to_string())
                .spawn(move || callback(event))
            {
                warn!(target: T_RFKILL, idx = event.idx, "Failed to dispatch rfkill event: {err}");
            }
        }
    }

    fn drain(&self, device: &mut dyn Device) -> Result<DrainReport> {
        let mut report = DrainReport::default();
        let mut buf = [0u8; EVENT_SIZE];

        loop {
            let n = match device.read_record(&mut buf) {
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(report),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(RfkillError::ReadEvent(err)),
            };
            if n != EVENT_SIZE {
                return Err(RfkillError::ShortRead(n));
            }

            let event = Event::from_bytes(&buf);
            let applied = self
                .table
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .apply(&event);

            match applied {
                Ok(()) => {
                    report.applied += 1;
                    trace!(target: T_RFKILL, %event, "rfkill_event");
                    self.dispatch(event);
                }
                Err(err) => {
                    report.rejected += 1;
                    warn!(target: T_RFKILL, %event, "Discarding rfkill event: {err}");
                }
            }
        }
    }

    fn write(&self, device: &mut dyn Device, event: &Event) -> Result<()> {
        match device.write_record(&event.to_bytes()) {
            Ok(EVENT_SIZE) => {
                info!(
                    target: T_RFKILL,
                    idx = event.idx,
                    rf_type = event.type_.name(),
                    op = event.op.name(),
                    state = if event.soft { "blocked" } else { "unblocked" },
                    "rfkill_write"
                );
                Ok(())
            }
            Ok(n) => Err(RfkillError::ShortWrite(n)),
            Err(err) => Err(RfkillError::WriteEvent(err)),
        }
    }

    fn run_worker(&self, mut device: Box<dyn Device>, requests: Receiver<Request>) {
        debug!(target: T_RFKILL, "rfkill_worker_start");
        while !self.stop.load(Ordering::Relaxed) {
            match requests.recv_timeout(self.config.stop_tick) {
                Ok(Request::Drain(reply)) => {
                    let result = self.drain(device.as_mut());
                    if let Err(err) = &result {
                        warn!(target: T_RFKILL, "rfkill drain aborted: {err}");
                    }
                    let _ = reply.send(result);
                }
                Ok(Request::Send(event, reply)) => {
                    let _ = reply.send(self.write(device.as_mut(), &event));
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!(target: T_RFKILL, "rfkill_worker_stop");
    }
}

/// Control session over the rfkill device.
///
/// Dropping the session has the same effect as [`Session::close`].
///
/// # Examples
///
/// ```no_run
/// # use rfswitch_core::*;
/// # fn example() -> Result<()> {
/// let session = Session::open()?;
/// for switch in session.switches(&Filter::with_type(RfkillType::Wlan))? {
///     switch.unblock()?;
/// }
/// session.close();
/// # Ok(())
/// # }
/// ```
pub struct Session {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Session {
    /// Open `/dev/rfkill` with default settings.
    pub fn open() -> Result<Self> {
        Self::open_with_config(RfkillConfig::default())
    }

    pub fn open_with_config(config: RfkillConfig) -> Result<Self> {
        let file = open_device(&config.device_path)?;
        info!(target: T_RFKILL, path = %config.device_path.display(), "rfkill_open");
        Self::open_with(Box::new(file), config)
    }

    /// Start a session over an already opened device.
    pub fn open_with(device: Box<dyn Device>, config: RfkillConfig) -> Result<Self> {
        let (requests_tx, requests_rx) = mpsc::sync_channel(0);
        let shared = Arc::new(Shared {
            config,
            requests: requests_tx,
            table: RwLock::new(SwitchTable::new()),
            global_callback: Mutex::new(None),
            switch_callbacks: Mutex::new(HashMap::new()),
            stop: Arc::new(AtomicBool::new(false)),
            listeners: Mutex::new(Vec::new()),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("rfkill-worker".to_string())
            .spawn(move || worker_shared.run_worker(device, requests_rx))
            .map_err(RfkillError::WorkerSpawn)?;

        Ok(Session {
            shared,
            worker: Some(worker),
        })
    }

    pub fn config(&self) -> &RfkillConfig {
        &self.shared.config
    }

    /// Drain pending kernel events, then return every known switch accepted by `filter`.
    ///
    /// Order is unspecified. A read failure during the drain is returned; events read
    /// before it stay applied.
    pub fn switches(&self, filter: &Filter) -> Result<Vec<Switch>> {
        self.shared.request_drain()?;
        Ok(self
            .shared
            .snapshot()
            .into_iter()
            .map(|state| Switch::new(state, Arc::clone(&self.shared)))
            .filter(|switch| filter.matches(switch))
            .collect())
    }

    /// Drain pending kernel events now and report how many records were applied or
    /// discarded.
    ///
    /// [`Session::switches`] runs the same cycle before reading the table.
    pub fn drain(&self) -> Result<DrainReport> {
        self.shared.request_drain()
    }

    /// Register `callback` for every event and keep draining every `interval`.
    ///
    /// Replaces any callback registered earlier on this session. Returns immediately.
    pub fn listen<F>(&self, callback: F, interval: Duration)
    where
        F: Fn(Event) + Send + Sync + 'static,
    {
        self.shared.set_global_callback(Arc::new(callback));
        self.shared
            .spawn_listener("rfkill-listener".to_string(), interval);
    }

    /// Soft-block every switch of `type_` with a single change-all record.
    pub fn block_type(&self, type_: RfkillType) -> Result<()> {
        self.shared.send(Event::change_all(type_, true))
    }

    /// Soft-unblock every switch of `type_` with a single change-all record.
    pub fn unblock_type(&self, type_: RfkillType) -> Result<()> {
        self.shared.send(Event::change_all(type_, false))
    }

    /// Stop the worker and every listener and release the device.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.shared.stop.store(true, Ordering::Relaxed);
        if worker.join().is_err() {
            warn!(target: T_RFKILL, "rfkill worker panicked");
        }
        let listeners: Vec<JoinHandle<()>> = lock(&self.shared.listeners).drain(..).collect();
        for listener in listeners {
            let _ = listener.join();
        }
        info!(target: T_RFKILL, "rfkill_close");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
