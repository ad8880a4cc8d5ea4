//! Background producer: sleep, read one sample, deliver it, repeat.
//!
//! A producer *unit* is one thread running [`run_loop`]. Units are not
//! restartable: once a unit has observed that sampling was switched off it
//! returns, and [`Sampler::start`] launches a fresh one next time. The
//! [`RunControl`] state machine guarantees at most one live unit.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crate::config::ProducerSettings;
use crate::control::RunControl;
use crate::error::StreamError;
use crate::sink::{Notifier, SampleSender, StopReason};
use crate::source::SampleSource;

/// Source handed from one unit to the next. Only one unit holds the lock at a time.
pub type SharedSource = Arc<Mutex<Box<dyn SampleSource>>>;

/// The producer loop body, run until `control` says stop.
///
/// The sleep is the only suspension point, so a stop request is observed at
/// most one interval late. Failed reads are logged and skipped; with
/// `max_consecutive_failures` set, that many failures in a row end the unit.
pub fn run_loop(
    control: &RunControl,
    source: &mut dyn SampleSource,
    tx: &SampleSender,
    settings: &ProducerSettings,
) -> StopReason {
    let mut failures: u32 = 0;
    while control.keep_running() {
        thread::sleep(settings.interval);
        match source.next_sample() {
            Ok(raw) => {
                failures = 0;
                if let Err(e) = tx.deliver(raw) {
                    log::error!("sensor producer: {e}, stopping");
                    control.retire();
                    return StopReason::Disconnected;
                }
            }
            Err(e) => {
                failures += 1;
                log::warn!("sensor producer: {e} ({failures} in a row)");
                if let Some(limit) = settings.max_consecutive_failures {
                    if failures >= limit {
                        log::error!("sensor producer: giving up after {failures} failed reads");
                        control.retire();
                        return StopReason::SourceFailures(failures);
                    }
                }
            }
        }
    }
    StopReason::Deactivated
}

/// Launch/stop surface for producer units.
pub struct Sampler {
    control: RunControl,
    source: SharedSource,
    tx: SampleSender,
    settings: ProducerSettings,
    handle: Option<JoinHandle<StopReason>>,
    launches: u64,
}

impl Sampler {
    pub fn new<S: SampleSource + 'static>(
        source: S,
        tx: SampleSender,
        settings: ProducerSettings,
    ) -> Self {
        Self {
            control: RunControl::new(),
            source: Arc::new(Mutex::new(Box::new(source))),
            tx,
            settings,
            handle: None,
            launches: 0,
        }
    }

    pub fn control(&self) -> &RunControl {
        &self.control
    }

    /// Number of units launched so far.
    pub fn launches(&self) -> u64 {
        self.launches
    }

    pub fn is_active(&self) -> bool {
        self.control.is_active()
    }

    pub fn sender(&self) -> SampleSender {
        self.tx.clone()
    }

    /// Install a wake-up callback. Takes effect for units launched afterwards.
    pub fn set_notifier(&mut self, notify: Option<Notifier>) {
        self.tx.set_notifier(notify);
    }

    /// Switch sampling on.
    ///
    /// Returns `Ok(true)` if a fresh unit was launched, `Ok(false)` if a live
    /// unit simply keeps (or resumes) sampling.
    pub fn start(&mut self) -> Result<bool, StreamError> {
        if !self.control.activate() {
            return Ok(false);
        }
        // The previous unit handed the switch back to idle, so it is done or
        // about to return. Its result is only diagnostic.
        self.handle = None;

        let unit = self.launches + 1;
        let control = self.control.clone();
        let source = self.source.clone();
        let tx = self.tx.clone();
        let settings = self.settings;
        let spawned = thread::Builder::new()
            .name(format!("sensor-producer-{unit}"))
            .spawn(move || {
                log::info!("sensor producer {unit} started");
                let _crash = CrashGuard {
                    unit,
                    control: control.clone(),
                    tx: tx.clone(),
                };
                let mut guard = source.lock().unwrap_or_else(PoisonError::into_inner);
                let reason = run_loop(&control, &mut **guard, &tx, &settings);
                drop(guard);
                log::info!("sensor producer {unit} {reason}");
                if tx.report_stop(reason).is_err() {
                    log::debug!("sensor producer {unit}: consumer gone, stop not reported");
                }
                reason
            });
        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                self.launches = unit;
                Ok(true)
            }
            Err(e) => {
                self.control.retire();
                log::error!("failed to spawn sensor producer: {e}");
                Err(StreamError::Spawn(e))
            }
        }
    }

    /// Switch sampling off. The live unit ends after its current sleep.
    pub fn stop(&mut self) {
        self.control.deactivate();
    }

    /// Stop sampling and wait for the last launched unit to return.
    ///
    /// Blocks for up to one interval; meant for shutdown and tests, not for
    /// the consumer's event loop.
    pub fn shutdown(&mut self) -> Option<StopReason> {
        self.stop();
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(reason) => Some(reason),
            Err(_) => {
                log::error!("sensor producer panicked");
                self.control.retire();
                None
            }
        }
    }
}

/// Releases the switch if a unit unwinds out of [`run_loop`].
///
/// A unit that returns normally has already handed the switch back, and a
/// newer unit may own it by the time this drops, so only a panic retires.
struct CrashGuard {
    unit: u64,
    control: RunControl,
    tx: SampleSender,
}

impl Drop for CrashGuard {
    fn drop(&mut self) {
        if !thread::panicking() {
            return;
        }
        log::error!("sensor producer {} panicked, releasing run switch", self.unit);
        self.control.retire();
        let _ = self.tx.report_stop(StopReason::Panicked);
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.control.deactivate();
    }
}
