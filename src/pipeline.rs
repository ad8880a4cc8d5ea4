//! Consumer side of the stream: derivation, history, publishing and the
//! two control entry points.
//!
//! A [`Pipeline`] lives in one thread (typically the UI thread). It owns the
//! receiving end of the delivery channel and drains it when the host calls
//! [`Pipeline::pump`]. Everything except the [`RunControl`] switch is
//! touched from this thread only.

use std::time::Duration;

use crate::config::StreamConfig;
use crate::control::RunControl;
use crate::derive::{Derivation, DerivedPoint};
use crate::error::{ConfigError, StreamError};
use crate::history::HistoryBuffer;
use crate::present::Presenter;
use crate::producer::Sampler;
use crate::sink::{channel_samples, Notifier, ProducerEvent, SampleReceiver, SampleSender, StopReason};
use crate::source::SampleSource;

/// Counters for display and diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Samples turned into points.
    pub accepted: u64,
    /// Samples discarded while forwarding was off.
    pub dropped: u64,
}

pub struct Pipeline {
    rx: SampleReceiver,
    sampler: Sampler,
    derivation: Derivation,
    history: HistoryBuffer,
    presenter: Box<dyn Presenter>,
    previous_raw: f64,
    next_index: u64,
    forward_enabled: bool,
    stats: PipelineStats,
    last_stop: Option<StopReason>,
}

impl Pipeline {
    /// Build a pipeline with sampling stopped and forwarding enabled.
    ///
    /// Call [`set_sampling(true)`](Self::set_sampling) to launch the producer.
    pub fn new<S, P>(cfg: &StreamConfig, source: S, presenter: P) -> Result<Self, ConfigError>
    where
        S: SampleSource + 'static,
        P: Presenter + 'static,
    {
        cfg.validate()?;
        let (tx, rx) = channel_samples();
        Ok(Self {
            rx,
            sampler: Sampler::new(source, tx, cfg.producer_settings()),
            derivation: Derivation::new(cfg.threshold)?,
            history: HistoryBuffer::new(cfg.history_capacity)?,
            presenter: Box::new(presenter),
            previous_raw: 0.0,
            next_index: 0,
            forward_enabled: true,
            stats: PipelineStats::default(),
            last_stop: None,
        })
    }

    /// Build a pipeline and apply the initial control state from `cfg`.
    pub fn start<S, P>(cfg: &StreamConfig, source: S, presenter: P) -> Result<Self, StreamError>
    where
        S: SampleSource + 'static,
        P: Presenter + 'static,
    {
        let mut pipeline = Self::new(cfg, source, presenter)?;
        pipeline.set_forwarding(cfg.start_forwarding);
        pipeline.set_sampling(cfg.start_sampling)?;
        Ok(pipeline)
    }

    /// Install a callback run by the producer after each delivery.
    ///
    /// Takes effect for producer units launched afterwards, so install it
    /// before the first `set_sampling(true)`.
    pub fn with_notifier(mut self, notify: Notifier) -> Self {
        self.sampler.set_notifier(Some(notify));
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Control surface
    // ─────────────────────────────────────────────────────────────────────────

    /// Start or stop sampling.
    ///
    /// `true` launches a fresh producer unit unless one is still alive, in
    /// which case that unit simply carries on. `false` lets the live unit end
    /// after its current sleep; samples already in flight may still arrive.
    pub fn set_sampling(&mut self, enabled: bool) -> Result<(), StreamError> {
        if enabled {
            self.sampler.start()?;
        } else {
            self.sampler.stop();
        }
        Ok(())
    }

    /// Pause or resume forwarding. While paused, received samples are dropped.
    pub fn set_forwarding(&mut self, enabled: bool) {
        if self.forward_enabled != enabled {
            log::info!(
                "forwarding {}",
                if enabled { "resumed" } else { "paused" }
            );
        }
        self.forward_enabled = enabled;
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.is_active()
    }

    pub fn is_forwarding(&self) -> bool {
        self.forward_enabled
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Consumer loop
    // ─────────────────────────────────────────────────────────────────────────

    /// Process everything queued so far without waiting.
    ///
    /// Returns the number of samples accepted (turned into points).
    pub fn pump(&mut self) -> usize {
        let mut accepted = 0;
        while let Some(ev) = self.rx.try_next() {
            accepted += self.handle_event(ev);
        }
        accepted
    }

    /// Wait up to `timeout` for the first event, then drain the rest.
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.rx.next_timeout(timeout) {
            Some(ev) => self.handle_event(ev) + self.pump(),
            None => 0,
        }
    }

    fn handle_event(&mut self, ev: ProducerEvent) -> usize {
        match ev {
            ProducerEvent::Sample(raw) => usize::from(self.accept(raw).is_some()),
            ProducerEvent::Stopped(reason) => {
                self.last_stop = Some(reason);
                0
            }
        }
    }

    /// Run one delivered raw value through the pipeline.
    ///
    /// Returns the new point, or `None` if forwarding is off and the sample
    /// was dropped. Dropped samples do not consume an index.
    pub fn accept(&mut self, raw: f64) -> Option<DerivedPoint> {
        if !self.forward_enabled {
            self.stats.dropped += 1;
            log::debug!("forwarding paused, dropped sample {raw}");
            return None;
        }
        let point = self.derivation.point(self.next_index, self.previous_raw, raw);
        self.next_index += 1;
        self.previous_raw = raw;
        self.history.append(point);
        self.stats.accepted += 1;
        let snapshot = self.history.snapshot();
        self.presenter.publish(&snapshot);
        Some(point)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Reason the most recent producer unit reported when it ended.
    pub fn last_stop(&self) -> Option<StopReason> {
        self.last_stop
    }

    /// Number of producer units launched so far.
    pub fn launches(&self) -> u64 {
        self.sampler.launches()
    }

    pub fn run_control(&self) -> &RunControl {
        self.sampler.control()
    }

    pub fn threshold(&self) -> f64 {
        self.derivation.threshold()
    }

    /// Stop sampling and wait for the producer to exit, then drain what it sent.
    ///
    /// Blocks for up to one sample interval.
    pub fn shutdown(&mut self) -> Option<StopReason> {
        let reason = self.sampler.shutdown();
        self.pump();
        reason
    }

    /// A sender feeding this pipeline's channel, for hosts that deliver
    /// samples from their own threads.
    pub fn sample_sender(&self) -> SampleSender {
        self.sampler.sender()
    }
}
