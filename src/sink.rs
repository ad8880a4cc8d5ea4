//! Delivery of raw samples from the producer thread into the consumer context.
//!
//! The producer only carries raw values. Ordering comes from the channel
//! itself (FIFO per sender), never from sequence numbers embedded in the
//! messages. Sending never blocks: the channel is unbounded and the consumer
//! drains it on its own turn (see [`Pipeline::pump`](crate::pipeline::Pipeline::pump)).

use std::fmt;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use crate::error::DeliveryError;

/// Callback run after every successful delivery, e.g. to wake a UI event loop.
pub type Notifier = Arc<dyn Fn() + Send + Sync + 'static>;

/// Why a producer unit ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Sampling was switched off and the unit observed it.
    Deactivated,
    /// The source failed this many times in a row.
    SourceFailures(u32),
    /// The consumer context went away.
    Disconnected,
    /// The source panicked mid-read.
    Panicked,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Deactivated => write!(f, "stopped"),
            StopReason::SourceFailures(n) => write!(f, "stopped after {n} failed reads"),
            StopReason::Disconnected => write!(f, "consumer disconnected"),
            StopReason::Panicked => write!(f, "crashed"),
        }
    }
}

/// Messages sent over the channel to the consumer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProducerEvent {
    /// One raw reading, in submission order.
    Sample(f64),
    /// Diagnostic: a producer unit ended. May arrive after samples of a newer unit.
    Stopped(StopReason),
}

/// Producer-side end of the delivery channel.
#[derive(Clone)]
pub struct SampleSender {
    tx: Sender<ProducerEvent>,
    notify: Option<Notifier>,
}

impl SampleSender {
    /// Deliver a raw sample without waiting for the consumer.
    pub fn deliver(&self, raw: f64) -> Result<(), DeliveryError> {
        self.send(ProducerEvent::Sample(raw))
    }

    /// Report that a producer unit ended.
    pub fn report_stop(&self, reason: StopReason) -> Result<(), DeliveryError> {
        self.send(ProducerEvent::Stopped(reason))
    }

    pub fn set_notifier(&mut self, notify: Option<Notifier>) {
        self.notify = notify;
    }

    fn send(&self, ev: ProducerEvent) -> Result<(), DeliveryError> {
        self.tx.send(ev).map_err(|_| DeliveryError::Disconnected)?;
        if let Some(notify) = &self.notify {
            notify();
        }
        Ok(())
    }
}

/// Consumer-side end of the delivery channel. Not `Sync`; lives in the consumer context.
pub struct SampleReceiver {
    rx: Receiver<ProducerEvent>,
}

impl SampleReceiver {
    /// Next queued event, if any, without waiting.
    pub fn try_next(&self) -> Option<ProducerEvent> {
        match self.rx.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next event.
    pub fn next_timeout(&self, timeout: Duration) -> Option<ProducerEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Create a new delivery channel pair: `(SampleSender, SampleReceiver)`.
pub fn channel_samples() -> (SampleSender, SampleReceiver) {
    let (tx, rx) = std::sync::mpsc::channel();
    (SampleSender { tx, notify: None }, SampleReceiver { rx })
}
