//! sensorstream crate root: re-exports and module wiring.
//!
//! A background producer samples a [`SampleSource`] on a fixed interval and
//! delivers raw values over a channel into a single-threaded [`Pipeline`],
//! which smooths and classifies them, keeps a rolling [`HistoryBuffer`] and
//! publishes every new window to a [`Presenter`].
//!
//! Modules:
//! - `config`: pipeline and window configuration
//! - `control`: the shared run switch and launch guard
//! - `source`: sample sources
//! - `sink`: cross-thread delivery channel
//! - `producer`: the background loop and its launcher
//! - `derive`, `history`: smoothing/classification and the rolling window
//! - `present`: presentation layer seam
//! - `pipeline`: the consumer loop and control entry points
//! - `ui` (feature `gui`): native window built on egui/eframe

pub mod config;
pub mod control;
pub mod derive;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod present;
pub mod producer;
pub mod sink;
pub mod source;

#[cfg(feature = "gui")]
pub mod ui;

// Public re-exports for a compact external API
pub use config::{ProducerSettings, StreamConfig};
pub use control::{RunControl, RunState};
pub use derive::{Derivation, DerivedPoint};
pub use error::{ConfigError, DeliveryError, SourceError, StreamError};
pub use history::HistoryBuffer;
pub use pipeline::{Pipeline, PipelineStats};
pub use present::{JsonLinesPresenter, Presenter, SharedSnapshot};
pub use producer::Sampler;
pub use sink::{channel_samples, ProducerEvent, SampleReceiver, SampleSender, StopReason};
pub use source::{FnSource, RandomSource, ReplaySource, SampleSource};

#[cfg(feature = "gui")]
pub use ui::{run_sensorstream, SensorStreamApp};
