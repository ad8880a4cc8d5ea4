//! Error types shared by the sampling pipeline.
//!
//! The taxonomy follows where a failure is handled:
//! - [`SourceError`]: a single read failed; the producer skips the iteration.
//! - [`DeliveryError`]: the foreground side is gone; the producer unit ends.
//! - [`ConfigError`]: rejected at construction, never retried.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to acquire one sample from a [`SampleSource`](crate::source::SampleSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The underlying device or service reported a read failure.
    #[error("sensor read failed: {0}")]
    Read(String),
    /// A finite source has no more values to hand out.
    #[error("sample source exhausted")]
    Exhausted,
}

/// Failure handing a sample across to the consumer context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("consumer context disconnected")]
    Disconnected,
}

/// Invalid configuration detected while building a component.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("history capacity must be at least 1")]
    ZeroCapacity,
    #[error("sample interval must be greater than zero")]
    ZeroInterval,
    #[error("classification threshold must be finite, got {0}")]
    NonFiniteThreshold(f64),
    #[error("source range is empty: min {min} > max {max}")]
    EmptySourceRange { min: i64, max: i64 },
    #[error("consecutive failure threshold must be at least 1 (use none to disable)")]
    ZeroFailureThreshold,
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Top-level error returned by the control surface.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn producer thread: {0}")]
    Spawn(#[source] std::io::Error),
}
