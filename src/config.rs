//! Configuration for the sampling pipeline and its window.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of derived points kept in the rolling window.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;
/// Default classification threshold applied to the smoothed value.
pub const DEFAULT_THRESHOLD: f64 = 5.0;
/// Default pause between two sensor reads.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 200;
/// Default number of consecutive read failures before a producer unit stops itself.
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Producer settings
// ─────────────────────────────────────────────────────────────────────────────

/// The subset of [`StreamConfig`] a producer unit needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProducerSettings {
    /// Fixed sleep before each read.
    pub interval: Duration,
    /// Stop the unit after this many failed reads in a row. `None` = never.
    pub max_consecutive_failures: Option<u32>,
}

impl Default for ProducerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_SAMPLE_INTERVAL_MS),
            max_consecutive_failures: Some(DEFAULT_MAX_CONSECUTIVE_FAILURES),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StreamConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration.
///
/// Every field has a default, so a YAML file only needs to list what it
/// changes:
///
/// ```yaml
/// history_capacity: 50
/// sample_interval_ms: 100
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    // ── Pipeline ─────────────────────────────────────────────────────────────
    /// Capacity of the rolling history window.
    pub history_capacity: usize,
    /// Smoothed values strictly above this are classified `true`.
    pub threshold: f64,
    /// Pause between two reads, in milliseconds.
    pub sample_interval_ms: u64,
    /// Escalation threshold for consecutive read failures. `None` disables it.
    pub max_consecutive_failures: Option<u32>,

    // ── Random source ────────────────────────────────────────────────────────
    /// Inclusive lower bound of [`RandomSource`](crate::source::RandomSource) values.
    pub source_min: i64,
    /// Inclusive upper bound of [`RandomSource`](crate::source::RandomSource) values.
    pub source_max: i64,

    // ── Window / chrome ──────────────────────────────────────────────────────
    /// Native window title.
    pub title: String,
    /// Optional headline rendered above the plots.
    pub headline: Option<String>,

    // ── Initial control state ────────────────────────────────────────────────
    /// Launch the producer right away.
    pub start_sampling: bool,
    /// Forward accepted samples to the presentation layer right away.
    pub start_forwarding: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            threshold: DEFAULT_THRESHOLD,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            max_consecutive_failures: Some(DEFAULT_MAX_CONSECUTIVE_FAILURES),

            source_min: 0,
            source_max: 10,

            title: "Real Time Sensor Data Streaming".to_string(),
            headline: Some("Visualization of Real Time Data Streaming".to_string()),

            start_sampling: true,
            start_forwarding: true,
        }
    }
}

impl StreamConfig {
    /// Check every numeric field. Called by all constructors that take a config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if !self.threshold.is_finite() {
            return Err(ConfigError::NonFiniteThreshold(self.threshold));
        }
        if self.source_min > self.source_max {
            return Err(ConfigError::EmptySourceRange {
                min: self.source_min,
                max: self.source_max,
            });
        }
        if self.max_consecutive_failures == Some(0) {
            return Err(ConfigError::ZeroFailureThreshold);
        }
        Ok(())
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn producer_settings(&self) -> ProducerSettings {
        ProducerSettings {
            interval: self.sample_interval(),
            max_consecutive_failures: self.max_consecutive_failures,
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: StreamConfig =
            serde_yaml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&s)
    }
}
