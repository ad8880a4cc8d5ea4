//! Smoothing and classification of consecutive raw samples.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_THRESHOLD;
use crate::error::ConfigError;

/// One accepted sample after derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedPoint {
    /// Position in the accepted stream. Starts at 0, no gaps.
    pub index: u64,
    pub raw: f64,
    /// Mean of this and the previous raw value.
    pub smoothed: f64,
    /// `smoothed > threshold`.
    pub classified: bool,
}

/// Two-point moving average followed by a threshold test.
///
/// Stateless: the caller threads the previous raw value through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derivation {
    threshold: f64,
}

impl Default for Derivation {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Derivation {
    pub fn new(threshold: f64) -> Result<Self, ConfigError> {
        if !threshold.is_finite() {
            return Err(ConfigError::NonFiniteThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns `(smoothed, classified)`.
    #[inline]
    pub fn apply(&self, previous_raw: f64, current_raw: f64) -> (f64, bool) {
        let smoothed = (current_raw + previous_raw) / 2.0;
        (smoothed, smoothed > self.threshold)
    }

    pub fn point(&self, index: u64, previous_raw: f64, current_raw: f64) -> DerivedPoint {
        let (smoothed, classified) = self.apply(previous_raw, current_raw);
        DerivedPoint {
            index,
            raw: current_raw,
            smoothed,
            classified,
        }
    }
}
