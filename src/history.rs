//! Fixed-capacity rolling window of derived points.

use std::collections::VecDeque;

use crate::derive::DerivedPoint;
use crate::error::ConfigError;

/// The most recent `capacity` points, oldest first.
///
/// A view onto the stream, not a log: evicted points are gone, but indices
/// keep counting. Owned by the consumer context; no interior locking.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    points: VecDeque<DerivedPoint>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append, evicting the oldest point when full. O(1).
    pub fn append(&mut self, point: DerivedPoint) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Current contents in insertion order.
    pub fn snapshot(&self) -> Vec<DerivedPoint> {
        self.points.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DerivedPoint> + '_ {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&DerivedPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
