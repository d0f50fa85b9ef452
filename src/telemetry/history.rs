use super::TelemetrySample;
use crate::constants::DEFAULT_HISTORY_CAPACITY;
use std::collections::vec_deque::{self, VecDeque};

/// Sliding window over the most recent samples.
///
/// Never holds more than `capacity` samples: pushing onto a full history drops
/// the oldest one, so the window keeps insertion order with no gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryHistory {
    samples: VecDeque<TelemetrySample>,
    capacity: usize,
}

impl Default for TelemetryHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl TelemetryHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, returning whichever sample got evicted to make room
    pub fn push(&mut self, sample: TelemetrySample) -> Option<TelemetrySample> {
        if self.capacity == 0 {
            return Some(sample);
        }

        let evicted = if self.samples.len() >= self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&TelemetrySample> {
        self.samples.back()
    }

    /// Oldest first
    pub fn iter(&self) -> vec_deque::Iter<'_, TelemetrySample> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a TelemetryHistory {
    type Item = &'a TelemetrySample;
    type IntoIter = vec_deque::Iter<'a, TelemetrySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
