//! Bounded motion history

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of samples kept in the vehicle's trail.
pub const TRAIL_CAPACITY: usize = 150;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single trail sample.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TrailSample {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
}

/// The most recent positions of the vehicle, oldest first.
///
/// Only used for display, nothing in the control loop reads it.
#[derive(Debug, Clone)]
pub struct MotionTrail {
    samples: VecDeque<TrailSample>,
    capacity: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionTrail {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest ones beyond the capacity.
    pub fn push(&mut self, sample: TrailSample) {
        self.samples.push_back(sample);

        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&TrailSample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailSample> {
        self.samples.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_zero_capacity_trail() {
        let mut t = MotionTrail::new(0);
        t.push(TrailSample {
            x: 1.0,
            y: 1.0,
            speed: 1.0,
        });
        assert!(t.is_empty());
        assert!(t.latest().is_none());
    }
}
