//! Lap counting
//!
//! A lap is counted when the vehicle returns close to where it started, having first been far
//! enough away. The arming distance stops the vehicle counting laps while it dawdles near the
//! start line.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;
use serde::{Deserialize, Serialize};
use util::maths::norm;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LapParams {
    /// Distance from the start the vehicle must exceed before a lap can be counted.
    pub arm_distance: f64,

    /// Distance from the start within which an armed counter counts a lap.
    pub count_distance: f64,
}

#[derive(Debug, Clone)]
pub struct LapCounter {
    params: LapParams,
    start: [f64; 2],
    armed: bool,
    laps: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for LapParams {
    fn default() -> Self {
        Self {
            arm_distance: 400.0,
            count_distance: 60.0,
        }
    }
}

impl LapCounter {
    pub fn new(params: LapParams, start_x: f64, start_y: f64) -> Self {
        Self {
            params,
            start: [start_x, start_y],
            armed: false,
            laps: 0,
        }
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Update with the vehicle's current position, returning `true` if a lap was completed.
    pub fn update(&mut self, x: f64, y: f64) -> bool {
        let dist = match norm(&self.start, &[x, y]) {
            Some(d) if d.is_finite() => d,
            _ => return false,
        };

        if !self.armed {
            if dist > self.params.arm_distance {
                self.armed = true;
            }
            return false;
        }

        if dist < self.params.count_distance {
            self.armed = false;
            self.laps += 1;
            info!("Lap {} complete", self.laps);
            return true;
        }

        false
    }

    /// Clear the count and disarm.
    pub fn reset(&mut self) {
        self.armed = false;
        self.laps = 0;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
