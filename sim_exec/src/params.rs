//! # Simulation Executable Parameters
//!
//! This module provides parameters for the simulation executable itself, as opposed to those of
//! the individual pipeline stages.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{lap::LapParams, vehicle::StartPose};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimExecParams {
    /// Path to the top-down scene image, relative to the software root
    pub scene_path: String,

    /// Pose the vehicle starts in and returns to on reset
    pub start_pose: StartPose,

    /// Number of ticks to run for, 0 runs until stopped
    pub max_ticks: u64,

    /// Target period of one tick in seconds, 0 runs as fast as possible
    pub cycle_period_s: f64,

    /// Save the lane detection overlay every this many ticks, 0 never saves
    pub overlay_save_interval: u64,

    /// Lap counter settings
    pub lap: LapParams,
}

impl Default for SimExecParams {
    fn default() -> Self {
        Self {
            scene_path: "scenes/track.png".into(),
            start_pose: StartPose::default(),
            max_ticks: 0,
            cycle_period_s: 1.0 / 60.0,
            overlay_save_interval: 0,
            lap: LapParams::default(),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
