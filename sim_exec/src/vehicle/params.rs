//! Parameters structure for the vehicle dynamics

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the vehicle dynamics.
///
/// All distances are in scene pixels, speeds in scene pixels per tick.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Params {
    // ---- GEOMETRY ----
    /// Overall length of the vehicle body.
    pub length: f64,

    /// Overall width of the vehicle body.
    pub width: f64,

    /// Distance between the front and rear axles.
    pub wheelbase: f64,

    // ---- CAPABILITIES ----
    /// Maximum absolute front wheel steering angle.
    ///
    /// Units: degrees
    pub max_steering_angle_deg: f64,

    /// Steering angles with a magnitude at or below this are treated as straight.
    ///
    /// Units: degrees
    pub steering_deadband_deg: f64,

    /// Minimum speed.
    pub min_speed: f64,

    /// Maximum speed.
    pub max_speed: f64,

    /// Speed of a freshly spawned vehicle.
    pub initial_speed: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            length: 40.0,
            width: 20.0,
            wheelbase: 30.0,
            max_steering_angle_deg: 35.0,
            steering_deadband_deg: 0.1,
            min_speed: 1.0,
            max_speed: 50.0,
            initial_speed: 2.5,
        }
    }
}
