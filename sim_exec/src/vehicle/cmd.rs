//! Commands passed into the vehicle dynamics

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A drive command for a single tick.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct DriveCmd {
    /// Demanded front wheel steering angle, positive turns towards increasing heading.
    ///
    /// Units: degrees
    pub steering_angle_deg: f64,

    /// Speed demand
    pub speed: SpeedCmd,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Whether the command changes the vehicle's speed.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub enum SpeedCmd {
    /// Keep driving at the current speed.
    Hold,

    /// Drive at the given speed.
    ///
    /// Units: scene pixels/tick
    Set(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCmd {
    pub fn new(steering_angle_deg: f64, speed: SpeedCmd) -> Self {
        Self {
            steering_angle_deg,
            speed,
        }
    }
}
