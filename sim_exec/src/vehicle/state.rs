//! Vehicle state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::MotionTrail;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematic state of the vehicle.
///
/// Positions are in the scene image's pixel frame (x right, y down), so a positive heading turns
/// clockwise on screen.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct VehicleState {
    /// Position of the vehicle reference point.
    pub x: f64,
    pub y: f64,

    /// Heading, angle from the scene +x axis.
    ///
    /// Units: degrees, always in (-180, 180]
    pub heading_deg: f64,

    /// Speed along the heading.
    ///
    /// Units: scene pixels/tick
    pub speed: f64,

    /// Front wheel steering angle.
    ///
    /// Units: degrees
    pub steering_angle_deg: f64,

    pub length: f64,
    pub width: f64,
    pub wheelbase: f64,
}

/// A vehicle, its state together with its motion history.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub state: VehicleState,
    pub trail: MotionTrail,
}

/// Pose the vehicle is spawned in, and returned to on reset.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Default)]
pub struct StartPose {
    pub x: f64,
    pub y: f64,

    /// Units: degrees
    pub heading_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleState {
    /// Position of the front axle, half the body length ahead of the reference point.
    pub fn front_axle_position(&self) -> (f64, f64) {
        let heading_rad = self.heading_deg.to_radians();

        (
            self.x + (self.length / 2.0) * heading_rad.cos(),
            self.y + (self.length / 2.0) * heading_rad.sin(),
        )
    }
}
