//! Pursuit control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the steering and speed laws.
///
/// The steering limit is not set here, it is the vehicle's own limit.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Gain converting the normalised lane offset into a steering angle at unit look-ahead.
    pub gain_constant: f64,

    /// Smallest look-ahead the steering law divides by.
    pub min_look_ahead: f64,

    /// Fraction of the base speed shed at full steering lock.
    pub speed_reduction: f64,

    /// Floor of the speed factor, as a fraction of the base speed.
    pub min_speed_factor: f64,

    /// Look-ahead distance used until the operator changes it.
    pub look_ahead_default: f64,

    /// Target speed used until the operator changes it.
    pub target_speed_default: f64,

    /// Lowest look-ahead the operator may select.
    pub look_ahead_min: f64,

    /// Highest look-ahead the operator may select.
    pub look_ahead_max: f64,

    /// Lowest target speed the operator may select.
    pub target_speed_min: f64,

    /// Highest target speed the operator may select.
    pub target_speed_max: f64,

    /// Multiple of the look-ahead distance at which the look-ahead point is drawn.
    pub viz_look_ahead_scale: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            gain_constant: 3000.0,
            min_look_ahead: 1.0,
            speed_reduction: 0.4,
            min_speed_factor: 0.5,
            look_ahead_default: 60.0,
            target_speed_default: 5.0,
            look_ahead_min: 20.0,
            look_ahead_max: 150.0,
            target_speed_min: 1.0,
            target_speed_max: 50.0,
            viz_look_ahead_scale: 4.0,
        }
    }
}
