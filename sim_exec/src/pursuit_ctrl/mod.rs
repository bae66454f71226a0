//! # Pursuit control module
//!
//! Pursuit control closes the loop between perception and the vehicle. The lane detector gives
//! the lateral position of the lane centre in the forward image, 0.5 meaning dead ahead. The
//! lateral error is the offset of that estimate from 0.5, and the steering law converts it into
//! a steering demand whose gain is inversely proportional to the look-ahead distance. This is
//! the pure pursuit idea: aiming at a point further along the road gives smaller, earlier
//! corrections.
//!
//! The speed law then sheds speed in proportion to how hard the vehicle is steering.
//!
//! The look-ahead distance and the base target speed form the `ControllerConfig`, which the
//! operator may change between ticks.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod controllers;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use controllers::*;
pub use params::Params;

use log::{debug, warn};
use nalgebra::Point2;
use serde::Serialize;
use util::maths::clamp;

use crate::vehicle::VehicleState;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Runtime tunable controller settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerConfig {
    /// Distance ahead of the vehicle the controller aims at.
    pub look_ahead_distance: f64,

    /// Speed demanded when driving straight.
    pub target_speed: f64,
}

/// Demands output by one pursuit step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PursuitDems {
    pub steering_angle_deg: f64,
    pub speed: f64,
}

pub struct PursuitCtrl {
    params: Params,

    config: ControllerConfig,

    steering_law: SteeringLaw,
    speed_law: SpeedLaw,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PursuitCtrl {
    /// Create the controller for a vehicle whose steering is limited to
    /// `max_steering_angle_deg`.
    pub fn new(params: Params, max_steering_angle_deg: f64) -> Self {
        let config = ControllerConfig {
            look_ahead_distance: params.look_ahead_default,
            target_speed: params.target_speed_default,
        };

        Self {
            steering_law: SteeringLaw::new(&params, max_steering_angle_deg),
            speed_law: SpeedLaw::new(&params, max_steering_angle_deg),
            config,
            params,
        }
    }

    pub fn config(&self) -> ControllerConfig {
        self.config
    }

    /// Set the look-ahead distance, clamped to the selectable range. Non-finite values are
    /// ignored.
    pub fn set_look_ahead(&mut self, look_ahead: f64) {
        if !look_ahead.is_finite() {
            warn!("Ignoring non-finite look-ahead demand ({})", look_ahead);
            return;
        }

        self.config.look_ahead_distance = clamp(
            &look_ahead,
            &self.params.look_ahead_min,
            &self.params.look_ahead_max,
        );
        debug!(
            "Look-ahead distance set to {:.1}",
            self.config.look_ahead_distance
        );
    }

    /// Set the target speed, clamped to the selectable range. Non-finite values are ignored.
    pub fn set_target_speed(&mut self, speed: f64) {
        if !speed.is_finite() {
            warn!("Ignoring non-finite target speed demand ({})", speed);
            return;
        }

        self.config.target_speed = clamp(
            &speed,
            &self.params.target_speed_min,
            &self.params.target_speed_max,
        );
        debug!("Target speed set to {:.1}", self.config.target_speed);
    }

    /// Compute the steering and speed demands for a lane estimate using the current config.
    pub fn step(&self, lane_estimate: f64) -> PursuitDems {
        let steering_angle_deg = self
            .steering_law
            .compute_steering(lane_estimate, self.config.look_ahead_distance);
        let speed = self
            .speed_law
            .compute_speed(steering_angle_deg, self.config.target_speed);

        PursuitDems {
            steering_angle_deg,
            speed,
        }
    }

    /// The point the vehicle is notionally aiming at, for display.
    ///
    /// Lies a multiple of the look-ahead distance from the vehicle, along the heading turned by
    /// the current steering angle.
    pub fn look_ahead_point(&self, state: &VehicleState) -> Point2<f64> {
        let dist = self.params.viz_look_ahead_scale * self.config.look_ahead_distance;
        let angle = (state.heading_deg + state.steering_angle_deg).to_radians();

        Point2::new(
            state.x + dist * angle.cos(),
            state.y + dist * angle.sin(),
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
