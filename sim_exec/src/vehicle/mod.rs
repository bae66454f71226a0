//! Vehicle dynamics module
//!
//! Integrates the motion of the simulated vehicle with a kinematic bicycle model. The front and
//! rear axles are each treated as a single wheel, so the turn radius about the rear axle is
//! `wheelbase / tan(steering_angle)` and the yaw rate is `speed / turn_radius`. Tyre slip is
//! ignored.
//!
//! The dynamics hold no state of their own. The driver owns a `Vehicle` value and passes it
//! through `VehicleDynamics::update` once per tick, receiving the updated value back.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod state;
mod trail;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use cmd::*;
pub use params::*;
pub use state::*;
pub use trail::*;

use log::trace;
use util::maths::{clamp, wrap_180_deg};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematic bicycle model integrator.
#[derive(Debug, Clone)]
pub struct VehicleDynamics {
    params: Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleDynamics {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Create a vehicle at rest in the given start pose, with an empty trail.
    pub fn spawn(&self, pose: StartPose) -> Vehicle {
        Vehicle {
            state: VehicleState {
                x: pose.x,
                y: pose.y,
                heading_deg: wrap_180_deg(pose.heading_deg),
                speed: clamp(
                    &self.params.initial_speed,
                    &self.params.min_speed,
                    &self.params.max_speed,
                ),
                steering_angle_deg: 0.0,
                length: self.params.length,
                width: self.params.width,
                wheelbase: self.params.wheelbase,
            },
            trail: MotionTrail::new(TRAIL_CAPACITY),
        }
    }

    /// Advance the vehicle by one tick under the given command.
    ///
    /// Steering and speed demands are clamped to the vehicle's limits rather than rejected, so
    /// this never fails.
    pub fn update(&self, mut vehicle: Vehicle, cmd: DriveCmd) -> Vehicle {
        let p = &self.params;
        let s = &mut vehicle.state;

        s.steering_angle_deg = clamp(
            &cmd.steering_angle_deg,
            &-p.max_steering_angle_deg,
            &p.max_steering_angle_deg,
        );

        if let SpeedCmd::Set(speed) = cmd.speed {
            s.speed = clamp(&speed, &p.min_speed, &p.max_speed);
        }

        // Yaw rate in rad/tick. Below the deadband the steering is treated as straight, which
        // also keeps the turn radius away from infinity.
        let yaw_rate_rad = if s.steering_angle_deg.abs() > p.steering_deadband_deg {
            let turn_radius = s.wheelbase / s.steering_angle_deg.to_radians().tan();
            s.speed / turn_radius
        } else {
            0.0
        };

        // Euler step with a unit time step. Position is advanced along the heading at the start
        // of the tick.
        let heading_rad = s.heading_deg.to_radians();
        s.x += s.speed * heading_rad.cos();
        s.y += s.speed * heading_rad.sin();
        s.heading_deg = wrap_180_deg(s.heading_deg + yaw_rate_rad.to_degrees());

        trace!(
            "Vehicle: x {:.2}, y {:.2}, hdg {:.2} deg, str {:.2} deg, spd {:.2}",
            s.x,
            s.y,
            s.heading_deg,
            s.steering_angle_deg,
            s.speed
        );

        let sample = TrailSample {
            x: s.x,
            y: s.y,
            speed: s.speed,
        };
        vehicle.trail.push(sample);

        vehicle
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn default_dynamics() -> VehicleDynamics {
        VehicleDynamics::new(Params::default())
    }

    fn start() -> StartPose {
        StartPose {
            x: 100.0,
            y: 200.0,
            heading_deg: 30.0,
        }
    }

    #[test]
    fn test_inputs_are_clamped() {
        let dynamics = default_dynamics();
        let p = dynamics.params().clone();
        let v = dynamics.spawn(start());

        let v = dynamics.update(v, DriveCmd::new(1000.0, SpeedCmd::Set(1e6)));
        assert_eq!(v.state.steering_angle_deg, p.max_steering_angle_deg);
        assert_eq!(v.state.speed, p.max_speed);

        let v = dynamics.update(v, DriveCmd::new(-1000.0, SpeedCmd::Set(-3.0)));
        assert_eq!(v.state.steering_angle_deg, -p.max_steering_angle_deg);
        assert_eq!(v.state.speed, p.min_speed);
    }

    #[test]
    fn test_speed_hold_keeps_previous_speed() {
        let dynamics = default_dynamics();
        let v = dynamics.spawn(start());

        let v = dynamics.update(v, DriveCmd::new(0.0, SpeedCmd::Set(7.0)));
        let v = dynamics.update(v, DriveCmd::new(0.0, SpeedCmd::Hold));
        assert_eq!(v.state.speed, 7.0);
    }

    #[test]
    fn test_straight_line() {
        let dynamics = default_dynamics();
        let mut v = dynamics.spawn(start());
        let hdg = start().heading_deg.to_radians();

        for i in 1..=50 {
            // Below the deadband counts as straight too
            let steer = if i % 2 == 0 { 0.0 } else { 0.05 };
            v = dynamics.update(v, DriveCmd::new(steer, SpeedCmd::Set(4.0)));

            assert_eq!(v.state.heading_deg, 30.0);
            assert_relative_eq!(v.state.x, 100.0 + 4.0 * i as f64 * hdg.cos(), epsilon = 1e-9);
            assert_relative_eq!(v.state.y, 200.0 + 4.0 * i as f64 * hdg.sin(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_constant_steering_circle() {
        let dynamics = default_dynamics();
        let p = dynamics.params().clone();
        let steer_deg: f64 = 20.0;
        let speed = 1.0;
        let radius = p.wheelbase / f64::tan(steer_deg.to_radians());

        let mut v = dynamics.spawn(StartPose {
            x: 0.0,
            y: 0.0,
            heading_deg: 0.0,
        });

        // Euler integration of a unit circle, positive steering turns towards +y
        let mut xs = vec![];
        let mut ys = vec![];
        let num_ticks = (2.0 * std::f64::consts::PI * radius / speed) as usize;
        for _ in 0..num_ticks {
            v = dynamics.update(v, DriveCmd::new(steer_deg, SpeedCmd::Set(speed)));
            xs.push(v.state.x);
            ys.push(v.state.y);
        }

        // Centre of the path is approximately at (0, radius). Every sample should lie close to
        // the circle, within the discretisation error of the step.
        for (x, y) in xs.iter().zip(ys.iter()) {
            let r = (x.powi(2) + (y - radius).powi(2)).sqrt();
            assert_abs_diff_eq!(r, radius, epsilon = 0.05 * radius);
        }

        // After a full lap we are back near the start
        assert_abs_diff_eq!(v.state.x, 0.0, epsilon = 0.1 * radius);
        assert_abs_diff_eq!(v.state.y, 0.0, epsilon = 0.1 * radius);
    }

    #[test]
    fn test_heading_stays_normalised() {
        let dynamics = default_dynamics();
        let mut v = dynamics.spawn(start());

        for i in 0..2000 {
            let steer = if i < 1000 { 35.0 } else { -35.0 };
            v = dynamics.update(v, DriveCmd::new(steer, SpeedCmd::Set(50.0)));
            assert!(
                v.state.heading_deg > -180.0 && v.state.heading_deg <= 180.0,
                "heading {} out of range",
                v.state.heading_deg
            );
        }
    }

    #[test]
    fn test_trail_bound_and_order() {
        let dynamics = default_dynamics();
        let mut v = dynamics.spawn(start());

        let mut xs = vec![];
        for _ in 0..400 {
            v = dynamics.update(v, DriveCmd::new(5.0, SpeedCmd::Set(3.0)));
            xs.push(v.state.x);
            assert!(v.trail.len() <= TRAIL_CAPACITY);
        }

        assert_eq!(v.trail.len(), TRAIL_CAPACITY);

        // The trail holds the most recent samples, oldest first
        let trail_xs: Vec<f64> = v.trail.iter().map(|s| s.x).collect();
        assert_eq!(trail_xs.as_slice(), &xs[xs.len() - TRAIL_CAPACITY..]);
        assert_eq!(v.trail.latest().map(|s| s.x), xs.last().copied());
    }

    #[test]
    fn test_trail_capacity_not_configurable() {
        let params: Params =
            util::params::from_toml_str("wheelbase = 30.0\ntrail_capacity = 500\n").unwrap();
        let dynamics = VehicleDynamics::new(params);
        let mut v = dynamics.spawn(start());

        for _ in 0..200 {
            v = dynamics.update(v, DriveCmd::new(0.0, SpeedCmd::Hold));
        }

        assert_eq!(v.trail.len(), TRAIL_CAPACITY);
    }

    #[test]
    fn test_front_axle_position() {
        let dynamics = default_dynamics();
        let v = dynamics.spawn(StartPose {
            x: 10.0,
            y: 10.0,
            heading_deg: 90.0,
        });

        let (fx, fy) = v.state.front_axle_position();
        assert_abs_diff_eq!(fx, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fy, 10.0 + v.state.length / 2.0, epsilon = 1e-9);
    }
}
