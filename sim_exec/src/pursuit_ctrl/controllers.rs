//! # Pursuit control laws
//!
//! The steering law turns the vehicle towards the detected lane centre. Its gain falls with the
//! look-ahead distance, so a long look-ahead gives gentle, anticipatory corrections and a short
//! one gives sharp corrections. The speed law slows the vehicle in proportion to the steering
//! demand, down to a floor.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use util::maths::clamp;

use super::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Maps the lane estimate onto a steering demand.
#[derive(Debug, Clone)]
pub struct SteeringLaw {
    max_steering_angle_deg: f64,
    gain_constant: f64,
    min_look_ahead: f64,
}

/// Maps the steering demand onto a speed demand.
#[derive(Debug, Clone)]
pub struct SpeedLaw {
    max_steering_angle_deg: f64,
    speed_reduction: f64,
    min_speed_factor: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SteeringLaw {
    /// Build the law, clamping its output to `max_steering_angle_deg` either side of straight.
    pub fn new(params: &Params, max_steering_angle_deg: f64) -> Self {
        Self {
            max_steering_angle_deg: max_steering_angle_deg.abs(),
            gain_constant: params.gain_constant,
            min_look_ahead: params.min_look_ahead,
        }
    }

    /// Steering demand in degrees for a lane estimate in [0, 1].
    ///
    /// Positive when the lane lies to the right of centre. The look-ahead is floored at the
    /// configured minimum so the gain stays bounded.
    pub fn compute_steering(&self, lane_estimate: f64, look_ahead: f64) -> f64 {
        let error = lane_estimate - 0.5;
        let look_ahead = look_ahead.max(self.min_look_ahead);

        let raw = error * self.gain_constant / look_ahead;
        let steer = clamp(
            &raw,
            &-self.max_steering_angle_deg,
            &self.max_steering_angle_deg,
        );

        trace!(
            "Steering: error {:.3}, look-ahead {:.1}, raw {:.2}, demand {:.2}",
            error,
            look_ahead,
            raw,
            steer
        );

        steer
    }
}

impl SpeedLaw {
    /// Build the law, treating `max_steering_angle_deg` as full lock.
    pub fn new(params: &Params, max_steering_angle_deg: f64) -> Self {
        Self {
            max_steering_angle_deg: max_steering_angle_deg.abs(),
            speed_reduction: params.speed_reduction,
            min_speed_factor: params.min_speed_factor,
        }
    }

    /// Speed demand for the given steering demand and base speed.
    pub fn compute_speed(&self, steering_angle_deg: f64, base_speed: f64) -> f64 {
        let lock = if self.max_steering_angle_deg > 0.0 {
            steering_angle_deg.abs() / self.max_steering_angle_deg
        } else {
            0.0
        };

        let factor = (1.0 - lock * self.speed_reduction).max(self.min_speed_factor);

        base_speed * factor
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    const MAX_STEER: f64 = 35.0;

    #[test]
    fn test_steering_neutral() {
        let law = SteeringLaw::new(&Params::default(), MAX_STEER);
        assert_abs_diff_eq!(law.compute_steering(0.5, 60.0), 0.0);
        assert_abs_diff_eq!(law.compute_steering(0.5, 0.0), 0.0);
    }

    #[test]
    fn test_steering_sign_and_gain() {
        let law = SteeringLaw::new(&Params::default(), MAX_STEER);

        // 0.1 * 3000 / 60 = 5 deg
        assert_abs_diff_eq!(law.compute_steering(0.6, 60.0), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(law.compute_steering(0.4, 60.0), -5.0, epsilon = 1e-9);

        // Longer look-ahead, gentler correction
        assert!(law.compute_steering(0.6, 120.0) < law.compute_steering(0.6, 60.0));
    }

    #[test]
    fn test_steering_clamped() {
        let law = SteeringLaw::new(&Params::default(), MAX_STEER);

        assert_abs_diff_eq!(law.compute_steering(1.0, 20.0), 35.0);
        assert_abs_diff_eq!(law.compute_steering(0.0, 20.0), -35.0);

        // Zero and negative look-ahead are floored, not divided by
        assert_abs_diff_eq!(law.compute_steering(0.51, 0.0), 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(law.compute_steering(0.9, -5.0), 35.0);
    }

    #[test]
    fn test_speed_law() {
        let law = SpeedLaw::new(&Params::default(), MAX_STEER);

        assert_abs_diff_eq!(law.compute_speed(0.0, 5.0), 5.0);

        // Full lock sheds 40 %
        assert_abs_diff_eq!(law.compute_speed(35.0, 10.0), 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(law.compute_speed(-35.0, 10.0), 6.0, epsilon = 1e-9);

        // Symmetric and decreasing with |steering|
        let mut prev = law.compute_speed(0.0, 10.0);
        for i in 1..=35 {
            let s = law.compute_speed(i as f64, 10.0);
            assert!(s <= prev);
            assert_abs_diff_eq!(s, law.compute_speed(-(i as f64), 10.0));
            prev = s;
        }
    }

    #[test]
    fn test_speed_floor() {
        let params = Params {
            speed_reduction: 0.9,
            ..Params::default()
        };
        let law = SpeedLaw::new(&params, MAX_STEER);

        assert_abs_diff_eq!(law.compute_speed(35.0, 10.0), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(law.compute_speed(90.0, 10.0), 5.0, epsilon = 1e-9);
    }
}
