//! # Perception to control pipeline
//!
//! One tick of the simulation:
//!
//! - Project the top-down scene into the forward view from the vehicle's pose
//! - Detect the lane centre in the forward view
//! - Compute the steering and speed demands
//! - Advance the vehicle under those demands
//!
//! Each tick starts from scratch apart from the vehicle itself, which is passed in and handed
//! back updated.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use image::RgbImage;
use log::debug;
use nalgebra::Point2;

use crate::{
    cam_pov::{self, PerspectiveProjector},
    lane_det::{self, LaneDetector, LaneEstimate},
    pursuit_ctrl::{self, PursuitCtrl, PursuitDems},
    vehicle::{self, DriveCmd, SpeedCmd, StartPose, Vehicle, VehicleDynamics},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct Pipeline {
    projector: PerspectiveProjector,
    detector: LaneDetector,
    pursuit: PursuitCtrl,
    dynamics: VehicleDynamics,
}

/// Everything a tick produced besides the updated vehicle.
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub estimate: LaneEstimate,

    pub dems: PursuitDems,

    /// Look-ahead point for display, from the pose at the start of the tick.
    pub look_ahead_point: Point2<f64>,

    /// Diagnostic overlay, if one was requested.
    pub overlay: Option<RgbImage>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pipeline {
    pub fn new(
        vehicle_params: vehicle::Params,
        cam_params: cam_pov::Params,
        lane_params: lane_det::Params,
        pursuit_params: pursuit_ctrl::Params,
    ) -> Self {
        Self {
            projector: PerspectiveProjector::new(cam_params),
            detector: LaneDetector::new(lane_params),
            pursuit: PursuitCtrl::new(pursuit_params, vehicle_params.max_steering_angle_deg),
            dynamics: VehicleDynamics::new(vehicle_params),
        }
    }

    pub fn detector(&self) -> &LaneDetector {
        &self.detector
    }

    pub fn pursuit(&self) -> &PursuitCtrl {
        &self.pursuit
    }

    pub fn pursuit_mut(&mut self) -> &mut PursuitCtrl {
        &mut self.pursuit
    }

    /// A fresh vehicle at the start pose.
    pub fn spawn(&self, pose: StartPose) -> Vehicle {
        self.dynamics.spawn(pose)
    }

    /// Run one tick, returning the updated vehicle.
    pub fn tick(
        &self,
        scene: &RgbImage,
        vehicle: Vehicle,
        with_overlay: bool,
    ) -> (Vehicle, TickOutput) {
        let s = vehicle.state;

        let forward = self.projector.project(scene, s.x, s.y, s.heading_deg);

        let (estimate, overlay) = if with_overlay {
            let (e, o) = self.detector.detect_with_overlay(&forward);
            (e, Some(o))
        } else {
            (self.detector.detect(&forward), None)
        };

        let dems = self.pursuit.step(estimate.centre);
        let look_ahead_point = self.pursuit.look_ahead_point(&s);

        debug!(
            "Lane {:.3} -> steering {:.2} deg, speed {:.2}",
            estimate.centre, dems.steering_angle_deg, dems.speed
        );

        let vehicle = self.dynamics.update(
            vehicle,
            DriveCmd::new(dems.steering_angle_deg, SpeedCmd::Set(dems.speed)),
        );

        (
            vehicle,
            TickOutput {
                estimate,
                dems,
                look_ahead_point,
                overlay,
            },
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use image::Rgb;

    const GREEN: Rgb<u8> = Rgb([0, 200, 0]);
    const GREY: Rgb<u8> = Rgb([60, 60, 60]);

    fn default_pipeline() -> Pipeline {
        Pipeline::new(
            vehicle::Params::default(),
            cam_pov::Params::default(),
            lane_det::Params::default(),
            pursuit_ctrl::Params::default(),
        )
    }

    /// A straight road running along x, with boundaries either side of y = 300.
    fn straight_road() -> RgbImage {
        let mut img = RgbImage::from_pixel(2000, 600, GREY);
        for x in 0..2000 {
            for y in (240..=250).chain(350..=360) {
                img.put_pixel(x, y, GREEN);
            }
        }
        img
    }

    #[test]
    fn test_centred_lane_end_to_end() {
        let pipeline = default_pipeline();

        let mut forward = RgbImage::from_pixel(480, 320, GREY);
        for y in 0..320 {
            for x in (138..=142).chain(338..=342) {
                forward.put_pixel(x, y, GREEN);
            }
        }

        let est = pipeline.detector().detect(&forward);
        assert_abs_diff_eq!(est.centre, 0.5, epsilon = 1e-9);

        let dems = pipeline.pursuit().step(est.centre);
        assert_abs_diff_eq!(dems.steering_angle_deg, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dems.speed, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_straight_road_closed_loop() {
        let pipeline = default_pipeline();
        let scene = straight_road();

        let mut v = pipeline.spawn(StartPose {
            x: 200.0,
            y: 300.0,
            heading_deg: 0.0,
        });

        for _ in 0..30 {
            let (next, out) = pipeline.tick(&scene, v, false);
            v = next;

            assert!(!out.estimate.rows.is_empty());
            assert_abs_diff_eq!(out.estimate.centre, 0.5, epsilon = 0.005);
            assert!(out.overlay.is_none());
        }

        assert!(v.state.x > 300.0);
        assert_abs_diff_eq!(v.state.y, 300.0, epsilon = 1.0);
        assert_abs_diff_eq!(v.state.heading_deg, 0.0, epsilon = 1.0);
        assert_eq!(v.trail.len(), 30);
    }

    #[test]
    fn test_offset_vehicle_steers_back() {
        let pipeline = default_pipeline();
        let scene = straight_road();

        // Right of the road centre, the lane appears to the left
        let v = pipeline.spawn(StartPose {
            x: 200.0,
            y: 315.0,
            heading_deg: 0.0,
        });

        let (v, out) = pipeline.tick(&scene, v, true);

        assert!(out.estimate.centre < 0.5);
        assert!(out.dems.steering_angle_deg < 0.0);
        assert!(v.state.heading_deg < 0.0);
        assert_eq!(out.overlay.map(|o| o.dimensions()), Some((480, 320)));
    }

    #[test]
    fn test_control_laws_share_vehicle_steering_limit() {
        let pipeline = Pipeline::new(
            vehicle::Params {
                max_steering_angle_deg: 20.0,
                ..vehicle::Params::default()
            },
            cam_pov::Params::default(),
            lane_det::Params::default(),
            pursuit_ctrl::Params::default(),
        );

        // Hard right demand saturates at the vehicle's limit, which is also full lock for the
        // speed law
        let dems = pipeline.pursuit().step(1.0);
        assert_abs_diff_eq!(dems.steering_angle_deg, 20.0);
        assert_abs_diff_eq!(dems.speed, 3.0, epsilon = 1e-9);

        let dems = pipeline.pursuit().step(0.0);
        assert_abs_diff_eq!(dems.steering_angle_deg, -20.0);
        assert_abs_diff_eq!(dems.speed, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_blank_scene_drives_straight() {
        let pipeline = default_pipeline();
        let scene = RgbImage::new(100, 100);

        let v = pipeline.spawn(StartPose::default());
        let (v, out) = pipeline.tick(&scene, v, false);

        assert_abs_diff_eq!(out.estimate.centre, 0.5);
        assert_abs_diff_eq!(out.dems.steering_angle_deg, 0.0);
        assert_abs_diff_eq!(v.state.heading_deg, 0.0);
        assert_abs_diff_eq!(v.state.speed, 5.0);
    }
}
