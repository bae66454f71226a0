//! # Camera point-of-view module
//!
//! Synthesises the driver's forward looking camera image from the top-down scene. A trapezoid in
//! front of the vehicle is mapped onto the rectangular output image: the short near edge onto
//! the bottom row and the long far edge onto the top row. Because the far edge covers more of
//! the scene, the track appears to converge towards the horizon as it would through a real lens.
//!
//! The homography is solved from scratch every tick, the trapezoid moves with the vehicle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod homography;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use homography::Homography;
pub use params::Params;

use image::{Rgb, RgbImage};
use log::warn;
use nalgebra::{Point2, Vector2};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Projects the top-down scene into the forward camera view.
#[derive(Debug, Clone)]
pub struct PerspectiveProjector {
    params: Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PerspectiveProjector {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Corners of the sampled trapezoid in scene coordinates, in the order front-left,
    /// front-right, far-right, far-left.
    ///
    /// "Right" is the heading rotated by +90°, which in the y-down scene frame is the driver's
    /// right hand side.
    pub fn trapezoid(&self, x: f64, y: f64, heading_deg: f64) -> [Point2<f64>; 4] {
        let p = &self.params;
        let heading_rad = heading_deg.to_radians();

        let origin = Point2::new(x, y);
        let fwd = Vector2::new(heading_rad.cos(), heading_rad.sin());
        let right = Vector2::new(
            (heading_rad + std::f64::consts::FRAC_PI_2).cos(),
            (heading_rad + std::f64::consts::FRAC_PI_2).sin(),
        );

        let near = origin + fwd * p.near_distance;
        let far = origin + fwd * p.far_distance;

        [
            near - right * p.near_half_width,
            near + right * p.near_half_width,
            far + right * p.far_half_width,
            far - right * p.far_half_width,
        ]
    }

    /// Corners of the forward image matching the trapezoid corners.
    fn image_corners(&self) -> [Point2<f64>; 4] {
        let w = self.params.output_width as f64;
        let h = self.params.output_height as f64;

        [
            Point2::new(0.0, h),
            Point2::new(w, h),
            Point2::new(w, 0.0),
            Point2::new(0.0, 0.0),
        ]
    }

    /// The transform from scene coordinates to forward image coordinates for the given pose.
    pub fn homography(&self, x: f64, y: f64, heading_deg: f64) -> Option<Homography> {
        Homography::from_correspondences(&self.trapezoid(x, y, heading_deg), &self.image_corners())
    }

    /// Render the forward image for a vehicle at the given pose.
    ///
    /// Scene areas outside the scene image are black. If the transform is degenerate the whole
    /// image is black, which the lane detector treats as "no lane found".
    pub fn project(&self, scene: &RgbImage, x: f64, y: f64, heading_deg: f64) -> RgbImage {
        let mut out = RgbImage::new(self.params.output_width, self.params.output_height);

        let image_to_scene = match self
            .homography(x, y, heading_deg)
            .and_then(|h| h.inverse())
        {
            Some(h) => h,
            None => {
                warn!(
                    "Degenerate camera projection at ({:.2}, {:.2}, {:.2} deg), \
                    producing a blank view",
                    x, y, heading_deg
                );
                return out;
            }
        };

        for (u, v, px) in out.enumerate_pixels_mut() {
            if let Some(s) = image_to_scene.apply(&Point2::new(u as f64, v as f64)) {
                *px = sample_bilinear(scene, s.x, s.y);
            }
        }

        out
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Bilinearly interpolate the scene at a sub-pixel position.
///
/// Neighbours outside the image count as black, so edges fade out over one pixel.
fn sample_bilinear(img: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    let (w, h) = img.dimensions();

    if !x.is_finite() || !y.is_finite() || x <= -1.0 || y <= -1.0 || x >= w as f64 || y >= h as f64
    {
        return Rgb([0, 0, 0]);
    }

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let get = |xi: i64, yi: i64| -> [f64; 3] {
        if xi < 0 || yi < 0 || xi >= w as i64 || yi >= h as i64 {
            [0.0; 3]
        } else {
            let p = img.get_pixel(xi as u32, yi as u32);
            [p[0] as f64, p[1] as f64, p[2] as f64]
        }
    };

    let p00 = get(x0, y0);
    let p10 = get(x0 + 1, y0);
    let p01 = get(x0, y0 + 1);
    let p11 = get(x0 + 1, y0 + 1);

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] * (1.0 - fx) + p10[c] * fx;
        let bot = p01[c] * (1.0 - fx) + p11[c] * fx;
        out[c] = (top * (1.0 - fy) + bot * fy).round().max(0.0).min(255.0) as u8;
    }

    Rgb(out)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    const GREEN: Rgb<u8> = Rgb([0, 200, 0]);
    const GREY: Rgb<u8> = Rgb([60, 60, 60]);

    #[test]
    fn test_trapezoid_corners() {
        let proj = PerspectiveProjector::new(Params::default());

        // Heading along +x, right is +y
        let t = proj.trapezoid(100.0, 50.0, 0.0);
        let expected = [(120.0, -30.0), (120.0, 130.0), (900.0, 1050.0), (900.0, -950.0)];
        for (p, (x, y)) in t.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(p.x, *x, epsilon = 1e-9);
            assert_abs_diff_eq!(p.y, *y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_homography_maps_trapezoid_onto_image() {
        let proj = PerspectiveProjector::new(Params::default());
        let h = proj.homography(300.0, 400.0, -57.0).unwrap();

        let corners = proj.image_corners();
        for (s, d) in proj.trapezoid(300.0, 400.0, -57.0).iter().zip(corners.iter()) {
            let m = h.apply(s).unwrap();
            assert_abs_diff_eq!(m.x, d.x, epsilon = 1e-6);
            assert_abs_diff_eq!(m.y, d.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_output_size_and_off_scene_black() {
        let proj = PerspectiveProjector::new(Params::default());
        let scene = RgbImage::from_pixel(64, 64, GREY);

        // Far away from the scene, everything is black
        let fwd = proj.project(&scene, 5000.0, 5000.0, 0.0);
        assert_eq!(fwd.dimensions(), (480, 320));
        assert!(fwd.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_line_ahead_appears_centred() {
        let proj = PerspectiveProjector::new(Params::default());

        // A green stripe along the x axis at y = 500, vehicle driving along it
        let mut scene = RgbImage::from_pixel(1200, 1000, GREY);
        for x in 0..1200 {
            for y in 496..505 {
                scene.put_pixel(x, y, GREEN);
            }
        }

        let fwd = proj.project(&scene, 100.0, 500.0, 0.0);

        // The stripe runs up the middle of the forward image
        for &v in &[300u32, 250, 200, 150, 100] {
            let greens: Vec<u32> = (0..480)
                .filter(|&u| fwd.get_pixel(u, v)[1] > 100 && fwd.get_pixel(u, v)[0] < 50)
                .collect();
            assert!(!greens.is_empty(), "no stripe found in row {}", v);
            let mid = (greens[0] + greens[greens.len() - 1]) as f64 / 2.0;
            assert_abs_diff_eq!(mid, 240.0, epsilon = 2.0);
        }

        // Stripe to the driver's right (larger y) shows on the right of the image
        let fwd = proj.project(&scene, 100.0, 470.0, 0.0);
        let row: Vec<u32> = (0..480)
            .filter(|&u| fwd.get_pixel(u, 256)[1] > 100 && fwd.get_pixel(u, 256)[0] < 50)
            .collect();
        assert!(!row.is_empty());
        assert!(row[0] > 240);
    }

    #[test]
    fn test_degenerate_geometry_gives_blank_view() {
        let proj = PerspectiveProjector::new(Params {
            near_half_width: 0.0,
            far_half_width: 0.0,
            ..Params::default()
        });
        let scene = RgbImage::from_pixel(64, 64, GREEN);

        assert!(proj.homography(10.0, 10.0, 0.0).is_none());
        let fwd = proj.project(&scene, 10.0, 10.0, 0.0);
        assert_eq!(fwd.dimensions(), (480, 320));
        assert!(fwd.pixels().all(|p| *p == Rgb([0, 0, 0])));

        // Non-finite pose
        let proj = PerspectiveProjector::new(Params::default());
        let fwd = proj.project(&scene, f64::NAN, 10.0, 0.0);
        assert!(fwd.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
