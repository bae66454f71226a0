//! Planar projective transforms

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{DMatrix, DVector, Matrix3, Point2, Vector3};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Smallest triangle area (in squared input units) for three control points to be considered
/// non-collinear.
const MIN_TRIANGLE_AREA: f64 = 1e-9;

/// Smallest magnitude of the homogeneous coordinate for a point to be mapped.
const MIN_HOMOGENEOUS_W: f64 = 1e-12;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A 3x3 homography, normalised so that the bottom-right element is 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography(pub Matrix3<f64>);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Homography {
    /// Solve the homography mapping each of the four `src` points onto the matching `dst` point.
    ///
    /// Uses the direct linear transform with `h33 = 1`, which gives an 8x8 linear system. Returns
    /// `None` if the correspondences are degenerate, i.e. any three of the points on either side
    /// are collinear, a point is not finite, or the system can't be solved.
    pub fn from_correspondences(src: &[Point2<f64>; 4], dst: &[Point2<f64>; 4]) -> Option<Self> {
        if !is_general_position(src) || !is_general_position(dst) {
            return None;
        }

        let mut a = DMatrix::<f64>::zeros(8, 8);
        let mut b = DVector::<f64>::zeros(8);

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            let (x, y) = (s.x, s.y);
            let (u, v) = (d.x, d.y);

            let r = 2 * i;
            a[(r, 0)] = x;
            a[(r, 1)] = y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -u * x;
            a[(r, 7)] = -u * y;
            b[r] = u;

            a[(r + 1, 3)] = x;
            a[(r + 1, 4)] = y;
            a[(r + 1, 5)] = 1.0;
            a[(r + 1, 6)] = -v * x;
            a[(r + 1, 7)] = -v * y;
            b[r + 1] = v;
        }

        let h = a.lu().solve(&b)?;

        if h.iter().any(|e| !e.is_finite()) {
            return None;
        }

        Some(Self(Matrix3::new(
            h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0,
        )))
    }

    /// The inverse transform, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let inv = self.0.try_inverse()?;
        let w = inv[(2, 2)];

        if w.abs() < MIN_HOMOGENEOUS_W || inv.iter().any(|e| !e.is_finite()) {
            return None;
        }

        Some(Self(inv / w))
    }

    /// Map a point through the transform, or `None` if it maps to infinity.
    pub fn apply(&self, p: &Point2<f64>) -> Option<Point2<f64>> {
        let q = self.0 * Vector3::new(p.x, p.y, 1.0);

        if q.z.abs() < MIN_HOMOGENEOUS_W {
            return None;
        }

        Some(Point2::new(q.x / q.z, q.y / q.z))
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// True if all points are finite and no three of them are collinear.
fn is_general_position(pts: &[Point2<f64>; 4]) -> bool {
    if pts.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return false;
    }

    const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];

    TRIPLES.iter().all(|&(i, j, k)| {
        let ab = pts[j] - pts[i];
        let ac = pts[k] - pts[i];
        (ab.x * ac.y - ab.y * ac.x).abs() * 0.5 > MIN_TRIANGLE_AREA
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_square() -> [Point2<f64>; 4] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_maps_control_points() {
        let src = [
            Point2::new(10.0, 20.0),
            Point2::new(50.0, 25.0),
            Point2::new(80.0, 90.0),
            Point2::new(-5.0, 70.0),
        ];
        let dst = unit_square();

        let h = Homography::from_correspondences(&src, &dst).unwrap();

        for (s, d) in src.iter().zip(dst.iter()) {
            let m = h.apply(s).unwrap();
            assert_abs_diff_eq!(m.x, d.x, epsilon = 1e-9);
            assert_abs_diff_eq!(m.y, d.y, epsilon = 1e-9);
        }

        // And back again
        let inv = h.inverse().unwrap();
        for (s, d) in src.iter().zip(dst.iter()) {
            let m = inv.apply(d).unwrap();
            assert_abs_diff_eq!(m.x, s.x, epsilon = 1e-6);
            assert_abs_diff_eq!(m.y, s.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_affine_case() {
        // Pure scale and translation has no projective component
        let src = unit_square();
        let dst = [
            Point2::new(5.0, 5.0),
            Point2::new(7.0, 5.0),
            Point2::new(7.0, 9.0),
            Point2::new(5.0, 9.0),
        ];

        let h = Homography::from_correspondences(&src, &dst).unwrap();
        assert_abs_diff_eq!(h.0[(2, 0)], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(h.0[(2, 1)], 0.0, epsilon = 1e-12);

        let m = h.apply(&Point2::new(0.5, 0.5)).unwrap();
        assert_abs_diff_eq!(m.x, 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.y, 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_correspondences() {
        let collinear = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 5.0),
        ];
        assert!(Homography::from_correspondences(&collinear, &unit_square()).is_none());
        assert!(Homography::from_correspondences(&unit_square(), &collinear).is_none());

        let mut nan = unit_square();
        nan[2] = Point2::new(f64::NAN, 1.0);
        assert!(Homography::from_correspondences(&nan, &unit_square()).is_none());
    }
}
