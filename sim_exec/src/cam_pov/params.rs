//! Camera POV parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Geometry of the trapezoid sampled from the scene, and the size of the forward image it is
/// mapped onto.
///
/// Distances are measured from the vehicle reference point, along the heading (`*_distance`) and
/// perpendicular to it (`*_half_width`), in scene pixels.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Distance ahead of the vehicle of the near (bottom) edge of the view.
    pub near_distance: f64,

    /// Distance ahead of the vehicle of the far (top) edge of the view.
    pub far_distance: f64,

    /// Half the width of the near edge.
    pub near_half_width: f64,

    /// Half the width of the far edge. Wider than the near edge, which produces the converging
    /// perspective of a forward looking camera.
    pub far_half_width: f64,

    /// Forward image width.
    ///
    /// Units: pixels
    pub output_width: u32,

    /// Forward image height.
    ///
    /// Units: pixels
    pub output_height: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            near_distance: 20.0,
            far_distance: 800.0,
            near_half_width: 80.0,
            far_half_width: 1000.0,
            output_width: 480,
            output_height: 320,
        }
    }
}
