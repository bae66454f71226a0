//! Lane detection parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the lane boundary detector.
///
/// HSV thresholds use the 8-bit convention: hue in [0, 180) (degrees halved), saturation and
/// value in [0, 255]. All bounds are inclusive.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Lower hue bound of the boundary marker colour.
    pub hue_min: u8,

    /// Upper hue bound of the boundary marker colour.
    pub hue_max: u8,

    /// Minimum saturation of the boundary marker colour.
    pub sat_min: u8,

    /// Minimum value (brightness) of the boundary marker colour.
    pub val_min: u8,

    /// Side length of the square morphological closing kernel. Must be odd, 1 disables the
    /// closing.
    pub closing_kernel_size: u32,

    /// Heights of the scanlines as a fraction of the image height, nearest first.
    pub scan_row_fractions: Vec<f64>,

    /// Fusion weights given to the found row centres, in the order the centres were found.
    pub fusion_weights: Vec<f64>,

    /// Minimum number of masked pixels a scanline needs to yield a centre.
    pub min_row_pixels: usize,

    /// Estimate returned when no scanline yields a centre.
    pub default_estimate: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            hue_min: 35,
            hue_max: 85,
            sat_min: 80,
            val_min: 80,
            closing_kernel_size: 3,
            scan_row_fractions: vec![0.8, 0.6, 0.4, 0.3],
            fusion_weights: vec![0.4, 0.3, 0.2, 0.1],
            min_row_pixels: 2,
            default_estimate: 0.5,
        }
    }
}
