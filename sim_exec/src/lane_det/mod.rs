//! # Lane detection module
//!
//! Estimates where the lane centre lies across the forward camera image. The track boundaries
//! are marked in a distinctive colour, so detection is a colour threshold in HSV space followed
//! by a small morphological closing to knit broken markings together. A handful of horizontal
//! scanlines are then searched for the outermost marked pixels; the midpoint between them is
//! that row's lane centre.
//!
//! Rows nearer the vehicle are more trustworthy than rows towards the horizon, so the row
//! centres are fused with decreasing weights. The result is a normalised horizontal position:
//! 0 at the left edge of the image, 1 at the right edge and 0.5 straight ahead.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod hsv;
mod morph;
mod overlay;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use hsv::{rgb_to_hsv, MASK_OFF, MASK_ON};
pub use params::Params;

use image::{GrayImage, RgbImage};
use log::{debug, trace};
use serde::Serialize;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Detects the lane centre in forward camera images.
#[derive(Debug, Clone)]
pub struct LaneDetector {
    params: Params,
}

/// Outcome of one detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneEstimate {
    /// Fused normalised lane centre, in [0, 1].
    pub centre: f64,

    /// The scanlines which produced a centre, in scan order.
    pub rows: Vec<RowDetection>,
}

/// A scanline on which the lane boundaries were found.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowDetection {
    /// Image row of the scanline.
    pub row: u32,

    /// Column of the leftmost masked pixel.
    pub left: u32,

    /// Column of the rightmost masked pixel.
    pub right: u32,

    /// Normalised centre of the row, `(left + right) / 2 / width`.
    pub centre: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LaneDetector {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Binary mask of the boundary markings in the image, after closing.
    pub fn mask(&self, img: &RgbImage) -> GrayImage {
        morph::close(
            &hsv::threshold(img, &self.params),
            self.params.closing_kernel_size,
        )
    }

    /// Estimate the lane centre in the image.
    pub fn detect(&self, img: &RgbImage) -> LaneEstimate {
        let mask = self.mask(img);
        self.estimate(&mask)
    }

    /// Estimate the lane centre and also render the diagnostic overlay.
    pub fn detect_with_overlay(&self, img: &RgbImage) -> (LaneEstimate, RgbImage) {
        let mask = self.mask(img);
        let estimate = self.estimate(&mask);
        let overlay = overlay::draw(img, &mask, &estimate.rows);

        (estimate, overlay)
    }

    fn estimate(&self, mask: &GrayImage) -> LaneEstimate {
        let rows = self.scan_rows(mask);
        let centre = self.fuse(&rows);

        debug!(
            "Lane centre {:.3} from {} of {} scanlines",
            centre,
            rows.len(),
            self.params.scan_row_fractions.len()
        );

        LaneEstimate { centre, rows }
    }

    /// Search each scanline for the outermost masked pixels.
    fn scan_rows(&self, mask: &GrayImage) -> Vec<RowDetection> {
        let (w, h) = mask.dimensions();
        let mut rows = Vec::with_capacity(self.params.scan_row_fractions.len());

        if w == 0 {
            return rows;
        }

        for frac in self.params.scan_row_fractions.iter() {
            let row_f = (h as f64 * frac).floor();
            if !(row_f >= 0.0 && row_f < h as f64) {
                trace!("Scanline fraction {} is outside the image, skipped", frac);
                continue;
            }
            let row = row_f as u32;

            let mut count = 0usize;
            let mut left = u32::MAX;
            let mut right = 0u32;

            for x in 0..w {
                if mask.get_pixel(x, row)[0] != MASK_OFF {
                    count += 1;
                    left = left.min(x);
                    right = right.max(x);
                }
            }

            if count < self.params.min_row_pixels.max(1) {
                trace!("Scanline {}: {} pixels, skipped", row, count);
                continue;
            }

            let centre = (left as f64 + right as f64) / 2.0 / w as f64;
            trace!(
                "Scanline {}: boundaries at {} and {}, centre {:.3}",
                row,
                left,
                right,
                centre
            );

            rows.push(RowDetection {
                row,
                left,
                right,
                centre,
            });
        }

        rows
    }

    /// Weighted mean of the row centres.
    ///
    /// The first found centre takes the first weight and so on, whichever scanlines they came
    /// from. The weights actually used are renormalised so a lone centre is taken at face value.
    fn fuse(&self, rows: &[RowDetection]) -> f64 {
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;

        for (r, w) in rows.iter().zip(self.params.fusion_weights.iter()) {
            weighted_sum += r.centre * w;
            weight_sum += w;
        }

        if rows.is_empty() || weight_sum <= 0.0 || !weighted_sum.is_finite() {
            return self.params.default_estimate;
        }

        clamp(&(weighted_sum / weight_sum), &0.0, &1.0)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
