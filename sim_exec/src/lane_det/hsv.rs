//! RGB to HSV conversion and colour thresholding

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use image::{GrayImage, Luma, Rgb, RgbImage};

use super::Params;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Mask value of a pixel inside the colour range.
pub const MASK_ON: u8 = 255;

/// Mask value of a pixel outside the colour range.
pub const MASK_OFF: u8 = 0;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert an 8-bit RGB pixel to 8-bit HSV.
///
/// Returns (H: 0-180, S: 0-255, V: 0-255), hue being the angle in degrees halved so it fits in a
/// byte.
pub fn rgb_to_hsv(px: &Rgb<u8>) -> (u8, u8, u8) {
    let r = px[0] as f64;
    let g = px[1] as f64;
    let b = px[2] as f64;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let h_deg = if delta <= 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let h_deg = if h_deg < 0.0 { h_deg + 360.0 } else { h_deg };

    (
        (h_deg / 2.0).round().min(180.0) as u8,
        s.round().min(255.0) as u8,
        max as u8,
    )
}

/// Build a binary mask of the pixels whose HSV colour is inside the configured range.
pub fn threshold(img: &RgbImage, params: &Params) -> GrayImage {
    let (w, h) = img.dimensions();
    let mut mask = GrayImage::new(w, h);

    for (x, y, px) in img.enumerate_pixels() {
        let (hue, sat, val) = rgb_to_hsv(px);

        let inside = hue >= params.hue_min
            && hue <= params.hue_max
            && sat >= params.sat_min
            && val >= params.val_min;

        mask.put_pixel(x, y, Luma([if inside { MASK_ON } else { MASK_OFF }]));
    }

    mask
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rgb_to_hsv() {
        assert_eq!(rgb_to_hsv(&Rgb([255, 0, 0])), (0, 255, 255));
        assert_eq!(rgb_to_hsv(&Rgb([0, 255, 0])), (60, 255, 255));
        assert_eq!(rgb_to_hsv(&Rgb([0, 0, 255])), (120, 255, 255));
        assert_eq!(rgb_to_hsv(&Rgb([255, 255, 0])), (30, 255, 255));
        assert_eq!(rgb_to_hsv(&Rgb([255, 0, 255])), (150, 255, 255));
        assert_eq!(rgb_to_hsv(&Rgb([0, 0, 0])), (0, 0, 0));
        assert_eq!(rgb_to_hsv(&Rgb([200, 200, 200])), (0, 0, 200));
        assert_eq!(rgb_to_hsv(&Rgb([0, 100, 50])), (75, 255, 100));
    }

    #[test]
    fn test_threshold_boundaries() {
        let p = Params::default();
        let mut img = RgbImage::new(5, 1);

        // Pure green is inside
        img.put_pixel(0, 0, Rgb([0, 200, 0]));
        // Too dark
        img.put_pixel(1, 0, Rgb([0, 79, 0]));
        // Too washed out
        img.put_pixel(2, 0, Rgb([180, 200, 180]));
        // Yellow hue (30) is below the range
        img.put_pixel(3, 0, Rgb([220, 220, 0]));
        // Cyan-ish green, hue 85 is the inclusive upper bound
        img.put_pixel(4, 0, Rgb([0, 255, 212]));

        let mask = threshold(&img, &p);
        let values: Vec<u8> = mask.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![MASK_ON, MASK_OFF, MASK_OFF, MASK_OFF, MASK_ON]);
    }
}
