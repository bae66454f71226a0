//! Diagnostic overlay of the lane detection

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use image::{GrayImage, Rgb, RgbImage};

use super::RowDetection;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const HIGHLIGHT_COLOUR: Rgb<u8> = Rgb([255, 255, 0]);
const CENTRE_COLOUR: Rgb<u8> = Rgb([255, 0, 255]);
const EDGE_COLOUR: Rgb<u8> = Rgb([0, 255, 0]);
const GUIDE_COLOUR: Rgb<u8> = Rgb([255, 100, 0]);

/// Weight of the camera image in the blend.
const IMAGE_WEIGHT: f64 = 0.7;

/// Weight of the mask highlight in the blend.
const HIGHLIGHT_WEIGHT: f64 = 0.5;

const CENTRE_RADIUS: i64 = 5;
const EDGE_RADIUS: i64 = 3;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Draw the overlay: the camera image blended with a highlight of the mask, a marker on the
/// centre and both edges of every detected row, and a guide on the image centreline.
pub fn draw(img: &RgbImage, mask: &GrayImage, rows: &[RowDetection]) -> RgbImage {
    let (w, h) = img.dimensions();

    let mut out = RgbImage::from_fn(w, h, |x, y| {
        let px = img.get_pixel(x, y);
        let hl = if mask.get_pixel(x, y)[0] > 0 {
            HIGHLIGHT_COLOUR
        } else {
            Rgb([0, 0, 0])
        };

        let mut c = [0u8; 3];
        for i in 0..3 {
            c[i] = (IMAGE_WEIGHT * px[i] as f64 + HIGHLIGHT_WEIGHT * hl[i] as f64)
                .round()
                .min(255.0) as u8;
        }
        Rgb(c)
    });

    for r in rows {
        let centre_x = (r.centre * w as f64) as i64;
        fill_disc(&mut out, centre_x, r.row as i64, CENTRE_RADIUS, CENTRE_COLOUR);
        fill_disc(&mut out, r.left as i64, r.row as i64, EDGE_RADIUS, EDGE_COLOUR);
        fill_disc(&mut out, r.right as i64, r.row as i64, EDGE_RADIUS, EDGE_COLOUR);
    }

    if w > 0 {
        for y in 0..h {
            out.put_pixel(w / 2, y, GUIDE_COLOUR);
        }
    }

    out
}

/// Fill a disc, clipped to the image.
fn fill_disc(img: &mut RgbImage, cx: i64, cy: i64, radius: i64, colour: Rgb<u8>) {
    let (w, h) = img.dimensions();

    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                continue;
            }
            if (x - cx).pow(2) + (y - cy).pow(2) <= radius.pow(2) {
                img.put_pixel(x as u32, y as u32, colour);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use image::Luma;

    #[test]
    fn test_overlay_blend_and_markers() {
        let img = RgbImage::from_pixel(40, 20, Rgb([100, 100, 100]));
        let mut mask = GrayImage::new(40, 20);
        mask.put_pixel(2, 2, Luma([255]));

        let rows = [RowDetection {
            row: 10,
            left: 5,
            right: 25,
            centre: 15.0 / 40.0,
        }];

        let out = draw(&img, &mask, &rows);

        assert_eq!(*out.get_pixel(0, 0), Rgb([70, 70, 70]));
        assert_eq!(*out.get_pixel(2, 2), Rgb([198, 198, 70]));
        assert_eq!(*out.get_pixel(15, 10), CENTRE_COLOUR);
        assert_eq!(*out.get_pixel(5, 10), EDGE_COLOUR);
        assert_eq!(*out.get_pixel(25, 13), EDGE_COLOUR);
        assert_eq!(*out.get_pixel(20, 0), GUIDE_COLOUR);
    }
}
