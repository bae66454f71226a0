//! Binary morphology on detection masks

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use image::GrayImage;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Morphological closing (dilation followed by erosion) with a square kernel.
///
/// Closing fills gaps and pinholes narrower than the kernel. Away from the image border the
/// outline of the masked regions is unchanged. At the border the erosion only sees in-image
/// neighbours, so a region dilated onto the border keeps those border pixels.
pub fn close(mask: &GrayImage, kernel_size: u32) -> GrayImage {
    if kernel_size <= 1 {
        return mask.clone();
    }

    erode(&dilate(mask, kernel_size), kernel_size)
}

/// Replace each pixel with the maximum of its neighbourhood.
pub fn dilate(mask: &GrayImage, kernel_size: u32) -> GrayImage {
    rank_filter(mask, kernel_size, |a, b| a.max(b))
}

/// Replace each pixel with the minimum of its neighbourhood.
pub fn erode(mask: &GrayImage, kernel_size: u32) -> GrayImage {
    rank_filter(mask, kernel_size, |a, b| a.min(b))
}

/// Apply `select` over the square neighbourhood of every pixel.
///
/// Only neighbours inside the image take part. Dilation therefore never draws from outside the
/// image and erosion never eats into the mask from outside it.
fn rank_filter<F>(mask: &GrayImage, kernel_size: u32, select: F) -> GrayImage
where
    F: Fn(u8, u8) -> u8,
{
    let (w, h) = mask.dimensions();
    let r = (kernel_size / 2) as i64;
    let mut out = GrayImage::new(w, h);

    for (x, y, px) in out.enumerate_pixels_mut() {
        let mut acc = mask.get_pixel(x, y)[0];

        for dy in -r..=r {
            let ny = y as i64 + dy;
            if ny < 0 || ny >= h as i64 {
                continue;
            }

            for dx in -r..=r {
                let nx = x as i64 + dx;
                if nx < 0 || nx >= w as i64 {
                    continue;
                }

                acc = select(acc, mask.get_pixel(nx as u32, ny as u32)[0]);
            }
        }

        px[0] = acc;
    }

    out
}
