//! Pixel transforms: RGBA → single-channel luma, then optional thresholding.
//!
//! Luma uses the ITU-R 601-2 weights (`0.299 R + 0.587 G + 0.114 B`) in
//! 16-bit fixed point with rounding. Alpha is ignored; the rasteriser already
//! composited onto white.

use crate::config::OutputMode;
use image::{GrayImage, Luma, RgbaImage};

const R_WEIGHT: u32 = 19_595;
const G_WEIGHT: u32 = 38_470;
const B_WEIGHT: u32 = 7_471;
const ROUNDING: u32 = 0x8000;

/// Luma of one RGB triple.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT + ROUNDING) >> 16) as u8
}

/// Convert a rasterised icon to 8-bit grayscale.
pub fn to_grayscale(img: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, _] = img.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    })
}

/// Threshold in place: `>= threshold` becomes 255, everything else 0.
///
/// Dark strokes fall below the threshold and become black lines on a white
/// background.
pub fn binarize(img: &mut GrayImage, threshold: u8) {
    for p in img.pixels_mut() {
        p.0[0] = if p.0[0] >= threshold { 255 } else { 0 };
    }
}

/// Apply the configured output mode to a rasterised icon.
pub fn apply_mode(img: &RgbaImage, mode: OutputMode, threshold: u8) -> GrayImage {
    let mut gray = to_grayscale(img);
    if mode == OutputMode::Binary {
        binarize(&mut gray, threshold);
    }
    gray
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn luma_extremes_and_primaries() {
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
        assert_eq!(luma(128, 128, 128), 128);
    }

    #[test]
    fn grayscale_keeps_dimensions() {
        let img = RgbaImage::from_pixel(7, 3, Rgba([10, 20, 30, 255]));
        let gray = to_grayscale(&img);
        assert_eq!(gray.dimensions(), (7, 3));
    }

    #[test]
    fn binarize_boundary_goes_white() {
        let mut img = GrayImage::from_raw(4, 1, vec![0, 127, 128, 255]).unwrap();
        binarize(&mut img, 128);
        assert_eq!(img.into_raw(), vec![0, 0, 255, 255]);
    }

    #[test]
    fn binarize_threshold_zero_is_all_white() {
        let mut img = GrayImage::from_raw(3, 1, vec![0, 1, 200]).unwrap();
        binarize(&mut img, 0);
        assert!(img.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn binarize_threshold_max_keeps_only_pure_white() {
        let mut img = GrayImage::from_raw(3, 1, vec![0, 254, 255]).unwrap();
        binarize(&mut img, 255);
        assert_eq!(img.into_raw(), vec![0, 0, 255]);
    }

    #[test]
    fn binary_mode_output_is_two_level() {
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            let v = ((x * 16 + y) % 256) as u8;
            Rgba([v, v, v, 255])
        });
        let out = apply_mode(&img, OutputMode::Binary, 100);
        for (x, y, p) in out.enumerate_pixels() {
            let src = img.get_pixel(x, y).0[0];
            let expected = if src < 100 { 0 } else { 255 };
            assert_eq!(p.0[0], expected, "pixel ({x},{y}) from {src}");
        }
    }

    #[test]
    fn grayscale_mode_skips_threshold() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([90, 90, 90, 255]));
        let out = apply_mode(&img, OutputMode::Grayscale, 128);
        assert!(out.pixels().all(|p| p.0[0] == 90));
    }
}
