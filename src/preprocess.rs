//! Decoding and normalization of uploaded images into the tensor the
//! classifier expects.
//!
//! The pipeline has to mirror the one that produced the training data
//! exactly; a mismatch degrades predictions silently instead of failing, so
//! the constants below are pinned by a golden-output test rather than shape
//! checks alone.

use image::imageops::FilterType;
use ndarray::Array4;

use crate::error::DecodeError;

pub const TARGET_WIDTH: u32 = 224;
pub const TARGET_HEIGHT: u32 = 224;

/// Per-channel means in BGR order, subtracted before the final rescale.
/// These are the Caffe-style ImageNet means the classifier was trained with.
const BGR_MEAN: [f32; 3] = [103.939, 116.779, 123.68];

/// Decode raw uploaded bytes into a normalized `[1, 224, 224, 3]` tensor.
///
/// Steps, in order: decode, resize to 224x224 with bilinear resampling,
/// convert to 3-channel f32, swap RGB to BGR and subtract the per-channel
/// mean, then divide everything by 255. The leading axis is the batch
/// dimension, always 1.
pub fn normalize(raw: &[u8]) -> Result<Array4<f32>, DecodeError> {
    let decoded = image::load_from_memory(raw)?;
    let resized = decoded.resize_exact(TARGET_WIDTH, TARGET_HEIGHT, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let (h, w) = (TARGET_HEIGHT as usize, TARGET_WIDTH as usize);
    let mut batch = Array4::<f32>::zeros((1, h, w, 3));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        batch[[0, y, x, 0]] = (pixel[2] as f32 - BGR_MEAN[0]) / 255.0;
        batch[[0, y, x, 1]] = (pixel[1] as f32 - BGR_MEAN[1]) / 255.0;
        batch[[0, y, x, 2]] = (pixel[0] as f32 - BGR_MEAN[2]) / 255.0;
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    use super::*;

    fn png_bytes(width: u32, height: u32, color: Rgb<u8>) -> Vec<u8> {
        let img = DynamicImage::from(RgbImage::from_pixel(width, height, color));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn output_has_the_fixed_batch_shape() {
        let bytes = png_bytes(640, 480, Rgb([120, 60, 30]));
        let batch = normalize(&bytes).unwrap();
        assert_eq!(batch.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn golden_values_for_a_solid_color_image() {
        // PNG round-trip is lossless and a solid color survives any resize
        // filter unchanged, so the expected values are exact.
        let bytes = png_bytes(100, 80, Rgb([10, 20, 30]));
        let batch = normalize(&bytes).unwrap();

        let expected = [
            (30.0 - 103.939) / 255.0,
            (20.0 - 116.779) / 255.0,
            (10.0 - 123.68) / 255.0,
        ];
        for y in [0, 111, 223] {
            for x in [0, 111, 223] {
                for c in 0..3 {
                    assert!(
                        (batch[[0, y, x, c]] - expected[c]).abs() < 1e-5,
                        "channel {} at ({}, {}): got {}, expected {}",
                        c,
                        x,
                        y,
                        batch[[0, y, x, c]],
                        expected[c]
                    );
                }
            }
        }
    }

    #[test]
    fn values_stay_inside_the_normalized_range() {
        // Extremes: all-black and all-white inputs bound the output range.
        for color in [Rgb([0, 0, 0]), Rgb([255, 255, 255])] {
            let bytes = png_bytes(50, 50, color);
            let batch = normalize(&bytes).unwrap();
            for &v in batch.iter() {
                assert!((-0.5..=0.6).contains(&v), "value {} out of range", v);
            }
        }
    }

    #[test]
    fn non_image_bytes_fail_to_decode() {
        assert!(normalize(b"definitely not an image").is_err());
    }

    #[test]
    fn truncated_image_fails_to_decode() {
        let mut bytes = png_bytes(64, 64, Rgb([1, 2, 3]));
        bytes.truncate(20);
        assert!(normalize(&bytes).is_err());
    }
}
