//! Luminance grayscale conversion.
//!
//! Collapses each pixel's R, G and B to a single luminance value using
//! the standard weights `0.299*R + 0.587*G + 0.114*B`, written back to
//! all three channels. Dimension-preserving and idempotent: a pixel
//! with equal channels maps to itself.

use image::Rgba;

use crate::types::{OPAQUE, RgbaImage, clamp_channel};

/// Convert every pixel to its luminance gray. Alpha is forced opaque.
#[must_use = "returns the grayscale image"]
pub fn grayscale(input: &RgbaImage) -> RgbaImage {
    RgbaImage::from_fn(input.width(), input.height(), |x, y| {
        let pixel = input.get_pixel(x, y);
        let luma = clamp_channel(
            0.299 * f64::from(pixel[0]) + 0.587 * f64::from(pixel[1]) + 0.114 * f64::from(pixel[2]),
        );
        Rgba([luma, luma, luma, OPAQUE])
    })
}
