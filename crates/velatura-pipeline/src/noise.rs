//! Additive channel noise.
//!
//! Perturbs each pixel's R, G and B independently by a uniform integer
//! draw in `[-max_delta, +max_delta]`, clamping back into range. The
//! generator is the process RNG, deliberately unseeded: two runs over
//! the same input produce different output. Tests assert the range and
//! dimension invariants, never exact pixel values.

use image::Rgba;
use rand::Rng;

use crate::types::{CHANNEL_MAX, OPAQUE, RgbaImage, clamp_channel_i32};

/// Symmetric perturbation bound for a noise intensity in [0, 1].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn max_delta(intensity: f64) -> i32 {
    (CHANNEL_MAX * intensity).round() as i32
}

/// Add uniform noise in `[-max_delta, +max_delta]` to every channel of
/// every pixel. Dimensions are preserved; alpha is forced opaque.
#[must_use = "returns the noised image"]
pub fn add_noise(input: &RgbaImage, max_delta: i32) -> RgbaImage {
    let mut rng = rand::rng();
    RgbaImage::from_fn(input.width(), input.height(), |x, y| {
        let pixel = input.get_pixel(x, y);
        let mut channel = |c: usize| {
            let delta = rng.random_range(-max_delta..=max_delta);
            clamp_channel_i32(i32::from(pixel[c]) + delta)
        };
        Rgba([channel(0), channel(1), channel(2), OPAQUE])
    })
}
