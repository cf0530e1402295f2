//! Spatial convolution against a named kernel.
//!
//! Output dimensions are `(W - offset, H - offset)` where `offset` is
//! the kernel's border width. Only pixels whose full kernel
//! neighborhood lies inside the input are computed; there is no edge
//! padding or extension. Computed pixels keep their input-space
//! coordinates, so the first `offset` rows and columns of the output
//! are never written by the kernel loop and stay opaque black.
//!
//! Chained convolutions therefore shrink the image one border at a
//! time, and any stage that runs afterwards sees the shrunk
//! dimensions. That is the observed contract of this pipeline and is
//! kept as-is.

use image::Rgba;

use crate::kernel::Kernel;
use crate::types::{OPAQUE, RgbaImage, clamp_channel};

/// Convolve `input` with `kernel`, shrinking the buffer by the kernel
/// offset on each axis.
///
/// Inputs too small to hold a single full kernel neighborhood
/// (`W <= 2 * offset` or `H <= 2 * offset`) produce a buffer with no
/// computed pixels, possibly zero-sized.
#[must_use = "returns the convolved image"]
pub fn convolve(input: &RgbaImage, kernel: &Kernel) -> RgbaImage {
    let offset = kernel.offset();
    let side = kernel.side();
    let (width, height) = input.dimensions();

    let out_width = width.saturating_sub(offset);
    let out_height = height.saturating_sub(offset);
    let mut output = RgbaImage::from_pixel(out_width, out_height, Rgba([0, 0, 0, OPAQUE]));

    if width <= 2 * offset || height <= 2 * offset {
        return output;
    }

    for y in offset..height - offset {
        for x in offset..width - offset {
            let mut sum = [0.0f64; 3];
            for ky in 0..side {
                for kx in 0..side {
                    // x >= offset and kx < side, so both coordinates
                    // stay inside the input.
                    let pixel = input.get_pixel(x + kx - offset, y + ky - offset);
                    let weight = kernel.weight(kx, ky);
                    sum[0] += weight * f64::from(pixel[0]);
                    sum[1] += weight * f64::from(pixel[1]);
                    sum[2] += weight * f64::from(pixel[2]);
                }
            }
            output.put_pixel(
                x,
                y,
                Rgba([
                    clamp_channel(sum[0]),
                    clamp_channel(sum[1]),
                    clamp_channel(sum[2]),
                    OPAQUE,
                ]),
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{BLUR, EDGE, SHARPEN};

    fn uniform(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
    }

    #[test]
    fn output_shrinks_by_offset_for_3x3_kernels() {
        let img = uniform(10, 8, 100);
        let out = convolve(&img, &EDGE);
        assert_eq!(out.dimensions(), (9, 7));

        let out = convolve(&img, &SHARPEN);
        assert_eq!(out.dimensions(), (9, 7));
    }

    #[test]
    fn output_shrinks_by_offset_for_5x5_blur() {
        let img = uniform(10, 8, 100);
        let out = convolve(&img, &BLUR);
        assert_eq!(out.dimensions(), (8, 6));
    }

    #[test]
    fn blur_preserves_uniform_interior() {
        // Blur weights sum to 1, so a constant region convolves to
        // itself at every fully computed pixel.
        let img = uniform(12, 12, 173);
        let out = convolve(&img, &BLUR);
        let offset = BLUR.offset();
        for y in offset..out.height() {
            for x in offset..out.width() {
                let p = out.get_pixel(x, y);
                assert_eq!(
                    (p[0], p[1], p[2]),
                    (173, 173, 173),
                    "blur changed a uniform pixel at ({x},{y})",
                );
            }
        }
    }

    #[test]
    fn edge_on_uniform_interior_is_black() {
        // Edge weights sum to 0.
        let img = uniform(10, 10, 200);
        let out = convolve(&img, &EDGE);
        let p = out.get_pixel(4, 4);
        assert_eq!((p[0], p[1], p[2]), (0, 0, 0));
    }

    #[test]
    fn uncomputed_border_is_opaque_black() {
        let img = uniform(10, 10, 200);
        let out = convolve(&img, &EDGE);
        for x in 0..out.width() {
            let p = out.get_pixel(x, 0);
            assert_eq!(p.0, [0, 0, 0, 255]);
        }
        for y in 0..out.height() {
            let p = out.get_pixel(0, y);
            assert_eq!(p.0, [0, 0, 0, 255]);
        }
    }

    #[test]
    fn all_output_alpha_is_opaque() {
        let img = RgbaImage::from_fn(9, 9, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = ((x * 31 + y * 17) % 256) as u8;
            Rgba([v, v.wrapping_mul(3), v.wrapping_add(90), 10])
        });
        let out = convolve(&img, &SHARPEN);
        for p in out.pixels() {
            assert_eq!(p[3], 255);
        }
    }

    #[test]
    fn edge_kernel_output_is_clamped() {
        // A white pixel on black drives the edge sum far past 255 and
        // far below 0 in the surround; both directions must clamp.
        let mut img = uniform(9, 9, 0);
        img.put_pixel(4, 4, Rgba([255, 255, 255, 255]));
        let out = convolve(&img, &EDGE);
        // Center: 8 * 255 clamps to 255.
        assert_eq!(out.get_pixel(4, 4).0, [255, 255, 255, 255]);
        // Neighbor: -255 clamps to 0.
        assert_eq!(out.get_pixel(3, 4).0, [0, 0, 0, 255]);
    }

    #[test]
    fn convolution_is_deterministic() {
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = ((x * 13 + y * 7) % 256) as u8;
            Rgba([v, 255 - v, v / 2, 255])
        });
        let a = convolve(&img, &BLUR);
        let b = convolve(&img, &BLUR);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn tiny_input_produces_no_computed_pixels() {
        // 3x3 against the 5x5 blur: no full neighborhood fits.
        let img = uniform(3, 3, 50);
        let out = convolve(&img, &BLUR);
        assert_eq!(out.dimensions(), (1, 1));
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn one_pixel_input_yields_empty_output() {
        let img = uniform(1, 1, 50);
        let out = convolve(&img, &EDGE);
        assert_eq!(out.dimensions(), (0, 0));
    }
}
