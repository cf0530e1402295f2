//! Radial vignette shading.
//!
//! Darkens pixels by the square of their normalized distance from the
//! buffer center: `brightness = ((max_dist - dist) / max_dist)^2`,
//! where `max_dist` is the distance from the center to the (0, 0)
//! corner. The center keeps its color; brightness falls off strictly
//! monotonically toward the edges.

use image::Rgba;

use crate::types::{OPAQUE, RgbaImage, clamp_channel};

/// Apply the vignette falloff to every pixel. Dimensions are preserved.
///
/// The center is `(W / 2, H / 2)` in integer division, matching the
/// rest of the pipeline's coordinate conventions. Buffers too small to
/// have a nonzero center distance (1x1) pass through unshaded.
#[must_use = "returns the shaded image"]
pub fn vignette(input: &RgbaImage) -> RgbaImage {
    let center_x = f64::from(input.width() / 2);
    let center_y = f64::from(input.height() / 2);
    let max_dist = center_x.hypot(center_y);

    RgbaImage::from_fn(input.width(), input.height(), |x, y| {
        let dist = (center_x - f64::from(x)).hypot(center_y - f64::from(y));
        let brightness = if max_dist > 0.0 {
            ((max_dist - dist) / max_dist).powi(2)
        } else {
            1.0
        };
        let pixel = input.get_pixel(x, y);
        Rgba([
            clamp_channel(f64::from(pixel[0]) * brightness),
            clamp_channel(f64::from(pixel[1]) * brightness),
            clamp_channel(f64::from(pixel[2]) * brightness),
            OPAQUE,
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn dimensions_are_preserved() {
        let out = vignette(&white(17, 31));
        assert_eq!(out.dimensions(), (17, 31));
    }

    #[test]
    fn center_pixel_keeps_its_color() {
        let img = RgbaImage::from_pixel(21, 21, Rgba([200, 150, 100, 255]));
        let out = vignette(&img);
        assert_eq!(out.get_pixel(10, 10).0, [200, 150, 100, 255]);
    }

    #[test]
    fn corners_are_darkest() {
        let out = vignette(&white(21, 21));
        let corner = out.get_pixel(0, 0)[0];
        let center = out.get_pixel(10, 10)[0];
        assert!(corner < center, "corner {corner} not darker than {center}");
        // The (0, 0) corner sits at exactly max_dist from the center.
        assert_eq!(corner, 0);
    }

    #[test]
    fn brightness_decreases_away_from_center() {
        let out = vignette(&white(41, 41));
        let mut previous = 256i32;
        for x in 20..41 {
            let value = i32::from(out.get_pixel(x, 20)[0]);
            assert!(
                value < previous,
                "brightness did not decrease at x={x}: {value} >= {previous}",
            );
            previous = value;
        }
    }

    #[test]
    fn black_stays_black() {
        let img = RgbaImage::from_pixel(9, 9, Rgba([0, 0, 0, 255]));
        let out = vignette(&img);
        for p in out.pixels() {
            assert_eq!(p.0, [0, 0, 0, 255]);
        }
    }

    #[test]
    fn alpha_is_opaque() {
        let img = RgbaImage::from_pixel(9, 9, Rgba([40, 40, 40, 0]));
        let out = vignette(&img);
        for p in out.pixels() {
            assert_eq!(p[3], 255);
        }
    }

    #[test]
    fn vignette_is_deterministic() {
        let img = RgbaImage::from_fn(24, 18, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = ((x * 11 + y * 5) % 256) as u8;
            Rgba([v, v, v, 255])
        });
        let a = vignette(&img);
        let b = vignette(&img);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn single_pixel_passes_through() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([77, 88, 99, 255]));
        let out = vignette(&img);
        assert_eq!(out.get_pixel(0, 0).0, [77, 88, 99, 255]);
    }
}
