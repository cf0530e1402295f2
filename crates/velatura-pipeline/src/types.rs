//! Shared types for the velatura filter pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can pass pixel buffers
/// around without depending on `image` directly.
pub use image::RgbaImage;

/// Alpha value written by every stage. Stages always produce fully
/// opaque output regardless of the input's alpha channel.
pub const OPAQUE: u8 = 255;

/// Upper bound of the RGB channel range, as a float for filter math.
pub const CHANNEL_MAX: f64 = 255.0;

/// Round a floating-point channel value and clamp it into [0, 255].
///
/// Every stage funnels its per-channel arithmetic through this (or
/// [`clamp_channel_i32`]) so out-of-range sums clamp instead of
/// wrapping.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_channel(value: f64) -> u8 {
    value.round().clamp(0.0, CHANNEL_MAX) as u8
}

/// Clamp an integer channel value into [0, 255].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_channel_i32(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Image dimensions in pixels.
///
/// `Display` renders the conventional `WxH` form used in logs and
/// timing reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of a pixel buffer.
    #[must_use]
    pub fn of(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Errors that can occur while loading a pipeline description.
///
/// All variants are raised before any image is processed: stage
/// parameters are validated at construction time and the parser fails
/// the whole parse on the first bad line. There is no skip-and-continue
/// for malformed configuration.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A stage was constructed with an out-of-range or unrecognized
    /// parameter (noise intensity outside [0, 1], unknown kernel name).
    #[error("invalid stage parameter: {0}")]
    InvalidParameter(String),

    /// The parser encountered a stage keyword outside the recognized set.
    #[error("unknown stage keyword `{0}`")]
    UnknownStage(String),

    /// The pipeline description is malformed or resolves to zero stages.
    #[error("invalid pipeline configuration: {0}")]
    ConfigError(String),
}
