//! The closed set of filter stages and their dispatch.
//!
//! A [`Stage`] is one named transformation with fixed parameters,
//! constructed once when the pipeline description is loaded and then
//! applied to any number of images. Parameters are validated at
//! construction, so a chain that builds successfully can no longer
//! fail while processing.

use std::fmt;

use crate::kernel::Kernel;
use crate::types::{PipelineError, RgbaImage};
use crate::{convolve, grayscale, noise, vignette};

/// One filter stage with its fixed parameters.
///
/// The variant set is closed: dispatch in [`Stage::transform`] is
/// exhaustive and checked at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Additive channel noise with intensity in [0, 1].
    Noise {
        /// Configured intensity, kept for the display name.
        intensity: f64,
        /// Derived perturbation bound `round(255 * intensity)`.
        max_delta: i32,
    },
    /// Spatial convolution against a library kernel.
    Convolve {
        /// The shared kernel matrix.
        kernel: &'static Kernel,
    },
    /// Radial vignette shading.
    Vignette,
    /// Luminance grayscale conversion.
    Grayscale,
}

impl Stage {
    /// Build a noise stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidParameter`] if `intensity` is
    /// outside [0, 1] (NaN included).
    pub fn noise(intensity: f64) -> Result<Self, PipelineError> {
        if !(0.0..=1.0).contains(&intensity) {
            return Err(PipelineError::InvalidParameter(format!(
                "noise intensity {intensity} is outside [0, 1]",
            )));
        }
        Ok(Self::Noise {
            intensity,
            max_delta: noise::max_delta(intensity),
        })
    }

    /// Build a convolve stage from a kernel name.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidParameter`] if `kernel_name` is
    /// not one of `edge`, `sharpen`, `blur`.
    pub fn convolve(kernel_name: &str) -> Result<Self, PipelineError> {
        Kernel::by_name(kernel_name)
            .map(|kernel| Self::Convolve { kernel })
            .ok_or_else(|| {
                PipelineError::InvalidParameter(format!(
                    "unknown kernel `{kernel_name}` (expected edge, sharpen, or blur)",
                ))
            })
    }

    /// Build a vignette stage.
    #[must_use]
    pub const fn vignette() -> Self {
        Self::Vignette
    }

    /// Build a grayscale stage.
    #[must_use]
    pub const fn grayscale() -> Self {
        Self::Grayscale
    }

    /// Apply this stage to one buffer, producing a new buffer.
    ///
    /// Stages never mutate their input; the output always satisfies
    /// the channel-range and opaque-alpha invariants.
    #[must_use = "returns the transformed image"]
    pub fn transform(&self, input: &RgbaImage) -> RgbaImage {
        match self {
            Self::Noise { max_delta, .. } => noise::add_noise(input, *max_delta),
            Self::Convolve { kernel } => convolve::convolve(input, kernel),
            Self::Vignette => vignette::vignette(input),
            Self::Grayscale => grayscale::grayscale(input),
        }
    }
}

/// The display name doubles as the stage's persistence file stem, so
/// it is filesystem-safe and distinguishes parameterized stages:
/// `noise-0.2`, `convolve-edge`, `vignette`, `greyscale`.
impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Noise { intensity, .. } => write!(f, "noise-{intensity}"),
            Self::Convolve { kernel } => write!(f, "convolve-{}", kernel.name()),
            Self::Vignette => f.write_str("vignette"),
            Self::Grayscale => f.write_str("greyscale"),
        }
    }
}
