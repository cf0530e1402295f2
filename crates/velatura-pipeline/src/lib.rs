//! velatura-pipeline: configurable raster filter chains (sans-IO).
//!
//! A pipeline description — a small line-oriented text format — is
//! parsed into an ordered [`Chain`] of filter [`Stage`]s:
//! additive noise, kernel convolution, radial vignette, and luminance
//! grayscale. The chain is built once and then applied to any number
//! of in-memory RGBA buffers.
//!
//! This crate has **no I/O dependencies** — it operates on in-memory
//! [`RgbaImage`] buffers and returns structured data. File decoding,
//! batch iteration, persistence, and logging live in the `velatura`
//! driver binary.
//!
//! Every stage upholds two invariants: output channels are clamped
//! into [0, 255] (never wrapped), and alpha is written fully opaque.
//! Stages are pure functions of their input buffer, with one
//! deliberate exception — the noise stage draws from an unseeded RNG
//! and is non-deterministic across runs.

pub mod chain;
pub mod convolve;
pub mod grayscale;
pub mod kernel;
pub mod noise;
pub mod parse;
pub mod stage;
pub mod types;
pub mod vignette;

pub use chain::{Chain, ChainReport, StageRecord, StageReport, StagedRun};
pub use kernel::Kernel;
pub use parse::parse_chain;
pub use stage::Stage;
pub use types::{Dimensions, PipelineError, RgbaImage};

/// Parse a pipeline description and run it over one input buffer.
///
/// Convenience for callers that do not need per-stage output or
/// timing; equivalent to [`parse_chain`] followed by [`Chain::run`].
///
/// # Errors
///
/// Returns any [`PipelineError`] raised while parsing the description
/// or constructing its stages. Once a chain is built, execution
/// itself cannot fail.
pub fn process(description: &str, input: &RgbaImage) -> Result<RgbaImage, PipelineError> {
    let chain = parse_chain(description)?;
    Ok(chain.run(input))
}
