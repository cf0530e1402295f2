//! The line-oriented pipeline description parser.
//!
//! Each non-comment line carries whitespace-separated tokens. A
//! `key=value` token is a parameter, recognized by its *value*: a
//! kernel name (`edge`/`sharpen`/`blur`) or a floating-point noise
//! intensity. A bare token must be a stage keyword (`convolve`,
//! `noise`, `vignette`, `greyscale`).
//!
//! Parameters are carried forward: whichever kernel name or noise
//! value was seen most recently — on the same line or an earlier one —
//! binds to the next stage keyword that needs it, and is read rather
//! than cleared, so one parameter can feed several stages. This
//! cross-line carry is part of the accepted configuration format:
//!
//! ```text
//! # sketch, then soften
//! kernel=edge convolve
//! noise=0.2 noise
//! vignette
//! greyscale
//! ```
//!
//! Any malformed line fails the whole parse; there is no
//! skip-and-continue.

use crate::chain::Chain;
use crate::stage::Stage;
use crate::types::PipelineError;

/// Pending `key=value` parameters, overwritten as tokens are read and
/// consumed (not cleared) by the stage keywords that need them.
#[derive(Debug, Default)]
struct PendingParams {
    kernel: Option<String>,
    noise: Option<f64>,
}

impl PendingParams {
    /// Record a parameter token's value if it is recognizable as a
    /// kernel name or a noise intensity. Anything else is ignored and
    /// disturbs nothing.
    fn capture(&mut self, value: &str) {
        if matches!(value, "edge" | "sharpen" | "blur") {
            self.kernel = Some(value.to_string());
        } else if let Ok(intensity) = value.parse::<f64>() {
            self.noise = Some(intensity);
        }
    }
}

/// Parse a pipeline description into an executable [`Chain`].
///
/// # Errors
///
/// Returns [`PipelineError::UnknownStage`] for an unrecognized stage
/// keyword, [`PipelineError::InvalidParameter`] for an out-of-range
/// noise intensity or unknown kernel name, and
/// [`PipelineError::ConfigError`] for an empty line, a stage keyword
/// whose parameter was never provided, or a description that resolves
/// to zero stages.
pub fn parse_chain(text: &str) -> Result<Chain, PipelineError> {
    let mut stages = Vec::new();
    let mut pending = PendingParams::default();

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();

        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            return Err(PipelineError::ConfigError(format!(
                "line {line_number}: empty line",
            )));
        }

        for token in line.split_whitespace() {
            if let Some((_key, value)) = token.split_once('=') {
                pending.capture(value);
            } else {
                stages.push(build_stage(token, &pending, line_number)?);
            }
        }
    }

    Chain::new(stages)
}

/// Construct the stage a keyword names, drawing on the pending
/// parameters.
fn build_stage(
    keyword: &str,
    pending: &PendingParams,
    line_number: usize,
) -> Result<Stage, PipelineError> {
    match keyword {
        "convolve" => {
            let kernel = pending.kernel.as_deref().ok_or_else(|| {
                PipelineError::ConfigError(format!(
                    "line {line_number}: convolve requires a kernel parameter",
                ))
            })?;
            Stage::convolve(kernel)
        }
        "noise" => {
            let intensity = pending.noise.ok_or_else(|| {
                PipelineError::ConfigError(format!(
                    "line {line_number}: noise requires an intensity parameter",
                ))
            })?;
            Stage::noise(intensity)
        }
        "vignette" => Ok(Stage::vignette()),
        "greyscale" => Ok(Stage::grayscale()),
        other => Err(PipelineError::UnknownStage(other.to_string())),
    }
}
