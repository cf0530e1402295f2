//! velatura: apply a configurable chain of image filters to files.
//!
//! Reads a pipeline description file, builds the filter chain once,
//! and runs it over a single image or every `.png` in a directory.
//! Optionally persists each stage's intermediate output and logs
//! per-stage timing.
//!
//! # Usage
//!
//! ```text
//! velatura [OPTIONS] --pipe <PATH> --input <PATH> --output <PATH>
//! ```
//!
//! Pipeline and stage-parameter errors are fatal before any image is
//! touched. In directory mode a failure on one image is logged and the
//! rest of the batch continues.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use velatura_pipeline::{Chain, StagedRun};

/// Apply a configurable chain of image filters.
///
/// The pipeline file declares one stage per line (`convolve`, `noise`,
/// `vignette`, `greyscale`) with `key=value` parameter tokens; see the
/// velatura-pipeline documentation for the format.
#[derive(Parser)]
#[command(name = "velatura", version)]
struct Cli {
    /// Path to the pipeline description file.
    #[arg(long = "pipe")]
    pipeline: PathBuf,

    /// Input image, or a directory of .png images.
    #[arg(long)]
    input: PathBuf,

    /// Output image path, or output directory when the input is a
    /// directory.
    #[arg(long)]
    output: PathBuf,

    /// Save every intermediate stage output next to the final image.
    #[arg(long)]
    save_all: bool,

    /// Log each stage's name, output size and elapsed time.
    #[arg(long, short)]
    verbose: bool,

    /// Print the timing report as JSON instead of logging it.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let description = match fs::read_to_string(&cli.pipeline) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.pipeline.display());
            return ExitCode::FAILURE;
        }
    };

    let chain = match velatura_pipeline::parse_chain(&description) {
        Ok(chain) => chain,
        Err(e) => {
            eprintln!("Error in {}: {e}", cli.pipeline.display());
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "loaded pipeline {} ({} stages)",
        cli.pipeline.display(),
        chain.len(),
    );

    if cli.input.is_dir() {
        run_batch(&cli, &chain)
    } else {
        run_single(&cli, &chain)
    }
}

/// Route `log` output to stderr; `--verbose` lifts the filter so the
/// per-stage lines show.
fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Process one input image; any failure is fatal.
fn run_single(cli: &Cli, chain: &Chain) -> ExitCode {
    let save_dir = cli.save_all.then(|| intermediate_dir(&cli.output));

    match process_image(cli, chain, &cli.input, &cli.output, save_dir.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Process every `.png` in the input directory. A failing image is
/// reported and skipped; the batch continues.
fn run_batch(cli: &Cli, chain: &Chain) -> ExitCode {
    let images = match collect_png_paths(&cli.input) {
        Ok(paths) => paths,
        Err(message) => {
            eprintln!("Error: {message}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::create_dir_all(&cli.output) {
        eprintln!("Error creating {}: {e}", cli.output.display());
        return ExitCode::FAILURE;
    }

    let mut failures = 0usize;
    for image_path in &images {
        let stem = file_stem(image_path);
        let output_path = cli.output.join(format!("{stem}.png"));
        let save_dir = cli
            .save_all
            .then(|| cli.output.join(format!("intermediate-{stem}")));

        if let Err(message) = process_image(cli, chain, image_path, &output_path, save_dir.as_deref())
        {
            log::error!("skipping {}: {message}", image_path.display());
            failures += 1;
        }
    }

    log::info!("processed {}/{} images", images.len() - failures, images.len());
    if failures > 0 {
        eprintln!("{failures} of {} images failed", images.len());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Decode, run the chain, persist intermediates, write the final image.
fn process_image(
    cli: &Cli,
    chain: &Chain,
    image_path: &Path,
    output_path: &Path,
    save_dir: Option<&Path>,
) -> Result<(), String> {
    let input = image::open(image_path)
        .map_err(|e| format!("reading {}: {e}", image_path.display()))?
        .to_rgba8();

    log::info!(
        "running pipeline on {} ({}x{})",
        image_path.display(),
        input.width(),
        input.height(),
    );

    let staged = chain.run_staged(&input);

    if let Some(dir) = save_dir {
        persist_intermediates(dir, &staged)?;
    }

    let report = staged.report();
    if cli.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("serializing timing report: {e}"))?;
        println!("{json}");
    } else {
        for stage in &report.stages {
            log::info!(
                "{:<24} {:>12} {:>8.3}ms",
                stage.label,
                stage.dimensions.to_string(),
                stage.duration.as_secs_f64() * 1000.0,
            );
        }
    }

    let destination = with_png_extension(output_path);
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| format!("creating {}: {e}", parent.display()))?;
    }
    staged
        .output
        .save(&destination)
        .map_err(|e| format!("writing {}: {e}", destination.display()))?;

    log::info!("wrote {}", destination.display());
    Ok(())
}

/// Write every stage's output buffer into `dir`, one file per stage,
/// indexed so repeated identical stages cannot collide.
fn persist_intermediates(dir: &Path, staged: &StagedRun) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| format!("creating {}: {e}", dir.display()))?;

    for (index, record) in staged.records.iter().enumerate() {
        let file = dir.join(format!("{:02}-{}.png", index + 1, record.label));
        record
            .buffer
            .save(&file)
            .map_err(|e| format!("writing {}: {e}", file.display()))?;
        log::info!("wrote {}", file.display());
    }
    Ok(())
}

/// All `.png` files directly inside `dir`, sorted for a stable batch
/// order. An unreadable or imageless directory is an error.
fn collect_png_paths(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(dir).map_err(|e| format!("reading {}: {e}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(format!(
            "input folder {} does not contain any .png image",
            dir.display(),
        ));
    }
    Ok(paths)
}

/// The input image's file stem, for naming batch outputs.
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "image".to_string(), |s| s.to_string_lossy().into_owned())
}

/// Append a `.png` extension when the output path has none.
fn with_png_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("png")
    }
}

/// Directory for a single-image run's intermediates: a sibling of the
/// output file named after its stem.
fn intermediate_dir(output: &Path) -> PathBuf {
    let stem = file_stem(output);
    output
        .parent()
        .map_or_else(PathBuf::new, Path::to_path_buf)
        .join(format!("intermediate-{stem}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_png_extension_appends_when_missing() {
        assert_eq!(
            with_png_extension(Path::new("out/result")),
            PathBuf::from("out/result.png"),
        );
    }

    #[test]
    fn with_png_extension_keeps_existing() {
        assert_eq!(
            with_png_extension(Path::new("out/result.jpeg")),
            PathBuf::from("out/result.jpeg"),
        );
    }

    #[test]
    fn file_stem_falls_back_for_bare_paths() {
        assert_eq!(file_stem(Path::new("photos/cat.png")), "cat");
        assert_eq!(file_stem(Path::new("..")), "image");
    }

    #[test]
    fn intermediate_dir_sits_next_to_the_output() {
        assert_eq!(
            intermediate_dir(Path::new("out/result.png")),
            PathBuf::from("out/intermediate-result"),
        );
        assert_eq!(
            intermediate_dir(Path::new("result.png")),
            PathBuf::from("intermediate-result"),
        );
    }
}
