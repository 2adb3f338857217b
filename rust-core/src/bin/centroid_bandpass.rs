//! Centroid-preserving bandpass command line
//!
//! Usage:
//!     centroid-bandpass filter -f sounds/violin.wav -w 500
//!     centroid-bandpass filter -f sounds/violin.wav -r 0.25 --step-gain 0.2
//!     centroid-bandpass batch -f job.yml

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;

use centroid_bandpass::batch::{load_wav, resample, save_wav, BatchRunner, ItemOutcome};
use centroid_bandpass::{CentroidBandpass, ConvergenceConfig, FilterKind, StftCentroid};

/// Bandpass audio while preserving its spectral centroid
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Log every iteration of the search
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter a single WAV file
    Filter(FilterArgs),
    /// Run a YAML batch job
    Batch {
        /// Job description file
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Input WAV file
    #[arg(short = 'f', long = "file")]
    file: PathBuf,

    /// Bandwidth in Hz
    #[arg(short = 'w', long, conflicts_with = "ratio", required_unless_present = "ratio")]
    bandwidth: Option<f64>,

    /// Bandwidth as a multiple of the input centroid
    #[arg(short = 'r', long)]
    ratio: Option<f64>,

    /// Processing sample rate in Hz
    #[arg(short = 's', long, default_value_t = 44100)]
    sample_rate: u32,

    /// Output WAV file (default: <input dir>/outs/bp_w_<bandwidth>_<name>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Accepted centroid error in Hz
    #[arg(long, default_value_t = 0.2)]
    tolerance: f64,

    /// Maximum number of filtering passes
    #[arg(long, default_value_t = 30)]
    max_iterations: usize,

    /// Correction gain in (0, 1]
    #[arg(long, default_value_t = 1.0)]
    step_gain: f64,

    /// Filter family
    #[arg(long, value_enum, default_value_t = FilterKind::Biquad)]
    filter: FilterKind,
}

fn default_output(input: &Path, bandwidth_hz: f64) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new("."));
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.wav".to_string());

    dir.join("outs")
        .join(format!("bp_w_{}_{}", bandwidth_hz as i64, name))
}

fn run_filter(args: FilterArgs) -> Result<()> {
    let audio = load_wav(&args.file)?;
    let audio = resample(&audio, args.sample_rate)
        .with_context(|| format!("Failed to resample {}", args.file.display()))?;

    let engine = CentroidBandpass::with_components(
        StftCentroid::default(),
        args.filter,
        ConvergenceConfig {
            tolerance_hz: args.tolerance,
            max_iterations: args.max_iterations,
            step_gain: args.step_gain,
        },
    );

    let bandwidth = match (args.bandwidth, args.ratio) {
        (Some(bandwidth), _) => bandwidth,
        (None, Some(ratio)) => {
            let centroid = engine.measure_centroid(&audio.samples, audio.sample_rate)?;
            ratio * centroid
        }
        (None, None) => anyhow::bail!("Either --bandwidth or --ratio is required"),
    };

    let outcome = engine
        .apply(&audio.samples, bandwidth, audio.sample_rate)
        .with_context(|| format!("Failed to filter {}", args.file.display()))?;

    println!(
        "{}: bandwidth {:.1} Hz, center {:.3} Hz, centroid {:.3} -> {:.3} Hz \
         after {} iteration(s){}",
        args.file.display(),
        bandwidth,
        outcome.center_hz,
        outcome.target_centroid_hz,
        outcome.measured_centroid_hz,
        outcome.iterations,
        if outcome.is_converged() { "" } else { " (not converged)" }
    );

    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.file, bandwidth));
    if let Some(dir) = output.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    save_wav(&output, &outcome.signal, audio.sample_rate)?;
    println!("Saved {}", output.display());

    Ok(())
}

fn run_batch(file: &Path) -> Result<()> {
    let runner = BatchRunner::from_yaml_file(file)
        .with_context(|| format!("Failed to load job {}", file.display()))?;
    let report = runner.run()?;

    for item in &report.items {
        match &item.outcome {
            ItemOutcome::Reference { output } => println!("Saved {}", output.display()),
            ItemOutcome::Filtered {
                output,
                iterations,
                status,
                ..
            } => println!("Saved {} ({:?}, {} iteration(s))", output.display(), status, iterations),
            ItemOutcome::Failed {
                bandwidth_hz,
                error,
            } => match bandwidth_hz {
                Some(bw) => eprintln!("Failed {} at {} Hz: {}", item.input.display(), bw, error),
                None => eprintln!("Failed {}: {}", item.input.display(), error),
            },
        }
    }

    if !report.is_success() {
        anyhow::bail!("{} item(s) failed", report.failure_count());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Command::Filter(args) => run_filter(args),
        Command::Batch { file } => run_batch(&file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let output = default_output(Path::new("sounds/violin.wav"), 500.7);
        assert_eq!(output, PathBuf::from("sounds/outs/bp_w_500_violin.wav"));
    }

    #[test]
    fn test_bandwidth_and_ratio_are_exclusive() {
        assert!(Cli::try_parse_from([
            "centroid-bandpass",
            "filter",
            "-f",
            "a.wav",
            "-w",
            "200",
            "-r",
            "0.5",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["centroid-bandpass", "filter", "-f", "a.wav"]).is_err());

        let cli = Cli::try_parse_from([
            "centroid-bandpass",
            "-v",
            "filter",
            "-f",
            "a.wav",
            "-r",
            "0.5",
            "--filter",
            "fir",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Filter(args) => {
                assert_eq!(args.ratio, Some(0.5));
                assert_eq!(args.filter, FilterKind::Fir);
                assert_eq!(args.sample_rate, 44100);
            }
            Command::Batch { .. } => panic!("expected filter subcommand"),
        }
    }
}
