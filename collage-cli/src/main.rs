use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::Rng;

use collage_core::LayoutConfig;
use collage_io::{load_backgrounds, SourceDataset};

mod batch;
mod error;

use batch::{run_batch, BatchConfig};
use error::CliError;

/// Augment multi-object images from labelme annotations and background images.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of output samples
    #[arg(short = 'n', long, value_name = "COUNT")]
    samplenum: usize,

    /// Input folder with labelme JSON files and their images
    #[arg(short = 'i', long, value_name = "DIR")]
    jsondir: PathBuf,

    /// Input folder with background images
    #[arg(short = 'b', long, value_name = "DIR")]
    bgdir: PathBuf,

    /// Output folder for composite images and JSON files
    #[arg(short = 'o', long, value_name = "DIR")]
    outdir: PathBuf,

    /// Minimum objects in an image
    #[arg(long, default_value_t = 2)]
    min: usize,

    /// Maximum objects in an image
    #[arg(long, default_value_t = 4)]
    max: usize,

    /// Output name prefix, e.g. "buscard" -> "buscard_00001.jpg"
    #[arg(long, default_value = "merge")]
    dataname: String,

    /// Seed for reproducible output; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Random positions tried per object before the canvas grows
    #[arg(long, default_value_t = 50)]
    attempts: u32,

    /// Canvas growth rounds allowed per sample
    #[arg(long = "max-growth", default_value_t = 20)]
    max_growth: u32,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(error::ErrorCode::Usage as u8)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if cli.min == 0 || cli.min > cli.max {
        return Err(CliError::usage(format!(
            "--min ({}) must be at least 1 and not exceed --max ({})",
            cli.min, cli.max
        )));
    }

    let dataset = SourceDataset::open(&cli.jsondir).map_err(|e| CliError::input(e.to_string()))?;

    log::info!("Loading backgrounds from {}", cli.bgdir.display());
    let backgrounds = load_backgrounds(&cli.bgdir).map_err(|e| CliError::input(e.to_string()))?;

    std::fs::create_dir_all(&cli.outdir).map_err(|e| {
        CliError::input(format!(
            "Failed to create output folder {}: {}",
            cli.outdir.display(),
            e
        ))
    })?;

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    log::info!("Generating {} samples (seed {})", cli.samplenum, seed);

    let config = BatchConfig {
        samples: cli.samplenum,
        min_objects: cli.min,
        max_objects: cli.max,
        dataname: cli.dataname,
        seed,
        quality: cli.quality,
        layout: LayoutConfig {
            max_attempts: cli.attempts,
            max_growth_rounds: cli.max_growth,
            ..LayoutConfig::default()
        },
    };

    let report = run_batch(&dataset, &backgrounds, &cli.outdir, &config);
    if report.written == 0 && report.failed > 0 {
        return Err(CliError::processing(format!(
            "All {} samples failed",
            report.failed
        )));
    }
    Ok(())
}
