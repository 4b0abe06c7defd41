use anyhow::{Context, Result};
use clap::Parser;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "handprep-cli")]
#[command(about = "Convert hand-pose depth frames into depth maps and segmentation labels", long_about = None)]
#[command(version)]
struct Args {
    /// Input dataset directory
    #[arg(value_name = "DATASET_DIR")]
    dataset_dir: PathBuf,

    /// Output directory (train/ and test/ are created inside)
    #[arg(value_name = "OUT_DIR")]
    out_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, default_value_t)]
    verbose: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, default_value_t)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose, args.quiet);

    if !args.dataset_dir.is_dir() {
        anyhow::bail!(
            "Dataset directory does not exist: {}",
            args.dataset_dir.display()
        );
    }

    let counts = handprep::convert_dataset(&args.dataset_dir, &args.out_dir)
        .context("Failed to convert dataset")?;

    if !args.quiet {
        log::info!(
            "Done: {} train and {} test frames written to {}",
            counts.train,
            counts.test,
            args.out_dir.display()
        );
    }

    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}
