//! Offline replay of a recorded try-on session.
//!
//! Reads frame images and the landmark recording, runs them through a full
//! camera session and writes one composited PNG per frame.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use virtual_tryon::{
    compositor::FrameOutcome,
    config::Config,
    replay::{ImageSequenceSource, RecordedLandmarks},
    session::Session,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory of frame images, processed in file-name order
    #[arg(short, long)]
    frames: PathBuf,

    /// Landmark recording (YAML)
    #[arg(short, long)]
    landmarks: PathBuf,

    /// Output directory for composited frames
    #[arg(short, long, default_value = "out")]
    out: PathBuf,

    /// Eyewear image (overrides the configured asset)
    #[arg(short, long)]
    asset: Option<PathBuf>,

    /// Overlay size in percent (70-140)
    #[arg(short, long)]
    size: Option<u32>,

    /// Overlay opacity in percent (30-100)
    #[arg(long)]
    alpha: Option<u32>,

    /// Disable selfie mirroring
    #[arg(long)]
    no_mirror: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Virtual try-on replay");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(asset) = args.asset {
        config.overlay.asset = asset;
    }
    if let Some(size) = args.size {
        config.overlay.size_percent = size;
    }
    if let Some(alpha) = args.alpha {
        config.overlay.alpha_percent = alpha;
    }
    if args.no_mirror {
        config.display.mirror = false;
    }

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    let mut session = Session::from_config(
        ImageSequenceSource::new(&args.frames),
        RecordedLandmarks::from_file(&args.landmarks),
        &config,
    )?;
    session.start().context("starting replay session")?;

    let mut overlaid = 0usize;
    let mut processed = 0usize;
    while let Some(report) = session.step()? {
        processed += 1;
        match report.outcome {
            FrameOutcome::Overlaid { rotation, placement } => {
                overlaid += 1;
                info!(
                    "Frame {}: pitch {:.1} yaw {:.1} roll {:.1}, overlay {:.0}x{:.0} at ({:.0}, {:.0})",
                    report.index,
                    rotation.pitch,
                    rotation.yaw,
                    rotation.roll,
                    placement.width,
                    placement.height,
                    placement.center_x,
                    placement.center_y
                );
            }
            FrameOutcome::Skipped => warn!("Frame {}: landmarks unusable, overlay skipped", report.index),
            FrameOutcome::NoFace => info!("Frame {}: no face", report.index),
        }

        let path = args.out.join(format!("frame_{:05}.png", report.index));
        session.capture_to(&path)?;
    }

    if processed > 0 {
        let snapshot = session.capture(&args.out)?;
        info!("Last frame captured to {}", snapshot.display());
    }

    info!("Processed {processed} frames, overlay drawn on {overlaid}");
    Ok(())
}
