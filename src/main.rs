use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use fanrig::fan::{FanModel, FanPreset, TraversalStats};
use fanrig::{AppConfig, Viewer, ViewerConfig};

/// Interactive viewer for an animated pedestal fan
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Fan model to build (overrides the config)
    #[arg(long, value_enum)]
    preset: Option<FanPreset>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Simulate this many 60 Hz frames without a window, then exit
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .filter_module("wgpu_hal", log::LevelFilter::Warn)
        .filter_module("naga", log::LevelFilter::Warn)
        .format_timestamp(None)
        .init();

    if let Err(err) = run(Cli::parse()) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(preset) = cli.preset {
        config.model.preset = preset;
    }
    if let Some(width) = cli.width {
        config.window.width = width;
    }
    if let Some(height) = cli.height {
        config.window.height = height;
    }
    config.validate().context("invalid command-line overrides")?;

    let model = FanModel::build(config.model.preset)
        .with_context(|| format!("building {} fan model", config.model.preset.name()))?;
    let viewer = Viewer::new(model, config.animation, config.camera.to_state());

    match cli.headless {
        Some(frames) => run_headless(viewer, frames),
        None => {
            let app: AppConfig = config.app_config();
            fanrig::run(app, viewer).context("running viewer")
        }
    }
}

fn run_headless(mut viewer: Viewer, frames: u32) -> Result<()> {
    let mut totals = TraversalStats::default();
    for frame in 0..frames {
        viewer.advance(1000.0 / 60.0);
        let mut stats = TraversalStats::default();
        viewer
            .submit(&mut stats)
            .with_context(|| format!("traversing frame {frame}"))?;
        totals.nodes += stats.nodes;
        totals.draws += stats.draws;
    }

    log::info!(
        "headless: {} frames, {} node visits, {} draws, {} triangles/frame",
        frames,
        totals.nodes,
        totals.draws,
        viewer.model.triangles_per_frame()
    );
    log::info!(
        "final pose: oscillation {:.2}°, blades {:.2}°, clock {:.0} ms",
        viewer.state.oscillation_deg,
        viewer.state.blade_deg,
        viewer.clock.now_ms()
    );
    Ok(())
}
