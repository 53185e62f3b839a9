//! Glint command line renderer.
//!
//! Loads a JSON scene (or the built-in demo), optionally adds OBJ meshes,
//! renders it and writes the frame to a PNG or PPM file.

mod cli;
mod output;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use glint_core::{MeshDesc, SceneDescription};
use glint_renderer::{render, GridConfig, RenderConfig, Scene};
use log::{info, LevelFilter};

use cli::Args;
use output::ImageSurface;

fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn load_description(args: &Args) -> Result<SceneDescription> {
    let mut desc = match &args.scene {
        Some(path) => SceneDescription::load(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            info!("No scene given, using the demo scene");
            SceneDescription::demo()
        }
    };

    // Command line meshes resolve against the working directory, not the scene file
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    for path in &args.meshes {
        desc.meshes.push(MeshDesc::new(cwd.join(path)));
    }

    Ok(desc)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let config = RenderConfig {
        width: args.width,
        height: args.height,
        max_depth: args.max_depth,
        traversal: args.traversal.into(),
        anti_alias: !args.no_aa,
        parallel: !args.single_threaded,
        ..Default::default()
    };
    let grid_config = GridConfig {
        cells_per_axis: args.grid_size,
        ..Default::default()
    };

    let start = Instant::now();
    let desc = load_description(&args)?;
    let mut scene = Scene::from_description(&desc).context("Failed to build scene")?;
    scene
        .build_grid(&grid_config)
        .context("Failed to build scene grid")?;
    info!("Scene ready in {:.2?}", start.elapsed());

    let mut surface = ImageSurface::new(config.width, config.height, &args.output);
    let stats = render(&scene, &desc.view, &config, &mut surface)
        .with_context(|| format!("Failed to render to {}", surface.path().display()))?;

    info!(
        "Done in {:.2?} ({} trace calls)",
        stats.elapsed, stats.trace.trace_calls
    );
    Ok(())
}
