//! Simple ray tracer example.
//!
//! Renders the built-in demo scene and saves it in PPM format.

use glint_core::SceneDescription;
use glint_renderer::{render, FrameBuffer, GridConfig, RenderConfig, Scene};
use std::fs::File;
use std::io::BufWriter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("Glint Ray Tracer - Simple Example");
    println!("=================================");

    // Build the scene
    let start = std::time::Instant::now();
    let desc = SceneDescription::demo();
    let mut scene = Scene::from_description(&desc)?;
    scene.build_grid(&GridConfig::default())?;
    println!("Scene built in {:?}", start.elapsed());

    let config = RenderConfig {
        width: 640,
        height: 500,
        ..Default::default()
    };

    println!(
        "Rendering {}x{} at depth {}...",
        config.width, config.height, config.max_depth
    );

    let mut frame = FrameBuffer::new(config.width, config.height);
    let stats = render(&scene, &desc.view, &config, &mut frame)?;
    println!(
        "Rendered in {:?} ({} edge pixels supersampled)",
        stats.elapsed, stats.trace.supersampled_pixels
    );

    // Save as PPM
    let filename = "output.ppm";
    frame.write_ppm(BufWriter::new(File::create(filename)?))?;
    println!("Saved to {}", filename);

    Ok(())
}
