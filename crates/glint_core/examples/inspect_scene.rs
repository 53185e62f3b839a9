//! Example: Load and inspect a JSON scene file.
//!
//! Run with: cargo run --example inspect_scene -- scenes/demo.json

use std::env;

use glint_core::{PrimitiveDesc, SceneDescription};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let scene = if args.len() < 2 {
        println!("No scene given, inspecting the built-in demo scene");
        SceneDescription::demo()
    } else {
        match SceneDescription::load(&args[1]) {
            Ok(scene) => scene,
            Err(e) => {
                eprintln!("Failed to load {}: {}", args[1], e);
                std::process::exit(1);
            }
        }
    };

    let primitives = match scene.expand_primitives() {
        Ok(primitives) => primitives,
        Err(e) => {
            eprintln!("Failed to expand meshes: {}", e);
            std::process::exit(1);
        }
    };

    println!("Eye: {}", scene.view.eye);
    println!("Primitives: {}", primitives.len());
    for (i, primitive) in primitives.iter().enumerate().take(20) {
        match primitive {
            PrimitiveDesc::Sphere { center, radius, .. } => {
                println!("  [{}] sphere   center={} radius={}", i, center, radius)
            }
            PrimitiveDesc::Plane { normal, offset, .. } => {
                println!("  [{}] plane    normal={} offset={}", i, normal, offset)
            }
            PrimitiveDesc::Triangle { vertices, .. } => {
                println!("  [{}] triangle {:?}", i, vertices)
            }
            PrimitiveDesc::Light { center, radius, .. } => {
                println!("  [{}] light    center={} radius={}", i, center, radius)
            }
        }
    }
    if primitives.len() > 20 {
        println!("  ... {} more", primitives.len() - 20);
    }
}
