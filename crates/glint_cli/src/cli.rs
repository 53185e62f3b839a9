use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glint_renderer::Traversal;
use log::LevelFilter;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Nearest-hit strategy names accepted by `--traversal`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TraversalArg {
    Grid,
    Brute,
}

impl From<TraversalArg> for Traversal {
    fn from(arg: TraversalArg) -> Self {
        match arg {
            TraversalArg::Grid => Traversal::Grid,
            TraversalArg::Brute => Traversal::BruteForce,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "glint")]
#[command(about = "Render a scene with the Glint ray tracer")]
pub struct Args {
    /// Scene description (JSON); the built-in demo scene when omitted
    pub scene: Option<PathBuf>,

    /// OBJ mesh to add to the scene (repeatable)
    #[arg(long = "mesh")]
    pub meshes: Vec<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value = "1024")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "800")]
    pub height: u32,

    /// Deepest reflection/refraction level
    #[arg(long, default_value = "4")]
    pub max_depth: u32,

    /// Grid cells per axis
    #[arg(long, default_value = "16")]
    pub grid_size: usize,

    /// Nearest-hit strategy
    #[arg(long, value_enum, default_value = "grid")]
    pub traversal: TraversalArg,

    /// Disable edge anti-aliasing
    #[arg(long)]
    pub no_aa: bool,

    /// Render on the calling thread only
    #[arg(long)]
    pub single_threaded: bool,

    /// Output file (.png, or .ppm for plain text)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
