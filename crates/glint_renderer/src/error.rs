//! Errors at the renderer boundary.
//!
//! The tracing core itself never fails: misses are `f32::INFINITY` or `None`.
//! These errors cover setup and presentation only.

use glint_core::SceneError;
use thiserror::Error;

/// Errors that can occur while preparing or presenting a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Surface is {actual_width}x{actual_height}, render is {width}x{height}")]
    SurfaceSize {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Scene grid has not been built")]
    GridNotBuilt,

    #[error("Failed to present frame: {0}")]
    Present(#[from] std::io::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
