//! Errors raised while loading or validating a scene description.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OBJ load error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("No triangles found in mesh file {0}")]
    EmptyMesh(PathBuf),

    #[error("Invalid primitive #{index}: {reason}")]
    InvalidPrimitive { index: usize, reason: String },

    #[error("Invalid view: {0}")]
    InvalidView(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
