//! Glint Core - Scene description and mesh import for the Glint ray tracer.
//!
//! This crate provides:
//!
//! - **Scene description**: `SceneDescription`, `PrimitiveDesc`, `MaterialDesc`, `View`
//!   loaded from JSON, plus the built-in demo scene
//! - **Mesh import**: Wavefront OBJ files triangulated into `Mesh` geometry
//!
//! It knows nothing about intersection or shading; the renderer turns a
//! description into its own primitives.
//!
//! # Example
//!
//! ```ignore
//! use glint_core::SceneDescription;
//!
//! let scene = SceneDescription::load("scene.json")?;
//! let primitives = scene.expand_primitives()?;
//! println!("{} primitives", primitives.len());
//! ```

pub mod error;
pub mod mesh;
pub mod obj;
pub mod scene;

// Re-export commonly used types
pub use error::{SceneError, SceneResult};
pub use mesh::Mesh;
pub use obj::{load_obj, ObjModel};
pub use scene::{
    MaterialDesc, MeshDesc, PrimitiveDesc, SceneDescription, ScreenWindow, Transform, View,
};
