//! Glint Renderer - grid-accelerated recursive ray tracing on the CPU.
//!
//! Scenes are flat lists of spheres, planes, triangles and spherical lights.
//! A uniform grid over a fixed world cube accelerates nearest-hit queries,
//! and each hit is shaded Whitted-style: diffuse and Phong specular light
//! with hard shadows, plus recursive reflection and refraction.
//!
//! # Example
//!
//! ```ignore
//! use glint_core::SceneDescription;
//! use glint_renderer::{render, FrameBuffer, GridConfig, RenderConfig, Scene};
//!
//! let desc = SceneDescription::demo();
//! let mut scene = Scene::from_description(&desc)?;
//! scene.build_grid(&GridConfig::default())?;
//!
//! let config = RenderConfig::default();
//! let mut frame = FrameBuffer::new(config.width, config.height);
//! render(&scene, &desc.view, &config, &mut frame)?;
//! ```

mod camera;
mod error;
mod grid;
mod mailbox;
mod material;
mod plane;
mod primitive;
mod renderer;
mod scene;
mod sphere;
mod surface;
mod tracer;
mod triangle;

pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use grid::{Grid, GridConfig};
pub use material::{Color, Material};
pub use plane::Plane;
pub use primitive::{Primitive, PrimitiveId, PrimitiveKind, Shape};
pub use renderer::{color_to_pixel, render, RenderConfig, RenderStats, Traversal};
pub use scene::Scene;
pub use sphere::Sphere;
pub use surface::{unpack_rgb, FrameBuffer, Surface};
pub use tracer::{Hit, TraceContext, TraceStats, Tracer};
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Aabb, Ray, Vec3};
