//! Scene description types for Glint.
//!
//! A [`SceneDescription`] is the renderer-agnostic input: primitives with
//! their materials, OBJ meshes to import, and the view (eye point and screen
//! window). It can be loaded from JSON or taken from [`SceneDescription::demo`].

use std::fs;
use std::path::{Path, PathBuf};

use glint_math::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};
use crate::obj::load_obj;

/// Colour given to mesh triangles whose OBJ file carries no material.
pub const DEFAULT_MESH_COLOR: Vec3 = Vec3::new(0.5, 0.5, 0.5);

/// Surface attributes of a primitive.
///
/// The specular coefficient is not stored: it is always `1 - diffuse`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
    /// Diffuse colour (RGB, 0-1)
    pub color: Vec3,

    /// Diffuse coefficient (0-1)
    pub diffuse: f32,

    /// Reflection coefficient (0-1)
    pub reflection: f32,

    /// Refraction coefficient (0-1)
    pub refraction: f32,

    /// Index of refraction (> 0)
    pub refractive_index: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            color: Vec3::ZERO,
            diffuse: 1.0,
            reflection: 0.2,
            refraction: 0.1,
            refractive_index: 1.0,
        }
    }
}

impl MaterialDesc {
    /// Default material with the given colour.
    pub fn new(color: Vec3) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Flat material given to imported mesh triangles.
    pub fn mesh(color: Vec3) -> Self {
        Self {
            color,
            diffuse: 0.8,
            reflection: 0.0,
            refraction: 0.0,
            refractive_index: 1.0,
        }
    }

    pub fn with_diffuse(mut self, diffuse: f32) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn with_reflection(mut self, reflection: f32) -> Self {
        self.reflection = reflection;
        self
    }

    pub fn with_refraction(mut self, refraction: f32) -> Self {
        self.refraction = refraction;
        self
    }

    pub fn with_refractive_index(mut self, refractive_index: f32) -> Self {
        self.refractive_index = refractive_index;
        self
    }

    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("diffuse", self.diffuse),
            ("reflection", self.reflection),
            ("refraction", self.refraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} coefficient {} is outside [0, 1]", name, value));
            }
        }
        if !(self.refractive_index > 0.0) {
            return Err(format!(
                "refractive index {} must be positive",
                self.refractive_index
            ));
        }
        Ok(())
    }
}

fn white() -> Vec3 {
    Vec3::ONE
}

/// One primitive of the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrimitiveDesc {
    Sphere {
        center: Vec3,
        radius: f32,
        #[serde(default)]
        material: MaterialDesc,
    },
    /// Plane `dot(normal, p) + offset = 0`.
    Plane {
        normal: Vec3,
        offset: f32,
        #[serde(default)]
        material: MaterialDesc,
    },
    Triangle {
        vertices: [Vec3; 3],
        #[serde(default)]
        material: MaterialDesc,
    },
    /// Emissive sphere. Lights never reflect or refract.
    Light {
        center: Vec3,
        radius: f32,
        #[serde(default = "white")]
        color: Vec3,
    },
}

impl PrimitiveDesc {
    /// Check the geometric and material parameters.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            PrimitiveDesc::Sphere {
                radius, material, ..
            } => {
                if !(*radius > 0.0) {
                    return Err(format!("sphere radius {} must be positive", radius));
                }
                material.validate()
            }
            PrimitiveDesc::Plane {
                normal, material, ..
            } => {
                if normal.length_squared() == 0.0 || !normal.is_finite() {
                    return Err("plane normal must be a non-zero vector".to_string());
                }
                material.validate()
            }
            PrimitiveDesc::Triangle { vertices, material } => {
                let [a, b, c] = *vertices;
                if (b - a).cross(c - a).length_squared() == 0.0 {
                    return Err("triangle is degenerate".to_string());
                }
                material.validate()
            }
            PrimitiveDesc::Light { radius, .. } => {
                if !(*radius > 0.0) {
                    return Err(format!("light radius {} must be positive", radius));
                }
                Ok(())
            }
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(self, PrimitiveDesc::Light { .. })
    }
}

/// Screen rectangle on the `z = 0` plane through which primary rays pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenWindow {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for ScreenWindow {
    fn default() -> Self {
        Self {
            left: -4.0,
            right: 4.0,
            top: 3.0,
            bottom: -3.0,
        }
    }
}

/// Eye point and screen window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct View {
    pub eye: Vec3,
    pub window: ScreenWindow,
}

impl Default for View {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, -10.0),
            window: ScreenWindow::default(),
        }
    }
}

impl View {
    fn validate(&self) -> SceneResult<()> {
        let w = &self.window;
        if w.left == w.right || w.top == w.bottom {
            return Err(SceneError::InvalidView(format!(
                "screen window {:?} has zero area",
                w
            )));
        }
        if !self.eye.is_finite() {
            return Err(SceneError::InvalidView("eye is not finite".to_string()));
        }
        Ok(())
    }
}

/// Transform components that can be composed into a matrix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

fn mesh_placement() -> Transform {
    Transform::from_translation(Vec3::new(0.0, 0.0, 2.0))
}

/// An OBJ file to import as triangles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshDesc {
    /// Path to the OBJ file, relative to the scene file
    pub path: PathBuf,

    /// Placement of the mesh; pushed 2 units away from the eye by default
    #[serde(default = "mesh_placement")]
    pub transform: Transform,

    /// Overrides the colour from the OBJ material library
    #[serde(default)]
    pub color: Option<Vec3>,
}

impl MeshDesc {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            transform: mesh_placement(),
            color: None,
        }
    }
}

/// A complete scene: view, primitives and meshes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    /// Eye point and screen window
    pub view: View,

    /// Primitives in insertion order
    pub primitives: Vec<PrimitiveDesc>,

    /// OBJ meshes expanded into triangles on load
    pub meshes: Vec<MeshDesc>,

    /// Directory mesh paths are resolved against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl SceneDescription {
    /// Create an empty scene with the default view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a primitive.
    pub fn add(&mut self, primitive: PrimitiveDesc) -> &mut Self {
        self.primitives.push(primitive);
        self
    }

    /// Parse and validate a JSON scene.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let scene: SceneDescription = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load a JSON scene file. Mesh paths are resolved relative to its directory.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let mut scene = Self::from_json_str(&json)?;
        scene.base_dir = path.parent().map(Path::to_path_buf);
        log::info!(
            "Loaded scene {}: {} primitives, {} meshes",
            path.display(),
            scene.primitives.len(),
            scene.meshes.len()
        );
        Ok(scene)
    }

    /// Validate the view and every primitive.
    pub fn validate(&self) -> SceneResult<()> {
        self.view.validate()?;
        for (index, primitive) in self.primitives.iter().enumerate() {
            primitive
                .validate()
                .map_err(|reason| SceneError::InvalidPrimitive { index, reason })?;
        }
        Ok(())
    }

    /// Number of lights among the explicit primitives.
    pub fn light_count(&self) -> usize {
        self.primitives.iter().filter(|p| p.is_light()).count()
    }

    /// All primitives, with every mesh flattened into triangles.
    ///
    /// Explicit primitives come first, in insertion order, followed by mesh
    /// triangles in file order. Degenerate mesh faces are dropped.
    pub fn expand_primitives(&self) -> SceneResult<Vec<PrimitiveDesc>> {
        let mut out = self.primitives.clone();

        for mesh_desc in &self.meshes {
            let path = match &self.base_dir {
                Some(dir) if mesh_desc.path.is_relative() => dir.join(&mesh_desc.path),
                _ => mesh_desc.path.clone(),
            };
            let matrix = mesh_desc.transform.to_matrix();
            let mut dropped = 0usize;

            for model in load_obj(&path)? {
                let color = mesh_desc
                    .color
                    .or(model.color)
                    .unwrap_or(DEFAULT_MESH_COLOR);
                let material = MaterialDesc::mesh(color);

                for vertices in model.mesh.transformed(&matrix).extract_triangle_vertices() {
                    let triangle = PrimitiveDesc::Triangle { vertices, material };
                    if triangle.validate().is_ok() {
                        out.push(triangle);
                    } else {
                        dropped += 1;
                    }
                }
            }

            if dropped > 0 {
                log::warn!("Dropped {} degenerate faces from {}", dropped, path.display());
            }
        }

        Ok(out)
    }

    /// The classic scene: a pink ground plane, three spheres and two lights.
    pub fn demo() -> Self {
        let ground = Vec3::new(1.0, 0.4, 0.4);
        let green = Vec3::new(0.5, 1.0, 0.2);
        let blue = Vec3::new(0.05, 0.05, 0.7);
        let light = Vec3::new(0.9, 0.8, 0.8);

        let mut scene = SceneDescription::new();
        scene
            .add(PrimitiveDesc::Plane {
                normal: Vec3::Y,
                offset: 6.0,
                material: MaterialDesc::new(ground),
            })
            .add(PrimitiveDesc::Sphere {
                center: Vec3::new(0.0, 0.0, 8.0),
                radius: 0.4,
                material: MaterialDesc::new(green).with_refraction(0.0),
            })
            .add(PrimitiveDesc::Sphere {
                center: Vec3::new(0.0, 0.0, 5.0),
                radius: 1.0,
                material: MaterialDesc::new(blue).with_refraction(0.5),
            })
            .add(PrimitiveDesc::Sphere {
                center: Vec3::new(3.0, -2.0, 7.0),
                radius: 0.5,
                material: MaterialDesc::new(green)
                    .with_refraction(0.0)
                    .with_diffuse(0.8),
            })
            .add(PrimitiveDesc::Light {
                center: Vec3::new(-3.0, 2.0, 2.0),
                radius: 0.5,
                color: light,
            })
            .add(PrimitiveDesc::Light {
                center: Vec3::new(3.0, -3.0, 2.0),
                radius: 0.3,
                color: light,
            });
        scene
    }
}
