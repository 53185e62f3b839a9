//! The renderable scene: primitive arena, light list, and grid.

use glint_core::SceneDescription;
use glint_math::Aabb;

use crate::{Grid, GridConfig, Primitive, PrimitiveId, RenderError, RenderResult};

/// Owns every primitive and the grid built over them.
///
/// Primitives keep their insertion order. Adding a primitive drops any
/// existing grid; call [`Scene::build_grid`] again before rendering.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
    lights: Vec<PrimitiveId>,
    grid: Option<Grid>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene (without its grid) from a description, importing meshes.
    pub fn from_description(desc: &SceneDescription) -> RenderResult<Self> {
        let mut scene = Self::new();
        for primitive in desc.expand_primitives()? {
            scene.add(Primitive::from(&primitive));
        }
        log::info!(
            "Scene has {} primitives ({} lights)",
            scene.len(),
            scene.lights.len()
        );
        Ok(scene)
    }

    /// Add a primitive and return its handle.
    pub fn add(&mut self, primitive: Primitive) -> PrimitiveId {
        let id = PrimitiveId::new(self.primitives.len());
        if primitive.is_light() {
            self.lights.push(id);
        }
        self.primitives.push(primitive);
        if self.grid.take().is_some() {
            log::debug!("Primitive added after grid build; grid discarded");
        }
        id
    }

    /// (Re)build the grid from scratch over the current primitives.
    pub fn build_grid(&mut self, config: &GridConfig) -> RenderResult<()> {
        self.grid = Some(Grid::build(&self.primitives, config)?);
        Ok(())
    }

    /// The grid, once built.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// The grid, or [`RenderError::GridNotBuilt`].
    pub fn require_grid(&self) -> RenderResult<&Grid> {
        self.grid.as_ref().ok_or(RenderError::GridNotBuilt)
    }

    /// World box of the grid, once built.
    pub fn bounds(&self) -> Option<&Aabb> {
        self.grid.as_ref().map(Grid::bounds)
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    #[inline]
    pub fn primitive(&self, id: PrimitiveId) -> &Primitive {
        &self.primitives[id.index()]
    }

    /// Handles of every light, in insertion order.
    pub fn lights(&self) -> &[PrimitiveId] {
        &self.lights
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Material;
    use glint_math::Vec3;

    #[test]
    fn test_add_tracks_lights() {
        let mut scene = Scene::new();
        let s = scene.add(Primitive::sphere(Vec3::ZERO, 1.0, Material::default()));
        let l = scene.add(Primitive::white_light(Vec3::Y * 5.0, 0.5));

        assert_eq!(scene.len(), 2);
        assert_eq!(s.index(), 0);
        assert_eq!(scene.lights(), &[l]);
        assert!(scene.primitive(l).is_light());
    }

    #[test]
    fn test_grid_lifecycle() {
        let mut scene = Scene::new();
        scene.add(Primitive::sphere(Vec3::ZERO, 1.0, Material::default()));
        assert!(scene.grid().is_none());
        assert!(matches!(scene.require_grid(), Err(RenderError::GridNotBuilt)));

        scene.build_grid(&GridConfig::default()).unwrap();
        assert!(scene.grid().is_some());
        assert_eq!(scene.bounds().map(|b| b.max()), Some(Vec3::splat(100.0)));

        // Adding invalidates the grid
        scene.add(Primitive::white_light(Vec3::Y * 5.0, 0.5));
        assert!(scene.grid().is_none());
    }

    #[test]
    fn test_from_demo_description() {
        let scene = Scene::from_description(&SceneDescription::demo()).unwrap();
        assert_eq!(scene.len(), 6);
        assert_eq!(scene.lights().len(), 2);
    }
}
