//! Uniform spatial grid over a fixed world cube.
//!
//! The world box is `[-C, C]^3` for a configured half-extent `C`; it does not
//! follow the scene. Primitives lying outside it are never found by a grid
//! walk. Each cell lists the handles of every primitive whose overlap test
//! passes against the cell's sub-box.

use glint_math::{Aabb, Vec3};

use crate::{Primitive, PrimitiveId, RenderError, RenderResult};

/// Grid resolution and world extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Cells per axis
    pub cells_per_axis: usize,
    /// Half-extent `C` of the world cube
    pub half_extent: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cells_per_axis: 16,
            half_extent: 100.0,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> RenderResult<()> {
        if self.cells_per_axis == 0 {
            return Err(RenderError::InvalidConfig(
                "grid needs at least one cell per axis".to_string(),
            ));
        }
        if !(self.half_extent > 0.0) || !self.half_extent.is_finite() {
            return Err(RenderError::InvalidConfig(format!(
                "grid half-extent {} must be positive and finite",
                self.half_extent
            )));
        }
        Ok(())
    }
}

/// Immutable cell table built from a primitive list.
#[derive(Debug, Clone)]
pub struct Grid {
    bounds: Aabb,
    cells_per_axis: usize,
    cell_size: Vec3,
    cells: Vec<Vec<PrimitiveId>>,
}

impl Grid {
    /// Populate every cell with the primitives overlapping it.
    ///
    /// Cost is cells x primitives overlap tests; this runs once per build,
    /// never per ray.
    pub fn build(primitives: &[Primitive], config: &GridConfig) -> RenderResult<Self> {
        config.validate()?;

        let n = config.cells_per_axis;
        let bounds = Aabb::cube(config.half_extent);
        let cell_size = bounds.size() / n as f32;

        let mut grid = Self {
            bounds,
            cells_per_axis: n,
            cell_size,
            cells: vec![Vec::new(); n * n * n],
        };

        let mut placed = vec![false; primitives.len()];
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    let cell_box = grid.cell_bounds(x, y, z);
                    let index = grid.index(x, y, z);
                    for (i, primitive) in primitives.iter().enumerate() {
                        if primitive.overlaps(&cell_box) {
                            grid.cells[index].push(PrimitiveId::new(i));
                            placed[i] = true;
                        }
                    }
                }
            }
        }

        let references: usize = grid.cells.iter().map(Vec::len).sum();
        let occupied = grid.cells.iter().filter(|c| !c.is_empty()).count();
        log::debug!(
            "Built {}^3 grid over {:?}: {} primitives, {} references, {} occupied cells",
            n,
            bounds,
            primitives.len(),
            references,
            occupied
        );

        let outside = placed.iter().filter(|p| !**p).count();
        if outside > 0 {
            log::warn!(
                "{} primitives lie outside the {}-unit world box and will not be traced through the grid",
                outside,
                config.half_extent
            );
        }

        Ok(grid)
    }

    /// World box covered by the grid.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn cells_per_axis(&self) -> usize {
        self.cells_per_axis
    }

    /// Extent of one cell along each axis.
    pub fn cell_size(&self) -> Vec3 {
        self.cell_size
    }

    /// Flat index of cell `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let n = self.cells_per_axis;
        x + y * n + z * n * n
    }

    /// Primitives listed in cell `(x, y, z)`.
    #[inline]
    pub fn cell(&self, x: usize, y: usize, z: usize) -> &[PrimitiveId] {
        &self.cells[self.index(x, y, z)]
    }

    /// Sub-box of cell `(x, y, z)`.
    pub fn cell_bounds(&self, x: usize, y: usize, z: usize) -> Aabb {
        let lo = self.bounds.min() + Vec3::new(x as f32, y as f32, z as f32) * self.cell_size;
        Aabb::from_points(lo, lo + self.cell_size)
    }

    /// Coordinates of the cell containing `point`, clamped into the grid.
    pub fn cell_coords(&self, point: Vec3) -> [usize; 3] {
        let rel = (point - self.bounds.min()) / self.cell_size;
        let max = (self.cells_per_axis - 1) as f32;
        [
            rel.x.floor().clamp(0.0, max) as usize,
            rel.y.floor().clamp(0.0, max) as usize,
            rel.z.floor().clamp(0.0, max) as usize,
        ]
    }
}
