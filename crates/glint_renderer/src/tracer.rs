//! Nearest-hit search and recursive Whitted shading.
//!
//! Two interchangeable nearest-hit strategies are provided: a linear scan of
//! every primitive and an incremental walk through the scene grid. Both skip
//! the primitive a ray leaves from and must agree on every ray that starts
//! inside the grid.

use std::ops::AddAssign;

use glint_math::{Aabb, Ray, Vec3};

use crate::mailbox::Mailbox;
use crate::{Color, Grid, PrimitiveId, RenderConfig, RenderResult, Scene, Traversal};

/// Exponent of the Phong highlight.
const SPECULAR_POWER: i32 = 20;

/// Nearest intersection found along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub primitive: PrimitiveId,
    pub distance: f32,
}

/// Counters gathered while tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Rays cast from the eye, including anti-aliasing sub-rays
    pub primary_rays: u64,
    /// Rays cast toward lights
    pub shadow_rays: u64,
    /// Reflected and refracted rays
    pub secondary_rays: u64,
    /// Invocations of [`Tracer::ray_trace`]
    pub trace_calls: u64,
    /// Ray/primitive intersection tests
    pub intersection_tests: u64,
    /// Pixels that were supersampled
    pub supersampled_pixels: u64,
}

impl AddAssign for TraceStats {
    fn add_assign(&mut self, other: Self) {
        self.primary_rays += other.primary_rays;
        self.shadow_rays += other.shadow_rays;
        self.secondary_rays += other.secondary_rays;
        self.trace_calls += other.trace_calls;
        self.intersection_tests += other.intersection_tests;
        self.supersampled_pixels += other.supersampled_pixels;
    }
}

/// Mutable state owned by one worker: its ray id counter, its mailbox, and
/// its counters. The scene itself is never written during a render.
///
/// A context may be reused across tracers; its mailbox grows to fit the
/// largest scene it has walked.
#[derive(Debug, Clone)]
pub struct TraceContext {
    next_ray_id: u64,
    mailbox: Mailbox,
    pub stats: TraceStats,
}

impl TraceContext {
    pub fn new(primitive_count: usize) -> Self {
        Self {
            next_ray_id: 1,
            mailbox: Mailbox::new(primitive_count),
            stats: TraceStats::default(),
        }
    }

    /// A ray with a fresh id.
    pub fn ray(&mut self, origin: Vec3, direction: Vec3) -> Ray {
        let id = self.next_ray_id;
        self.next_ray_id += 1;
        Ray::new(origin, direction, id)
    }
}

/// Read-only view of a scene prepared for tracing.
pub struct Tracer<'a> {
    scene: &'a Scene,
    grid: &'a Grid,
    bounds: Aabb,
    max_depth: u32,
    epsilon: f32,
    traversal: Traversal,
}

impl<'a> Tracer<'a> {
    /// Fetch the scene's world box and grid once.
    pub fn new(scene: &'a Scene, config: &RenderConfig) -> RenderResult<Self> {
        let grid = scene.require_grid()?;
        Ok(Self {
            scene,
            grid,
            bounds: *grid.bounds(),
            max_depth: config.max_depth,
            epsilon: config.epsilon,
            traversal: config.traversal,
        })
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// A context sized for this scene.
    pub fn context(&self) -> TraceContext {
        TraceContext::new(self.scene.len())
    }

    /// Nearest hit using the configured strategy.
    #[inline]
    pub fn nearest(
        &self,
        ray: &Ray,
        exclude: Option<PrimitiveId>,
        ctx: &mut TraceContext,
    ) -> Option<Hit> {
        match self.traversal {
            Traversal::Grid => self.find_nearest(ray, exclude, ctx),
            Traversal::BruteForce => {
                ctx.stats.intersection_tests += self.scene.len() as u64;
                self.get_distance(ray, exclude)
            }
        }
    }

    /// Linear scan of every primitive except `exclude`.
    pub fn get_distance(&self, ray: &Ray, exclude: Option<PrimitiveId>) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for (i, primitive) in self.scene.primitives().iter().enumerate() {
            let id = PrimitiveId::new(i);
            if Some(id) == exclude {
                continue;
            }
            let distance = primitive.intersect(ray);
            if distance < best.map_or(f32::INFINITY, |h| h.distance) {
                best = Some(Hit {
                    primitive: id,
                    distance,
                });
            }
        }
        best
    }

    /// Walk the grid cell by cell from the ray origin.
    ///
    /// Returns `None` when the origin is outside the grid. The walk stops when
    /// it leaves the grid or when the best hit so far is closer than every
    /// remaining cell boundary, since no farther cell can beat it.
    pub fn find_nearest(
        &self,
        ray: &Ray,
        exclude: Option<PrimitiveId>,
        ctx: &mut TraceContext,
    ) -> Option<Hit> {
        let origin = ray.origin();
        let dir = ray.direction();
        if !self.bounds.contains(origin, self.epsilon) || dir == Vec3::ZERO {
            return None;
        }

        let grid = self.grid;
        let n = grid.cells_per_axis() as i32;
        let cell_size = grid.cell_size();
        let lo = self.bounds.min();

        let start = grid.cell_coords(origin);
        let mut pos = [start[0] as i32, start[1] as i32, start[2] as i32];
        let mut step = [0i32; 3];
        let mut out = [0i32; 3];
        let mut tmax = [f32::MAX; 3];
        let mut tdelta = [f32::MAX; 3];

        for axis in 0..3 {
            let d = dir[axis];
            if d > 0.0 {
                step[axis] = 1;
                out[axis] = n;
                let boundary = lo[axis] + (pos[axis] + 1) as f32 * cell_size[axis];
                tmax[axis] = (boundary - origin[axis]) / d;
                tdelta[axis] = cell_size[axis] / d;
            } else if d < 0.0 {
                step[axis] = -1;
                out[axis] = -1;
                let boundary = lo[axis] + pos[axis] as f32 * cell_size[axis];
                tmax[axis] = (boundary - origin[axis]) / d;
                tdelta[axis] = -cell_size[axis] / d;
            }
        }

        ctx.mailbox.begin_walk(self.scene.len());
        let mut best: Option<Hit> = None;
        loop {
            let cell = grid.cell(pos[0] as usize, pos[1] as usize, pos[2] as usize);
            for &id in cell {
                if Some(id) == exclude || !ctx.mailbox.first_visit(id) {
                    continue;
                }
                ctx.stats.intersection_tests += 1;
                let distance = self.scene.primitive(id).intersect(ray);
                if distance < best.map_or(f32::INFINITY, |h| h.distance) {
                    best = Some(Hit {
                        primitive: id,
                        distance,
                    });
                }
            }

            // Axis whose next boundary is closest
            let axis = if tmax[0] < tmax[1] {
                if tmax[0] < tmax[2] {
                    0
                } else {
                    2
                }
            } else if tmax[1] < tmax[2] {
                1
            } else {
                2
            };

            if let Some(hit) = best {
                if hit.distance < tmax[axis] {
                    break;
                }
            }

            pos[axis] += step[axis];
            if pos[axis] == out[axis] {
                break;
            }
            tmax[axis] += tdelta[axis];
        }

        best
    }

    /// Trace a ray from the eye.
    ///
    /// An eye outside the world box is first moved onto the box surface plus
    /// epsilon; a ray that misses the box sees nothing.
    pub fn trace_primary(
        &self,
        eye: Vec3,
        direction: Vec3,
        ctx: &mut TraceContext,
    ) -> (Color, Option<PrimitiveId>) {
        ctx.stats.primary_rays += 1;
        if direction == Vec3::ZERO {
            return (Color::ZERO, None);
        }

        let mut ray = ctx.ray(eye, direction);
        if !self.bounds.contains(eye, 0.0) {
            match self.bounds.intersect(&ray) {
                Some(t) => ray = ray.advanced(t + self.epsilon),
                None => return (Color::ZERO, None),
            }
        }

        self.ray_trace(&ray, 0, 1.0, None, ctx)
    }

    /// Shade `ray`: direct light with shadows, then reflection and refraction.
    ///
    /// Returns the colour and the primitive hit, if any. Recursion stops once
    /// `depth` exceeds the configured maximum.
    pub fn ray_trace(
        &self,
        ray: &Ray,
        depth: u32,
        refractive_index: f32,
        exclude: Option<PrimitiveId>,
        ctx: &mut TraceContext,
    ) -> (Color, Option<PrimitiveId>) {
        ctx.stats.trace_calls += 1;
        if depth > self.max_depth {
            return (Color::ZERO, None);
        }

        let Some(hit) = self.nearest(ray, exclude, ctx) else {
            return (Color::ZERO, None);
        };

        let primitive = self.scene.primitive(hit.primitive);
        let material = primitive.material();
        let point = ray.at(hit.distance);
        let mut normal = primitive.normal(point).normalize_or_zero();
        let dir = ray.direction();

        let mut color = self.direct_light(ray, hit.primitive, point, normal, ctx);

        if material.reflection > 0.0 {
            let reflected = dir - 2.0 * dir.dot(normal) * normal;
            let reflected_ray = ctx.ray(point, reflected);
            ctx.stats.secondary_rays += 1;
            let (rcol, _) = self.ray_trace(
                &reflected_ray,
                depth + 1,
                refractive_index,
                Some(hit.primitive),
                ctx,
            );
            color += rcol * material.reflection * material.color;
        }

        if material.refraction > 0.0 {
            let new_index = material.refractive_index;
            let n = refractive_index / new_index;
            // Leaving the surface from inside
            if normal.dot(dir) > 0.0 {
                normal = -normal;
            }
            let cos_i = -normal.dot(dir);
            let cos_t2 = 1.0 - n * n * (1.0 - cos_i * cos_i);
            if cos_t2 > 0.0 {
                let refracted = n * dir + (n * cos_i - cos_t2.sqrt()) * normal;
                let refracted_ray = ctx.ray(point, refracted);
                ctx.stats.secondary_rays += 1;
                let (rcol, _) =
                    self.ray_trace(&refracted_ray, depth + 1, new_index, Some(hit.primitive), ctx);
                // Transmitted light is not tinted by the surface colour
                color += rcol * material.refraction;
            }
        }

        (color, Some(hit.primitive))
    }

    /// Diffuse and specular light reaching `point` from every unoccluded light.
    fn direct_light(
        &self,
        ray: &Ray,
        shaded: PrimitiveId,
        point: Vec3,
        normal: Vec3,
        ctx: &mut TraceContext,
    ) -> Color {
        let material = self.scene.primitive(shaded).material();
        let specular = material.specular();
        let mut color = Color::ZERO;

        for &light_id in self.scene.lights() {
            let light = self.scene.primitive(light_id);
            let mut l = light.position() - point;
            let dist = l.length();
            if dist > f32::EPSILON {
                l /= dist;
            }

            let shadow_ray = ctx.ray(point, l);
            ctx.stats.shadow_rays += 1;
            let lit = matches!(
                self.nearest(&shadow_ray, Some(shaded), ctx),
                Some(h) if h.primitive == light_id
            );
            if !lit {
                continue;
            }

            let light_color = light.material().color;
            let n_dot_l = normal.dot(l);
            if n_dot_l > 0.0 {
                color += material.color * n_dot_l * material.diffuse * light_color;
            }

            if specular > 0.0 {
                let r = l - 2.0 * l.dot(normal) * normal;
                let v_dot_r = ray.direction().dot(r);
                if v_dot_r > 0.0 {
                    color += light_color * v_dot_r.powi(SPECULAR_POWER) * specular;
                }
            }
        }

        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridConfig, Material, Primitive};

    fn config(traversal: Traversal) -> RenderConfig {
        RenderConfig {
            traversal,
            ..Default::default()
        }
    }

    fn matte(color: Color) -> Material {
        Material::new(color)
            .with_reflection(0.0)
            .with_refraction(0.0, 1.0)
    }

    fn built(mut scene: Scene) -> Scene {
        scene.build_grid(&GridConfig::default()).unwrap();
        scene
    }

    #[test]
    fn test_tracer_requires_grid() {
        let scene = Scene::new();
        assert!(Tracer::new(&scene, &RenderConfig::default()).is_err());
    }

    #[test]
    fn test_get_distance_picks_nearest_and_skips_excluded() {
        let mut scene = Scene::new();
        let far = scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, 10.0), 1.0, matte(Color::X)));
        let near = scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, matte(Color::Y)));
        let scene = built(scene);
        let tracer = Tracer::new(&scene, &config(Traversal::BruteForce)).unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 1);
        let hit = tracer.get_distance(&ray, None).unwrap();
        assert_eq!(hit.primitive, near);
        assert!((hit.distance - 4.0).abs() < 1e-5);

        let hit = tracer.get_distance(&ray, Some(near)).unwrap();
        assert_eq!(hit.primitive, far);
        assert!((hit.distance - 9.0).abs() < 1e-5);

        let miss = Ray::new(Vec3::ZERO, -Vec3::Z, 2);
        assert!(tracer.get_distance(&miss, None).is_none());
    }

    #[test]
    fn test_find_nearest_matches_brute_force_across_cells() {
        let mut scene = Scene::new();
        // A large sphere spanning many cells and a small one behind it
        let big = scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, 30.0), 20.0, matte(Color::X)));
        let small = scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, 70.0), 2.0, matte(Color::Y)));
        scene.add(Primitive::plane(Vec3::Y, 6.0, matte(Color::Z)));
        let scene = built(scene);
        let tracer = Tracer::new(&scene, &config(Traversal::Grid)).unwrap();
        let mut ctx = tracer.context();

        let ray = ctx.ray(Vec3::new(0.0, 0.0, -50.0), Vec3::Z);
        let grid_hit = tracer.find_nearest(&ray, None, &mut ctx).unwrap();
        let brute_hit = tracer.get_distance(&ray, None).unwrap();
        assert_eq!(grid_hit.primitive, big);
        assert_eq!(grid_hit.primitive, brute_hit.primitive);
        assert!((grid_hit.distance - brute_hit.distance).abs() < 1e-4);

        // Excluding the big sphere exposes the small one
        let ray = ctx.ray(Vec3::new(0.0, 0.0, -50.0), Vec3::Z);
        let grid_hit = tracer.find_nearest(&ray, Some(big), &mut ctx).unwrap();
        assert_eq!(grid_hit.primitive, small);
        assert!((grid_hit.distance - 118.0).abs() < 1e-3);
    }

    #[test]
    fn test_find_nearest_outside_grid_is_none() {
        let mut scene = Scene::new();
        scene.add(Primitive::sphere(Vec3::ZERO, 1.0, matte(Color::X)));
        let scene = built(scene);
        let tracer = Tracer::new(&scene, &config(Traversal::Grid)).unwrap();
        let mut ctx = tracer.context();

        let ray = ctx.ray(Vec3::new(0.0, 0.0, -500.0), Vec3::Z);
        assert!(tracer.find_nearest(&ray, None, &mut ctx).is_none());
        // The brute force path does not care where the ray starts
        assert!(tracer.get_distance(&ray, None).is_some());
    }

    #[test]
    fn test_find_nearest_tests_each_primitive_once() {
        let mut scene = Scene::new();
        // Spans several cells along the ray but is missed by it
        scene.add(Primitive::sphere(Vec3::new(0.0, 30.0, 0.0), 29.0, matte(Color::X)));
        let scene = built(scene);
        let tracer = Tracer::new(&scene, &config(Traversal::Grid)).unwrap();
        let mut ctx = tracer.context();

        let ray = ctx.ray(Vec3::new(-90.0, 0.5, 0.5), Vec3::X);
        assert!(tracer.find_nearest(&ray, None, &mut ctx).is_none());
        assert_eq!(ctx.stats.intersection_tests, 1);
    }

    #[test]
    fn test_find_nearest_does_not_depend_on_ray_id() {
        let mut scene = Scene::new();
        let target = scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, matte(Color::X)));
        let scene = built(scene);
        let tracer = Tracer::new(&scene, &config(Traversal::Grid)).unwrap();
        let mut ctx = tracer.context();

        // The same ray twice through one context
        let ray = ctx.ray(Vec3::ZERO, Vec3::Z);
        for _ in 0..2 {
            let hit = tracer.find_nearest(&ray, None, &mut ctx).unwrap();
            assert_eq!(hit.primitive, target);
            assert!((hit.distance - 4.0).abs() < 1e-5);
        }

        // Caller-chosen ids, including zero and one already handed out
        for id in [0, ray.id(), ray.id() + 1] {
            let ray = Ray::new(Vec3::ZERO, Vec3::Z, id);
            let hit = tracer.find_nearest(&ray, None, &mut ctx).unwrap();
            assert_eq!(Some(hit), tracer.get_distance(&ray, None));
        }
        let next = ctx.ray(Vec3::ZERO, Vec3::Z);
        assert!(tracer.find_nearest(&next, None, &mut ctx).is_some());
    }

    #[test]
    fn test_find_nearest_with_undersized_context() {
        let mut scene = Scene::new();
        scene.add(Primitive::plane(Vec3::Y, 6.0, matte(Color::ONE)));
        let target = scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, matte(Color::X)));
        let scene = built(scene);
        let tracer = Tracer::new(&scene, &config(Traversal::Grid)).unwrap();
        let mut ctx = TraceContext::new(0);

        let ray = ctx.ray(Vec3::ZERO, Vec3::Z);
        let hit = tracer.find_nearest(&ray, None, &mut ctx).unwrap();
        assert_eq!(hit.primitive, target);
        assert!((hit.distance - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_trace_miss_is_black() {
        let mut scene = Scene::new();
        scene.add(Primitive::white_light(Vec3::new(0.0, 10.0, 0.0), 0.5));
        let scene = built(scene);
        let tracer = Tracer::new(&scene, &RenderConfig::default()).unwrap();
        let mut ctx = tracer.context();

        let ray = ctx.ray(Vec3::ZERO, -Vec3::Y);
        let (color, hit) = tracer.ray_trace(&ray, 0, 1.0, None, &mut ctx);
        assert_eq!(color, Color::ZERO);
        assert!(hit.is_none());
    }

    #[test]
    fn test_ray_trace_depth_limit() {
        let mut scene = Scene::new();
        scene.add(Primitive::plane(Vec3::Y, 6.0, matte(Color::ONE)));
        scene.add(Primitive::white_light(Vec3::new(0.0, 10.0, 0.0), 0.5));
        let scene = built(scene);
        let config = RenderConfig::default();
        let tracer = Tracer::new(&scene, &config).unwrap();
        let mut ctx = tracer.context();

        let ray = ctx.ray(Vec3::ZERO, -Vec3::Y);
        let (color, hit) = tracer.ray_trace(&ray, config.max_depth + 1, 1.0, None, &mut ctx);
        assert_eq!(color, Color::ZERO);
        assert!(hit.is_none());
    }

    #[test]
    fn test_diffuse_lighting_of_plane() {
        let mut scene = Scene::new();
        let ground = scene.add(Primitive::plane(Vec3::Y, 6.0, matte(Color::new(1.0, 0.5, 0.25))));
        scene.add(Primitive::white_light(Vec3::new(0.0, 4.0, 0.0), 0.5));
        let scene = built(scene);
        let tracer = Tracer::new(&scene, &RenderConfig::default()).unwrap();
        let mut ctx = tracer.context();

        // Straight down onto the plane under the light: N.L = 1
        let ray = ctx.ray(Vec3::ZERO, -Vec3::Y);
        let (color, hit) = tracer.ray_trace(&ray, 0, 1.0, None, &mut ctx);
        assert_eq!(hit, Some(ground));
        assert!((color - Color::new(1.0, 0.5, 0.25)).length() < 1e-5);
    }

    #[test]
    fn test_reflection_picks_up_mirrored_surface() {
        let mut scene = Scene::new();
        let mirror = Material::new(Color::ONE)
            .with_reflection(1.0)
            .with_refraction(0.0, 1.0)
            .with_diffuse(1.0);
        scene.add(Primitive::plane(Vec3::Y, 6.0, mirror));
        scene.add(Primitive::white_light(Vec3::new(0.0, 4.0, 0.0), 0.5));
        let scene = built(scene);
        let tracer = Tracer::new(&scene, &RenderConfig::default()).unwrap();
        let mut ctx = tracer.context();

        let ray = ctx.ray(Vec3::ZERO, -Vec3::Y);
        let (color, _) = tracer.ray_trace(&ray, 0, 1.0, None, &mut ctx);

        // Direct light is 1.0; the reflected ray climbs into the light sphere,
        // which is lit by nothing, so the total stays 1.0 per channel.
        assert!((color - Color::ONE).length() < 1e-5);
        assert!(ctx.stats.secondary_rays >= 1);
    }

    #[test]
    fn test_refraction_passes_through_glass() {
        let mut scene = Scene::new();
        let glass = Material::new(Color::ZERO)
            .with_reflection(0.0)
            .with_refraction(1.0, 1.0);
        let lens = scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, glass));
        scene.add(Primitive::plane(-Vec3::Z, 20.0, matte(Color::ONE)));
        scene.add(Primitive::white_light(Vec3::new(0.0, 8.0, 10.0), 0.5));
        let scene = built(scene);
        let config = RenderConfig::default();
        let tracer = Tracer::new(&scene, &config).unwrap();
        let mut ctx = tracer.context();

        // The black lens shows only the lit wall behind it
        let ray = ctx.ray(Vec3::ZERO, Vec3::Z);
        let (color, hit) = tracer.ray_trace(&ray, 0, 1.0, None, &mut ctx);
        assert_eq!(hit, Some(lens));
        let expected = 10.0 / Vec3::new(0.0, 8.0, -10.0).length();
        assert!((color - Color::splat(expected)).length() < 1e-4);

        // At the last level the transmitted ray is cut off
        let ray = ctx.ray(Vec3::ZERO, Vec3::Z);
        let (color, hit) = tracer.ray_trace(&ray, config.max_depth, 1.0, None, &mut ctx);
        assert_eq!(hit, Some(lens));
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_total_internal_reflection_skips_refraction() {
        let mut scene = Scene::new();
        let glass = Material::new(Color::ZERO)
            .with_reflection(0.0)
            .with_refraction(1.0, 1.0);
        scene.add(Primitive::sphere(Vec3::ZERO, 2.0, glass));
        scene.add(Primitive::plane(Vec3::Y, 6.0, matte(Color::ONE)));
        scene.add(Primitive::white_light(Vec3::new(0.0, 40.0, 0.0), 0.5));
        let scene = built(scene);
        let tracer = Tracer::new(&scene, &RenderConfig::default()).unwrap();
        let mut ctx = tracer.context();

        // From inside a medium of index 2.5 into index 1.0 at a grazing angle
        let dir = Vec3::new(1.0, 0.1, 0.0).normalize();
        let ray = ctx.ray(Vec3::new(0.0, 1.5, 0.0), dir);
        let before = ctx.stats.secondary_rays;
        let _ = tracer.ray_trace(&ray, 0, 2.5, None, &mut ctx);
        assert_eq!(ctx.stats.secondary_rays, before);
    }
}
