//! Sphere geometry. Lights share it.

use glint_math::{Aabb, Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Distance along `ray` to the nearest non-negative root, or `f32::INFINITY`.
    ///
    /// Assumes a unit-length direction. When the ray starts inside the sphere
    /// the far root is returned.
    pub fn intersect(&self, ray: &Ray) -> f32 {
        let v = ray.origin() - self.center;
        let b = -v.dot(ray.direction());
        let det = b * b - v.dot(v) + self.radius * self.radius;
        if det <= 0.0 {
            return f32::INFINITY;
        }

        let det = det.sqrt();
        let i1 = b - det;
        let i2 = b + det;
        if i2 <= 0.0 {
            // Both roots behind the origin
            return f32::INFINITY;
        }

        if i1 >= 0.0 {
            i1
        } else {
            i2
        }
    }

    /// Outward unit normal at a surface point.
    pub fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center) / self.radius
    }

    /// Does the sphere touch the box?
    pub fn overlaps(&self, bbox: &Aabb) -> bool {
        bbox.distance_squared(self.center) <= self.radius * self.radius
    }
}
