//! Infinite plane geometry.

use glint_math::{Aabb, Ray, Vec3};

/// Plane `dot(normal, p) + offset = 0` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vec3,
    offset: f32,
}

impl Plane {
    /// Create a plane. A non-unit normal is normalized and the offset scaled
    /// with it, so the plane itself does not move.
    pub fn new(normal: Vec3, offset: f32) -> Self {
        let len = normal.length();
        Self {
            normal: normal / len,
            offset: offset / len,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// The point of the plane closest to the origin.
    pub fn position(&self) -> Vec3 {
        -self.normal * self.offset
    }

    /// Signed distance of `point` from the plane.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.offset
    }

    /// Distance along `ray` to the plane, or `f32::INFINITY` when parallel or behind.
    pub fn intersect(&self, ray: &Ray) -> f32 {
        let d = self.normal.dot(ray.direction());
        if d != 0.0 {
            let dist = -self.signed_distance(ray.origin()) / d;
            if dist > 0.0 {
                return dist;
            }
        }
        f32::INFINITY
    }

    /// Does the plane cut the box? True when the corners are not all strictly
    /// on one side.
    pub fn overlaps(&self, bbox: &Aabb) -> bool {
        let mut below = false;
        let mut above = false;
        for corner in bbox.corners() {
            let side = self.signed_distance(corner);
            below |= side <= 0.0;
            above |= side >= 0.0;
            if below && above {
                return true;
            }
        }
        false
    }
}
