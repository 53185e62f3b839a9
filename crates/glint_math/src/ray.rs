use crate::Vec3;

/// A ray in 3D space with origin, direction, and an identifier.
///
/// Rays are cast from the eye, toward lights, and along reflected or refracted
/// paths. The direction is not required to be normalized, although every ray
/// the tracer builds is. The `id` tells rays from one worker apart; it plays
/// no part in intersection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub id: u64,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3, id: u64) -> Self {
        Self {
            origin,
            direction,
            id,
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the identifier of the ray.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray, starting `t` further along its direction.
    pub fn advanced(&self, t: f32) -> Ray {
        Ray::new(self.at(t), self.direction, self.id)
    }
}
