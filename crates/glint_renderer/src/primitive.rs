//! Closed set of scene primitives and their handles.
//!
//! Every primitive answers the same questions: where does a ray hit it, what
//! is the normal at a point, does it touch a box. Lights are spheres with a
//! light material, so they reuse the sphere's geometry for all three.

use glint_core::PrimitiveDesc;
use glint_math::{Aabb, Ray, Vec3};

use crate::{Material, Plane, Sphere, Triangle};

/// Handle to a primitive owned by a [`Scene`](crate::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(u32);

impl PrimitiveId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position in the scene's primitive list.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type tag of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Sphere,
    Plane,
    Triangle,
    Light,
}

/// Geometry of a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Light(Sphere),
}

/// A shape with the material it owns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    shape: Shape,
    material: Material,
}

impl Primitive {
    pub fn sphere(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            shape: Shape::Sphere(Sphere::new(center, radius)),
            material,
        }
    }

    pub fn plane(normal: Vec3, offset: f32, material: Material) -> Self {
        Self {
            shape: Shape::Plane(Plane::new(normal, offset)),
            material,
        }
    }

    pub fn triangle(a: Vec3, b: Vec3, c: Vec3, material: Material) -> Self {
        Self {
            shape: Shape::Triangle(Triangle::new(a, b, c)),
            material,
        }
    }

    /// An emissive sphere. Its material is always non-reflective and non-refractive.
    pub fn light(center: Vec3, radius: f32, color: Vec3) -> Self {
        Self {
            shape: Shape::Light(Sphere::new(center, radius)),
            material: Material::light(color),
        }
    }

    /// A white light.
    pub fn white_light(center: Vec3, radius: f32) -> Self {
        Self::light(center, radius, Vec3::ONE)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self.shape {
            Shape::Sphere(_) => PrimitiveKind::Sphere,
            Shape::Plane(_) => PrimitiveKind::Plane,
            Shape::Triangle(_) => PrimitiveKind::Triangle,
            Shape::Light(_) => PrimitiveKind::Light,
        }
    }

    #[inline]
    pub fn is_light(&self) -> bool {
        matches!(self.shape, Shape::Light(_))
    }

    #[inline]
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Reference point: sphere/light center, triangle centroid, or the plane
    /// point nearest the origin.
    pub fn position(&self) -> Vec3 {
        match &self.shape {
            Shape::Sphere(s) | Shape::Light(s) => s.center(),
            Shape::Plane(p) => p.position(),
            Shape::Triangle(t) => t.centroid(),
        }
    }

    /// Distance along `ray` to the primitive, `f32::INFINITY` on a miss.
    #[inline]
    pub fn intersect(&self, ray: &Ray) -> f32 {
        match &self.shape {
            Shape::Sphere(s) | Shape::Light(s) => s.intersect(ray),
            Shape::Plane(p) => p.intersect(ray),
            Shape::Triangle(t) => t.intersect(ray),
        }
    }

    /// Surface normal at `point`.
    #[inline]
    pub fn normal(&self, point: Vec3) -> Vec3 {
        match &self.shape {
            Shape::Sphere(s) | Shape::Light(s) => s.normal(point),
            Shape::Plane(p) => p.normal(),
            Shape::Triangle(t) => t.normal(),
        }
    }

    /// Does the primitive touch `bbox`? Only used to populate the grid.
    pub fn overlaps(&self, bbox: &Aabb) -> bool {
        match &self.shape {
            Shape::Sphere(s) | Shape::Light(s) => s.overlaps(bbox),
            Shape::Plane(p) => p.overlaps(bbox),
            Shape::Triangle(t) => t.overlaps(bbox),
        }
    }
}

impl From<&PrimitiveDesc> for Primitive {
    fn from(desc: &PrimitiveDesc) -> Self {
        match desc {
            PrimitiveDesc::Sphere {
                center,
                radius,
                material,
            } => Primitive::sphere(*center, *radius, material.into()),
            PrimitiveDesc::Plane {
                normal,
                offset,
                material,
            } => Primitive::plane(*normal, *offset, material.into()),
            PrimitiveDesc::Triangle { vertices, material } => {
                let [a, b, c] = *vertices;
                Primitive::triangle(a, b, c, material.into())
            }
            PrimitiveDesc::Light {
                center,
                radius,
                color,
            } => Primitive::light(*center, *radius, *color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::MaterialDesc;

    #[test]
    fn test_light_shares_sphere_geometry() {
        let sphere = Primitive::sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, Material::default());
        let light = Primitive::white_light(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 1);

        assert_eq!(sphere.intersect(&ray), light.intersect(&ray));
        let p = Vec3::new(0.0, 0.0, 4.0);
        assert_eq!(sphere.normal(p), light.normal(p));
        assert_eq!(light.kind(), PrimitiveKind::Light);
        assert!(light.is_light());
        assert!(!sphere.is_light());
    }

    #[test]
    fn test_light_material() {
        let light = Primitive::light(Vec3::ZERO, 0.5, Vec3::new(0.9, 0.8, 0.8));
        assert_eq!(light.material().reflection, 0.0);
        assert_eq!(light.material().refraction, 0.0);
        assert_eq!(light.material().color, Vec3::new(0.9, 0.8, 0.8));
    }

    #[test]
    fn test_kinds_and_positions() {
        let plane = Primitive::plane(Vec3::Y, 6.0, Material::default());
        assert_eq!(plane.kind(), PrimitiveKind::Plane);
        assert_eq!(plane.position(), Vec3::new(0.0, -6.0, 0.0));

        let tri = Primitive::triangle(Vec3::ZERO, Vec3::X * 3.0, Vec3::Y * 3.0, Material::default());
        assert_eq!(tri.kind(), PrimitiveKind::Triangle);
        assert_eq!(tri.position(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_from_desc() {
        let desc = PrimitiveDesc::Sphere {
            center: Vec3::new(1.0, 2.0, 3.0),
            radius: 0.5,
            material: MaterialDesc::new(Vec3::X).with_reflection(0.7),
        };
        let p = Primitive::from(&desc);

        assert_eq!(p.kind(), PrimitiveKind::Sphere);
        assert_eq!(p.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.material().reflection, 0.7);

        let light = Primitive::from(&PrimitiveDesc::Light {
            center: Vec3::ZERO,
            radius: 1.0,
            color: Vec3::ONE,
        });
        assert!(light.is_light());
    }
}
