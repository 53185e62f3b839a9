//! Triangle geometry.
//!
//! Ray intersection goes through the supporting plane and a 2D barycentric
//! test on the projection that drops the dominant normal axis. Grid
//! population uses a separating-axis triangle/box test.

use glint_math::{Aabb, Ray, Vec3};

/// A triangle primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertices
    a: Vec3,
    b: Vec3,
    c: Vec3,
    /// Pre-computed face normal (unit length), from `(b - a) x (c - a)`
    normal: Vec3,
    /// Axes kept by the 2D projection
    u_axis: usize,
    v_axis: usize,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalize_or_zero();

        // Drop the axis the normal is most aligned with so the projection
        // never collapses the triangle.
        let n = normal.abs();
        let (u_axis, v_axis) = if n.x >= n.y && n.x >= n.z {
            (1, 2)
        } else if n.y >= n.z {
            (2, 0)
        } else {
            (0, 1)
        };

        Self {
            a,
            b,
            c,
            normal,
            u_axis,
            v_axis,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Distance along `ray` to the triangle, or `f32::INFINITY`.
    pub fn intersect(&self, ray: &Ray) -> f32 {
        let denom = self.normal.dot(ray.direction());
        if denom == 0.0 {
            return f32::INFINITY;
        }

        let dist = self.normal.dot(self.a - ray.origin()) / denom;
        if !(dist > 0.0) || !dist.is_finite() {
            return f32::INFINITY;
        }

        let (ku, kv) = (self.u_axis, self.v_axis);
        let e1 = self.b - self.a;
        let e2 = self.c - self.a;
        let h = ray.at(dist) - self.a;

        let det = e1[ku] * e2[kv] - e1[kv] * e2[ku];
        if det == 0.0 {
            return f32::INFINITY;
        }
        let u = (h[ku] * e2[kv] - h[kv] * e2[ku]) / det;
        let v = (e1[ku] * h[kv] - e1[kv] * h[ku]) / det;

        if u >= 0.0 && v >= 0.0 && u + v <= 1.0 {
            dist
        } else {
            f32::INFINITY
        }
    }

    /// Exact triangle/box overlap (separating axis theorem).
    ///
    /// Tests the three box face normals, the triangle normal, and the nine
    /// cross products of box axes with triangle edges.
    pub fn overlaps(&self, bbox: &Aabb) -> bool {
        let center = bbox.centroid();
        let half = bbox.half_size();

        let v0 = self.a - center;
        let v1 = self.b - center;
        let v2 = self.c - center;

        let edges = [v1 - v0, v2 - v1, v0 - v2];

        for box_axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            for edge in edges {
                if separated(box_axis.cross(edge), v0, v1, v2, half) {
                    return false;
                }
            }
        }

        // Box face normals, i.e. the triangle's own bounds against the box
        let lo = v0.min(v1).min(v2);
        let hi = v0.max(v1).max(v2);
        if lo.cmpgt(half).any() || hi.cmplt(-half).any() {
            return false;
        }

        plane_overlaps_box(edges[0].cross(edges[1]), v0, half)
    }
}

/// Is `axis` a separating axis between the triangle and a box of half-size
/// `half` centered on the origin?
#[inline]
fn separated(axis: Vec3, v0: Vec3, v1: Vec3, v2: Vec3, half: Vec3) -> bool {
    if axis.length_squared() == 0.0 {
        // Edge parallel to the box axis; covered by the other tests
        return false;
    }
    let p0 = axis.dot(v0);
    let p1 = axis.dot(v1);
    let p2 = axis.dot(v2);
    let r = half.dot(axis.abs());
    p0.min(p1).min(p2) > r || p0.max(p1).max(p2) < -r
}

/// Does the plane through `vert` with normal `normal` touch the box of
/// half-size `half` centered on the origin?
fn plane_overlaps_box(normal: Vec3, vert: Vec3, half: Vec3) -> bool {
    let mut vmin = Vec3::ZERO;
    let mut vmax = Vec3::ZERO;
    for q in 0..3 {
        if normal[q] > 0.0 {
            vmin[q] = -half[q] - vert[q];
            vmax[q] = half[q] - vert[q];
        } else {
            vmin[q] = half[q] - vert[q];
            vmax[q] = -half[q] - vert[q];
        }
    }
    if normal.dot(vmin) > 0.0 {
        return false;
    }
    normal.dot(vmax) >= 0.0
}
