use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box used as the world extent of the scene grid and
/// as the sub-box of every grid cell.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self { x, y, z }
    }

    /// Create a cube of the given half-extent centered on the origin.
    pub fn cube(half_extent: f32) -> Self {
        Self::from_points(Vec3::splat(-half_extent), Vec3::splat(half_extent))
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max() - self.min()
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(self.x.center(), self.y.center(), self.z.center())
    }

    /// Half of the extent along each axis.
    pub fn half_size(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// True when min < max on every axis.
    pub fn is_valid(&self) -> bool {
        self.x.min < self.x.max && self.y.min < self.y.max && self.z.min < self.z.max
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Does `point` lie within the box, allowing `epsilon` of slack on every face?
    pub fn contains(&self, point: Vec3, epsilon: f32) -> bool {
        self.x.expand(epsilon).contains(point.x)
            && self.y.expand(epsilon).contains(point.y)
            && self.z.expand(epsilon).contains(point.z)
    }

    /// Squared distance from `point` to the nearest point of the box (zero inside).
    pub fn distance_squared(&self, point: Vec3) -> f32 {
        let closest = Vec3::new(
            self.x.clamp(point.x),
            self.y.clamp(point.y),
            self.z.clamp(point.z),
        );
        (point - closest).length_squared()
    }

    /// Distance along `ray` to the nearest box face it crosses.
    ///
    /// Uses the slab method. From outside the box this is the entry distance;
    /// from inside it is the exit distance. Returns `None` when the ray misses
    /// the box or the box lies entirely behind the ray.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let span = (0..3).fold(Interval::UNIVERSE, |span, axis| {
            let slab = self.axis_interval(axis);
            span.intersect(&slab.ray_span(ray.origin[axis], ray.direction[axis]))
        });

        if span.is_empty() || span.max < 0.0 {
            None
        } else if span.min >= 0.0 {
            Some(span.min)
        } else {
            Some(span.max)
        }
    }
}
