/// A closed range of scalars, used for the per-axis extent of an [`Aabb`](crate::Aabb).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns the midpoint of the interval.
    pub fn center(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Overlap of two intervals; empty when they are disjoint.
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Parameters `t` for which `origin + t * direction` lies inside the
    /// interval, along one axis.
    ///
    /// A zero direction gives everything or nothing depending on `origin`.
    pub fn ray_span(&self, origin: f32, direction: f32) -> Interval {
        if direction == 0.0 {
            return if self.contains(origin) {
                Interval::UNIVERSE
            } else {
                Interval::EMPTY
            };
        }
        let t0 = (self.min - origin) / direction;
        let t1 = (self.max - origin) / direction;
        Interval::new(t0.min(t1), t0.max(t1))
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Expands the interval by delta on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        Interval::new(self.min - delta, self.max + delta)
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Every value.
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };
}
