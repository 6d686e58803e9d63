//! Ray representation and ray-box tests.

use strand_math::{Aabb3, Dir3, Point3, Vec3};

/// A ray in 3D space with a valid parameter interval `[near_t, far_t]`.
///
/// The far bound is owned by whoever traces the ray and only ever shrinks
/// while a closest hit is being searched for.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
    /// Precomputed reciprocal of direction components for fast AABB tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
    near_t: f64,
    far_t: f64,
}

impl Ray {
    /// Create a new ray from origin and direction, valid over `[0, ∞)`.
    ///
    /// The direction will be normalized.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let dir = Dir3::new_normalize(direction);
        let inv = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
        let sign = [
            if inv.x < 0.0 { 1 } else { 0 },
            if inv.y < 0.0 { 1 } else { 0 },
            if inv.z < 0.0 { 1 } else { 0 },
        ];
        Self {
            origin,
            direction: dir,
            inv_direction: inv,
            sign,
            near_t: 0.0,
            far_t: f64::INFINITY,
        }
    }

    /// Replace the valid interval.
    pub fn with_bounds(mut self, near_t: f64, far_t: f64) -> Self {
        self.near_t = near_t;
        self.far_t = far_t;
        self
    }

    /// Lower bound of the valid interval.
    #[inline]
    pub fn near_t(&self) -> f64 {
        self.near_t
    }

    /// Upper bound of the valid interval.
    #[inline]
    pub fn far_t(&self) -> f64 {
        self.far_t
    }

    /// Narrow the far bound, typically to the depth of a newly found hit.
    #[inline]
    pub fn set_far_t(&mut self, far_t: f64) {
        self.far_t = far_t;
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }

    /// Test ray-AABB intersection using the slab method.
    ///
    /// Returns `Some((t_min, t_max))`, clipped to the ray's valid interval,
    /// if the ray passes through the box there. Returns `None` otherwise.
    ///
    /// Handles infinite values correctly for axis-aligned rays.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3) -> Option<(f64, f64)> {
        let bounds = [aabb.min, aabb.max];

        let tx1 = (bounds[self.sign[0]].x - self.origin.x) * self.inv_direction.x;
        let tx2 = (bounds[1 - self.sign[0]].x - self.origin.x) * self.inv_direction.x;

        let mut t_min = tx1.max(self.near_t);
        let mut t_max = tx2.min(self.far_t);

        let ty1 = (bounds[self.sign[1]].y - self.origin.y) * self.inv_direction.y;
        let ty2 = (bounds[1 - self.sign[1]].y - self.origin.y) * self.inv_direction.y;

        t_min = t_min.max(ty1);
        t_max = t_max.min(ty2);

        let tz1 = (bounds[self.sign[2]].z - self.origin.z) * self.inv_direction.z;
        let tz2 = (bounds[1 - self.sign[2]].z - self.origin.z) * self.inv_direction.z;

        t_min = t_min.max(tz1);
        t_max = t_max.min(tz2);

        if t_max >= t_min {
            Some((t_min, t_max))
        } else {
            None
        }
    }
}
