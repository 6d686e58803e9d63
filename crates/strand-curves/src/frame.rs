//! Ray-aligned projection frame.
//!
//! Control nodes are expressed in a basis whose z-axis is the ray direction
//! and whose origin is the ray origin. In that space the ray is simply the
//! positive z-axis, so a node's `(x, y)` is its offset from the ray and its
//! `z` is its depth along the ray.

use strand_math::{Point3, Vec3, Vec4};

/// Orthonormal right-handed basis `(lx, ly, lz)` with `lz` along the ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayFrame {
    /// Ray origin; the frame's origin.
    pub origin: Point3,
    /// First perpendicular axis.
    pub lx: Vec3,
    /// Second perpendicular axis.
    pub ly: Vec3,
    /// Ray direction.
    pub lz: Vec3,
}

impl RayFrame {
    /// Build the frame for a ray with the given origin and unit direction.
    ///
    /// `lx` lies in the horizontal (xz) plane. A ray along the y axis has no
    /// horizontal component; it gets the fixed choice `lx = (1, 0, 0)`.
    pub fn new(origin: Point3, direction: &Vec3) -> Self {
        let lz = *direction;
        let d = (lz.x * lz.x + lz.z * lz.z).sqrt();
        let (lx, ly) = if d == 0.0 {
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -lz.y))
        } else {
            let lx = Vec3::new(lz.z / d, 0.0, -lz.x / d);
            (lx, Vec3::new(lx.z * lz.y, d, -lz.y * lx.x))
        };
        Self { origin, lx, ly, lz }
    }

    /// Express a node `(position, radius)` in this frame.
    ///
    /// The radius is carried through unchanged.
    #[inline]
    pub fn project(&self, node: &Vec4) -> Vec4 {
        let p = node.xyz() - self.origin.coords;
        Vec4::new(self.lx.dot(&p), self.ly.dot(&p), self.lz.dot(&p), node.w)
    }
}
