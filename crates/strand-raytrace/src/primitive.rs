//! Capabilities shared by every primitive the renderer can trace.

use strand_curves::TriangleMesh;
use strand_math::{Aabb3, Point2, Point3, Vec3};

use crate::Ray;

/// Closest hit reported by a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Parameter along the ray where intersection occurs.
    pub t: f64,
    /// 3D intersection point.
    pub point: Point3,
    /// Surface parameter coordinates (u, v) at intersection.
    pub uv: Point2,
    /// Local radius of the primitive at the hit.
    pub width: f64,
    /// Sub-primitive that was hit (the segment id for curves).
    pub element: u32,
}

/// Surface data shading needs at a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionInfo {
    /// Hit position.
    pub point: Point3,
    /// Geometric normal.
    pub geometric_normal: Vec3,
    /// Shading normal.
    pub shading_normal: Vec3,
    /// Surface parameter coordinates.
    pub uv: Point2,
    /// Offset for secondary rays leaving the surface.
    pub epsilon: f64,
}

/// A traceable primitive.
///
/// Implementations are immutable snapshots, so a single value may be
/// traced from many threads at once.
pub trait Primitive: Send + Sync {
    /// Bounds of the whole primitive.
    fn bounds(&self) -> Aabb3;

    /// Find the closest hit within the ray's interval.
    ///
    /// On success the ray's far bound is narrowed to the hit depth.
    fn intersect(&self, ray: &mut Ray) -> Option<RayHit>;

    /// Shading data for a hit previously returned by [`intersect`](Self::intersect).
    fn intersection_info(&self, ray: &Ray, hit: &RayHit) -> IntersectionInfo;

    /// A coarse triangle mesh for previews.
    fn build_proxy(&self) -> TriangleMesh;
}
