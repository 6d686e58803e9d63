#![warn(missing_docs)]

//! Math types for the strand hair ray tracer.
//!
//! Thin wrappers around nalgebra providing the handful of types the curve
//! primitive needs: points, vectors, 4-component node records, affine
//! placement transforms and axis-aligned boxes.

use nalgebra::{Matrix4, Unit, Vector2, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in 2D parameter space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A 4-component record: position `xyz` plus radius `w`.
pub type Vec4 = Vector4<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        Self { matrix: m }
    }

    /// Uniform scale by `s` on every axis.
    pub fn uniform_scale(s: f64) -> Self {
        Self::scale(s, s, s)
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// Applying the result to a point applies `other` first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Per-axis linear scale factors: the lengths of the basis columns of
    /// the upper-left 3x3 block.
    pub fn scale_factors(&self) -> Vec3 {
        let m3 = self.matrix.fixed_view::<3, 3>(0, 0);
        Vec3::new(
            m3.column(0).norm(),
            m3.column(1).norm(),
            m3.column(2).norm(),
        )
    }

    /// Average of [`scale_factors`](Self::scale_factors), used to scale
    /// radii that have no direction of their own.
    pub fn average_scale(&self) -> f64 {
        let s = self.scale_factors();
        (s.x + s.y + s.z) / 3.0
    }
}

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True if nothing has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Expand this AABB to include another box.
    pub fn include_aabb(&mut self, other: &Aabb3) {
        if other.is_empty() {
            return;
        }
        self.include_point(&other.min);
        self.include_point(&other.max);
    }

    /// Expand the AABB by a tolerance in all directions.
    pub fn expand(&mut self, tol: f64) {
        self.min.x -= tol;
        self.min.y -= tol;
        self.min.z -= tol;
        self.max.x += tol;
        self.max.y += tol;
        self.max.z += tol;
    }

    /// Test if a point lies inside or on the boundary of the box.
    pub fn contains_point(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Center of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Edge lengths of the box.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Surface area of the box; zero for an empty box.
    pub fn surface_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.extent();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }
}

/// Build two unit vectors that complete `n` to an orthonormal basis.
///
/// `n` must be normalized. The result is deterministic for a given input.
pub fn orthonormal_basis(n: &Vec3) -> (Vec3, Vec3) {
    let arbitrary = if n.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    let tangent = arbitrary.cross(n).normalize();
    let bitangent = n.cross(&tangent);
    (tangent, bitangent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert!((result - p).norm() < 1e-12);
    }

    #[test]
    fn test_translation() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let result = t.apply_point(&Point3::new(1.0, 2.0, 3.0));
        assert!((result.x - 11.0).abs() < 1e-12);
        assert!((result.y - 22.0).abs() < 1e-12);
        assert!((result.z - 33.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_y_90() {
        let t = Transform::rotation_y(PI / 2.0);
        let result = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(result.x.abs() < 1e-12);
        assert!((result.z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_compose_applies_right_first() {
        let translate = Transform::translation(1.0, 0.0, 0.0);
        let scale = Transform::uniform_scale(2.0);
        let result = scale.then(&translate).apply_point(&Point3::origin());
        assert!((result.x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_factors_ignore_rotation_and_translation() {
        let t = Transform::translation(4.0, 5.0, 6.0)
            .then(&Transform::rotation_y(0.7))
            .then(&Transform::scale(1.0, 2.0, 3.0));
        let s = t.scale_factors();
        assert_relative_eq!(s.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(s.z, 3.0, epsilon = 1e-12);
        assert_relative_eq!(t.average_scale(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_aabb_union_and_contains() {
        let mut a = Aabb3::empty();
        assert!(a.is_empty());
        assert_eq!(a.surface_area(), 0.0);

        a.include_point(&Point3::new(0.0, 0.0, 0.0));
        a.include_aabb(&Aabb3::new(
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 3.0, 4.0),
        ));
        a.include_aabb(&Aabb3::empty());
        assert!(!a.is_empty());
        assert!(a.contains_point(&Point3::new(1.5, 2.5, 3.5)));
        assert!(!a.contains_point(&Point3::new(-0.1, 0.0, 0.0)));
        assert_relative_eq!(a.surface_area(), 2.0 * (6.0 + 12.0 + 8.0));
        assert_relative_eq!(a.center().z, 2.0);

        a.expand(0.5);
        assert!(a.contains_point(&Point3::new(-0.4, 3.4, 4.4)));
        assert_relative_eq!(a.extent().x, 3.0);
    }

    #[test]
    fn test_orthonormal_basis() {
        for n in [Vec3::x(), Vec3::y(), Vec3::z(), Vec3::new(1.0, -2.0, 0.5).normalize()] {
            let (t, b) = orthonormal_basis(&n);
            assert!((t.norm() - 1.0).abs() < 1e-12);
            assert!((b.norm() - 1.0).abs() < 1e-12);
            assert!(t.dot(&n).abs() < 1e-12);
            assert!(b.dot(&n).abs() < 1e-12);
            assert!(t.dot(&b).abs() < 1e-12);
        }
    }
}
