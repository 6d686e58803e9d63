//! Quadratic B-spline evaluation for one curve segment.
//!
//! A segment is controlled by three consecutive nodes `p0, p1, p2` and is
//! parameterized over `u ∈ [0, 1]`. The curve starts at the midpoint of
//! `p0, p1` and ends at the midpoint of `p1, p2`.

use std::ops::{Add, Mul, Sub};

use strand_math::{Aabb3, Point3, Vec4};

/// Evaluate the quadratic B-spline at `u`.
///
/// Generic so the same formula serves scalars, 2D chords and full
/// `(x, y, z, radius)` node records.
#[inline]
pub fn quadratic_bspline<T>(p0: T, p1: T, p2: T, u: f64) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T>,
{
    (p0 * 0.5 - p1 + p2 * 0.5) * (u * u) + (p1 - p0) * u + (p0 + p1) * 0.5
}

/// Evaluate the derivative of the quadratic B-spline at `u`.
#[inline]
pub fn quadratic_bspline_deriv<T>(p0: T, p1: T, p2: T, u: f64) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T>,
{
    (p0 - p1 * 2.0 + p2) * u + (p1 - p0)
}

/// Parameter where the derivative of a scalar spline vanishes.
///
/// Returns `None` unless the critical point lies strictly inside `(0, 1)`.
/// A straight segment (zero second derivative) yields a NaN or infinite
/// quotient, which fails the range test and is reported as `None`.
#[inline]
pub fn flat_point(p0: f64, p1: f64, p2: f64) -> Option<f64> {
    let u = (p0 - p1) / (p0 - 2.0 * p1 + p2);
    (u > 0.0 && u < 1.0).then_some(u)
}

/// Range `(min, max)` a scalar spline covers over `u ∈ [0, 1]`.
pub fn min_max_quadratic(p0: f64, p1: f64, p2: f64) -> (f64, f64) {
    let start = (p0 + p1) * 0.5;
    let end = (p1 + p2) * 0.5;
    let (mut lo, mut hi) = if start > end { (end, start) } else { (start, end) };

    if let Some(u) = flat_point(p0, p1, p2) {
        let flat = quadratic_bspline(p0, p1, p2, u);
        lo = lo.min(flat);
        hi = hi.max(flat);
    }
    (lo, hi)
}

/// Bounding box of a segment's swept tube.
///
/// Per-axis extrema of the centerline, grown on all sides by the largest of
/// the three control radii. Loose, but safe for any radius variation.
pub fn segment_bounds(q0: &Vec4, q1: &Vec4, q2: &Vec4) -> Aabb3 {
    let (x_min, x_max) = min_max_quadratic(q0.x, q1.x, q2.x);
    let (y_min, y_max) = min_max_quadratic(q0.y, q1.y, q2.y);
    let (z_min, z_max) = min_max_quadratic(q0.z, q1.z, q2.z);
    let max_w = q0.w.max(q1.w).max(q2.w);

    let mut aabb = Aabb3::new(
        Point3::new(x_min, y_min, z_min),
        Point3::new(x_max, y_max, z_max),
    );
    aabb.expand(max_w);
    aabb
}

/// Mean of the three control positions, used as the BVH sort key.
pub fn segment_centroid(q0: &Vec4, q1: &Vec4, q2: &Vec4) -> Point3 {
    Point3::from((q0.xyz() + q1.xyz() + q2.xyz()) / 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strand_math::Vec3;

    #[test]
    fn test_endpoints_are_midpoints() {
        assert_relative_eq!(quadratic_bspline(0.0, 2.0, 6.0, 0.0), 1.0);
        assert_relative_eq!(quadratic_bspline(0.0, 2.0, 6.0, 1.0), 4.0);
    }

    #[test]
    fn test_vector_evaluation_matches_scalar() {
        let p0 = Vec4::new(0.0, 1.0, 2.0, 0.1);
        let p1 = Vec4::new(1.0, 3.0, -2.0, 0.2);
        let p2 = Vec4::new(4.0, 0.0, 5.0, 0.3);
        let u = 0.37;
        let v = quadratic_bspline(p0, p1, p2, u);
        for i in 0..4 {
            assert_relative_eq!(v[i], quadratic_bspline(p0[i], p1[i], p2[i], u), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let (p0, p1, p2) = (0.3, -1.7, 2.2);
        let h = 1e-6;
        for u in [0.0, 0.25, 0.5, 0.9] {
            let fd = (quadratic_bspline(p0, p1, p2, u + h) - quadratic_bspline(p0, p1, p2, u - h))
                / (2.0 * h);
            assert_relative_eq!(quadratic_bspline_deriv(p0, p1, p2, u), fd, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_flat_point_inside() {
        // Symmetric arch: peak at u = 0.5.
        let u = flat_point(0.0, 2.0, 0.0).unwrap();
        assert_relative_eq!(u, 0.5);
        assert_relative_eq!(quadratic_bspline_deriv(0.0, 2.0, 0.0, u), 0.0);
    }

    #[test]
    fn test_flat_point_degenerate_is_none() {
        // Straight line: 0/0 and x/0 must not leak out as a parameter.
        assert!(flat_point(1.0, 1.0, 1.0).is_none());
        assert!(flat_point(0.0, 1.0, 2.0).is_none());
        // Monotonic but curved: critical point outside (0, 1).
        assert!(flat_point(0.0, 1.0, 3.0).is_none());
    }

    #[test]
    fn test_min_max_includes_peak() {
        let (lo, hi) = min_max_quadratic(0.0, 2.0, 0.0);
        assert_relative_eq!(lo, 1.0);
        assert_relative_eq!(hi, 1.5);

        let (lo, hi) = min_max_quadratic(3.0, 2.0, 1.0);
        assert_relative_eq!(lo, 1.5);
        assert_relative_eq!(hi, 2.5);
    }

    /// Small deterministic generator for control point sets.
    struct Lcg(u64);

    impl Lcg {
        fn next_f64(&mut self) -> f64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
            (self.0 >> 11) as f64 / (1u64 << 53) as f64
        }

        fn range(&mut self, lo: f64, hi: f64) -> f64 {
            lo + (hi - lo) * self.next_f64()
        }
    }

    fn assert_bounds_contain_tube(q0: Vec4, q1: Vec4, q2: Vec4) {
        let mut aabb = segment_bounds(&q0, &q1, &q2);
        // Endpoint extrema and samples may round differently.
        aabb.expand(1e-9);

        for i in 0..=400 {
            let u = i as f64 / 400.0;
            let c = quadratic_bspline(q0, q1, q2, u);
            // Every point of the tube cross-section lies within radius of the center.
            for offset in [Vec3::x(), -Vec3::x(), Vec3::y(), -Vec3::y(), Vec3::z(), -Vec3::z()] {
                let p = Point3::from(c.xyz() + offset * c.w);
                assert!(
                    aabb.contains_point(&p),
                    "sample {} of {:?} {:?} {:?} escapes {:?}",
                    u,
                    q0,
                    q1,
                    q2,
                    aabb
                );
            }
        }
    }

    #[test]
    fn test_segment_bounds_contain_dense_samples() {
        let cases = [
            // Curved in every axis.
            (Vec4::new(0.0, 0.0, 0.0, 0.05), Vec4::new(1.0, 2.0, -1.0, 0.2), Vec4::new(2.0, -1.0, 0.5, 0.1)),
            // Straight: no flat point on any axis.
            (Vec4::new(0.0, 0.0, 0.0, 0.1), Vec4::new(1.0, 1.0, 1.0, 0.1), Vec4::new(2.0, 2.0, 2.0, 0.1)),
            // All control points equal.
            (Vec4::new(1.0, 1.0, 1.0, 0.3), Vec4::new(1.0, 1.0, 1.0, 0.3), Vec4::new(1.0, 1.0, 1.0, 0.3)),
            // Extremum exactly at an endpoint (p0 == p1 and p1 == p2 per axis).
            (Vec4::new(1.0, 0.0, 3.0, 0.2), Vec4::new(1.0, 2.0, 3.0, 0.2), Vec4::new(3.0, 2.0, -1.0, 0.2)),
            // Radius peaked in the middle, zero at the ends.
            (Vec4::new(-1.0, 0.0, 0.0, 0.0), Vec4::new(0.0, 0.5, 0.0, 1.5), Vec4::new(1.0, 0.0, 0.0, 0.0)),
            // Sharp hairpin.
            (Vec4::new(0.0, 0.0, 0.0, 0.01), Vec4::new(10.0, 0.1, 0.0, 0.02), Vec4::new(0.0, 0.2, 0.0, 0.01)),
        ];
        for (q0, q1, q2) in cases {
            assert_bounds_contain_tube(q0, q1, q2);
        }

        let mut rng = Lcg(0x5eed);
        for _ in 0..200 {
            let mut node = || {
                Vec4::new(
                    rng.range(-10.0, 10.0),
                    rng.range(-10.0, 10.0),
                    rng.range(-10.0, 10.0),
                    rng.range(0.0, 1.0),
                )
            };
            let (q0, q1, q2) = (node(), node(), node());
            assert_bounds_contain_tube(q0, q1, q2);
        }
    }

    #[test]
    fn test_segment_centroid() {
        let c = segment_centroid(
            &Vec4::new(0.0, 0.0, 0.0, 1.0),
            &Vec4::new(3.0, 0.0, 0.0, 1.0),
            &Vec4::new(0.0, 6.0, 3.0, 1.0),
        );
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 2.0);
        assert_relative_eq!(c.z, 1.0);
    }
}
