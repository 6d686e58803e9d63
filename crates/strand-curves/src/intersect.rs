//! Closest-hit intersection of a ray with one tapered spline segment.
//!
//! The segment arrives already projected into the ray's frame (see
//! [`RayFrame`](crate::RayFrame)), so the ray is the positive z-axis and a
//! hit is any point of the curve whose `(x, y)` lies within the local radius
//! of the origin.
//!
//! The search subdivides the parameter range at its midpoint, culling any
//! sub-range whose 2D bound cannot reach the ray, until [`MAX_DEPTH`]
//! halvings leave pieces flat enough to treat as tapered line segments.
//! Subdivision uses a fixed-capacity stack, so a call never allocates.

use strand_math::{Point2, Vec2, Vec4};

use crate::spline::{flat_point, quadratic_bspline};

/// Number of halvings before a sub-range is tested as a straight chord.
pub const MAX_DEPTH: usize = 5;

/// A ray hit on a curve segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    /// Depth along the ray.
    pub t: f64,
    /// `x`: spline parameter of the hit in `[0, 1]`. `y`: offset across the
    /// ribbon in `[0, 1]`, with `0.5` on the centerline.
    pub uv: Point2,
    /// Ribbon radius at the hit.
    pub width: f64,
}

/// One pending sub-range `[u_min, u_min + u_span]` and its chord.
#[derive(Debug, Clone, Copy)]
struct Span {
    p0: Vec2,
    p1: Vec2,
    w0: f64,
    w1: f64,
    u_min: f64,
    u_span: f64,
    depth: usize,
}

impl Span {
    #[inline]
    fn u_max(&self) -> f64 {
        self.u_min + self.u_span
    }
}

/// Per-segment quantities shared by every sub-range of the search.
#[derive(Debug)]
struct ProjectedSegment {
    q: [Vec4; 3],
    /// Per-axis parameter where the 2D derivative vanishes, if inside (0, 1).
    flat: [Option<f64>; 2],
    /// Curve coordinate at the flat parameter, per axis.
    flat_value: [f64; 2],
    /// `B'(u) = curvature * u + slope`
    curvature: Vec2,
    slope: Vec2,
}

impl ProjectedSegment {
    fn new(q0: &Vec4, q1: &Vec4, q2: &Vec4) -> Self {
        let mut flat = [None; 2];
        let mut flat_value = [0.0; 2];
        for axis in 0..2 {
            flat[axis] = flat_point(q0[axis], q1[axis], q2[axis]);
            if let Some(u) = flat[axis] {
                flat_value[axis] = quadratic_bspline(q0[axis], q1[axis], q2[axis], u);
            }
        }

        let (p0, p1, p2) = (q0.xy(), q1.xy(), q2.xy());
        Self {
            q: [*q0, *q1, *q2],
            flat,
            flat_value,
            curvature: p0 - p1 * 2.0 + p2,
            slope: p1 - p0,
        }
    }

    fn root(&self) -> Span {
        let [q0, q1, q2] = &self.q;
        Span {
            p0: (q0.xy() + q1.xy()) * 0.5,
            p1: (q1.xy() + q2.xy()) * 0.5,
            w0: (q0.w + q1.w) * 0.5,
            w1: (q1.w + q2.w) * 0.5,
            u_min: 0.0,
            u_span: 1.0,
            depth: 0,
        }
    }

    #[inline]
    fn eval(&self, u: f64) -> Vec4 {
        quadratic_bspline(self.q[0], self.q[1], self.q[2], u)
    }

    #[inline]
    fn tangent(&self, u: f64) -> Vec2 {
        self.slope + self.curvature * u
    }

    /// Whether the curve over `span`, grown by the larger endpoint radius,
    /// can come within reach of the ray axis.
    fn may_hit(&self, span: &Span) -> bool {
        let mut lo = span.p0.inf(&span.p1);
        let mut hi = span.p0.sup(&span.p1);
        for axis in 0..2 {
            if let Some(u) = self.flat[axis] {
                if u > span.u_min && u < span.u_max() {
                    lo[axis] = lo[axis].min(self.flat_value[axis]);
                    hi[axis] = hi[axis].max(self.flat_value[axis]);
                }
            }
        }

        let w = span.w0.max(span.w1);
        lo.x <= w && lo.y <= w && hi.x >= -w && hi.y >= -w
    }

    /// Halve `span`, placing the new chord endpoint on the true curve.
    fn split(&self, span: &Span) -> (Span, Span) {
        let half = span.u_span * 0.5;
        let mid_u = span.u_min + half;
        let mid = self.eval(mid_u);
        let left = Span {
            p1: mid.xy(),
            w1: mid.w,
            u_span: half,
            depth: span.depth + 1,
            ..*span
        };
        let right = Span {
            p0: mid.xy(),
            w0: mid.w,
            u_min: mid_u,
            u_span: half,
            depth: span.depth + 1,
            ..*span
        };
        (left, right)
    }

    /// Test a flat sub-range as a tapered line segment.
    fn hit_chord(&self, span: &Span, t_min: f64, t_max: f64) -> Option<CurveHit> {
        // Reject when the ray's foot lies before the start or past the end of
        // this piece, measured along the curve's own tangents.
        let t0 = self.tangent(span.u_min);
        let t1 = self.tangent(span.u_max());
        if t0.dot(&span.p0) > 0.0 || t1.dot(&span.p1) < 0.0 {
            return None;
        }

        let v = span.p1 - span.p0;
        let length_sq = v.norm_squared();
        // A zero-length chord (curve running along the ray) degenerates to its start point.
        let along = if length_sq > 0.0 {
            -span.p0.dot(&v) / length_sq
        } else {
            0.0
        };
        let signed = span.p0.x * v.y - span.p0.y * v.x;

        let (fraction, distance) = if along <= 0.0 {
            (0.0, span.p0.norm())
        } else if along >= 1.0 {
            (1.0, span.p1.norm())
        } else {
            (along, signed.abs() / length_sq.sqrt())
        };

        // The fraction is clamped, so u stays inside this span.
        let u = fraction * span.u_span + span.u_min;

        let q = self.eval(u);
        let (depth, width) = (q.z, q.w);
        if !(depth > t_min && depth < t_max && distance < width) {
            return None;
        }

        let half = 0.5 * distance / width;
        let v = if signed < 0.0 { 0.5 - half } else { 0.5 + half };
        Some(CurveHit {
            t: depth,
            uv: Point2::new(u, v),
            width,
        })
    }
}

/// Find the closest hit on a projected segment with depth in `(t_min, t_max)`.
///
/// `q0, q1, q2` are the segment's control nodes in the ray frame:
/// `(x, y, depth, radius)`. Each accepted hit tightens the far bound, so the
/// result is the nearest hit; when two sub-ranges report the same depth, the
/// one with the smaller curve parameter wins.
pub fn intersect_segment(
    q0: &Vec4,
    q1: &Vec4,
    q2: &Vec4,
    t_min: f64,
    t_max: f64,
) -> Option<CurveHit> {
    let segment = ProjectedSegment::new(q0, q1, q2);
    let mut current = segment.root();

    // Pending right halves, at most one per depth level.
    let mut stack = [current; MAX_DEPTH];
    let mut len = 0;

    let mut closest: Option<CurveHit> = None;
    let mut far = t_max;

    loop {
        if segment.may_hit(&current) {
            if current.depth < MAX_DEPTH {
                let (left, right) = segment.split(&current);
                stack[len] = right;
                len += 1;
                current = left;
                continue;
            }
            if let Some(hit) = segment.hit_chord(&current, t_min, far) {
                far = hit.t;
                closest = Some(hit);
            }
        }

        if len == 0 {
            break;
        }
        len -= 1;
        current = stack[len];
    }

    closest
}
