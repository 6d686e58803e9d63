//! Coarse ribbon mesh used to preview curve sets.
//!
//! The proxy is a visualization fallback only; rays are never intersected
//! against it.

use strand_math::{orthonormal_basis, Vec3};

use crate::spline::{quadratic_bspline, quadratic_bspline_deriv};
use crate::CurveSet;

/// Output triangle mesh for previews and export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). Same length as vertices.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    fn push_vertex(&mut self, p: &Vec3, n: &Vec3) -> u32 {
        let index = self.num_vertices() as u32;
        self.vertices.extend([p.x as f32, p.y as f32, p.z as f32]);
        self.normals.extend([n.x as f32, n.y as f32, n.z as f32]);
        index
    }
}

/// Samples taken along each segment; fewer for denser curve sets.
pub fn proxy_samples(curve_count: usize) -> usize {
    if curve_count < 100 {
        100
    } else if curve_count < 10_000 {
        5
    } else {
        2
    }
}

/// Build a ribbon strip for every segment of `curves`.
///
/// Each sample contributes two vertices offset by the local radius on
/// either side of the centerline, perpendicular to the spline tangent.
pub fn build_proxy(curves: &CurveSet) -> TriangleMesh {
    let samples = proxy_samples(curves.curve_count());
    let mut mesh = TriangleMesh::new();

    for t in curves.segment_ids() {
        let [p0, p1, p2] = curves.segment(t);
        let mut previous: Option<(u32, u32)> = None;

        for j in 0..=samples {
            let u = j as f64 / samples as f64;
            let deriv = quadratic_bspline_deriv(p0.xyz(), p1.xyz(), p2.xyz(), u);
            let tangent = deriv.try_normalize(1e-12).unwrap_or_else(Vec3::z);
            let (side, normal) = orthonormal_basis(&tangent);

            let p = quadratic_bspline(p0, p1, p2, u);
            let center = p.xyz();
            let a = mesh.push_vertex(&(center - side * p.w), &normal);
            let b = mesh.push_vertex(&(center + side * p.w), &normal);

            if let Some((pa, pb)) = previous {
                mesh.indices.extend([pa, pb, b]);
                mesh.indices.extend([pa, b, a]);
            }
            previous = Some((a, b));
        }
    }

    mesh
}
