//! Hair curve sets as traceable primitives.
//!
//! [`HairCurves`] owns the raw, untransformed curve data and its placement.
//! [`HairCurves::prepare_for_render`] produces a [`PreparedCurves`] snapshot:
//! the transformed curves plus a segment BVH, shared read-only by every
//! tracing thread until [`HairCurves::cleanup_after_render`] drops it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use log::info;
use strand_curves::{build_proxy, intersect_segment, CurveSet, RayFrame, TriangleMesh};
use strand_math::{Aabb3, Transform};

use crate::bvh::{Bvh, BvhPrimitive};
use crate::error::Result;
use crate::primitive::{IntersectionInfo, Primitive, RayHit};
use crate::Ray;

/// Maximum segments per BVH leaf.
const LEAF_SIZE: usize = 2;

/// Self-intersection offset, in multiples of the hit width.
const EPSILON_SCALE: f64 = 2.5;

/// A placed curve set and its render-time state.
#[derive(Debug)]
pub struct HairCurves {
    path: Option<PathBuf>,
    curves: CurveSet,
    transform: Transform,
    prepared: Option<Arc<PreparedCurves>>,
}

impl HairCurves {
    /// Load curves from a HAIR file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let hair = strand_hair::read_hair(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            curves: hair.curves,
            transform: Transform::identity(),
            prepared: None,
        })
    }

    /// Wrap curves that have no backing file.
    pub fn from_curves(curves: CurveSet) -> Self {
        Self {
            path: None,
            curves,
            transform: Transform::identity(),
            prepared: None,
        }
    }

    /// File the curves were loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The untransformed curves.
    pub fn curves(&self) -> &CurveSet {
        &self.curves
    }

    /// Placement applied by the next [`prepare_for_render`](Self::prepare_for_render).
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Replace the placement transform.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Apply the placement and build the acceleration structure.
    ///
    /// Must complete before any ray is traced; the returned snapshot is
    /// never mutated afterwards.
    pub fn prepare_for_render(&mut self) -> Arc<PreparedCurves> {
        let prepared = Arc::new(PreparedCurves::new(&self.curves, &self.transform));
        self.prepared = Some(Arc::clone(&prepared));
        prepared
    }

    /// The current snapshot, if prepared.
    pub fn prepared(&self) -> Option<&Arc<PreparedCurves>> {
        self.prepared.as_ref()
    }

    /// Release the snapshot and restore the raw curve data.
    ///
    /// File-backed curves are reloaded from disk.
    pub fn cleanup_after_render(&mut self) -> Result<()> {
        self.prepared = None;
        if let Some(path) = &self.path {
            self.curves = strand_hair::read_hair(path)?.curves;
        }
        Ok(())
    }
}

/// Transformed curves and their segment BVH.
#[derive(Debug)]
pub struct PreparedCurves {
    curves: CurveSet,
    bvh: Bvh,
}

impl PreparedCurves {
    /// Transform `curves` and build a BVH over every segment.
    pub fn new(curves: &CurveSet, transform: &Transform) -> Self {
        let start = Instant::now();
        let curves = curves.transformed(transform);

        let primitives: Vec<BvhPrimitive> = curves
            .segment_ids()
            .map(|id| BvhPrimitive {
                aabb: curves.segment_bounds(id),
                centroid: curves.segment_centroid(id),
                id,
            })
            .collect();
        let segments = primitives.len();
        let bvh = Bvh::build(primitives, LEAF_SIZE);

        let (nodes, depth) = bvh.stats();
        info!(
            "prepared {} curves: {} segments, {} BVH nodes, depth {} in {:.1?}",
            curves.curve_count(),
            segments,
            nodes,
            depth,
            start.elapsed()
        );

        Self { curves, bvh }
    }

    /// The transformed curves.
    pub fn curves(&self) -> &CurveSet {
        &self.curves
    }

    /// The segment BVH.
    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }
}

impl Primitive for PreparedCurves {
    fn bounds(&self) -> Aabb3 {
        self.curves.bounds()
    }

    fn intersect(&self, ray: &mut Ray) -> Option<RayHit> {
        let frame = RayFrame::new(ray.origin, ray.direction.as_ref());
        let mut closest = None;

        self.bvh.traverse(ray, |ray, id| {
            let [n0, n1, n2] = self.curves.segment(id);
            let q0 = frame.project(&n0);
            let q1 = frame.project(&n1);
            let q2 = frame.project(&n2);

            if let Some(hit) = intersect_segment(&q0, &q1, &q2, ray.near_t(), ray.far_t()) {
                ray.set_far_t(hit.t);
                closest = Some((hit, id));
            }
        });

        closest.map(|(hit, id)| RayHit {
            t: hit.t,
            point: ray.at(hit.t),
            uv: hit.uv,
            width: hit.width,
            element: id,
        })
    }

    fn intersection_info(&self, ray: &Ray, hit: &RayHit) -> IntersectionInfo {
        // Curves always face the viewer.
        let facing = -ray.direction.into_inner();
        IntersectionInfo {
            point: hit.point,
            geometric_normal: facing,
            shading_normal: facing,
            uv: hit.uv,
            epsilon: EPSILON_SCALE * hit.width,
        }
    }

    fn build_proxy(&self) -> TriangleMesh {
        build_proxy(&self.curves)
    }
}
