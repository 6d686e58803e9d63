//! The curve set: every curve's control nodes in one shared buffer.

use std::ops::Range;

use log::warn;
use strand_math::{Aabb3, Point3, Transform, Vec3, Vec4};
use thiserror::Error;

use crate::spline::{segment_bounds, segment_centroid};

/// Errors raised when a curve layout is inconsistent with its node buffer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveSetError {
    /// A curve ends before the curve preceding it.
    #[error("curve {curve} ends at node {end}, before the previous curve's end {previous}")]
    UnorderedBoundaries {
        /// Index of the offending curve.
        curve: usize,
        /// Its end index.
        end: u32,
        /// End index of the previous curve.
        previous: u32,
    },

    /// A curve extends past the node buffer.
    #[error("curve {curve} ends at node {end} but only {nodes} nodes are present")]
    BoundaryOutOfRange {
        /// Index of the offending curve.
        curve: usize,
        /// Its end index.
        end: u32,
        /// Number of nodes available.
        nodes: usize,
    },

    /// Per-node colors do not match the node count.
    #[error("{colors} node colors given for {nodes} nodes")]
    ColorCountMismatch {
        /// Number of colors.
        colors: usize,
        /// Number of nodes.
        nodes: usize,
    },
}

/// Color assignment for the nodes of a curve set.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeColors {
    /// One color shared by every node.
    Uniform(Vec3),
    /// One color per node.
    PerNode(Vec<Vec3>),
}

/// A set of hair curves.
///
/// Nodes are `(x, y, z, radius)` records shared contiguously by all curves.
/// Curve `i` owns nodes `[curve_ends[i - 1], curve_ends[i])`. A curve with
/// `k` nodes holds `k - 2` overlapping segments, each addressed by the index
/// `t` of its last control node.
///
/// A `CurveSet` is immutable once built; placement produces a new set with
/// [`transformed`](Self::transformed).
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSet {
    nodes: Vec<Vec4>,
    curve_ends: Vec<u32>,
    colors: NodeColors,
    bounds: Aabb3,
}

impl CurveSet {
    /// Build a curve set, validating the curve boundaries and colors.
    pub fn new(
        nodes: Vec<Vec4>,
        curve_ends: Vec<u32>,
        colors: NodeColors,
    ) -> Result<Self, CurveSetError> {
        let mut previous = 0;
        let mut short_curves = 0;
        for (curve, &end) in curve_ends.iter().enumerate() {
            if end < previous {
                return Err(CurveSetError::UnorderedBoundaries {
                    curve,
                    end,
                    previous,
                });
            }
            if end as usize > nodes.len() {
                return Err(CurveSetError::BoundaryOutOfRange {
                    curve,
                    end,
                    nodes: nodes.len(),
                });
            }
            if end - previous < 3 {
                short_curves += 1;
            }
            previous = end;
        }

        if let NodeColors::PerNode(colors) = &colors {
            if colors.len() != nodes.len() {
                return Err(CurveSetError::ColorCountMismatch {
                    colors: colors.len(),
                    nodes: nodes.len(),
                });
            }
        }

        if short_curves > 0 {
            warn!("{} curves have fewer than 3 nodes and contribute no segments", short_curves);
        }

        let mut set = Self {
            nodes,
            curve_ends,
            colors,
            bounds: Aabb3::empty(),
        };
        set.bounds = set.compute_bounds();
        Ok(set)
    }

    /// Number of curves.
    pub fn curve_count(&self) -> usize {
        self.curve_ends.len()
    }

    /// Number of nodes across all curves.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes, `(x, y, z, radius)`.
    pub fn nodes(&self) -> &[Vec4] {
        &self.nodes
    }

    /// Exclusive end index of every curve.
    pub fn curve_ends(&self) -> &[u32] {
        &self.curve_ends
    }

    /// Node color assignment.
    pub fn colors(&self) -> &NodeColors {
        &self.colors
    }

    /// Color of node `i`.
    pub fn node_color(&self, i: usize) -> Vec3 {
        match &self.colors {
            NodeColors::Uniform(c) => *c,
            NodeColors::PerNode(colors) => colors[i],
        }
    }

    /// Node index range of curve `i`.
    pub fn curve_range(&self, i: usize) -> Range<usize> {
        let start = if i == 0 { 0 } else { self.curve_ends[i - 1] as usize };
        start..self.curve_ends[i] as usize
    }

    /// Ids of every segment, curve by curve.
    pub fn segment_ids(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.curve_count()).flat_map(move |i| {
            let range = self.curve_range(i);
            (range.start as u32 + 2)..(range.end as u32).max(range.start as u32 + 2)
        })
    }

    /// Total number of segments.
    pub fn segment_count(&self) -> usize {
        (0..self.curve_count())
            .map(|i| self.curve_range(i).len().saturating_sub(2))
            .sum()
    }

    /// Control nodes of segment `t`.
    #[inline]
    pub fn segment(&self, t: u32) -> [Vec4; 3] {
        let t = t as usize;
        [self.nodes[t - 2], self.nodes[t - 1], self.nodes[t]]
    }

    /// Bounding box of segment `t`.
    pub fn segment_bounds(&self, t: u32) -> Aabb3 {
        let [q0, q1, q2] = self.segment(t);
        segment_bounds(&q0, &q1, &q2)
    }

    /// Centroid of segment `t`'s control positions.
    pub fn segment_centroid(&self, t: u32) -> Point3 {
        let [q0, q1, q2] = self.segment(t);
        segment_centroid(&q0, &q1, &q2)
    }

    /// Union of all segment bounds.
    pub fn bounds(&self) -> Aabb3 {
        self.bounds
    }

    /// Apply a placement transform, returning a new curve set.
    ///
    /// Positions go through the full affine transform. Radii are scaled by
    /// the transform's average linear scale factor.
    pub fn transformed(&self, transform: &Transform) -> Self {
        let width_scale = transform.average_scale();
        let nodes: Vec<Vec4> = self
            .nodes
            .iter()
            .map(|n| {
                let p = transform.apply_point(&Point3::from(n.xyz()));
                Vec4::new(p.x, p.y, p.z, n.w * width_scale)
            })
            .collect();

        let mut set = Self {
            nodes,
            curve_ends: self.curve_ends.clone(),
            colors: self.colors.clone(),
            bounds: Aabb3::empty(),
        };
        set.bounds = set.compute_bounds();
        set
    }

    fn compute_bounds(&self) -> Aabb3 {
        let mut bounds = Aabb3::empty();
        for t in self.segment_ids() {
            bounds.include_aabb(&self.segment_bounds(t));
        }
        bounds
    }
}
