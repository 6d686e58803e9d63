//! Bounding Volume Hierarchy over primitive ids.
//!
//! Uses Surface Area Heuristic (SAH) for construction. Traversal visits
//! candidate ids front to back and re-checks every node against the ray's
//! current far bound, so a visitor that shrinks that bound prunes the rest
//! of the walk.

use strand_math::{Aabb3, Point3};

use crate::Ray;

/// One entry handed to [`Bvh::build`].
#[derive(Debug, Clone, Copy)]
pub struct BvhPrimitive {
    /// Bounds of the primitive.
    pub aabb: Aabb3,
    /// Point used to sort the primitive into buckets.
    pub centroid: Point3,
    /// Id passed back to the traversal visitor.
    pub id: u32,
}

/// A BVH node - either a leaf containing ids or an internal node with children.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Leaf node containing primitive ids.
    Leaf {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Primitive ids contained in this leaf.
        ids: Vec<u32>,
    },
    /// Internal node with two children.
    Internal {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb3,
        /// Left child node.
        left: Box<BvhNode>,
        /// Right child node.
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    /// Bounding box of this node.
    pub fn aabb(&self) -> &Aabb3 {
        match self {
            BvhNode::Leaf { aabb, .. } => aabb,
            BvhNode::Internal { aabb, .. } => aabb,
        }
    }
}

/// Bounding Volume Hierarchy for accelerated closest-hit queries.
#[derive(Debug, Clone)]
pub struct Bvh {
    root: Option<BvhNode>,
}

impl Bvh {
    /// Build a BVH using SAH construction.
    ///
    /// Nodes with at most `leaf_size` primitives become leaves.
    pub fn build(mut primitives: Vec<BvhPrimitive>, leaf_size: usize) -> Self {
        let root = if primitives.is_empty() {
            None
        } else {
            Some(build_node(&mut primitives, leaf_size.max(1)))
        };
        Self { root }
    }

    /// Get a reference to the root node, if any.
    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// Bounds of everything in the hierarchy.
    pub fn bounds(&self) -> Aabb3 {
        self.root.as_ref().map_or_else(Aabb3::empty, |n| *n.aabb())
    }

    /// Number of nodes and maximum depth.
    pub fn stats(&self) -> (usize, usize) {
        fn walk(node: &BvhNode, depth: usize) -> (usize, usize) {
            match node {
                BvhNode::Leaf { .. } => (1, depth),
                BvhNode::Internal { left, right, .. } => {
                    let (ln, ld) = walk(left, depth + 1);
                    let (rn, rd) = walk(right, depth + 1);
                    (1 + ln + rn, ld.max(rd))
                }
            }
        }
        self.root.as_ref().map_or((0, 0), |root| walk(root, 1))
    }

    /// Call `visit` for every id whose leaf box the ray passes through.
    ///
    /// The visitor receives the ray mutably and may shrink its far bound;
    /// boxes entirely beyond that bound are skipped from then on.
    pub fn traverse<F>(&self, ray: &mut Ray, mut visit: F)
    where
        F: FnMut(&mut Ray, u32),
    {
        if let Some(ref root) = self.root {
            traverse_node(root, ray, &mut visit);
        }
    }
}

fn traverse_node<F>(node: &BvhNode, ray: &mut Ray, visit: &mut F)
where
    F: FnMut(&mut Ray, u32),
{
    if ray.intersect_aabb(node.aabb()).is_none() {
        return;
    }

    match node {
        BvhNode::Leaf { ids, .. } => {
            for &id in ids {
                visit(ray, id);
            }
        }
        BvhNode::Internal { left, right, .. } => {
            // Test children in order of AABB distance
            let left_t = ray.intersect_aabb(left.aabb()).map(|(t, _)| t);
            let right_t = ray.intersect_aabb(right.aabb()).map(|(t, _)| t);

            match (left_t, right_t) {
                (Some(lt), Some(rt)) => {
                    if lt <= rt {
                        traverse_node(left, ray, visit);
                        traverse_node(right, ray, visit);
                    } else {
                        traverse_node(right, ray, visit);
                        traverse_node(left, ray, visit);
                    }
                }
                (Some(_), None) => traverse_node(left, ray, visit),
                (None, Some(_)) => traverse_node(right, ray, visit),
                (None, None) => {}
            }
        }
    }
}

/// Build a BVH node recursively using SAH.
fn build_node(prims: &mut [BvhPrimitive], leaf_size: usize) -> BvhNode {
    let mut bounds = Aabb3::empty();
    for p in prims.iter() {
        bounds.include_aabb(&p.aabb);
    }

    if prims.len() <= leaf_size {
        return BvhNode::Leaf {
            aabb: bounds,
            ids: prims.iter().map(|p| p.id).collect(),
        };
    }

    let mut centroid_bounds = Aabb3::empty();
    for p in prims.iter() {
        centroid_bounds.include_point(&p.centroid);
    }

    let mid = match find_best_split(prims, &bounds, &centroid_bounds) {
        Some((axis, pos)) => partition(prims, axis, pos),
        None => 0,
    };

    // Fallback if partition fails: just split in the middle
    let mid = if mid == 0 || mid == prims.len() {
        prims.len() / 2
    } else {
        mid
    };

    let (left, right) = prims.split_at_mut(mid);
    BvhNode::Internal {
        aabb: bounds,
        left: Box::new(build_node(left, leaf_size)),
        right: Box::new(build_node(right, leaf_size)),
    }
}

/// Find the best split axis and position using SAH over centroid buckets.
fn find_best_split(
    prims: &[BvhPrimitive],
    bounds: &Aabb3,
    centroid_bounds: &Aabb3,
) -> Option<(usize, f64)> {
    const NUM_BUCKETS: usize = 12;

    let total_area = bounds.surface_area();
    let extent = centroid_bounds.extent();
    let mut best: Option<(usize, f64)> = None;
    let mut best_cost = f64::INFINITY;

    for axis in 0..3 {
        let axis_extent = extent[axis];
        if axis_extent < 1e-10 {
            continue;
        }
        let axis_min = centroid_bounds.min[axis];

        let mut bucket_counts = [0usize; NUM_BUCKETS];
        let mut bucket_bounds = [Aabb3::empty(); NUM_BUCKETS];

        for p in prims {
            let b = ((p.centroid[axis] - axis_min) / axis_extent * NUM_BUCKETS as f64) as usize;
            let b = b.min(NUM_BUCKETS - 1);
            bucket_counts[b] += 1;
            bucket_bounds[b].include_aabb(&p.aabb);
        }

        for split in 1..NUM_BUCKETS {
            let mut left_count = 0;
            let mut left_bounds = Aabb3::empty();
            for i in 0..split {
                left_count += bucket_counts[i];
                left_bounds.include_aabb(&bucket_bounds[i]);
            }

            let mut right_count = 0;
            let mut right_bounds = Aabb3::empty();
            for i in split..NUM_BUCKETS {
                right_count += bucket_counts[i];
                right_bounds.include_aabb(&bucket_bounds[i]);
            }

            if left_count == 0 || right_count == 0 {
                continue;
            }

            // SAH cost: traversal + P(left) * N_left + P(right) * N_right
            let cost = 0.125
                + left_bounds.surface_area() / total_area * left_count as f64
                + right_bounds.surface_area() / total_area * right_count as f64;

            if cost < best_cost {
                best_cost = cost;
                best = Some((axis, axis_min + (split as f64 / NUM_BUCKETS as f64) * axis_extent));
            }
        }
    }

    best
}

/// Partition primitives by centroid along an axis.
fn partition(prims: &mut [BvhPrimitive], axis: usize, pos: f64) -> usize {
    let mut left = 0;
    let mut right = prims.len();

    while left < right {
        if prims[left].centroid[axis] < pos {
            left += 1;
        } else {
            right -= 1;
            prims.swap(left, right);
        }
    }

    left
}
