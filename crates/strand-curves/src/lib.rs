#![warn(missing_docs)]

//! Hair curves for the strand ray tracer.
//!
//! A curve is a chain of `(position, radius)` nodes read as a sequence of
//! overlapping quadratic B-spline segments: tapered tubes that together form
//! one smooth strand.
//!
//! # Architecture
//!
//! - [`CurveSet`] - Node buffer, curve boundaries, colors and bounds
//! - [`spline`] - Segment evaluation, extrema and bounding boxes
//! - [`RayFrame`] - Projection into a ray-aligned basis
//! - [`intersect_segment`] - Adaptive closest-hit search on one segment
//! - [`proxy`] - Preview ribbon mesh

mod curve_set;
mod frame;
mod intersect;
pub mod proxy;
pub mod spline;

pub use curve_set::{CurveSet, CurveSetError, NodeColors};
pub use frame::RayFrame;
pub use intersect::{intersect_segment, CurveHit, MAX_DEPTH};
pub use proxy::{build_proxy, TriangleMesh};
