#![warn(missing_docs)]

//! Ray tracing of hair curve sets.
//!
//! Curves are intersected directly as tapered spline ribbons; no tessellated
//! geometry is involved in tracing.
//!
//! # Architecture
//!
//! - [`Ray`] - Ray with an explicit `[near, far]` interval
//! - [`bvh`] - Bounding volume hierarchy over curve segments
//! - [`Primitive`] - What the renderer needs from traceable geometry
//! - [`HairCurves`] - Placement and render lifecycle of a curve set
//! - [`render_frame`] - Parallel primary ray tracing
//!
//! # Example
//!
//! ```ignore
//! use strand_raytrace::{HairCurves, Primitive, Ray};
//!
//! let mut hair = HairCurves::from_file("head.hair")?;
//! let prepared = hair.prepare_for_render();
//!
//! let mut ray = Ray::new(Point3::new(0.0, 10.0, -50.0), Vec3::z());
//! if let Some(hit) = prepared.intersect(&mut ray) {
//!     println!("hit segment {} at t = {}", hit.element, hit.t);
//! }
//!
//! hair.cleanup_after_render()?;
//! ```

mod camera;
mod curves;
mod error;
mod primitive;
mod ray;
mod render;
pub mod bvh;

pub use bvh::Bvh;
pub use camera::{Camera, PrimaryRays};
pub use curves::{HairCurves, PreparedCurves};
pub use error::{RenderError, Result};
pub use primitive::{IntersectionInfo, Primitive, RayHit};
pub use ray::Ray;
pub use render::{render_frame, FrameBuffer, Shading};
