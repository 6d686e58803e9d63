//! Row-parallel primary ray tracing.

use rayon::prelude::*;
use strand_curves::CurveSet;

use crate::{Camera, Primitive, RayHit};

/// How hits are turned into pixel colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Grey ramp from nearest (white) to farthest (dark) hit.
    #[default]
    Depth,
    /// `u` in red, cross-sectional `v` in green.
    Uv,
    /// Color of the hit segment's middle node.
    Color,
}

/// Closest hit for every pixel of a frame, row-major from the top.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    hits: Vec<Option<RayHit>>,
}

impl FrameBuffer {
    /// Image width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Hit at pixel `(x, y)`.
    pub fn hit(&self, x: u32, y: u32) -> Option<&RayHit> {
        self.hits[(y * self.width + x) as usize].as_ref()
    }

    /// Number of pixels that hit something.
    pub fn hit_count(&self) -> usize {
        self.hits.iter().filter(|h| h.is_some()).count()
    }

    /// Depth range `(min, max)` over all hits.
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        self.hits.iter().flatten().fold(None, |range, hit| match range {
            None => Some((hit.t, hit.t)),
            Some((lo, hi)) => Some((lo.min(hit.t), hi.max(hit.t))),
        })
    }

    /// Shade into packed RGB8 pixels. Misses are black.
    ///
    /// `curves` must be the set the frame was traced against; segment ids
    /// in the hits index into it.
    pub fn to_rgb8(&self, shading: Shading, curves: &CurveSet) -> Vec<u8> {
        let (near, far) = self.depth_range().unwrap_or((0.0, 1.0));
        let span = if far > near { far - near } else { 1.0 };

        let mut pixels = Vec::with_capacity(self.hits.len() * 3);
        for hit in &self.hits {
            let rgb = match hit {
                None => [0.0; 3],
                Some(hit) => match shading {
                    Shading::Depth => {
                        let g = 1.0 - 0.8 * (hit.t - near) / span;
                        [g, g, g]
                    }
                    Shading::Uv => [hit.uv.x, hit.uv.y, 0.0],
                    Shading::Color => {
                        let c = curves.node_color(hit.element as usize - 1);
                        [c.x, c.y, c.z]
                    }
                },
            };
            pixels.extend(rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8));
        }
        pixels
    }
}

/// Trace one primary ray per pixel against a prepared primitive.
///
/// Rows are traced in parallel; each ray starts with the interval
/// `[near, ∞)` and is owned by the thread tracing it.
pub fn render_frame(primitive: &dyn Primitive, camera: &Camera, near: f64) -> FrameBuffer {
    let width = camera.width;
    let rays = camera.rays();
    let mut hits = vec![None; width as usize * camera.height as usize];

    if width > 0 {
        hits.par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    let mut ray = rays.ray(x as u32, y as u32).with_bounds(near, f64::INFINITY);
                    *pixel = primitive.intersect(&mut ray);
                }
            });
    }

    FrameBuffer {
        width,
        height: camera.height,
        hits,
    }
}
