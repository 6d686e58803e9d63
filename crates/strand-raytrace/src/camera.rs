//! Pinhole camera producing primary rays.

use strand_math::{Point3, Vec3};

use crate::Ray;

/// A pinhole camera looking from `position` toward `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera position.
    pub position: Point3,
    /// Look-at target.
    pub target: Point3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f64,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl Camera {
    /// Create a new camera for rendering.
    pub fn new(position: Point3, target: Point3, up: Vec3, fov: f64, width: u32, height: u32) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            width,
            height,
        }
    }

    /// Orthonormal `(right, up, forward)` basis.
    ///
    /// Falls back to a Z-up or Y-up frame when `up` is parallel to the view
    /// direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position)
            .try_normalize(1e-12)
            .unwrap_or_else(|| -Vec3::z());
        let right = forward
            .cross(&self.up)
            .try_normalize(1e-12)
            .or_else(|| forward.cross(&Vec3::z()).try_normalize(1e-12))
            .unwrap_or_else(|| forward.cross(&Vec3::y()).normalize());
        let up = right.cross(&forward);
        (right, up, forward)
    }

    /// Per-frame ray generator; the basis and image plane are computed once.
    pub fn rays(&self) -> PrimaryRays {
        let (right, up, forward) = self.basis();
        let half_height = (self.fov * 0.5).tan();
        let aspect = self.width as f64 / self.height.max(1) as f64;
        PrimaryRays {
            origin: self.position,
            forward,
            right: right * half_height * aspect,
            up: up * half_height,
            inv_width: 1.0 / self.width.max(1) as f64,
            inv_height: 1.0 / self.height.max(1) as f64,
        }
    }

    /// Primary ray through the center of pixel `(x, y)`, row 0 at the top.
    ///
    /// Use [`rays`](Self::rays) when tracing many pixels.
    pub fn ray(&self, x: u32, y: u32) -> Ray {
        self.rays().ray(x, y)
    }
}

/// Primary rays of one camera, with the image plane precomputed.
#[derive(Debug, Clone, Copy)]
pub struct PrimaryRays {
    origin: Point3,
    forward: Vec3,
    /// Right basis vector scaled to the half width of the image plane.
    right: Vec3,
    /// Up basis vector scaled to the half height of the image plane.
    up: Vec3,
    inv_width: f64,
    inv_height: f64,
}

impl PrimaryRays {
    /// Primary ray through the center of pixel `(x, y)`, row 0 at the top.
    #[inline]
    pub fn ray(&self, x: u32, y: u32) -> Ray {
        let sx = 2.0 * (x as f64 + 0.5) * self.inv_width - 1.0;
        let sy = 1.0 - 2.0 * (y as f64 + 0.5) * self.inv_height;
        Ray::new(self.origin, self.forward + self.right * sx + self.up * sy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn camera() -> Camera {
        Camera::new(Point3::origin(), Point3::new(0.0, 0.0, 10.0), Vec3::y(), FRAC_PI_2, 5, 5)
    }

    #[test]
    fn test_center_pixel_looks_at_target() {
        let ray = camera().ray(2, 2);
        assert_relative_eq!(ray.direction.into_inner(), Vec3::z(), epsilon = 1e-12);
        assert_eq!(ray.origin, Point3::origin());
    }

    #[test]
    fn test_image_orientation() {
        let cam = camera();
        let top_left = cam.ray(0, 0).direction;
        assert!(top_left.y > 0.0);
        // Looking down +z with +y up, screen right is -x.
        assert!(top_left.x > 0.0);
        let bottom_right = cam.ray(4, 4).direction;
        assert!(bottom_right.y < 0.0);
        assert!(bottom_right.x < 0.0);
    }

    #[test]
    fn test_fov_spans_edges() {
        // 90 degree fov: the pixel-edge ray at the top leaves at 45 degrees.
        let cam = Camera::new(Point3::origin(), Point3::new(0.0, 0.0, 1.0), Vec3::y(), FRAC_PI_2, 1, 1_000_000);
        let d = cam.ray(0, 0).direction;
        assert_relative_eq!(d.y / d.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_shared_generator_matches_per_pixel_rays() {
        let cam = Camera::new(Point3::new(1.0, 2.0, -3.0), Point3::new(0.5, 0.0, 4.0), Vec3::y(), 0.9, 7, 3);
        let rays = cam.rays();
        for y in 0..cam.height {
            for x in 0..cam.width {
                let a = rays.ray(x, y);
                let b = cam.ray(x, y);
                assert_eq!(a.origin, b.origin);
                assert_eq!(a.direction, b.direction);
            }
        }
    }

    #[test]
    fn test_degenerate_up() {
        let cam = Camera::new(Point3::origin(), Point3::new(0.0, 5.0, 0.0), Vec3::y(), 1.0, 4, 4);
        let (right, up, forward) = cam.basis();
        assert_relative_eq!(right.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(up.dot(&forward), 0.0, epsilon = 1e-12);
        assert_relative_eq!(right.dot(&forward), 0.0, epsilon = 1e-12);
    }
}
