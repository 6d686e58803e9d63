//! Render settings read from TOML.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use strand_math::{Aabb3, Point3, Transform, Vec3};
use strand_raytrace::{Camera, Shading};

/// Output shading mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadeMode {
    /// Grey depth ramp.
    #[default]
    Depth,
    /// Curve parameter and cross-sectional offset.
    Uv,
    /// Node colors from the file.
    Color,
}

impl From<ShadeMode> for Shading {
    fn from(mode: ShadeMode) -> Self {
        match mode {
            ShadeMode::Depth => Shading::Depth,
            ShadeMode::Uv => Shading::Uv,
            ShadeMode::Color => Shading::Color,
        }
    }
}

/// Camera placement. Unset position or target frame the curves automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Camera position.
    pub position: Option<[f64; 3]>,
    /// Look-at target.
    pub target: Option<[f64; 3]>,
    /// Up vector.
    pub up: [f64; 3],
    /// Vertical field of view (degrees).
    pub fov: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: None,
            target: None,
            up: [0.0, 1.0, 0.0],
            fov: 40.0,
        }
    }
}

/// Placement of the curves in the scene, applied scale, rotation, translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Translation.
    pub translate: [f64; 3],
    /// Per-axis scale.
    pub scale: [f64; 3],
    /// Rotation about Y (degrees).
    pub rotate_y: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            translate: [0.0; 3],
            scale: [1.0; 3],
            rotate_y: 0.0,
        }
    }
}

impl PlacementSettings {
    /// The placement as an affine transform.
    pub fn transform(&self) -> Transform {
        let [tx, ty, tz] = self.translate;
        let [sx, sy, sz] = self.scale;
        Transform::translation(tx, ty, tz)
            .then(&Transform::rotation_y(self.rotate_y.to_radians()))
            .then(&Transform::scale(sx, sy, sz))
    }
}

/// Render parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width (pixels).
    pub width: u32,
    /// Image height (pixels).
    pub height: u32,
    /// Ray near bound.
    pub near: f64,
    /// Output shading.
    pub shading: ShadeMode,
    /// Camera.
    pub camera: CameraSettings,
    /// Curve placement.
    pub placement: PlacementSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            near: 0.0,
            shading: ShadeMode::Depth,
            camera: CameraSettings::default(),
            placement: PlacementSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read render config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid render config {}", path.display()))
    }

    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("image size must be positive, got {}x{}", self.width, self.height);
        }
        if self.camera.fov.is_nan() || self.camera.fov <= 0.0 || self.camera.fov >= 180.0 {
            bail!("fov must be between 0 and 180 degrees, got {}", self.camera.fov);
        }
        if self.near.is_nan() || self.near < 0.0 {
            bail!("near bound must be non-negative, got {}", self.near);
        }
        if self.placement.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            bail!("placement scale must be finite and non-zero");
        }
        Ok(())
    }

    /// Build the camera, framing `bounds` for any unset position or target.
    pub fn camera(&self, bounds: &Aabb3) -> Camera {
        let center = if bounds.is_empty() {
            Point3::origin()
        } else {
            bounds.center()
        };
        let target = self.camera.target.map(Point3::from).unwrap_or(center);

        let position = self.camera.position.map(Point3::from).unwrap_or_else(|| {
            // Back off along -z far enough for the bounding sphere to fit the fov.
            let radius = if bounds.is_empty() {
                1.0
            } else {
                (bounds.extent().norm() * 0.5).max(1e-6)
            };
            let distance = radius / (self.camera.fov.to_radians() * 0.5).sin();
            target - Vec3::z() * distance
        });

        Camera::new(
            position,
            target,
            Vec3::from(self.camera.up),
            self.camera.fov.to_radians(),
            self.width,
            self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_from_empty_toml() {
        let settings = RenderSettings::from_toml("").unwrap();
        assert_eq!(settings.width, 512);
        assert_eq!(settings.shading, ShadeMode::Depth);
        assert_eq!(settings.camera.up, [0.0, 1.0, 0.0]);
        assert_eq!(settings.placement.scale, [1.0; 3]);
    }

    #[test]
    fn test_partial_toml() {
        let settings = RenderSettings::from_toml(
            r#"
            width = 320
            shading = "color"

            [camera]
            position = [0.0, 2.0, -30.0]
            fov = 25.0

            [placement]
            translate = [1.0, 0.0, 0.0]
            rotate_y = 90.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, 512);
        assert_eq!(settings.shading, ShadeMode::Color);
        assert_eq!(settings.camera.position, Some([0.0, 2.0, -30.0]));
        assert_eq!(settings.camera.target, None);
        assert_eq!(settings.placement.rotate_y, 90.0);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(RenderSettings::from_toml("width = 0").is_err());
        assert!(RenderSettings::from_toml("[camera]\nfov = 0.0").is_err());
        assert!(RenderSettings::from_toml("near = -1.0").is_err());
        assert!(RenderSettings::from_toml("[placement]\nscale = [1.0, 0.0, 1.0]").is_err());
        assert!(RenderSettings::from_toml("shading = \"phong\"").is_err());
    }

    #[test]
    fn test_placement_order() {
        let placement = PlacementSettings {
            translate: [10.0, 0.0, 0.0],
            scale: [2.0, 2.0, 2.0],
            rotate_y: 90.0,
        };
        // Scale, then rotate +x onto -z, then translate.
        let p = placement.transform().apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(10.0, 0.0, -2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_auto_camera_frames_bounds() {
        let settings = RenderSettings::default();
        let bounds = Aabb3::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let camera = settings.camera(&bounds);
        assert_eq!(camera.target, Point3::origin());
        assert!(camera.position.z < -3.0);
        assert_eq!((camera.width, camera.height), (512, 512));
    }
}
