//! Screen to world mapping.
//!
//! Screen coordinates are CSS pixels with the origin at the top-left corner.
//! They are first normalized to `[-1, 1]` with Y pointing up, then either used
//! directly ([`Projection::Flat`]) or un-projected through a perspective
//! camera looking down -Z.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{invalid, ConfigResult};

/// Size of the drawing surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

impl Viewport {
    /// Zero or negative dimensions are clamped to one pixel.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Maps a screen point to normalized device coordinates.
    pub fn to_ndc(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x / self.width) * 2.0 - 1.0,
            -(screen.y / self.height) * 2.0 + 1.0,
        )
    }
}

fn sanitize_extent(v: f32) -> f32 {
    if v.is_finite() && v >= 1.0 {
        v
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveCamera {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Camera sits at `(0, 0, camera_z)` looking at the origin.
    pub camera_z: f32,
    /// NDC depth used when un-projecting pointer positions.
    pub ndc_depth: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_z: 1.0,
            ndc_depth: 0.0,
        }
    }
}

impl PerspectiveCamera {
    fn projection(&self, viewport: &Viewport) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_deg.to_radians(),
            viewport.aspect(),
            self.near,
            self.far,
        )
    }

    fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.camera_z))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    /// World space is NDC; z is always 0.
    Flat,
    Perspective(PerspectiveCamera),
}

impl Default for Projection {
    fn default() -> Self {
        Self::Perspective(PerspectiveCamera::default())
    }
}

impl Projection {
    pub fn view_projection(&self, viewport: &Viewport) -> Mat4 {
        match self {
            Self::Flat => Mat4::IDENTITY,
            Self::Perspective(cam) => cam.projection(viewport) * cam.view(),
        }
    }

    pub fn screen_to_world(&self, screen: Vec2, viewport: &Viewport) -> Vec3 {
        let ndc = viewport.to_ndc(screen);
        match self {
            Self::Flat => ndc.extend(0.0),
            Self::Perspective(cam) => self
                .view_projection(viewport)
                .inverse()
                .project_point3(ndc.extend(cam.ndc_depth)),
        }
    }

    /// Pixels covered by one world unit at clip-space `w == 1`.
    ///
    /// The point shader divides this by `w` to get perspective-correct sizes.
    pub fn pixels_per_world_unit(&self, viewport: &Viewport) -> f32 {
        match self {
            Self::Flat => viewport.height * 0.5,
            Self::Perspective(cam) => {
                let focal = 1.0 / (cam.fov_y_deg.to_radians() * 0.5).tan();
                focal * viewport.height * 0.5
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        match self {
            Self::Flat => Ok(()),
            Self::Perspective(cam) => {
                if !(cam.fov_y_deg > 0.0 && cam.fov_y_deg < 180.0) {
                    return Err(invalid("projection.fov_y_deg must be in (0, 180)"));
                }
                if !(cam.near > 0.0 && cam.far > cam.near) {
                    return Err(invalid("projection requires 0 < near < far"));
                }
                if !(cam.camera_z.is_finite() && cam.camera_z > 0.0) {
                    return Err(invalid("projection.camera_z must be positive"));
                }
                if !(-1.0..=1.0).contains(&cam.ndc_depth) {
                    return Err(invalid("projection.ndc_depth must be in [-1, 1]"));
                }
                Ok(())
            }
        }
    }
}
