//! Camera and perspective projection

use nalgebra::{Point3, Rotation3};

use crate::config::RenderSettings;

/// A vertex after projection for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPoint {
    /// At or behind the near threshold; has no screen position
    Culled,
    /// Projected to integer screen coordinates
    Projected { x: i32, y: i32, visible: bool },
}

impl ScreenPoint {
    pub fn is_visible(&self) -> bool {
        matches!(self, ScreenPoint::Projected { visible: true, .. })
    }

    /// Screen position, if the point was projected at all
    pub fn position(&self) -> Option<(i32, i32)> {
        match *self {
            ScreenPoint::Projected { x, y, .. } => Some((x, y)),
            ScreenPoint::Culled => None,
        }
    }
}

/// Fixed pinhole camera looking down +z from `camera_distance` away
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub focal_length: f32,
    pub camera_distance: f32,
    pub near: f32,
    pub margin: i32,
}

impl Projector {
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            focal_length: settings.focal_length,
            camera_distance: settings.camera_distance,
            near: settings.near,
            margin: settings.margin,
        }
    }

    /// Project one model-space vertex onto a `width` x `height` viewport
    pub fn project(
        &self,
        vertex: &Point3<f32>,
        scale: f32,
        rotation: &Rotation3<f32>,
        width: i32,
        height: i32,
    ) -> ScreenPoint {
        let p = rotation * (vertex * scale);
        let depth = p.z + self.camera_distance;

        // Prevent division by near-zero or negative depth values
        if depth <= self.near {
            return ScreenPoint::Culled;
        }

        let x = (p.x * self.focal_length / depth + width as f32 * 0.5) as i32;
        let y = (p.y * self.focal_length / depth + height as f32 * 0.5) as i32;
        let m = self.margin;
        let visible = x > -m && x < width + m && y > -m && y < height + m;

        ScreenPoint::Projected { x, y, visible }
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(&RenderSettings::default())
    }
}
