//! Tunable limits and render parameters
//!
//! Every section deserializes with defaults for missing fields, so a config
//! file only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Hard caps applied while parsing a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseLimits {
    pub max_vertices: usize,
    /// Counted after deduplication
    pub max_edges: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_vertices: 3500,
            max_edges: 12000,
        }
    }
}

/// Camera and per-frame budget parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Upper bound on lines drawn per frame
    pub max_draw_edges: usize,
    /// Perspective focal length in pixels
    pub focal_length: f32,
    /// Camera distance along the depth axis
    pub camera_distance: f32,
    /// Vertices at or below this depth are not projected
    pub near: f32,
    /// Slack around the viewport within which a vertex still counts as visible
    pub margin: i32,
    /// Fixed tilt about the horizontal axis, in radians
    pub pitch: f32,
    /// Lines drawn between cooperative yields
    pub yield_every: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_draw_edges: 2500,
            focal_length: 130.0,
            camera_distance: 4.0,
            near: 0.1,
            margin: 80,
            pitch: 0.45,
            yield_every: 128,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub frame_interval_ms: u64,
    /// Yaw advance per rendered frame, in radians
    pub yaw_step: f32,
}

impl SchedulerSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 80,
            yaw_step: 0.035,
        }
    }
}

/// Initial overlay text and scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub text: String,
    pub scale: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            text: "wf3d".to_string(),
            scale: 1.2,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directory of the mesh store
    pub models_dir: Option<PathBuf>,
    pub limits: ParseLimits,
    pub render: RenderSettings,
    pub scheduler: SchedulerSettings,
    pub display: DisplaySettings,
}
