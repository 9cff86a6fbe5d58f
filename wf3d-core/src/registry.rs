//! The active mesh and its display parameters
//!
//! All mutation goes through [`Registry`]. A selection parses the new mesh
//! completely before touching anything, then swaps it in with one
//! assignment; on error the previous mesh and name stay active. Render passes
//! borrow a [`Snapshot`], so a selection can never land halfway through one.

use serde::Serialize;
use std::sync::Arc;

use crate::config::{DisplaySettings, ParseLimits};
use crate::error::Result;
use crate::geometry::Mesh;
use crate::name::ModelName;
use crate::obj::parse_obj;
use crate::store::MeshStore;
use crate::transform::Orientation;

pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 4.0;
/// Overlay text is cut to this many characters
pub const MAX_OVERLAY_CHARS: usize = 48;

/// Per-display parameters read by every frame
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub orientation: Orientation,
    pub scale: f32,
    pub text: String,
}

impl DisplayState {
    fn set_scale(&mut self, scale: f32) {
        if scale.is_finite() {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.chars().take(MAX_OVERLAY_CHARS).collect();
    }
}

/// Read-only view of the registry for one render pass
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub mesh: Option<&'a Mesh>,
    pub display: &'a DisplayState,
}

/// Status report for the control surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub active: String,
    pub text: String,
    pub scale: f32,
}

/// Owner of the active mesh and display state
#[derive(Debug)]
pub struct Registry {
    limits: ParseLimits,
    mesh: Option<Arc<Mesh>>,
    active: Option<ModelName>,
    display: DisplayState,
}

impl Registry {
    pub fn new(limits: ParseLimits, display: &DisplaySettings, pitch: f32) -> Self {
        let mut state = DisplayState {
            orientation: Orientation::new(0.0, pitch),
            scale: DisplaySettings::default().scale,
            text: String::new(),
        };
        state.set_scale(display.scale);
        state.set_text(&display.text);
        Self {
            limits,
            mesh: None,
            active: None,
            display: state,
        }
    }

    /// Validate `name`, then load it from `store` and make it active.
    pub fn select(&mut self, store: &dyn MeshStore, name: &str) -> Result<()> {
        let name = ModelName::parse(name)?;
        self.select_name(store, &name)
    }

    /// Load `name` from `store` and make it active.
    ///
    /// Nothing changes unless the whole load succeeds.
    pub fn select_name(&mut self, store: &dyn MeshStore, name: &ModelName) -> Result<()> {
        let mesh = store
            .open(name)
            .and_then(|reader| parse_obj(reader, name.as_str(), &self.limits))
            .inspect_err(|e| log::warn!("selecting {name} failed: {e}"))?;
        log::info!(
            "model loaded: {name} ({} vertices, {} edges)",
            mesh.vertices().len(),
            mesh.edges().len()
        );
        self.load(name.clone(), mesh);
        Ok(())
    }

    /// Make an already-built mesh active
    pub fn load(&mut self, name: ModelName, mesh: Mesh) {
        self.mesh = Some(Arc::new(mesh));
        self.active = Some(name);
    }

    /// Clamp `scale` and truncate `text` before storing them.
    ///
    /// A non-finite scale is ignored.
    pub fn set_display_params(&mut self, text: &str, scale: f32) {
        self.display.set_text(text);
        self.display.set_scale(scale);
    }

    /// Advance the continuous rotation; the only per-frame mutation
    pub fn advance_yaw(&mut self, step: f32) {
        self.display.orientation.advance_yaw(step);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            mesh: self.mesh.as_deref(),
            display: &self.display,
        }
    }

    /// Shared handle to the active mesh
    pub fn mesh(&self) -> Option<Arc<Mesh>> {
        self.mesh.clone()
    }

    pub fn active_name(&self) -> Option<&ModelName> {
        self.active.as_ref()
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn current_state(&self) -> Status {
        Status {
            active: self
                .active
                .as_ref()
                .map(ModelName::to_string)
                .unwrap_or_default(),
            text: self.display.text.clone(),
            scale: self.display.scale,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(ParseLimits::default(), &DisplaySettings::default(), 0.45)
    }
}
