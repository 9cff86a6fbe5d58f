//! Requests from the control surface
//!
//! Front ends translate their input (keys, command-line flags) into
//! [`Command`]s and apply them between frames.

use serde::Serialize;

use crate::error::Result;
use crate::registry::{Registry, Status};
use crate::store::MeshStore;

/// A single control-surface request
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load a model; on success also apply the given text and scale
    Select {
        model: String,
        text: Option<String>,
        scale: Option<f32>,
    },
    /// Change overlay text and/or scale, keeping the current model
    SetDisplay {
        text: Option<String>,
        scale: Option<f32>,
    },
    /// Re-read the active model from the store
    Reload,
}

impl Registry {
    /// Apply one command. Errors leave the registry unchanged.
    pub fn apply(&mut self, store: &dyn MeshStore, command: Command) -> Result<()> {
        match command {
            Command::Select { model, text, scale } => {
                self.select(store, &model)?;
                self.set_display_fallback(text, scale);
            }
            Command::SetDisplay { text, scale } => self.set_display_fallback(text, scale),
            Command::Reload => {
                if let Some(name) = self.active_name().cloned() {
                    self.select_name(store, &name)?;
                }
            }
        }
        Ok(())
    }

    fn set_display_fallback(&mut self, text: Option<String>, scale: Option<f32>) {
        let text = text.unwrap_or_else(|| self.display().text.clone());
        let scale = scale.unwrap_or(self.display().scale);
        self.set_display_params(&text, scale);
    }
}

/// Current status plus every model available for selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    #[serde(flatten)]
    pub status: Status,
    pub models: Vec<String>,
}

/// Build the listing shown to the control surface.
pub fn catalog(registry: &Registry, store: &dyn MeshStore) -> Catalog {
    Catalog {
        status: registry.current_state(),
        models: store.list().iter().map(ToString::to_string).collect(),
    }
}

/// Model `offset` places away from the active one in the store's listing,
/// wrapping around. With nothing active, stepping forward gives the first
/// model and stepping back gives the last.
pub fn cycle_model(registry: &Registry, store: &dyn MeshStore, offset: isize) -> Option<String> {
    let models = store.list();
    if models.is_empty() {
        return None;
    }
    let len = models.len() as isize;
    let next = match registry
        .active_name()
        .and_then(|active| models.iter().position(|m| m == active))
    {
        Some(current) => (current as isize + offset).rem_euclid(len),
        None if offset < 0 => len - 1,
        None => 0,
    };
    Some(models[next as usize].to_string())
}
