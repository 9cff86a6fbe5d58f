//! Error types shared by the loader, store and registry

use thiserror::Error;

use crate::name::NameError;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Which parse capacity was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Vertices,
    Edges,
}

impl std::fmt::Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capacity::Vertices => f.write_str("vertices"),
            Capacity::Edges => f.write_str("edges"),
        }
    }
}

/// Errors that can occur while loading or selecting a mesh.
#[derive(Error, Debug)]
pub enum Error {
    /// The name does not resolve to readable bytes in the store.
    #[error("model not found: {name}")]
    NotFound { name: String },

    /// The stream contained no usable vertices or no usable faces.
    #[error("invalid OBJ {name} (needs vertices and faces)")]
    Malformed { name: String },

    /// Vertex or deduplicated edge count went past its limit mid-parse.
    #[error("model has too many {what} (limit {limit})")]
    CapacityExceeded { what: Capacity, limit: usize },

    #[error("bad model name: {0}")]
    InvalidName(#[from] NameError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
