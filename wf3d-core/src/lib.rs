//! WF3D Core Library - Wireframe mesh loading and projection
//!
//! This library holds everything that does not depend on a particular
//! display: OBJ parsing and normalization, the model store, the registry of
//! the active mesh, and the per-frame projection pipeline and scheduler.

pub mod config;
pub mod control;
pub mod error;
pub mod geometry;
pub mod name;
pub mod normalize;
pub mod obj;
pub mod projection;
pub mod registry;
pub mod render;
pub mod scheduler;
pub mod store;
pub mod transform;

// Re-export commonly used types
pub use config::{ParseLimits, RenderSettings, SchedulerSettings, Settings};
pub use control::{catalog, Catalog, Command};
pub use error::{Capacity, Error, Result};
pub use geometry::{Edge, Mesh, Vertex};
pub use name::{ModelName, NameError};
pub use projection::{Projector, ScreenPoint};
pub use registry::{DisplayState, Registry, Snapshot, Status};
pub use render::{Canvas, Color, FontSize, FrameStats, Pipeline};
pub use scheduler::FrameScheduler;
pub use store::{DirStore, MemoryStore, MeshStore};
pub use transform::Orientation;
