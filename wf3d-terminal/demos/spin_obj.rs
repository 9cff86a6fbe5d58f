//! Example: spin a single OBJ file in the terminal
//!
//! Usage: cargo run --example spin_obj -- path/to/model.obj

use std::env;
use std::fs;

use eyre::{Context, Result};
use wf3d_core::geometry::CUBE_OBJ;
use wf3d_core::{MemoryStore, ModelName, Registry, Settings};
use wf3d_terminal::TerminalApp;

fn main() -> Result<()> {
    env_logger::init();

    let mut store = MemoryStore::new();
    let name = match env::args().nth(1) {
        Some(path) => {
            let data = fs::read(&path).wrap_err_with(|| format!("failed to read {path}"))?;
            let name = ModelName::sanitize(&path)?;
            store.insert(name.clone(), data);
            name
        }
        None => {
            eprintln!("No OBJ file provided, using default cube...");
            let name = ModelName::parse("cube.obj")?;
            store.insert(name.clone(), CUBE_OBJ);
            name
        }
    };

    let settings = Settings::default();
    let mut registry = Registry::new(settings.limits, &settings.display, settings.render.pitch);
    registry
        .select_name(&store, &name)
        .wrap_err_with(|| format!("failed to load {name}"))?;

    let mut app = TerminalApp::new(registry, Box::new(store), &settings)?;
    app.run()?;

    println!("Thank you for using WF3D!");
    Ok(())
}
