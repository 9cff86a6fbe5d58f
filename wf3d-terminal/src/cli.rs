//! Command-line interface
//!
//! Settings are layered: built-in defaults, then `wf3d.toml` (or the file
//! given with `--config`), then `WF3D_*` environment variables, then flags.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use wf3d_core::name::base_name;
use wf3d_core::obj::parse_obj;
use wf3d_core::store::{ensure_default_model, import_model, startup_model};
use wf3d_core::{catalog, DirStore, MeshStore, Registry, Settings};

use crate::TerminalApp;

/// Config file looked up in the working directory when `--config` is absent
const DEFAULT_CONFIG_NAME: &str = "wf3d";

/// Rotating wireframe viewer for OBJ models
///
/// If no subcommand is specified, the terminal viewer is started.
#[derive(Debug, clap::Parser)]
#[command(name = "wf3d", version)]
pub struct Args {
    /// Directory holding the models (files in `<dir>/models/` win over `<dir>/`)
    #[arg(long, global = true)]
    pub models_dir: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model to show first
    #[arg(long)]
    pub model: Option<String>,

    /// Overlay text
    #[arg(long)]
    pub text: Option<String>,

    /// Model scale
    #[arg(long)]
    pub scale: Option<f32>,

    /// Write log output to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: Option<Subcommand>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    /// Print the current status and the available models as JSON.
    List,
    /// Copy an OBJ file into the model store, keeping it only if it loads.
    Import {
        /// OBJ file to import
        file: PathBuf,
    },
    /// Parse an OBJ file and print its vertex and edge counts.
    Check {
        /// OBJ file to check
        file: PathBuf,
    },
}

/// Load settings from the optional config file and the environment.
pub fn load_settings(config_file: Option<&Path>) -> Result<Settings> {
    let file = match config_file {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("WF3D")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .wrap_err("error reading settings")?
        .try_deserialize()
        .wrap_err("error parsing settings")?;
    Ok(settings)
}

/// Start logging. `RUST_LOG` overrides the default filter.
pub fn init_logging(args: &Args) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or(args.default_log_filter());
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("error creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

impl Args {
    /// The viewer owns the terminal, so stderr only gets errors while it runs
    fn default_log_filter(&self) -> &'static str {
        if self.subcommand.is_none() && self.log_file.is_none() {
            "error"
        } else {
            "warn"
        }
    }

    /// Settings with command-line flags applied on top
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = load_settings(self.config.as_deref())?;
        if let Some(dir) = &self.models_dir {
            settings.models_dir = Some(dir.clone());
        }
        if let Some(text) = &self.text {
            settings.display.text = text.clone();
        }
        if let Some(scale) = self.scale {
            settings.display.scale = scale;
        }
        Ok(settings)
    }
}

pub fn exec(args: Args) -> Result<()> {
    let settings = args.settings()?;
    let mut store = DirStore::new(
        settings
            .models_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".")),
    );

    match args.subcommand {
        Some(Subcommand::List) => {
            let registry = startup_registry(&settings, &store, args.model.as_deref());
            let listing = catalog(&registry, &store);
            println!("{}", serde_json::to_string_pretty(&listing)?);
            Ok(())
        }

        Some(Subcommand::Import { file }) => {
            let data = File::open(&file)
                .wrap_err_with(|| format!("error opening {}", file.display()))?;
            let name = import_model(
                &mut store,
                &file.to_string_lossy(),
                data,
                &settings.limits,
            )
            .wrap_err_with(|| format!("error importing {}", file.display()))?;
            println!("imported {name} into {}", store.root().display());
            Ok(())
        }

        Some(Subcommand::Check { file }) => {
            let path = file.to_string_lossy();
            let reader = BufReader::new(
                File::open(&file).wrap_err_with(|| format!("error opening {path}"))?,
            );
            let mesh = parse_obj(reader, base_name(&path), &settings.limits)?;
            println!(
                "{}: {} vertices, {} edges",
                mesh.name(),
                mesh.vertices().len(),
                mesh.edges().len()
            );
            Ok(())
        }

        None => {
            if let Err(e) = ensure_default_model(&mut store) {
                log::warn!("could not write default model: {e}");
            }
            let registry = startup_registry(&settings, &store, args.model.as_deref());
            let mut app = TerminalApp::new(registry, Box::new(store), &settings)?;
            app.run()?;
            Ok(())
        }
    }
}

/// Registry with the requested (or default) model loaded, if it loads.
///
/// A model that fails to load is logged and leaves the registry empty, so the
/// viewer still starts and shows its placeholder.
fn startup_registry(settings: &Settings, store: &dyn MeshStore, model: Option<&str>) -> Registry {
    let mut registry = Registry::new(settings.limits, &settings.display, settings.render.pitch);
    let names = store.list();
    let model = model.or_else(|| startup_model(&names).map(|name| name.as_str()));
    if let Some(model) = model {
        if let Err(e) = registry.select(store, model) {
            log::warn!("could not load startup model {model}: {e}");
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;
    use wf3d_core::geometry::CUBE_OBJ;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "wf3d",
            "--models-dir",
            "/srv/models",
            "--text",
            "hello",
            "--scale",
            "2.5",
        ])
        .unwrap();
        assert_eq!(args.models_dir, Some(PathBuf::from("/srv/models")));
        assert_eq!(args.text.as_deref(), Some("hello"));
        assert_eq!(args.scale, Some(2.5));
        assert!(args.subcommand.is_none());

        let args = Args::try_parse_from(["wf3d", "import", "teapot.obj"]).unwrap();
        assert!(matches!(
            args.subcommand,
            Some(Subcommand::Import { file }) if file == Path::new("teapot.obj")
        ));

        let args = Args::try_parse_from(["wf3d", "list", "--models-dir", "m"]).unwrap();
        assert!(matches!(args.subcommand, Some(Subcommand::List)));
        assert_eq!(args.models_dir, Some(PathBuf::from("m")));

        assert!(Args::try_parse_from(["wf3d", "check"]).is_err());
    }

    #[test]
    fn test_settings_from_file_and_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "[render]\nfocal_length = 90.0\n\n[display]\ntext = \"from file\"\nscale = 0.5\n",
        )
        .unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.render.focal_length, 90.0);
        assert_eq!(settings.render.max_draw_edges, 2500);
        assert_eq!(settings.display.text, "from file");

        let path_arg = path.to_string_lossy().into_owned();
        let args = Args::try_parse_from(["wf3d", "--config", &path_arg, "--scale", "3"]).unwrap();
        let settings = args.settings().unwrap();
        assert_eq!(settings.display.text, "from file");
        assert_eq!(settings.display.scale, 3.0);
    }

    #[test]
    fn test_environment_overrides_file_and_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[scheduler]\nyaw_step = 0.5\n").unwrap();

        std::env::set_var("WF3D_SCHEDULER__YAW_STEP", "0.25");
        std::env::set_var("WF3D_SCHEDULER__FRAME_INTERVAL_MS", "40");
        let settings = load_settings(Some(&path));
        std::env::remove_var("WF3D_SCHEDULER__YAW_STEP");
        std::env::remove_var("WF3D_SCHEDULER__FRAME_INTERVAL_MS");

        let settings = settings.unwrap();
        assert_eq!(settings.scheduler.yaw_step, 0.25);
        assert_eq!(settings.scheduler.frame_interval_ms, 40);
        assert_eq!(settings.render.focal_length, 130.0);
    }

    #[test]
    fn test_default_log_filter() {
        let viewer = Args::try_parse_from(["wf3d"]).unwrap();
        assert_eq!(viewer.default_log_filter(), "error");

        let logged = Args::try_parse_from(["wf3d", "--log-file", "wf3d.log"]).unwrap();
        assert_eq!(logged.default_log_filter(), "warn");

        let list = Args::try_parse_from(["wf3d", "list"]).unwrap();
        assert_eq!(list.default_log_filter(), "warn");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_settings(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_startup_registry() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.obj"), "v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap();
        let mut store = DirStore::new(dir.path());
        let settings = Settings::default();

        let registry = startup_registry(&settings, &store, None);
        assert_eq!(registry.current_state().active, "a.obj");

        ensure_default_model(&mut store).unwrap();
        let registry = startup_registry(&settings, &store, None);
        assert_eq!(registry.current_state().active, "cube.obj");

        let registry = startup_registry(&settings, &store, Some("missing.obj"));
        assert_eq!(registry.current_state().active, "");
        assert!(registry.mesh().is_none());

        fs::write(dir.path().join("b.obj"), CUBE_OBJ).unwrap();
        let registry = startup_registry(&settings, &store, Some("b.obj"));
        assert_eq!(registry.current_state().active, "b.obj");
    }
}
