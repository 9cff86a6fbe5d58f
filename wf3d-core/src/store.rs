//! Mesh storage backends
//!
//! The registry only ever reads through [`MeshStore::open`]; writing is used
//! by the import flow, which re-reads what it wrote through the same path the
//! registry uses before accepting it.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use crate::config::ParseLimits;
use crate::error::{Error, Result};
use crate::geometry::CUBE_OBJ;
use crate::name::ModelName;
use crate::obj::parse_obj;

/// Name of the built-in model written by [`ensure_default_model`]
pub const DEFAULT_MODEL: &str = "cube.obj";

/// Subdirectory preferred for model files
const MODELS_SUBDIR: &str = "models";

/// A named collection of OBJ files
pub trait MeshStore {
    /// Open a model for sequential reading
    fn open(&self, name: &ModelName) -> Result<Box<dyn BufRead + '_>>;

    /// Create (or truncate) a model for writing
    fn create(&mut self, name: &ModelName) -> Result<Box<dyn Write + '_>>;

    fn remove(&mut self, name: &ModelName) -> Result<()>;

    fn contains(&self, name: &ModelName) -> bool;

    /// Valid model names, sorted and without duplicates
    fn list(&self) -> Vec<ModelName>;
}

/// Models stored as files under `<root>/models/` or directly in `<root>`
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn models_dir(&self) -> PathBuf {
        self.root.join(MODELS_SUBDIR)
    }

    /// Existing file for `name`, preferring the models subdirectory
    fn resolve(&self, name: &ModelName) -> Option<PathBuf> {
        [self.models_dir(), self.root.clone()]
            .into_iter()
            .map(|dir| dir.join(name.as_str()))
            .find(|path| path.is_file())
    }
}

impl MeshStore for DirStore {
    fn open(&self, name: &ModelName) -> Result<Box<dyn BufRead + '_>> {
        let path = self.resolve(name).ok_or_else(|| Error::NotFound {
            name: name.to_string(),
        })?;
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn create(&mut self, name: &ModelName) -> Result<Box<dyn Write + '_>> {
        let models_dir = self.models_dir();
        let file = fs::create_dir_all(&models_dir)
            .and_then(|()| File::create(models_dir.join(name.as_str())))
            .or_else(|e| {
                log::warn!("cannot write {name} under {}: {e}", models_dir.display());
                File::create(self.root.join(name.as_str()))
            })?;
        Ok(Box::new(io::BufWriter::new(file)))
    }

    fn remove(&mut self, name: &ModelName) -> Result<()> {
        let path = self.resolve(name).ok_or_else(|| Error::NotFound {
            name: name.to_string(),
        })?;
        fs::remove_file(path)?;
        Ok(())
    }

    fn contains(&self, name: &ModelName) -> bool {
        self.resolve(name).is_some()
    }

    fn list(&self) -> Vec<ModelName> {
        let mut names = BTreeSet::new();
        for dir in [self.models_dir(), self.root.clone()] {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                if !entry.file_type().is_ok_and(|t| t.is_file()) {
                    continue;
                }
                if let Some(name) = entry
                    .file_name()
                    .to_str()
                    .and_then(|s| ModelName::parse(s).ok())
                {
                    names.insert(name);
                }
            }
        }
        log::debug!("found {} model(s) in {}", names.len(), self.root.display());
        names.into_iter().collect()
    }
}

/// In-memory store, mostly for tests and demos
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<ModelName, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: ModelName, bytes: impl Into<Vec<u8>>) {
        self.files.insert(name, bytes.into());
    }
}

impl MeshStore for MemoryStore {
    fn open(&self, name: &ModelName) -> Result<Box<dyn BufRead + '_>> {
        let bytes = self.files.get(name).ok_or_else(|| Error::NotFound {
            name: name.to_string(),
        })?;
        Ok(Box::new(bytes.as_slice()))
    }

    fn create(&mut self, name: &ModelName) -> Result<Box<dyn Write + '_>> {
        let buf = self.files.entry(name.clone()).or_default();
        buf.clear();
        Ok(Box::new(buf))
    }

    fn remove(&mut self, name: &ModelName) -> Result<()> {
        self.files
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })
    }

    fn contains(&self, name: &ModelName) -> bool {
        self.files.contains_key(name)
    }

    fn list(&self) -> Vec<ModelName> {
        self.files.keys().cloned().collect()
    }
}

/// Write the built-in cube if no `cube.obj` exists yet
pub fn ensure_default_model(store: &mut dyn MeshStore) -> Result<()> {
    let name = ModelName::parse(DEFAULT_MODEL)?;
    if store.contains(&name) {
        return Ok(());
    }
    let mut writer = store.create(&name)?;
    writer.write_all(CUBE_OBJ.as_bytes())?;
    writer.flush()?;
    log::info!("wrote default model {name}");
    Ok(())
}

/// Model to show at startup: the default cube if present, else the first name
pub fn startup_model(names: &[ModelName]) -> Option<&ModelName> {
    names
        .iter()
        .find(|n| n.as_str() == DEFAULT_MODEL)
        .or_else(|| names.first())
}

/// Store an uploaded model and check that it loads.
///
/// The raw file name is sanitized into a [`ModelName`]. After writing, the
/// model is parsed back from the store; if that fails the stored file is
/// removed again and the parse error is returned.
pub fn import_model(
    store: &mut dyn MeshStore,
    raw_name: &str,
    mut data: impl Read,
    limits: &ParseLimits,
) -> Result<ModelName> {
    let name = ModelName::sanitize(raw_name).inspect_err(|e| {
        log::warn!("upload rejected: raw name {raw_name:?}: {e}");
    })?;

    let written = {
        let mut writer = store.create(&name)?;
        io::copy(&mut data, &mut writer).and_then(|n| writer.flush().map(|()| n))
    };
    let validated = written.map_err(Error::from).and_then(|bytes| {
        log::debug!("upload {name}: {bytes} bytes written");
        let reader = store.open(&name)?;
        parse_obj(reader, name.as_str(), limits)
    });

    match validated {
        Ok(mesh) => {
            log::info!(
                "upload {name} accepted ({} vertices, {} edges)",
                mesh.vertices().len(),
                mesh.edges().len()
            );
            Ok(name)
        }
        Err(e) => {
            log::warn!("upload {name} failed validation: {e}");
            if let Err(remove_err) = store.remove(&name) {
                log::warn!("could not remove rejected upload {name}: {remove_err}");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn name(s: &str) -> ModelName {
        ModelName::parse(s).unwrap()
    }

    #[test]
    fn test_dir_store_lookup_order() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("models")).unwrap();
        fs::write(dir.path().join("models/a.obj"), "models copy").unwrap();
        fs::write(dir.path().join("a.obj"), "root copy").unwrap();
        fs::write(dir.path().join("b.obj"), "root only").unwrap();

        let store = DirStore::new(dir.path());
        let mut text = String::new();
        store.open(&name("a.obj")).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "models copy");

        text.clear();
        store.open(&name("b.obj")).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "root only");

        assert!(matches!(
            store.open(&name("c.obj")),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_dir_store_list() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("models/nested.obj")).unwrap();
        fs::write(dir.path().join("models/zeta.obj"), "").unwrap();
        fs::write(dir.path().join("models/alpha.obj"), "").unwrap();
        fs::write(dir.path().join("alpha.obj"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("bad$name.obj"), "").unwrap();

        let store = DirStore::new(dir.path());
        assert_eq!(store.list(), vec![name("alpha.obj"), name("zeta.obj")]);
    }

    #[test]
    fn test_dir_store_create_and_remove() {
        let dir = tempdir().unwrap();
        let mut store = DirStore::new(dir.path());
        ensure_default_model(&mut store).unwrap();
        assert!(dir.path().join("models").join(DEFAULT_MODEL).is_file());
        assert_eq!(store.list(), vec![name(DEFAULT_MODEL)]);

        store.remove(&name(DEFAULT_MODEL)).unwrap();
        assert!(!store.contains(&name(DEFAULT_MODEL)));
    }

    #[test]
    fn test_ensure_default_model_keeps_existing() {
        let mut store = MemoryStore::new();
        store.insert(name(DEFAULT_MODEL), "custom");
        ensure_default_model(&mut store).unwrap();

        let mut text = String::new();
        store.open(&name(DEFAULT_MODEL)).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "custom");
    }

    #[test]
    fn test_startup_model() {
        let names = vec![name("a.obj"), name("cube.obj"), name("z.obj")];
        assert_eq!(startup_model(&names), Some(&name("cube.obj")));
        let names = vec![name("b.obj"), name("c.obj")];
        assert_eq!(startup_model(&names), Some(&name("b.obj")));
        assert_eq!(startup_model(&[]), None);
    }

    #[test]
    fn test_import_valid_model() {
        let mut store = MemoryStore::new();
        let imported = import_model(
            &mut store,
            "uploads/My Cube.OBJ",
            CUBE_OBJ.as_bytes(),
            &ParseLimits::default(),
        )
        .unwrap();
        assert_eq!(imported, name("my_cube.obj"));
        assert!(store.contains(&imported));
    }

    #[test]
    fn test_import_invalid_model_is_removed() {
        let dir = tempdir().unwrap();
        let mut store = DirStore::new(dir.path());
        let result = import_model(
            &mut store,
            "broken.obj",
            "v 0 0 0\n".as_bytes(),
            &ParseLimits::default(),
        );
        assert!(matches!(result, Err(Error::Malformed { .. })));
        assert!(store.list().is_empty());

        let limits = ParseLimits {
            max_vertices: 4,
            ..ParseLimits::default()
        };
        let result = import_model(&mut store, "big.obj", CUBE_OBJ.as_bytes(), &limits);
        assert!(matches!(result, Err(Error::CapacityExceeded { .. })));
        assert!(!store.contains(&name("big.obj")));
    }

    #[test]
    fn test_import_bad_name() {
        let mut store = MemoryStore::new();
        let result = import_model(&mut store, "..", CUBE_OBJ.as_bytes(), &ParseLimits::default());
        assert!(matches!(result, Err(Error::InvalidName(_))));
        assert!(store.list().is_empty());
    }
}
