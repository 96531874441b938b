use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{NetworkError, Result};

/// Opaque key -> blob persistence.
///
/// `save` is all-or-nothing per key and replaces any previous blob.
/// `load` returns `Ok(None)` for a key that was never saved.
pub trait ParameterStore {
    fn save(&mut self, key: &str, blob: &[u8]) -> Result<()>;

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// In-process store, mostly for tests and short-lived sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ParameterStore for MemoryStore {
    fn save(&mut self, key: &str, blob: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), blob.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }
}

/// One `<key>.json` file per key inside a directory.
///
/// Saves go to a temporary sibling first and are renamed into place, so a
/// reader sees either the old blob or the new one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates `dir` if it does not exist.
    pub fn new(dir: impl AsRef<Path>) -> Result<JsonFileStore> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(JsonFileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let invalid = key.is_empty()
            || key == "."
            || key == ".."
            || key.chars().any(|c| c == '/' || c == '\\' || c == '\0');
        if invalid {
            return Err(NetworkError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl ParameterStore for JsonFileStore {
    fn save(&mut self, key: &str, blob: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let written = write_synced(&tmp, blob).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!("wrote {} bytes to {}", blob.len(), path.display());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_synced(path: &Path, blob: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(blob)?;
    file.sync_all()
}
