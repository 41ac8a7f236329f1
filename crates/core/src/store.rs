//! Credential and model preference persistence.
//!
//! Storage is a plain string key-value capability ([`PreferenceStore`]) that
//! gets injected into [`Preferences`], which knows the two fixed keys.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{
    error::{Result, VidbriefError},
    paths::get_default_store_path,
};

pub const API_KEY_KEY: &str = "geminiApiKey";
pub const MODEL_KEY: &str = "selectedGeminiModel";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .expect("MemoryStore poisoned")
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .expect("MemoryStore poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .expect("MemoryStore poisoned")
            .remove(key);
        Ok(())
    }
}

/// JSON object on disk. Every read goes to the file, so separate instances
/// over the same path observe each other's writes.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn open_default() -> Self {
        Self::new(get_default_store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn store_error(&self, reason: impl ToString) -> VidbriefError {
        VidbriefError::Store {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.store_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| self.store_error(e))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.store_error(e))?;
        }
        let pretty_json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, pretty_json).map_err(|e| self.store_error(e))
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.write_lock.lock().expect("FileStore poisoned");
        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Typed view over a [`PreferenceStore`].
pub struct Preferences<S> {
    store: S,
}

impl<S: PreferenceStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored API key, or an empty string when none is set.
    pub fn api_key(&self) -> Result<String> {
        Ok(self.store.get(API_KEY_KEY)?.unwrap_or_default())
    }

    pub fn set_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(VidbriefError::InvalidApiKey);
        }
        self.store.set(API_KEY_KEY, key)
    }

    pub fn clear_api_key(&self) -> Result<()> {
        self.store.remove(API_KEY_KEY)
    }

    /// Selected model id, [`DEFAULT_MODEL`] when unset. Not checked against
    /// any catalog.
    pub fn model(&self) -> Result<String> {
        Ok(self
            .store
            .get(MODEL_KEY)?
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()))
    }

    pub fn set_model(&self, model: &str) -> Result<()> {
        self.store.set(MODEL_KEY, model)
    }
}
