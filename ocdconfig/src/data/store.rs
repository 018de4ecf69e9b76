//! Persisted option blobs.
//!
//! Each component owns exactly one blob keyed by its slug. Blobs are read on
//! every render and replaced wholesale on save; there is no partial update.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, RwLock},
    time::SystemTime,
};

use serde_json::Value;
use thiserror::Error;

/// One component's stored settings: `field.id => value`.
pub type Options = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access option store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in option store: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML in option store: {0}")]
    TomlRead(#[from] toml::de::Error),

    #[error("cannot write option store as TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("unsupported option store extension: {0:?}")]
    UnsupportedFormat(String),
}

/// Key-value store holding one option blob per component slug.
///
/// Consistency between concurrent writers is left to the implementation.
pub trait OptionStore: Send + Sync {
    /// Read the blob stored under `key`; `None` when nothing was saved.
    fn load(&self, key: &str) -> Result<Option<Options>, StoreError>;

    /// Replace the blob stored under `key`.
    fn save(&self, key: &str, options: &Options) -> Result<(), StoreError>;
}

/// Process-local store, mostly for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Options>>,
}

impl MemoryStore {
    pub fn with_blob(self, key: impl Into<String>, options: Options) -> Self {
        self.blobs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), options);
        self
    }
}

impl OptionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Options>, StoreError> {
        let blobs = self.blobs.read().unwrap_or_else(|e| e.into_inner());
        Ok(blobs.get(key).cloned())
    }

    fn save(&self, key: &str, options: &Options) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().unwrap_or_else(|e| e.into_inner());
        blobs.insert(key.to_string(), options.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Toml,
}

/// All blobs in a single JSON or TOML document, one top-level key per slug.
///
/// The format follows the file extension (`.json`, `.toml`/`.tml`).
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    format: FileFormat,
    backup: bool,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let format = match ext.as_str() {
            "json" => FileFormat::Json,
            "toml" | "tml" => FileFormat::Toml,
            _ => return Err(StoreError::UnsupportedFormat(ext)),
        };
        Ok(Self {
            path,
            format,
            backup: false,
            lock: Mutex::new(()),
        })
    }

    /// Copy the previous document to a timestamped backup before each save.
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_document(&self) -> Result<Options, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Options::new()),
            Err(e) => return Err(self.io_err(e)),
        };
        if content.trim().is_empty() {
            return Ok(Options::new());
        }
        let doc = match self.format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => {
                let v: toml::Table = toml::from_str(&content)?;
                serde_json::to_value(v)?
            }
        };
        match doc {
            Value::Object(map) => Ok(map),
            other => {
                warn!(
                    "option store {} is not a table ({other}), treating it as empty",
                    self.path.display()
                );
                Ok(Options::new())
            }
        }
    }

    fn write_document(&self, doc: &Options) -> Result<(), StoreError> {
        let content = match self.format {
            FileFormat::Json => serde_json::to_string_pretty(doc)?,
            FileFormat::Toml => toml::to_string_pretty(doc)?,
        };

        if self.backup && self.path.exists() {
            let secs = SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            let ext = match self.format {
                FileFormat::Json => "json",
                FileFormat::Toml => "toml",
            };
            let backup_path = self.path.with_extension(format!("bk-{secs}.{ext}"));
            fs::copy(&self.path, &backup_path).map_err(|e| self.io_err(e))?;
        }
        fs::write(&self.path, content).map_err(|e| self.io_err(e))
    }
}

impl OptionStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Options>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut doc = self.read_document()?;
        match doc.remove(key) {
            Some(Value::Object(options)) => Ok(Some(options)),
            Some(other) => {
                warn!("stored options for '{key}' are not a table ({other}), ignoring them");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, options: &Options) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut doc = self.read_document()?;
        doc.insert(key.to_string(), Value::Object(options.clone()));
        self.write_document(&doc)?;
        debug!("saved options for '{key}' to {}", self.path.display());
        Ok(())
    }
}

/// Per-request accessor that reads each blob from the store at most once.
///
/// A missing blob is an empty map, never an error.
pub struct OptionCache<'a> {
    store: &'a dyn OptionStore,
    loaded: HashMap<String, Options>,
}

impl<'a> OptionCache<'a> {
    pub fn new(store: &'a dyn OptionStore) -> Self {
        Self {
            store,
            loaded: HashMap::new(),
        }
    }

    pub fn store(&self) -> &'a dyn OptionStore {
        self.store
    }

    /// Stored options of `slug`, loading them on first access.
    pub fn get(&mut self, slug: &str) -> Result<&Options, StoreError> {
        if !self.loaded.contains_key(slug) {
            let options = self.store.load(slug)?.unwrap_or_default();
            self.loaded.insert(slug.to_string(), options);
        }
        Ok(&self.loaded[slug])
    }

    /// Write through to the store and refresh the cached copy.
    pub fn save(&mut self, slug: &str, options: Options) -> Result<(), StoreError> {
        self.store.save(slug, &options)?;
        self.loaded.insert(slug.to_string(), options);
        Ok(())
    }
}
