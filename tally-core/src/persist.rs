//! Whole-collection persistence: one document per repository.
//!
//! The byte-level sink is injected through [`Storage`]; this module only
//! owns the document shape and the codec.
//!
//! # Document layout
//!
//! ```text
//! { "version": 1, "saved_at": "<rfc3339>", "items": [ ... ] }
//! ```
//!
//! A bare `[ ... ]` sequence is also accepted on load.
//!
//! Loading parses the document into a [`serde_json::Value`] tree first
//! (YAML included), picks the layout from its shape, then decodes each item
//! on its own so a schema error names the item that failed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::Entity;
use crate::error::{io_err, PersistError};
use crate::repository::Repository;

/// Current snapshot document version.
pub const SNAPSHOT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Byte-level sink and source addressed by a caller-supplied name.
pub trait Storage {
    /// Returns `Ok(None)` when nothing has been stored under `name` yet.
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, PersistError>;

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), PersistError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, PersistError> {
        (**self).read(name)
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), PersistError> {
        (**self).write(name, bytes)
    }
}

/// In-process [`Storage`] backed by a map.
///
/// `fail_writes` makes every write return an I/O error, which is how tests
/// exercise the best-effort flush path.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    docs: RefCell<HashMap<String, Vec<u8>>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            docs: RefCell::default(),
            fail_writes: true,
        }
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw bytes stored under `name`.
    pub fn raw(&self, name: &str) -> Option<Vec<u8>> {
        self.docs.borrow().get(name).cloned()
    }

    /// Store raw bytes without going through a codec.
    pub fn put_raw(&self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.docs.borrow_mut().insert(name.to_string(), bytes.into());
    }
}

impl Storage for MemoryStorage {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, PersistError> {
        Ok(self.raw(name))
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), PersistError> {
        if self.fail_writes {
            return Err(io_err(
                PathBuf::from(name),
                std::io::Error::other("memory storage is read-only"),
            ));
        }
        self.put_raw(name, bytes);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Self-describing text encodings for snapshot documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// Conventional file extension (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// `<stem>.<extension>`
    pub fn file_name(self, stem: &str) -> String {
        format!("{stem}.{}", self.extension())
    }

    fn encode<D: Serialize>(self, name: &str, doc: &D) -> Result<Vec<u8>, PersistError> {
        let encoded = match self {
            Format::Json => serde_json::to_vec_pretty(doc).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::to_string(doc)
                .map(String::into_bytes)
                .map_err(|e| e.to_string()),
        };
        encoded.map_err(|detail| PersistError::Encode {
            name: name.to_string(),
            detail,
        })
    }

    fn decode<D: DeserializeOwned>(self, name: &str, bytes: &[u8]) -> Result<D, PersistError> {
        let decoded = match self {
            Format::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::from_slice(bytes).map_err(|e| e.to_string()),
        };
        decoded.map_err(|detail| PersistError::CorruptData {
            name: name.to_string(),
            detail,
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(format!("unknown format '{other}'; expected: json, yaml")),
        }
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SnapshotOut<'a, T> {
    version: u32,
    saved_at: DateTime<Utc>,
    items: &'a [T],
}

#[derive(Deserialize)]
struct SnapshotIn {
    version: u32,
    items: Vec<Value>,
}

fn corrupt(name: &str, detail: impl Into<String>) -> PersistError {
    PersistError::CorruptData {
        name: name.to_string(),
        detail: detail.into(),
    }
}

// ---------------------------------------------------------------------------
// SnapshotStore
// ---------------------------------------------------------------------------

/// Saves and loads full repository snapshots through a [`Storage`].
#[derive(Debug)]
pub struct SnapshotStore<S> {
    storage: S,
    format: Format,
}

impl<S: Storage> SnapshotStore<S> {
    pub fn new(storage: S, format: Format) -> Self {
        Self { storage, format }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Encode the full sequence and write it under `name`.
    pub fn save<T: Serialize>(&self, name: &str, items: &[T]) -> Result<(), PersistError> {
        let doc = SnapshotOut {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            items,
        };
        let bytes = self.format.encode(name, &doc)?;
        self.storage.write(name, &bytes)?;
        tracing::info!(snapshot = name, count = items.len(), format = %self.format, "snapshot saved");
        Ok(())
    }

    /// Read the sequence stored under `name`.
    ///
    /// A missing source is a first run and yields an empty sequence.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, PersistError> {
        let Some(bytes) = self.storage.read(name)? else {
            tracing::warn!(snapshot = name, "no snapshot found; starting empty");
            return Ok(Vec::new());
        };
        let (version, raw) = match self.format.decode::<Value>(name, &bytes)? {
            Value::Array(raw) => (SNAPSHOT_VERSION, raw),
            envelope => {
                let doc: SnapshotIn =
                    serde_json::from_value(envelope).map_err(|e| corrupt(name, e.to_string()))?;
                (doc.version, doc.items)
            }
        };
        if version > SNAPSHOT_VERSION {
            return Err(corrupt(
                name,
                format!("snapshot version {version} is newer than supported {SNAPSHOT_VERSION}"),
            ));
        }
        let items = raw
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|e| corrupt(name, format!("item {index}: {e}")))
            })
            .collect::<Result<Vec<T>, _>>()?;
        tracing::debug!(snapshot = name, count = items.len(), "snapshot loaded");
        Ok(items)
    }

    /// Save `repo`'s snapshot under `name`.
    pub fn save_repo<T>(&self, name: &str, repo: &Repository<T>) -> Result<(), PersistError>
    where
        T: Entity + Serialize,
    {
        self.save(name, &repo.all())
    }

    /// Load `name` into `repo`, replacing whatever it held.
    ///
    /// Returns the number of entities loaded. A document holding the same
    /// id twice is reported as corrupt and `repo` keeps its contents.
    pub fn load_into<T>(&self, name: &str, repo: &mut Repository<T>) -> Result<usize, PersistError>
    where
        T: Entity + DeserializeOwned,
    {
        let items: Vec<T> = self.load(name)?;
        let count = items.len();
        repo.replace_all(items)
            .map_err(|err| PersistError::CorruptData {
                name: name.to_string(),
                detail: err.to_string(),
            })?;
        Ok(count)
    }

    /// Write a single value (not a sequence) under `name`.
    pub fn save_value<V: Serialize>(&self, name: &str, value: &V) -> Result<(), PersistError> {
        let bytes = self.format.encode(name, value)?;
        self.storage.write(name, &bytes)?;
        tracing::info!(snapshot = name, format = %self.format, "value saved");
        Ok(())
    }

    /// Read a single value; `None` when nothing is stored under `name`.
    pub fn load_value<V: DeserializeOwned>(&self, name: &str) -> Result<Option<V>, PersistError> {
        match self.storage.read(name)? {
            Some(bytes) => self.format.decode(name, &bytes).map(Some),
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
