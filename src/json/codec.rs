use super::pretty_print;
use crate::error::JsonError;
use crate::fs::{FileSystem, RealFileSystem};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};

/// How a document is written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Use the sidecar layout instead of compact single-line JSON
    pub pretty: bool,
    /// Order object keys alphabetically at every level
    pub sort_keys: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            sort_keys: false,
        }
    }
}

impl SaveOptions {
    pub fn compact() -> Self {
        Self {
            pretty: false,
            sort_keys: false,
        }
    }
}

/// Reads and writes JSON sidecar files
#[derive(Clone)]
pub struct JsonCodec {
    fs: Arc<dyn FileSystem>,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem::new()))
    }
}

impl JsonCodec {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Reads and parses `path`. Malformed content is logged with the file's
    /// path before the decode error is returned.
    pub fn load(&self, path: &Path) -> Result<Value, JsonError> {
        self.load_as(path)
    }

    /// Like [`load`](Self::load), deserializing into `T`. A document that is
    /// valid JSON but does not fit `T` is a decode error as well.
    pub fn load_as<T: DeserializeOwned>(&self, path: &Path) -> Result<T, JsonError> {
        let text = self.fs.read_to_string(path).map_err(|source| JsonError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| {
            error!("Failed to decode JSON file {}: {}", path.display(), source);
            JsonError::Decode {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    pub fn save<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), JsonError> {
        self.save_with(path, value, SaveOptions::default())
    }

    /// Serializes `value` and replaces `path` atomically, creating missing
    /// parent directories.
    pub fn save_with<T: Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
        options: SaveOptions,
    ) -> Result<(), JsonError> {
        let mut text = if options.sort_keys {
            let sorted = sort_keys(serde_json::to_value(value).map_err(JsonError::Encode)?);
            encode(&sorted, options.pretty)?
        } else {
            encode(value, options.pretty)?
        };
        text.push('\n');

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.is_dir(parent) {
                self.fs
                    .create_dir_all(parent)
                    .map_err(|source| JsonError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        self.fs
            .write_atomic(path, text.as_bytes())
            .map_err(|source| JsonError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Saved JSON to {}", path.display());
        Ok(())
    }

    /// Merges `entries` into the object stored at `path`, overwriting keys
    /// that already exist. A missing file starts out as an empty object.
    pub fn update(&self, path: &Path, entries: &Map<String, Value>) -> Result<(), JsonError> {
        let mut current = if self.fs.exists(path) {
            match self.load(path)? {
                Value::Object(map) => map,
                _ => {
                    return Err(JsonError::NotAnObject {
                        path: path.to_path_buf(),
                    })
                }
            }
        } else {
            Map::new()
        };

        for (key, value) in entries {
            current.insert(key.clone(), value.clone());
        }

        self.save(path, &Value::Object(current))
    }
}

fn encode<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, JsonError> {
    if pretty {
        pretty_print(value)
    } else {
        serde_json::to_string(value).map_err(JsonError::Encode)
    }
}

/// Recursively orders object keys
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Loads a JSON file from disk
pub fn load_json(path: impl AsRef<Path>) -> Result<Value, JsonError> {
    JsonCodec::default().load(path.as_ref())
}

/// Loads a JSON file from disk into a typed value
pub fn load_json_as<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, JsonError> {
    JsonCodec::default().load_as(path.as_ref())
}

/// Saves a value as a pretty sidecar file
pub fn save_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<(), JsonError> {
    JsonCodec::default().save(path.as_ref(), value)
}

pub fn save_json_with<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    value: &T,
    options: SaveOptions,
) -> Result<(), JsonError> {
    JsonCodec::default().save_with(path.as_ref(), value, options)
}

/// Merges entries into an existing JSON object file
pub fn update_json(path: impl AsRef<Path>, entries: &Map<String, Value>) -> Result<(), JsonError> {
    JsonCodec::default().update(path.as_ref(), entries)
}
