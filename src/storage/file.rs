// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-file credential storage.
//!
//! The file holds a single JSON object mapping key to value. Every write
//! replaces the whole file through a uniquely named temp file in the same
//! directory and a rename, so a crash never leaves a half-written credential
//! behind. The temp file is created owner-only (0600 on unix) before any
//! credential is written to it.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::CredentialStorage;
use crate::error::ApiError;

type Entries = BTreeMap<String, String>;

enum Loaded {
    Entries(Entries),
    Corrupt(serde_json::Error),
}

/// Credential storage persisted to a JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Loaded, ApiError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(Loaded::Entries(Entries::new())),
            Ok(bytes) => Ok(match serde_json::from_slice(&bytes) {
                Ok(entries) => Loaded::Entries(entries),
                Err(e) => Loaded::Corrupt(e),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Loaded::Entries(Entries::new())),
            Err(e) => Err(io_error(&self.path, e)),
        }
    }

    /// Load for modification. A corrupt file is replaced rather than
    /// blocking every future write.
    fn load_for_update(&self) -> Result<Entries, ApiError> {
        match self.load()? {
            Loaded::Entries(entries) => Ok(entries),
            Loaded::Corrupt(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Discarding corrupt credential file"
                );
                Ok(Entries::new())
            }
        }
    }

    fn save(&self, entries: &Entries) -> Result<(), ApiError> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
                parent
            }
            None => Path::new("."),
        };

        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| ApiError::Storage(format!("failed to encode credentials: {}", e)))?;

        // NamedTempFile opens with O_EXCL and mode 0600.
        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| io_error(parent, e))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| io_error(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| io_error(&self.path, e.error))
            .map(drop)
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded data is (), so a poisoned lock carries no broken state.
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let _guard = self.guard();
        match self.load()? {
            Loaded::Entries(mut entries) => Ok(entries.remove(key)),
            Loaded::Corrupt(e) => Err(ApiError::Storage(format!(
                "{} is corrupt: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), ApiError> {
        let _guard = self.guard();
        let mut current = self.load_for_update()?;
        for (key, value) in entries {
            current.insert(key.to_string(), value.to_string());
        }
        self.save(&current)
    }

    fn remove(&self, keys: &[&str]) -> Result<(), ApiError> {
        let _guard = self.guard();
        let mut entries = self.load_for_update()?;
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }
        if entries.len() == before && !self.path.exists() {
            return Ok(());
        }
        self.save(&entries)
    }
}

fn io_error(path: &Path, e: io::Error) -> ApiError {
    ApiError::Storage(format!("{}: {}", path.display(), e))
}
