// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store over a durable key-value backend.
//!
//! [`CredentialStore`] is the only component that reads or writes the two
//! credential strings. Backend failures never reach callers: reads degrade to
//! an empty string and writes are dropped with a warning, which leaves the
//! client in the "logged out" state it already knows how to handle.

pub mod file;
pub mod memory;

use std::sync::Arc;

use crate::error::ApiError;
use crate::models::TokenPair;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Fixed storage keys.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
}

/// Durable key-value storage for credential strings.
pub trait CredentialStorage: Send + Sync {
    /// Read a value. `Ok(None)` if the key is unset.
    fn get(&self, key: &str) -> Result<Option<String>, ApiError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.set_many(&[(key, value)])
    }

    /// Write all of `entries` in one operation.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), ApiError>;

    /// Remove all of `keys` in one operation.
    fn remove(&self, keys: &[&str]) -> Result<(), ApiError>;
}

/// Holds the live access/refresh credential pair.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn CredentialStorage>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn CredentialStorage>) -> Self {
        Self { backend }
    }

    /// Store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    /// Current access credential, or `""` if unset or unreadable.
    pub fn access(&self) -> String {
        self.read(keys::ACCESS_TOKEN)
    }

    pub fn set_access(&self, token: &str) {
        self.write(keys::ACCESS_TOKEN, token);
    }

    /// Current refresh credential, or `""` if unset or unreadable.
    pub fn refresh(&self) -> String {
        self.read(keys::REFRESH_TOKEN)
    }

    pub fn set_refresh(&self, token: &str) {
        self.write(keys::REFRESH_TOKEN, token);
    }

    /// Overwrite both credentials with a freshly issued pair.
    pub fn store_pair(&self, pair: &TokenPair) {
        let entries = [
            (keys::ACCESS_TOKEN, pair.access_token.as_str()),
            (keys::REFRESH_TOKEN, pair.refresh_token.as_str()),
        ];
        if let Err(e) = self.backend.set_many(&entries) {
            tracing::warn!(error = %e, "Credential write failed, pair not persisted");
        }
    }

    /// Remove both credentials.
    pub fn clear(&self) {
        if let Err(e) = self
            .backend
            .remove(&[keys::ACCESS_TOKEN, keys::REFRESH_TOKEN])
        {
            tracing::warn!(error = %e, "Failed to clear stored credentials");
        }
    }

    fn read(&self, key: &str) -> String {
        match self.backend.get(key) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Credential read failed, treating as unset");
                String::new()
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.backend.set(key, value) {
            tracing::warn!(key, error = %e, "Credential write failed, value not persisted");
        }
    }
}
