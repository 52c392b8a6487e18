//! In-process credential storage.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::CredentialStorage;
use crate::error::ApiError;

/// Credential storage that lives as long as the process.
///
/// One lock covers the whole map, so batched writes and removals are never
/// seen half applied.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    // Writers never panic mid-update, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.values.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.values.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.read().get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), ApiError> {
        let mut values = self.write();
        for (key, value) in entries {
            values.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), ApiError> {
        let mut values = self.write();
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}
