// Copyright (c) 2026 HOMELINK HUB
//
// This file is part of HomeLink.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@homelink-hub.io

//! Host persistence capability for config entries.
//!
//! Stands in for the host's persisted entry storage: create-entry,
//! options updates and unique-id deduplication. One store instance is
//! shared by every flow the host runs.

use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::flow::ConfigEntry;

pub type EntryId = u64;

#[derive(Debug, Clone, Error)]
pub enum EntryStoreError {
    /// Another entry already claimed this unique id.
    #[error("an entry with unique id '{0}' is already configured")]
    DuplicateUniqueId(String),

    #[error("no entry with id {0}")]
    NotFound(EntryId),
}

/// A persisted entry, as the host would store it.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub id: EntryId,
    pub title: String,
    pub unique_id: Option<String>,
    pub data: Value,
    /// Post-setup options written by an options flow, if any.
    pub options: Option<Value>,
}

#[derive(Debug, Default)]
struct EntryStoreInner {
    next_id: EntryId,
    entries: Vec<StoredEntry>,
}

/// In-memory config entry store.
#[derive(Debug, Default)]
pub struct EntryStore {
    inner: Mutex<EntryStoreInner>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a finished entry.
    ///
    /// Two entries resolving to the same unique id must not both succeed;
    /// the second create is rejected without touching the first.
    pub fn create(&self, entry: ConfigEntry) -> Result<EntryId, EntryStoreError> {
        let mut inner = self.inner.lock();

        if let Some(unique_id) = &entry.unique_id
            && inner
                .entries
                .iter()
                .any(|stored| stored.unique_id.as_deref() == Some(unique_id.as_str()))
        {
            return Err(EntryStoreError::DuplicateUniqueId(unique_id.clone()));
        }

        inner.next_id += 1;
        let id = inner.next_id;
        info!("📦 Created config entry #{id}: {}", entry.title);
        inner.entries.push(StoredEntry {
            id,
            title: entry.title,
            unique_id: entry.unique_id,
            data: entry.data,
            options: None,
        });
        Ok(id)
    }

    /// Replace an entry's options payload without recreating the entry.
    pub fn update_options(&self, id: EntryId, options: Value) -> Result<(), EntryStoreError> {
        let mut inner = self.inner.lock();
        let entry = inner
            .entries
            .iter_mut()
            .find(|stored| stored.id == id)
            .ok_or(EntryStoreError::NotFound(id))?;
        debug!("Updating options for entry #{id}");
        entry.options = Some(options);
        Ok(())
    }

    pub fn get(&self, id: EntryId) -> Option<StoredEntry> {
        self.inner.lock().entries.iter().find(|stored| stored.id == id).cloned()
    }

    /// Whether a unique id is already claimed by some entry.
    pub fn has_unique_id(&self, unique_id: &str) -> bool {
        self.inner
            .lock()
            .entries
            .iter()
            .any(|stored| stored.unique_id.as_deref() == Some(unique_id))
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(title: &str, unique_id: Option<&str>) -> ConfigEntry {
        ConfigEntry {
            title: title.to_owned(),
            unique_id: unique_id.map(str::to_owned),
            data: json!({"host": "device.lan"}),
        }
    }

    #[test]
    fn create_and_get_roundtrip() {
        let store = EntryStore::new();
        let id = store.create(entry("Device (device.lan)", Some("aa:bb"))).unwrap();

        let stored = store.get(id).unwrap();
        assert_eq!(stored.title, "Device (device.lan)");
        assert_eq!(stored.unique_id.as_deref(), Some("aa:bb"));
        assert!(stored.options.is_none());
    }

    #[test]
    fn duplicate_unique_id_rejected() {
        let store = EntryStore::new();
        store.create(entry("first", Some("aa:bb"))).unwrap();

        let err = store.create(entry("second", Some("aa:bb"))).unwrap_err();
        assert!(matches!(err, EntryStoreError::DuplicateUniqueId(id) if id == "aa:bb"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn entries_without_unique_id_never_collide() {
        let store = EntryStore::new();
        store.create(entry("first", None)).unwrap();
        store.create(entry("second", None)).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn options_update_keeps_entry_data() {
        let store = EntryStore::new();
        let id = store.create(entry("device", Some("aa:bb"))).unwrap();

        store.update_options(id, json!({"password": "new"})).unwrap();

        let stored = store.get(id).unwrap();
        assert_eq!(stored.data, json!({"host": "device.lan"}));
        assert_eq!(stored.options, Some(json!({"password": "new"})));
    }

    #[test]
    fn options_update_for_unknown_entry_fails() {
        let store = EntryStore::new();
        assert!(matches!(
            store.update_options(99, json!({})),
            Err(EntryStoreError::NotFound(99))
        ));
    }
}
