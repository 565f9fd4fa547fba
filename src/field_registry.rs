//! Process-wide record of custom field types already announced to the editor.
//!
//! The editor must be told about each custom field type exactly once, no
//! matter how many extensions declare it. [`FieldTypeRegistry::global`]
//! returns the registry shared by the whole process; separate instances can
//! be created with [`FieldTypeRegistry::new`] for embedding and tests.

use indexmap::IndexSet;
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Payload of the one-time `EXTENSION_FIELD_ADDED` notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldTypeAdded {
    #[serde(rename = "name")]
    pub type_name: String,
    pub implementation: Value,
}

#[derive(Debug, Default)]
pub struct FieldTypeRegistry {
    known: Mutex<IndexSet<String>>,
}

static GLOBAL: OnceCell<FieldTypeRegistry> = OnceCell::new();

impl FieldTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process. It is never cleared.
    pub fn global() -> &'static FieldTypeRegistry {
        GLOBAL.get_or_init(FieldTypeRegistry::new)
    }

    /// Record `type_name`. Returns the notification payload the first time a
    /// name is seen and `None` on every later call.
    pub fn ensure_registered(&self, type_name: &str, implementation: &Value) -> Option<FieldTypeAdded> {
        let mut known = self.lock();
        if known.contains(type_name) {
            tracing::debug!("Field type {} already registered", type_name);
            return None;
        }
        known.insert(type_name.to_string());
        tracing::info!("Registered field type {} (#{})", type_name, known.len());
        Some(FieldTypeAdded {
            type_name: type_name.to_string(),
            implementation: implementation.clone(),
        })
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.lock().contains(type_name)
    }

    /// Registered names in registration order.
    pub fn registered(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the set half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, IndexSet<String>> {
        self.known.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
