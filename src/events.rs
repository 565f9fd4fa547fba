//! Publication of conversion results to the editor's notification bus.
//!
//! The converter itself only returns values; [`ExtensionHost`] turns a
//! [`Conversion`] into `EXTENSION_FIELD_ADDED` and `EXTENSION_ADDED`
//! notifications and hands them to an [`EventBus`] before returning.

use crate::config::ConversionConfig;
use crate::convert::{Conversion, convert_extension};
use crate::error::Result;
use crate::field_registry::{FieldTypeAdded, FieldTypeRegistry};
use crate::model::{CategoryInfo, ExtensionMetadata};
use serde::Serialize;

pub const EXTENSION_ADDED: &str = "EXTENSION_ADDED";
pub const EXTENSION_FIELD_ADDED: &str = "EXTENSION_FIELD_ADDED";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum ExtensionEvent {
    #[serde(rename = "EXTENSION_ADDED")]
    ExtensionAdded(CategoryInfo),
    #[serde(rename = "EXTENSION_FIELD_ADDED")]
    ExtensionFieldAdded(FieldTypeAdded),
}

impl ExtensionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ExtensionEvent::ExtensionAdded(_) => EXTENSION_ADDED,
            ExtensionEvent::ExtensionFieldAdded(_) => EXTENSION_FIELD_ADDED,
        }
    }
}

/// Receiver of notifications. Closures taking `&ExtensionEvent` are buses.
pub trait EventBus {
    fn emit(&mut self, event: &ExtensionEvent);
}

impl<F> EventBus for F
where
    F: FnMut(&ExtensionEvent),
{
    fn emit(&mut self, event: &ExtensionEvent) {
        self(event)
    }
}

/// Bus that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingBus {
    pub events: Vec<ExtensionEvent>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name() == name).count()
    }

    /// Payloads of all `EXTENSION_ADDED` events, oldest first.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryInfo> {
        self.events.iter().filter_map(|e| match e {
            ExtensionEvent::ExtensionAdded(category) => Some(category),
            _ => None,
        })
    }
}

impl EventBus for RecordingBus {
    fn emit(&mut self, event: &ExtensionEvent) {
        self.events.push(event.clone());
    }
}

/// Registers extensions and publishes what they produce.
pub struct ExtensionHost<'r, B: EventBus> {
    registry: &'r FieldTypeRegistry,
    bus: B,
    config: ConversionConfig,
}

impl<B: EventBus> ExtensionHost<'static, B> {
    /// Host backed by the process-wide field type registry.
    pub fn new(bus: B) -> Self {
        Self::with_registry(FieldTypeRegistry::global(), bus)
    }
}

impl<'r, B: EventBus> ExtensionHost<'r, B> {
    pub fn with_registry(registry: &'r FieldTypeRegistry, bus: B) -> Self {
        Self {
            registry,
            bus,
            config: ConversionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ConversionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Convert `meta` and publish one `EXTENSION_FIELD_ADDED` per field type
    /// seen for the first time, then one `EXTENSION_ADDED`. Nothing is
    /// published when conversion fails.
    pub fn register_extension(&mut self, meta: &ExtensionMetadata) -> Result<CategoryInfo> {
        let Conversion {
            category,
            new_field_types,
        } = convert_extension(meta, self.registry, &self.config)?;
        for added in new_field_types {
            self.bus.emit(&ExtensionEvent::ExtensionFieldAdded(added));
        }
        self.bus.emit(&ExtensionEvent::ExtensionAdded(category.clone()));
        Ok(category)
    }
}
