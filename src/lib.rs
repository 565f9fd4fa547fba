//! Extension block converter.
//!
//! Turns extension metadata (id, colours, block descriptors, custom field
//! types, menus) into the two artifacts a visual block editor consumes: a
//! block-factory JSON definition per block and a toolbox XML fragment per
//! block, button and separator.
//!
//! [`convert::convert_extension`] does the conversion and returns plain
//! values; [`events::ExtensionHost`] publishes them as `EXTENSION_ADDED` /
//! `EXTENSION_FIELD_ADDED` notifications. Custom field types are tracked in
//! the process-wide [`field_registry::FieldTypeRegistry`] so each is
//! announced once.
//!
//! The binary `blockconv` converts metadata files and prints the events as JSON.

pub mod argument;
pub mod color;
pub mod config;
pub mod convert;
pub mod error;
pub mod events;
pub mod field_registry;
pub mod generator;
pub mod loader;
pub mod model;
pub mod template;

pub use config::{ConversionConfig, IconCheck};
pub use convert::{Conversion, convert_extension};
pub use error::{ConversionError, Result};
pub use events::{EventBus, ExtensionEvent, ExtensionHost, RecordingBus};
pub use field_registry::{FieldTypeAdded, FieldTypeRegistry};
