//! Output generators.
//!
//! This module provides:
//! - [`block_json`] – Block-factory JSON definitions for blocks and custom field types.
//! - [`toolbox_xml`] – Toolbox XML for blocks, buttons and separators.
//! - [`menu`] – Block definitions for extension menus.

pub mod block_json;
pub mod menu;
pub mod toolbox_xml;
