//! Block definitions for extension menus.

use crate::argument::menu_block_type;
use crate::generator::block_json::{CategoryStyle, OUTPUT_SHAPE_ROUND, OUTPUT_SHAPE_SQUARE};
use crate::model::MenuInfo;
use serde_json::{Value, json};

/// Definition of the shadow block `<extensionId>_menu_<menuName>`: a single
/// dropdown field named after the menu. Menus that accept reporters are
/// round so a reporter can replace them.
pub fn menu_json(extension_id: &str, menu_name: &str, menu: &MenuInfo, style: &CategoryStyle<'_>) -> Value {
    let output_shape = if menu.accept_reporters {
        OUTPUT_SHAPE_ROUND
    } else {
        OUTPUT_SHAPE_SQUARE
    };
    json!({
        "type": menu_block_type(extension_id, menu_name),
        "message0": "%1",
        "inputsInline": true,
        "output": "String",
        "colour": style.colors[0],
        "colourSecondary": style.colors[1],
        "colourTertiary": style.colors[2],
        "outputShape": output_shape,
        "args0": [{
            "type": "field_dropdown",
            "name": menu_name,
            "options": menu.options(),
        }],
    })
}
