//! Mapping of block arguments to block-factory arg specs and toolbox
//! `<value>` XML.

use crate::error::{ConversionError, Result};
use crate::generator::toolbox_xml::{Shadow, field_xml, value_xml};
use crate::model::{ArgumentDescriptor, ArgumentType, CustomFieldType, MenuInfo};
use indexmap::IndexMap;
use serde_json::{Value, json};

/// Size of the icon at the start of a block.
pub const BLOCK_ICON_SIZE: u32 = 40;
/// Size of inline images and of the loop arrow.
pub const INLINE_IMAGE_SIZE: u32 = 24;

/// Extension-wide inputs the resolver needs.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentContext<'a> {
    pub extension_id: &'a str,
    pub custom_field_types: &'a IndexMap<String, CustomFieldType>,
    pub menus: &'a IndexMap<String, MenuInfo>,
    pub strict: bool,
}

/// One resolved placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArgument {
    /// Content of the `%N` slot in `args{i}`.
    pub spec: Value,
    /// Toolbox XML for the argument: a `<value>` element for inputs, a bare
    /// `<field>` for a dropdown with a default. `None` for images and
    /// dropdowns without a default.
    pub value_xml: Option<String>,
}

/// Shadow block and field name of a built-in argument type.
fn builtin_shadow(arg_type: &ArgumentType) -> Option<Shadow<'static>> {
    let (block_type, field_name) = match arg_type {
        ArgumentType::String => ("text", "TEXT"),
        ArgumentType::Number | ArgumentType::Angle => ("math_number", "NUM"),
        ArgumentType::Color => ("colour_picker", "COLOUR"),
        ArgumentType::Matrix => ("matrix", "MATRIX"),
        ArgumentType::Note => ("note", "NOTE"),
        ArgumentType::Boolean | ArgumentType::Image | ArgumentType::Custom(_) => return None,
    };
    Some(Shadow {
        block_type,
        field_name,
    })
}

/// `<extensionId>_<typeName>`: block type of a custom field's shadow block.
pub fn custom_field_block_type(extension_id: &str, type_name: &str) -> String {
    format!("{}_{}", extension_id, type_name)
}

/// `field_<extensionId>_<typeName>`: the editor-side field tag.
pub fn custom_field_name(extension_id: &str, type_name: &str) -> String {
    format!("field_{}", custom_field_block_type(extension_id, type_name))
}

/// `<extensionId>_menu_<menuName>`: block type of a menu's shadow block.
pub fn menu_block_type(extension_id: &str, menu_name: &str) -> String {
    format!("{}_menu_{}", extension_id, menu_name)
}

fn input_value(name: &str) -> Value {
    json!({ "type": "input_value", "name": name })
}

fn untyped(name: &str) -> ResolvedArgument {
    ResolvedArgument {
        spec: input_value(name),
        value_xml: Some(value_xml(name, None, None)),
    }
}

/// Resolve the placeholder `name`. `arg` is `None` only for placeholders
/// that lenient parsing let through; those become untyped inputs.
pub fn resolve_argument(
    ctx: &ArgumentContext<'_>,
    name: &str,
    arg: Option<&ArgumentDescriptor>,
) -> Result<ResolvedArgument> {
    let Some(arg) = arg else {
        return Ok(untyped(name));
    };

    if arg.arg_type == ArgumentType::Image {
        return Ok(ResolvedArgument {
            spec: inline_image(arg),
            value_xml: None,
        });
    }
    if let Some(menu) = arg.menu.as_deref() {
        return resolve_menu_argument(ctx, name, arg, menu);
    }

    let default = arg.default_text();
    match &arg.arg_type {
        ArgumentType::Boolean => Ok(ResolvedArgument {
            spec: json!({ "type": "input_value", "name": name, "check": "Boolean" }),
            value_xml: Some(value_xml(name, None, None)),
        }),
        ArgumentType::Custom(type_name) => {
            if !ctx.custom_field_types.contains_key(type_name) {
                if ctx.strict {
                    return Err(ConversionError::UnknownArgumentType(type_name.clone()));
                }
                tracing::warn!(
                    "Argument {} has undeclared type {}, using a plain input",
                    name,
                    type_name
                );
                return Ok(untyped(name));
            }
            let block_type = custom_field_block_type(ctx.extension_id, type_name);
            let field_name = custom_field_name(ctx.extension_id, type_name);
            let mut spec = json!({ "type": field_name.as_str(), "name": name });
            if let Some(default) = default.as_deref() {
                spec["value"] = Value::String(default.to_string());
            }
            let shadow = Shadow {
                block_type: &block_type,
                field_name: &field_name,
            };
            Ok(ResolvedArgument {
                spec,
                value_xml: Some(value_xml(name, Some(shadow), default.as_deref())),
            })
        }
        builtin => Ok(ResolvedArgument {
            spec: input_value(name),
            value_xml: Some(value_xml(name, builtin_shadow(builtin), default.as_deref())),
        }),
    }
}

fn resolve_menu_argument(
    ctx: &ArgumentContext<'_>,
    name: &str,
    arg: &ArgumentDescriptor,
    menu: &str,
) -> Result<ResolvedArgument> {
    let menu_info = ctx
        .menus
        .get(menu)
        .ok_or_else(|| ConversionError::UnknownMenu(menu.to_string()))?;

    if !menu_info.accept_reporters {
        return Ok(ResolvedArgument {
            spec: json!({ "type": "field_dropdown", "name": name, "options": menu_info.options() }),
            value_xml: arg
                .default_text()
                .filter(|d| !d.is_empty())
                .map(|d| field_xml(name, &d)),
        });
    }

    let mut spec = input_value(name);
    if arg.arg_type == ArgumentType::Boolean {
        spec["check"] = json!("Boolean");
    }
    let block_type = menu_block_type(ctx.extension_id, menu);
    let shadow = Shadow {
        block_type: &block_type,
        field_name: menu,
    };
    Ok(ResolvedArgument {
        spec,
        value_xml: Some(value_xml(name, Some(shadow), arg.default_text().as_deref())),
    })
}

/// Inline image field. A missing source is passed on as an empty string.
pub fn inline_image(arg: &ArgumentDescriptor) -> Value {
    if arg.data_uri.is_none() {
        tracing::warn!("Image argument without dataURI");
    }
    json!({
        "type": "field_image",
        "src": arg.data_uri.as_deref().unwrap_or(""),
        "width": INLINE_IMAGE_SIZE,
        "height": INLINE_IMAGE_SIZE,
        "flip_rtl": arg.flip_rtl,
    })
}

/// Icon at the start of a block.
pub fn block_icon(src: &str) -> Value {
    json!({
        "type": "field_image",
        "src": src,
        "width": BLOCK_ICON_SIZE,
        "height": BLOCK_ICON_SIZE,
    })
}

/// Separator between a block's icon and its text.
pub fn vertical_separator() -> Value {
    json!({ "type": "field_vertical_separator" })
}

/// Arrow at the bottom right of a loop block.
pub fn loop_arrow(src: &str) -> Value {
    json!({
        "type": "field_image",
        "src": src,
        "width": INLINE_IMAGE_SIZE,
        "height": INLINE_IMAGE_SIZE,
        "alt": "*",
        "flip_rtl": true,
    })
}

/// Input name of the `index`-th substack: `SUBSTACK`, `SUBSTACK2`, ...
pub fn substack_name(index: u32) -> String {
    if index == 0 {
        "SUBSTACK".to_string()
    } else {
        format!("SUBSTACK{}", index + 1)
    }
}

/// Statement input of the `index`-th branch. Branches have no toolbox XML.
pub fn statement_input(index: u32) -> Value {
    json!({ "type": "input_statement", "name": substack_name(index) })
}
