//! Conversion of a whole extension.
//!
//! [`convert_extension`] walks the block list in declaration order and
//! produces one [`ConversionResult`] per entry. The field type registry is
//! only touched once every block converted, so a rejected extension never
//! announces its field types.

use crate::argument::{
    ArgumentContext, custom_field_block_type, custom_field_name, resolve_argument,
};
use crate::color::category_colors;
use crate::config::ConversionConfig;
use crate::error::{ConversionError, Result};
use crate::field_registry::{FieldTypeAdded, FieldTypeRegistry};
use crate::generator::block_json::{
    BlockJsonBuilder, CategoryStyle, SCRATCH_EXTENSION, ShapeRules, custom_field_json,
};
use crate::generator::menu::menu_json;
use crate::generator::toolbox_xml::{SEPARATOR_XML, block_xml, button_xml};
use crate::model::*;
use crate::template::{Segment, parse_lines};

/// Everything one extension produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Payload for `EXTENSION_ADDED`.
    pub category: CategoryInfo,
    /// Field types this extension was first to declare, in declaration order.
    pub new_field_types: Vec<FieldTypeAdded>,
}

/// Extension-wide state shared by the blocks of one extension.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionContext<'a> {
    pub extension_id: &'a str,
    pub style: CategoryStyle<'a>,
    /// Icon for blocks without their own.
    pub block_icon_uri: Option<&'a str>,
    pub arguments: ArgumentContext<'a>,
    pub config: &'a ConversionConfig,
}

/// Convert every entry of `meta`, then register its custom field types.
pub fn convert_extension(
    meta: &ExtensionMetadata,
    registry: &FieldTypeRegistry,
    config: &ConversionConfig,
) -> Result<Conversion> {
    if meta.id.is_empty() {
        return Err(ConversionError::MissingField {
            field: "id",
            context: "extension".to_string(),
        });
    }

    let [color1, color2, color3] = category_colors(
        meta.color1.as_deref(),
        meta.color2.as_deref(),
        meta.color3.as_deref(),
    );
    let ctx = ExtensionContext {
        extension_id: &meta.id,
        style: CategoryStyle {
            name: meta.category_name(),
            colors: [&color1, &color2, &color3],
        },
        block_icon_uri: meta.block_icon_uri.as_deref(),
        arguments: ArgumentContext {
            extension_id: &meta.id,
            custom_field_types: &meta.custom_field_types,
            menus: &meta.menus,
            strict: config.strict,
        },
        config,
    };

    let blocks = meta
        .blocks
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            convert_entry(&ctx, entry).map_err(|source| ConversionError::Block {
                index,
                opcode: entry_label(entry),
                source: Box::new(source),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let menus = meta
        .menus
        .iter()
        .map(|(name, menu)| menu_json(&meta.id, name, menu, &ctx.style))
        .collect();

    let custom_field_types = meta
        .custom_field_types
        .iter()
        .map(|(type_name, field)| {
            let block_type = custom_field_block_type(&meta.id, type_name);
            let field_name = custom_field_name(&meta.id, type_name);
            let json = custom_field_json(&block_type, &field_name, field, &ctx.style);
            CustomFieldDefinition { field_name, json }
        })
        .collect();

    let new_field_types: Vec<FieldTypeAdded> = meta
        .custom_field_types
        .iter()
        .filter_map(|(type_name, field)| registry.ensure_registered(type_name, &field.implementation))
        .collect();

    tracing::info!(
        "Converted extension {} ({} entries, {} new field types)",
        meta.id,
        blocks.len(),
        new_field_types.len()
    );

    let category = CategoryInfo {
        id: meta.id.clone(),
        name: meta.category_name().to_string(),
        color1: color1.clone(),
        color2: color2.clone(),
        color3: color3.clone(),
        block_icon_uri: meta.block_icon_uri.clone(),
        menu_icon_uri: meta.menu_icon_uri.clone(),
        docs_uri: meta.docs_uri.clone(),
        show_status_button: meta.show_status_button,
        blocks,
        menus,
        custom_field_types,
    };
    Ok(Conversion {
        category,
        new_field_types,
    })
}

fn entry_label(entry: &BlockEntry) -> String {
    match entry {
        BlockEntry::Separator => SEPARATOR_SENTINEL.to_string(),
        BlockEntry::Block(block) => block
            .opcode
            .clone()
            .or_else(|| block.func.clone())
            .unwrap_or_else(|| "<none>".to_string()),
    }
}

/// Convert one entry of the block list.
pub fn convert_entry(ctx: &ExtensionContext<'_>, entry: &BlockEntry) -> Result<ConversionResult> {
    match entry {
        BlockEntry::Separator => Ok(ConversionResult {
            info: BlockInfo::Separator,
            json: None,
            xml: SEPARATOR_XML.to_string(),
        }),
        BlockEntry::Block(block) => convert_block(ctx, block),
    }
}

/// Convert one block descriptor: buttons to button XML, everything else to
/// a block definition plus toolbox XML.
pub fn convert_block(ctx: &ExtensionContext<'_>, block: &BlockDescriptor) -> Result<ConversionResult> {
    match block.block_type() {
        BlockType::Button => convert_button(block),
        BlockType::Unknown(name) => Err(ConversionError::UnknownBlockType(name.clone())),
        _ => convert_scriptable(ctx, block),
    }
}

fn convert_button(block: &BlockDescriptor) -> Result<ConversionResult> {
    let func = block
        .func
        .as_deref()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ConversionError::MissingField {
            field: "func",
            context: "button".to_string(),
        })?;
    let text = block.text_lines().concat();
    Ok(ConversionResult {
        info: BlockInfo::Callback(func.to_string()),
        json: None,
        xml: button_xml(&text, func),
    })
}

fn convert_scriptable(ctx: &ExtensionContext<'_>, block: &BlockDescriptor) -> Result<ConversionResult> {
    let opcode = block
        .opcode
        .as_deref()
        .filter(|o| !o.is_empty())
        .ok_or_else(|| ConversionError::MissingField {
            field: "opcode",
            context: format!("{} block", block.block_type().as_str()),
        })?;
    let rules = ShapeRules::for_block_type(block.block_type())?;
    let lines = parse_lines(&block.text_lines(), &block.arguments, ctx.config.strict)?;

    let block_type = format!("{}_{}", ctx.extension_id, opcode);
    let mut json = BlockJsonBuilder::new(&block_type, &ctx.style, &rules, block.is_terminal);

    let icon = block.block_icon_uri.as_deref().or(ctx.block_icon_uri);
    if let Some(icon) = icon {
        if ctx.config.icon_check.needs_compat_flag(icon) {
            json.add_extension_flag(SCRATCH_EXTENSION);
        }
        let text_follows = lines.first().is_some_and(|line| !line.is_empty());
        json.push_icon(icon, text_follows);
        if lines.is_empty() {
            json.finish_line();
        }
    }

    // Text lines alternate with substacks: text0, branch0, text1, branch1, ...
    let mut values = Vec::new();
    let mut texts = lines.iter();
    let branch_count = block.branch_count();
    let mut branch = 0;
    loop {
        let mut progressed = false;
        if let Some(line) = texts.next() {
            for segment in line {
                match segment {
                    Segment::Literal(text) => json.append_text(text),
                    Segment::Placeholder(name) => {
                        let resolved = resolve_argument(&ctx.arguments, name, block.arguments.get(name))?;
                        json.push_arg(resolved.spec);
                        values.extend(resolved.value_xml);
                    }
                }
            }
            json.finish_line();
            progressed = true;
        }
        if branch < branch_count {
            json.push_branch(branch);
            branch += 1;
            progressed = true;
        }
        if !progressed {
            break;
        }
    }
    if *block.block_type() == BlockType::Loop {
        json.push_loop_arrow(&ctx.config.loop_arrow_src);
    }

    tracing::debug!("Converted block {} ({} lines)", block_type, json.current_line());
    Ok(ConversionResult {
        info: BlockInfo::Block(block.clone()),
        json: Some(json.build()),
        xml: block_xml(&block_type, &values),
    })
}
