//! Block-factory JSON definitions.
//!
//! Definitions are plain `serde_json` objects whose keys keep insertion
//! order, so `message0`/`args0` come out in the order they were built.

use crate::argument::{block_icon, loop_arrow, statement_input, vertical_separator};
use crate::error::{ConversionError, Result};
use crate::model::{BlockType, CustomFieldType};
use serde_json::{Map, Value, json};

pub const OUTPUT_SHAPE_ROUND: i64 = 2;
pub const OUTPUT_SHAPE_SQUARE: i64 = 3;

/// Flag carried by every extension block.
pub const FROM_EXTENSION: &str = "from_extension";
/// Compatibility flag for blocks whose icon failed the icon check.
pub const SCRATCH_EXTENSION: &str = "scratch_extension";

/// Category name and colours shared by all blocks of an extension.
#[derive(Debug, Clone, Copy)]
pub struct CategoryStyle<'a> {
    pub name: &'a str,
    pub colors: [&'a str; 3],
}

/// Shape-dependent keys of a block definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRules {
    pub output_shape: i64,
    /// Value of `output`; `None` for stack blocks.
    pub output: Option<&'static str>,
    /// Whether the block connects above and below.
    pub statements: bool,
}

impl ShapeRules {
    /// Rules for a scriptable block type. Buttons are not blocks.
    pub fn for_block_type(block_type: &BlockType) -> Result<Self> {
        let stack = ShapeRules {
            output_shape: OUTPUT_SHAPE_SQUARE,
            output: None,
            statements: true,
        };
        match block_type {
            BlockType::Command | BlockType::Conditional | BlockType::Loop => Ok(stack),
            BlockType::Reporter => Ok(ShapeRules {
                output_shape: OUTPUT_SHAPE_ROUND,
                output: Some("String"),
                statements: false,
            }),
            BlockType::Boolean => Ok(ShapeRules {
                output_shape: OUTPUT_SHAPE_ROUND,
                output: Some("Boolean"),
                statements: false,
            }),
            BlockType::Button | BlockType::Unknown(_) => {
                Err(ConversionError::UnknownBlockType(block_type.as_str().to_string()))
            }
        }
    }
}

/// Incremental builder for one block definition.
///
/// Text and args are appended to the current line; [`finish_line`] moves on
/// to `message{n+1}`.
///
/// [`finish_line`]: BlockJsonBuilder::finish_line
#[derive(Debug)]
pub struct BlockJsonBuilder {
    json: Map<String, Value>,
    line: usize,
}

impl BlockJsonBuilder {
    pub fn new(block_type: &str, style: &CategoryStyle<'_>, rules: &ShapeRules, is_terminal: bool) -> Self {
        let mut json = Map::new();
        json.insert("type".into(), json!(block_type));
        json.insert("inputsInline".into(), json!(true));
        json.insert("checkboxInFlyout".into(), json!(true));
        json.insert("category".into(), json!(style.name));
        json.insert("colour".into(), json!(style.colors[0]));
        json.insert("colourSecondary".into(), json!(style.colors[1]));
        json.insert("colourTertiary".into(), json!(style.colors[2]));
        json.insert("extensions".into(), json!([FROM_EXTENSION]));
        json.insert("outputShape".into(), json!(rules.output_shape));
        if let Some(output) = rules.output {
            json.insert("output".into(), json!(output));
        }
        if rules.statements {
            json.insert("previousStatement".into(), Value::Null);
            if !is_terminal {
                json.insert("nextStatement".into(), Value::Null);
            }
        }
        Self { json, line: 0 }
    }

    pub fn add_extension_flag(&mut self, flag: &str) {
        if let Some(Value::Array(flags)) = self.json.get_mut("extensions") {
            if !flags.iter().any(|f| f == flag) {
                flags.push(json!(flag));
            }
        }
    }

    /// Index of the line being built.
    pub fn current_line(&self) -> usize {
        self.line
    }

    /// Append literal text to the current message.
    pub fn append_text(&mut self, text: &str) {
        let key = format!("message{}", self.line);
        let entry = self.json.entry(key).or_insert_with(|| json!(""));
        if let Value::String(message) = entry {
            message.push_str(text);
        }
    }

    /// Add an arg to the current line and write its `%N` reference into the
    /// message. Returns N.
    pub fn push_arg(&mut self, spec: Value) -> usize {
        self.append_text("");
        let key = format!("args{}", self.line);
        let entry = self.json.entry(key).or_insert_with(|| json!([]));
        let n = match entry {
            Value::Array(args) => {
                args.push(spec);
                args.len()
            }
            _ => 0,
        };
        self.append_text(&format!("%{}", n));
        n
    }

    /// Close the current line. A line without any text still gets its
    /// `message{i}` key.
    pub fn finish_line(&mut self) {
        self.append_text("");
        self.line += 1;
    }

    /// Block icon, followed by a separator when text follows on the same line.
    pub fn push_icon(&mut self, src: &str, text_follows: bool) {
        self.push_arg(block_icon(src));
        if text_follows {
            self.append_text(" ");
            self.push_arg(vertical_separator());
        }
    }

    /// A line holding only the statement input of branch `index`.
    pub fn push_branch(&mut self, index: u32) {
        self.push_arg(statement_input(index));
        self.finish_line();
    }

    /// Right-aligned line holding the loop arrow.
    pub fn push_loop_arrow(&mut self, src: &str) {
        self.json
            .insert(format!("lastDummyAlign{}", self.line), json!("RIGHT"));
        self.push_arg(loop_arrow(src));
        self.finish_line();
    }

    pub fn build(self) -> Value {
        Value::Object(self.json)
    }
}

/// Block definition of a custom field type's shadow block.
pub fn custom_field_json(
    block_type: &str,
    field_name: &str,
    field: &CustomFieldType,
    style: &CategoryStyle<'_>,
) -> Value {
    json!({
        "type": block_type,
        "message0": "%1",
        "inputsInline": true,
        "output": field.output,
        "colour": style.colors[0],
        "colourSecondary": style.colors[1],
        "colourTertiary": style.colors[2],
        "outputShape": field.output_shape,
        "args0": [{ "name": field_name, "type": field_name }],
        "extensions": [FROM_EXTENSION],
    })
}
