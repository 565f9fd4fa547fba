use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel string that stands for a separator between groups of blocks.
pub const SEPARATOR_SENTINEL: &str = "---";

fn is_false(b: &bool) -> bool {
    !*b
}

// ────────────────────────────────────────────────────────────────────────────
// ExtensionMetadata – input
// ────────────────────────────────────────────────────────────────────────────

/// Declarative description of an extension as supplied by the loader.
///
/// Keys follow the camelCase naming used on the wire (`blockIconURI`,
/// `customFieldTypes`, ...). `menus` and `customFieldTypes` keep their
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionMetadata {
    pub id: String,
    /// Category name shown in the palette. Falls back to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color3: Option<String>,
    /// Icon shown on every block that has no `blockIconURI` of its own.
    #[serde(default, rename = "blockIconURI", skip_serializing_if = "Option::is_none")]
    pub block_icon_uri: Option<String>,
    #[serde(default, rename = "menuIconURI", skip_serializing_if = "Option::is_none")]
    pub menu_icon_uri: Option<String>,
    #[serde(default, rename = "docsURI", skip_serializing_if = "Option::is_none")]
    pub docs_uri: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub show_status_button: bool,
    #[serde(default)]
    pub blocks: Vec<BlockEntry>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub menus: IndexMap<String, MenuInfo>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub custom_field_types: IndexMap<String, CustomFieldType>,
}

impl ExtensionMetadata {
    /// Category name, defaulting to the extension id.
    pub fn category_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// One entry of an extension's block list.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockEntry {
    /// The `"---"` sentinel.
    Separator,
    Block(BlockDescriptor),
}

impl<'de> Deserialize<'de> for BlockEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Sentinel(String),
            Block(Box<BlockDescriptor>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Sentinel(s) if s == SEPARATOR_SENTINEL => Ok(BlockEntry::Separator),
            Raw::Sentinel(s) => Err(serde::de::Error::custom(format!(
                "unexpected block entry {:?}: only {:?} may appear as a string",
                s, SEPARATOR_SENTINEL
            ))),
            Raw::Block(block) => Ok(BlockEntry::Block(*block)),
        }
    }
}

impl Serialize for BlockEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            BlockEntry::Separator => serializer.serialize_str(SEPARATOR_SENTINEL),
            BlockEntry::Block(block) => block.serialize(serializer),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Block descriptors
// ────────────────────────────────────────────────────────────────────────────

/// Block shape. Unrecognized names are kept in [`BlockType::Unknown`] so the
/// converter can report them instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    #[default]
    Command,
    Reporter,
    Boolean,
    Conditional,
    Loop,
    Button,
    Unknown(String),
}

impl BlockType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "command" => BlockType::Command,
            "reporter" => BlockType::Reporter,
            "Boolean" | "boolean" => BlockType::Boolean,
            "conditional" => BlockType::Conditional,
            "loop" => BlockType::Loop,
            "button" => BlockType::Button,
            other => BlockType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Command => "command",
            BlockType::Reporter => "reporter",
            BlockType::Boolean => "Boolean",
            BlockType::Conditional => "conditional",
            BlockType::Loop => "loop",
            BlockType::Button => "button",
            BlockType::Unknown(s) => s,
        }
    }

    /// Number of substacks a block of this shape has when `branchCount` is
    /// not given.
    pub fn default_branch_count(&self) -> u32 {
        match self {
            BlockType::Loop => 1,
            BlockType::Conditional => 2,
            _ => 0,
        }
    }
}

impl<'de> Deserialize<'de> for BlockType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(BlockType::from_name(&s))
    }
}

impl Serialize for BlockType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Display text of a block: one string, or one string per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockText {
    Single(String),
    Lines(Vec<String>),
}

impl BlockText {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            BlockText::Single(s) => vec![s.as_str()],
            BlockText::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for BlockText {
    fn from(s: &str) -> Self {
        BlockText::Single(s.to_string())
    }
}

/// A block (or button) as declared by an extension.
///
/// Keys this crate does not interpret are kept in `extra`, so the descriptor
/// round-trips unchanged into [`ConversionResult::info`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opcode: Option<String>,
    /// Callback key of a button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub func: Option<String>,
    /// As declared; `None` means command. Use [`BlockDescriptor::block_type`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_type: Option<BlockType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<BlockText>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub arguments: IndexMap<String, ArgumentDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_count: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_terminal: bool,
    #[serde(default, rename = "blockIconURI", skip_serializing_if = "Option::is_none")]
    pub block_icon_uri: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

static DEFAULT_BLOCK_TYPE: BlockType = BlockType::Command;

impl BlockDescriptor {
    /// Effective block type.
    pub fn block_type(&self) -> &BlockType {
        self.block_type.as_ref().unwrap_or(&DEFAULT_BLOCK_TYPE)
    }

    /// Effective number of substacks.
    pub fn branch_count(&self) -> u32 {
        self.branch_count
            .unwrap_or_else(|| self.block_type().default_branch_count())
    }

    /// Text lines, falling back to the opcode when no text was given.
    pub fn text_lines(&self) -> Vec<&str> {
        match (&self.text, &self.opcode) {
            (Some(text), _) => text.lines(),
            (None, Some(opcode)) => vec![opcode.as_str()],
            (None, None) => Vec::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Arguments
// ────────────────────────────────────────────────────────────────────────────

/// Argument type: one of the built-in kinds or the name of a custom field
/// type declared in `customFieldTypes`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ArgumentType {
    #[default]
    String,
    Number,
    Boolean,
    Image,
    Angle,
    Color,
    Matrix,
    Note,
    Custom(String),
}

impl ArgumentType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "string" => ArgumentType::String,
            "number" => ArgumentType::Number,
            "Boolean" | "boolean" => ArgumentType::Boolean,
            "image" => ArgumentType::Image,
            "angle" => ArgumentType::Angle,
            "color" => ArgumentType::Color,
            "matrix" => ArgumentType::Matrix,
            "note" => ArgumentType::Note,
            other => ArgumentType::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ArgumentType::String => "string",
            ArgumentType::Number => "number",
            ArgumentType::Boolean => "Boolean",
            ArgumentType::Image => "image",
            ArgumentType::Angle => "angle",
            ArgumentType::Color => "color",
            ArgumentType::Matrix => "matrix",
            ArgumentType::Note => "note",
            ArgumentType::Custom(s) => s,
        }
    }
}

impl<'de> Deserialize<'de> for ArgumentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ArgumentType::from_name(&s))
    }
}

impl Serialize for ArgumentType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentDescriptor {
    #[serde(rename = "type", default)]
    pub arg_type: ArgumentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Image source for `image` arguments.
    #[serde(default, rename = "dataURI", skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,
    #[serde(default, rename = "flipRTL", skip_serializing_if = "is_false")]
    pub flip_rtl: bool,
    /// Name of a menu declared in [`ExtensionMetadata::menus`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<String>,
}

impl ArgumentDescriptor {
    pub fn new(arg_type: ArgumentType) -> Self {
        Self {
            arg_type,
            ..Default::default()
        }
    }

    /// Default value rendered as text. Strings are used as-is, numbers and
    /// booleans use their JSON spelling.
    pub fn default_text(&self) -> Option<String> {
        match self.default_value.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Field type supplied by an extension and unknown to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldType {
    pub output: String,
    pub output_shape: i64,
    /// Opaque implementation handle, handed to the editor untouched.
    #[serde(default)]
    pub implementation: Value,
}

// ────────────────────────────────────────────────────────────────────────────
// Menus
// ────────────────────────────────────────────────────────────────────────────

/// A static menu. Accepts either `{ "items": [...], "acceptReporters": bool }`
/// or the bare item array.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuInfo {
    pub items: Vec<MenuItem>,
    #[serde(skip_serializing_if = "is_false")]
    pub accept_reporters: bool,
}

impl<'de> Deserialize<'de> for MenuInfo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Full {
            #[serde(default)]
            items: Vec<MenuItem>,
            #[serde(default)]
            accept_reporters: bool,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Items(Vec<MenuItem>),
            Full(Full),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Items(items) => MenuInfo {
                items,
                accept_reporters: false,
            },
            Raw::Full(full) => MenuInfo {
                items: full.items,
                accept_reporters: full.accept_reporters,
            },
        })
    }
}

impl MenuInfo {
    /// Dropdown options as `[text, value]` pairs.
    pub fn options(&self) -> Vec<[String; 2]> {
        self.items.iter().map(MenuItem::option).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuItem {
    Text(String),
    Pair { text: String, value: Value },
}

impl MenuItem {
    pub fn option(&self) -> [String; 2] {
        match self {
            MenuItem::Text(s) => [s.clone(), s.clone()],
            MenuItem::Pair { text, value } => {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                [text.clone(), value]
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Conversion output
// ────────────────────────────────────────────────────────────────────────────

/// What a [`ConversionResult`] was produced from.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockInfo {
    /// The original descriptor of a scriptable block.
    Block(BlockDescriptor),
    /// Callback key of a button.
    Callback(String),
    Separator,
}

impl Serialize for BlockInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            BlockInfo::Block(block) => block.serialize(serializer),
            BlockInfo::Callback(func) => serializer.serialize_str(func),
            BlockInfo::Separator => serializer.serialize_str(SEPARATOR_SENTINEL),
        }
    }
}

impl BlockInfo {
    pub fn as_block(&self) -> Option<&BlockDescriptor> {
        match self {
            BlockInfo::Block(block) => Some(block),
            _ => None,
        }
    }
}

/// Per-entry output: block-factory JSON (absent for pseudo-blocks), toolbox
/// XML and the source info.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub info: BlockInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
    pub xml: String,
}

/// Block-factory definition backing a custom field type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldDefinition {
    /// `field_<extensionId>_<typeName>`.
    pub field_name: String,
    pub json: Value,
}

/// Payload of the `EXTENSION_ADDED` notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    pub color1: String,
    pub color2: String,
    pub color3: String,
    #[serde(rename = "blockIconURI", skip_serializing_if = "Option::is_none")]
    pub block_icon_uri: Option<String>,
    #[serde(rename = "menuIconURI", skip_serializing_if = "Option::is_none")]
    pub menu_icon_uri: Option<String>,
    #[serde(rename = "docsURI", skip_serializing_if = "Option::is_none")]
    pub docs_uri: Option<String>,
    pub show_status_button: bool,
    pub blocks: Vec<ConversionResult>,
    pub menus: Vec<Value>,
    pub custom_field_types: Vec<CustomFieldDefinition>,
}
