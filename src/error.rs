//! Error types for extension conversion.

use thiserror::Error;

/// Structural problems that abort the conversion of an extension.
///
/// Invalid icon or image resources are not errors; they degrade to the
/// editor's compatibility path instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConversionError {
    /// A `[NAME]` placeholder names no argument of the block.
    #[error("placeholder [{placeholder}] does not name an argument of the block")]
    UnknownPlaceholder { placeholder: String },

    /// An argument is declared but its placeholder never appears in the text.
    #[error("argument {argument} is declared but never referenced by the block text")]
    UnusedArgument { argument: String },

    /// The block type is outside the supported set.
    #[error("unknown block type: {0}")]
    UnknownBlockType(String),

    /// A required field is absent or empty.
    #[error("missing required field `{field}` on {context}")]
    MissingField {
        /// Wire name of the field.
        field: &'static str,
        /// What was being converted.
        context: String,
    },

    /// The argument type is neither built in nor declared in `customFieldTypes`.
    #[error("argument type {0} is neither built in nor a declared custom field type")]
    UnknownArgumentType(String),

    /// The argument refers to a menu the extension does not declare.
    #[error("argument refers to undeclared menu {0}")]
    UnknownMenu(String),

    /// Wraps any of the above with the position of the offending block.
    #[error("block #{index} ({opcode}): {source}")]
    Block {
        /// Index in the extension's block list.
        index: usize,
        /// Opcode, callback key or `<none>`.
        opcode: String,
        #[source]
        source: Box<ConversionError>,
    },
}

impl ConversionError {
    /// The underlying error with any [`ConversionError::Block`] context removed.
    pub fn innermost(&self) -> &ConversionError {
        match self {
            ConversionError::Block { source, .. } => source.innermost(),
            other => other,
        }
    }
}

/// Result alias for conversion operations.
pub type Result<T, E = ConversionError> = std::result::Result<T, E>;
