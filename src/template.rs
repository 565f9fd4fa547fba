//! Block text templates.
//!
//! A block's text is one or more lines of literal text with `[NAME]`
//! placeholders. [`tokenize_line`] splits a line into segments;
//! [`parse_lines`] does that for every line and checks the placeholders
//! against the block's arguments.

use crate::error::{ConversionError, Result};
use crate::model::ArgumentDescriptor;
use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// Name between the brackets of a `[NAME]` token.
    Placeholder(String),
}

/// Segments of one text line, left to right.
pub type TemplateLine = Vec<Segment>;

/// Split a line at its `[NAME]` tokens. An unterminated `[` and an empty
/// `[]` stay literal text.
pub fn tokenize_line(line: &str) -> TemplateLine {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) if close > 0 => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(after[..close].to_string()));
                rest = &after[close + 1..];
            }
            _ => {
                literal.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Tokenize every line and validate placeholders against `arguments`.
///
/// In strict mode every placeholder must name an argument and every argument
/// must be referenced at least once.
///
/// A placeholder may appear more than once. Every occurrence becomes its own
/// arg and `<value>`, so the block ends up with several inputs of the same
/// name, which editors typically refuse to load. This is accepted in both
/// modes and logged as a warning.
pub fn parse_lines(
    lines: &[&str],
    arguments: &IndexMap<String, ArgumentDescriptor>,
    strict: bool,
) -> Result<Vec<TemplateLine>> {
    let parsed: Vec<TemplateLine> = lines.iter().map(|l| tokenize_line(l)).collect();
    for name in repeated_placeholders(&parsed) {
        tracing::warn!("Placeholder [{}] appears more than once; inputs will share a name", name);
    }
    if !strict {
        return Ok(parsed);
    }

    let mut referenced: IndexSet<&str> = IndexSet::new();
    for name in placeholders(&parsed) {
        if !arguments.contains_key(name) {
            return Err(ConversionError::UnknownPlaceholder {
                placeholder: name.to_string(),
            });
        }
        referenced.insert(name);
    }
    if let Some(unused) = arguments.keys().find(|k| !referenced.contains(k.as_str())) {
        return Err(ConversionError::UnusedArgument {
            argument: unused.clone(),
        });
    }
    Ok(parsed)
}

/// Names that occur more than once, each listed once in order of first repeat.
pub fn repeated_placeholders(lines: &[TemplateLine]) -> Vec<&str> {
    let mut seen = IndexSet::new();
    let mut repeated = IndexSet::new();
    for name in placeholders(lines) {
        if !seen.insert(name) {
            repeated.insert(name);
        }
    }
    repeated.into_iter().collect()
}

/// Placeholder names in order of appearance, repeats included.
pub fn placeholders(lines: &[TemplateLine]) -> impl Iterator<Item = &str> {
    lines.iter().flatten().filter_map(|seg| match seg {
        Segment::Placeholder(name) => Some(name.as_str()),
        Segment::Literal(_) => None,
    })
}
