//! Conversion settings.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Image source of the arrow drawn at the bottom right of loop blocks.
pub const DEFAULT_LOOP_ARROW_SRC: &str = "./static/blocks-media/repeat.svg";

/// MIME subtypes accepted as embeddable block icons.
const EMBEDDABLE_IMAGE_TYPES: &[&str] = &["png", "svg+xml", "jpeg", "gif"];

/// Decides when a block icon sends the block down the editor's
/// `scratch_extension` compatibility path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconCheck {
    /// Every icon takes the compatibility path.
    #[default]
    Always,
    /// Only icons that are not a well-formed base64 image data URI do.
    DataUri,
    /// No icon does.
    Never,
}

impl IconCheck {
    /// Whether `uri` needs the `scratch_extension` flag.
    pub fn needs_compat_flag(self, uri: &str) -> bool {
        match self {
            IconCheck::Always => true,
            IconCheck::DataUri => !is_embeddable_image(uri),
            IconCheck::Never => false,
        }
    }
}

impl FromStr for IconCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(IconCheck::Always),
            "data-uri" => Ok(IconCheck::DataUri),
            "never" => Ok(IconCheck::Never),
            other => Err(format!(
                "unknown icon check {:?} (expected always, data-uri or never)",
                other
            )),
        }
    }
}

/// `data:image/<type>;base64,<payload>` with a supported type and a payload
/// that decodes to at least one byte.
pub fn is_embeddable_image(uri: &str) -> bool {
    let Some(rest) = uri.strip_prefix("data:image/") else {
        return false;
    };
    let Some((media, payload)) = rest.split_once(',') else {
        return false;
    };
    let Some(subtype) = media.strip_suffix(";base64") else {
        return false;
    };
    if !EMBEDDABLE_IMAGE_TYPES.contains(&subtype) {
        return false;
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .is_ok_and(|bytes| !bytes.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionConfig {
    pub icon_check: IconCheck,
    /// Reject placeholders without an argument, arguments without a
    /// placeholder and undeclared custom argument types. When off, such
    /// placeholders become untyped inputs and unused arguments are ignored.
    pub strict: bool,
    pub loop_arrow_src: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            icon_check: IconCheck::default(),
            strict: true,
            loop_arrow_src: DEFAULT_LOOP_ARROW_SRC.to_string(),
        }
    }
}

impl ConversionConfig {
    /// Settings that accept the loose metadata older extensions ship with.
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }
}
