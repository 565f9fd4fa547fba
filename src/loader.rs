//! Reading extension metadata from JSON files.

use crate::model::ExtensionMetadata;
use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Parse extension metadata from JSON text.
pub fn parse_metadata(text: &str) -> Result<ExtensionMetadata> {
    serde_json::from_str(text).context("Failed to parse extension metadata")
}

/// Read and parse one metadata file.
pub fn load_metadata(path: impl AsRef<Utf8Path>) -> Result<ExtensionMetadata> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    parse_metadata(&text).with_context(|| format!("Invalid metadata in {}", path))
}

/// Expand the given paths into metadata files. Files are taken as given;
/// directories contribute every `*.json` below them, sorted by path.
pub fn collect_metadata_files<P: AsRef<Utf8Path>>(inputs: &[P]) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_file() {
            files.push(input.to_path_buf());
            continue;
        }
        if !input.is_dir() {
            return Err(anyhow!("No such file or directory: {}", input));
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(input) {
            let entry = entry.with_context(|| format!("Read dir {}", input))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = Utf8PathBuf::from_path_buf(entry.into_path())
                .map_err(|p| anyhow!("Non-UTF8 path {}", p.display()))?;
            if path.extension() == Some("json") {
                found.push(path);
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}
