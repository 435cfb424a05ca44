//! Manifest (package descriptor) version updates.
//!
//! The manifest is a JSON object with a top-level `version` string. Only
//! that field is touched; every other field keeps its value and position.
//! The file is rewritten with 2-space indentation.

use std::path::Path;

use serde_json::Value;

use crate::version::VersionString;

/// Errors from reading or updating a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to access manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("manifest root must be a JSON object")]
    NotAnObject,

    #[error("manifest has no string \"version\" field")]
    MissingVersion,
}

/// Read the `version` field of the manifest at `path`.
pub fn read_version(path: &Path) -> Result<String, ManifestError> {
    let root = read_object(path)?;
    root.get("version")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ManifestError::MissingVersion)
}

/// Set the manifest's `version` field and rewrite the file.
///
/// Returns the previous version, if the manifest had one. A manifest
/// without a `version` field gets one appended.
pub fn update_version(
    path: &Path,
    version: &VersionString,
) -> Result<Option<String>, ManifestError> {
    let mut root = read_object(path)?;

    let previous = root
        .get("version")
        .and_then(Value::as_str)
        .map(str::to_string);

    if let Value::Object(map) = &mut root {
        map.insert(
            "version".to_string(),
            Value::String(version.as_str().to_string()),
        );
    }

    let mut rendered = serde_json::to_string_pretty(&root)?;
    rendered.push('\n');
    std::fs::write(path, rendered)?;

    tracing::debug!(
        path = %path.display(),
        previous = previous.as_deref().unwrap_or("<none>"),
        version = %version,
        "Updated manifest version"
    );

    Ok(previous)
}

fn read_object(path: &Path) -> Result<Value, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    let root: Value = serde_json::from_str(&content)?;
    if !root.is_object() {
        return Err(ManifestError::NotAnObject);
    }
    Ok(root)
}
