//! Build metadata artifact generation.
//!
//! Writes a small TypeScript module exposing the assembled version and the
//! generation time, so a frontend can show build information at runtime.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::version::VersionString;

/// Default artifact location, relative to the project directory.
pub const DEFAULT_ARTIFACT_PATH: &str = "src/version.ts";

/// Errors from artifact generation.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to create artifact directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Metadata rendered into the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMetadata {
    /// The assembled version.
    pub version: VersionString,
    /// When the version was generated.
    pub built_at: DateTime<Utc>,
}

impl BuildMetadata {
    /// Create metadata for a version generated at `built_at`.
    pub fn new(version: VersionString, built_at: DateTime<Utc>) -> Self {
        Self { version, built_at }
    }

    /// ISO-8601 timestamp with millisecond precision, e.g.
    /// `2025-12-26T10:00:00.000Z`.
    pub fn iso_timestamp(&self) -> String {
        self.built_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.built_at.timestamp_millis()
    }
}

/// Render the artifact source text.
pub fn render(metadata: &BuildMetadata) -> String {
    // JSON string literals are valid TypeScript string literals.
    let version = serde_json::Value::String(metadata.version.to_string());
    let built_at = serde_json::Value::String(metadata.iso_timestamp());

    format!(
        r#"// This file is generated by dayver. Do not edit.

export const VERSION = {version};
export const BUILD_TIME = {built_at};
export const BUILD_TIMESTAMP = {timestamp};

export const VERSION_INFO = {{
  version: VERSION,
  buildTime: BUILD_TIME,
  buildTimestamp: BUILD_TIMESTAMP,
}} as const;

export function getBuildDate(): string {{
  return new Date(BUILD_TIMESTAMP).toLocaleString();
}}

export function getDisplayVersion(): string {{
  return VERSION.split("-")[0];
}}
"#,
        timestamp = metadata.timestamp_millis(),
    )
}

/// Write the artifact to `path`, creating parent directories as needed.
pub fn write(path: &Path, metadata: &BuildMetadata) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ArtifactError::CreateDir {
            path: parent.display().to_string(),
            source,
        })?;
    }

    std::fs::write(path, render(metadata)).map_err(|source| ArtifactError::Write {
        path: path.display().to_string(),
        source,
    })?;

    tracing::debug!(path = %path.display(), version = %metadata.version, "Wrote build artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::version::assemble;

    fn metadata() -> BuildMetadata {
        let version = assemble("dev", NaiveDate::from_ymd_opt(2025, 12, 26).unwrap(), 3).unwrap();
        let built_at = Utc.with_ymd_and_hms(2025, 12, 26, 10, 0, 0).unwrap();
        BuildMetadata::new(version, built_at)
    }

    #[test]
    fn test_timestamps() {
        let meta = metadata();
        assert_eq!(meta.iso_timestamp(), "2025-12-26T10:00:00.000Z");
        assert_eq!(meta.timestamp_millis(), 1_766_743_200_000);
    }

    #[test]
    fn test_render_constants() {
        let text = render(&metadata());
        assert!(text.contains("export const VERSION = \"25.12.26-dev.3\";"));
        assert!(text.contains("export const BUILD_TIME = \"2025-12-26T10:00:00.000Z\";"));
        assert!(text.contains("export const BUILD_TIMESTAMP = 1766743200000;"));
        assert!(text.contains("export const VERSION_INFO = {"));
        assert!(text.contains("export function getBuildDate(): string {"));
        assert!(text.contains("return VERSION.split(\"-\")[0];"));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_ARTIFACT_PATH);
        assert!(!path.parent().unwrap().exists());

        write(&path, &metadata()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, render(&metadata()));
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("version.ts");
        std::fs::write(&path, "stale").unwrap();

        write(&path, &metadata()).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("// This file"));
    }

    #[test]
    fn test_write_into_file_parent_fails() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("src");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = write(&blocker.join("version.ts"), &metadata());
        assert!(matches!(result, Err(ArtifactError::CreateDir { .. })));
    }
}
