#![deny(unsafe_code)]

//! Configuration loading and validation for dayver.
//!
//! Loads the optional `dayver.toml` project file and validates it. Provides
//! the [`DayverConfig`] type as the central configuration structure shared by
//! the CLI and the version generator.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name looked up in the project directory when no explicit config
/// path is given.
pub const CONFIG_FILE_NAME: &str = "dayver.toml";

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level dayver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayverConfig {
    /// Directory the generator operates in (git history, manifest, artifact).
    /// Relative paths elsewhere in the config are resolved against it.
    #[serde(default = "default_project_path")]
    pub project_path: PathBuf,

    /// Release type used when the caller does not supply one.
    /// An empty string selects the clean `YY.MM.DD.N` format.
    #[serde(default = "default_release_type")]
    pub release_type: String,

    /// Suppress non-essential console output.
    #[serde(default)]
    pub silent: bool,

    /// Fixed build number that bypasses the git history query.
    #[serde(default)]
    pub override_commit_count: Option<u64>,

    /// Manifest (package descriptor) settings.
    #[serde(default)]
    pub manifest: ManifestConfig,

    /// Generated metadata artifact settings.
    #[serde(default)]
    pub artifact: ArtifactConfig,
}

impl Default for DayverConfig {
    fn default() -> Self {
        Self {
            project_path: default_project_path(),
            release_type: default_release_type(),
            silent: false,
            override_commit_count: None,
            manifest: ManifestConfig::default(),
            artifact: ArtifactConfig::default(),
        }
    }
}

fn default_project_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_release_type() -> String {
    "dev".to_string()
}

/// Manifest update configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Manifest path, relative to the project directory.
    #[serde(default = "default_manifest_path")]
    pub path: PathBuf,

    /// Whether the generated version is written back into the manifest.
    #[serde(default = "default_manifest_update")]
    pub update: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: default_manifest_path(),
            update: default_manifest_update(),
        }
    }
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_manifest_update() -> bool {
    true
}

/// Build metadata artifact configuration. Generation is opt-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Whether the artifact file is generated.
    #[serde(default)]
    pub enabled: bool,

    /// Artifact path, relative to the project directory.
    #[serde(default = "default_artifact_path")]
    pub path: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_artifact_path(),
        }
    }
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("src/version.ts")
}

impl DayverConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: DayverConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "project_path must not be empty".to_string(),
            ));
        }
        let release_type = self.release_type.trim();
        if release_type.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "release_type must not contain whitespace, got {:?}",
                self.release_type
            )));
        }
        if self.manifest.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "manifest.path must not be empty".to_string(),
            ));
        }
        if self.artifact.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "artifact.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute-or-project-relative location of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.project_path.join(&self.manifest.path)
    }

    /// Absolute-or-project-relative location of the artifact file.
    pub fn artifact_path(&self) -> PathBuf {
        self.project_path.join(&self.artifact.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DayverConfig::default();
        assert_eq!(config.project_path, PathBuf::from("."));
        assert_eq!(config.release_type, "dev");
        assert!(!config.silent);
        assert_eq!(config.override_commit_count, None);
        assert_eq!(config.manifest.path, PathBuf::from("package.json"));
        assert!(config.manifest.update);
        assert!(!config.artifact.enabled);
        assert_eq!(config.artifact.path, PathBuf::from("src/version.ts"));
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = DayverConfig::parse("").unwrap();
        assert_eq!(config.release_type, "dev");
        assert!(config.manifest.update);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            project_path = "/srv/app"
            release_type = "beta"
            silent = true
            override_commit_count = 12

            [manifest]
            path = "web/package.json"
            update = false

            [artifact]
            enabled = true
            path = "web/src/build.ts"
        "#;
        let config = DayverConfig::parse(toml).unwrap();
        assert_eq!(config.project_path, PathBuf::from("/srv/app"));
        assert_eq!(config.release_type, "beta");
        assert!(config.silent);
        assert_eq!(config.override_commit_count, Some(12));
        assert!(!config.manifest.update);
        assert!(config.artifact.enabled);
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("/srv/app/web/package.json")
        );
        assert_eq!(
            config.artifact_path(),
            PathBuf::from("/srv/app/web/src/build.ts")
        );
    }

    #[test]
    fn test_empty_release_type_is_valid() {
        let config = DayverConfig::parse(r#"release_type = """#).unwrap();
        assert_eq!(config.release_type, "");
    }

    #[test]
    fn test_validation_rejects_whitespace_in_release_type() {
        let result = DayverConfig::parse(r#"release_type = "release candidate""#);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_negative_override() {
        let result = DayverConfig::parse("override_commit_count = -3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_rejects_empty_manifest_path() {
        let toml = r#"
            [manifest]
            path = ""
        "#;
        assert!(DayverConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_artifact_path() {
        let toml = r#"
            [artifact]
            path = ""
        "#;
        assert!(DayverConfig::parse(toml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "release_type = \"rc\"\nsilent = true\n").unwrap();

        let config = DayverConfig::load(&path).unwrap();
        assert_eq!(config.release_type, "rc");
        assert!(config.silent);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = DayverConfig::load(Path::new("/nonexistent/dayver.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_invalid_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, b"not valid toml [[[").unwrap();

        assert!(DayverConfig::load(&path).is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }
}
