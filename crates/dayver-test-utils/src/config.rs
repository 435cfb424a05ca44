//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`DayverConfig`] values
//! without repeating boilerplate across crate boundaries.

use std::path::Path;

use dayver_config::DayverConfig;

/// Fluent builder for [`DayverConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .project_path(project.path())
///     .release_type("beta")
///     .silent(true)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: DayverConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: DayverConfig::default(),
        }
    }

    pub fn project_path(mut self, path: &Path) -> Self {
        self.config.project_path = path.to_path_buf();
        self
    }

    pub fn release_type(mut self, release_type: &str) -> Self {
        self.config.release_type = release_type.to_string();
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.config.silent = silent;
        self
    }

    pub fn override_commit_count(mut self, count: u64) -> Self {
        self.config.override_commit_count = Some(count);
        self
    }

    pub fn update_manifest(mut self, update: bool) -> Self {
        self.config.manifest.update = update;
        self
    }

    pub fn artifact(mut self, enabled: bool) -> Self {
        self.config.artifact.enabled = enabled;
        self
    }

    pub fn artifact_path(mut self, path: &str) -> Self {
        self.config.artifact.path = path.into();
        self
    }

    pub fn build(self) -> DayverConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
