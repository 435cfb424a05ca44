//! Version generation pipeline.
//!
//! Resolves the build number, assembles the version, then optionally writes
//! it into the manifest and the build metadata artifact. Only assembly can
//! fail the run; write failures are recorded in the [`GenerationReport`].

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, Utc};
use dayver_config::DayverConfig;

use crate::artifact::{self, BuildMetadata};
use crate::build_number::{BuildNumber, BuildNumberResolver, BuildNumberSource, CommitCounter};
use crate::manifest;
use crate::version::{self, VersionError, VersionString};

/// Errors that abort version generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("version generation failed: {0}")]
    Version(#[from] VersionError),
}

/// Result of an optional write step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The step was not requested.
    Skipped,
    /// The file was written.
    Written,
    /// The write failed; the message describes why.
    Failed(String),
}

impl WriteOutcome {
    /// Whether the file was written.
    pub fn succeeded(&self) -> bool {
        matches!(self, WriteOutcome::Written)
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Skipped => write!(f, "skipped"),
            WriteOutcome::Written => write!(f, "written"),
            WriteOutcome::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

/// Everything a generation run produced.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// The assembled version.
    pub version: VersionString,
    /// The date the version is stamped with.
    pub date: NaiveDate,
    /// The resolved build number and its source.
    pub build_number: BuildNumber,
    /// Manifest update outcome.
    pub manifest: WriteOutcome,
    /// Artifact generation outcome.
    pub artifact: WriteOutcome,
}

/// Generates versions for one project configuration.
pub struct VersionGenerator {
    config: DayverConfig,
    resolver: BuildNumberResolver,
}

impl VersionGenerator {
    /// Create a generator using `counter` for history queries.
    pub fn new(config: DayverConfig, counter: Box<dyn CommitCounter>) -> Self {
        Self {
            config,
            resolver: BuildNumberResolver::new(counter),
        }
    }

    /// The configuration this generator runs with.
    pub fn config(&self) -> &DayverConfig {
        &self.config
    }

    /// Resolve the build number and assemble the version for `date`
    /// without writing anything.
    pub fn version_for(
        &self,
        date: NaiveDate,
    ) -> Result<(VersionString, BuildNumber), GenerateError> {
        let build_number = self.resolver.resolve(
            date,
            &self.config.project_path,
            self.config.override_commit_count,
        );
        tracing::debug!(
            counter = self.resolver.counter_name(),
            build = build_number.value,
            source = ?build_number.source,
            "Resolved build number"
        );
        self.report_build_number(&build_number);

        let version = version::assemble(&self.config.release_type, date, build_number.value)?;
        Ok((version, build_number))
    }

    /// Run the full pipeline for the invocation instant `now`.
    pub fn generate(&self, now: DateTime<Local>) -> Result<GenerationReport, GenerateError> {
        let date = now.date_naive();
        let (version, build_number) = self.version_for(date)?;

        if !self.config.silent {
            tracing::info!(version = %version, build = build_number.value, "Generated version");
        }

        let manifest = if self.config.manifest.update {
            self.update_manifest(&version)
        } else {
            WriteOutcome::Skipped
        };

        let artifact = if self.config.artifact.enabled {
            self.write_artifact(&version, now.with_timezone(&Utc))
        } else {
            WriteOutcome::Skipped
        };

        Ok(GenerationReport {
            version,
            date,
            build_number,
            manifest,
            artifact,
        })
    }

    fn report_build_number(&self, build_number: &BuildNumber) {
        if self.config.silent {
            return;
        }
        match build_number.source {
            BuildNumberSource::Override => tracing::warn!(
                build = build_number.value,
                "Using override commit count, git history was not queried"
            ),
            BuildNumberSource::Unavailable => {
                tracing::warn!("Git history unavailable, build number defaults to 0")
            }
            BuildNumberSource::History => {}
        }
    }

    fn update_manifest(&self, version: &VersionString) -> WriteOutcome {
        let path = self.config.manifest_path();
        match manifest::update_version(&path, version) {
            Ok(previous) => {
                if !self.config.silent {
                    tracing::info!(
                        path = %path.display(),
                        previous = previous.as_deref().unwrap_or("<none>"),
                        "Updated manifest"
                    );
                }
                WriteOutcome::Written
            }
            Err(e) => {
                if !self.config.silent {
                    tracing::warn!(path = %path.display(), error = %e, "Manifest not updated");
                }
                WriteOutcome::Failed(e.to_string())
            }
        }
    }

    fn write_artifact(&self, version: &VersionString, built_at: DateTime<Utc>) -> WriteOutcome {
        let path = self.config.artifact_path();
        let metadata = BuildMetadata::new(version.clone(), built_at);
        match artifact::write(&path, &metadata) {
            Ok(()) => {
                if !self.config.silent {
                    tracing::info!(path = %path.display(), "Wrote build artifact");
                }
                WriteOutcome::Written
            }
            Err(e) => {
                if !self.config.silent {
                    tracing::warn!(error = %e, "Build artifact not written");
                }
                WriteOutcome::Failed(e.to_string())
            }
        }
    }
}
