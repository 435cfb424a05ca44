#![deny(unsafe_code)]

//! dayver core: date-and-commit derived versions.
//!
//! Versions have the shape `YY.MM.DD-type.N` (or `YY.MM.DD.N` for a clean
//! release), where `N` is the number of commits made on that day. The
//! version can be written into a JSON manifest and rendered into a
//! generated build metadata module.

/// Generated build metadata module.
pub mod artifact;
/// Compile-time build metadata (version, git hash, profile).
pub mod build_info;
/// Build number resolution from git history.
pub mod build_number;
/// Resolve, assemble and write pipeline.
pub mod generator;
/// Console logging setup and event capture.
pub mod logging;
/// JSON manifest version updates.
pub mod manifest;
/// Version string assembly.
pub mod version;

pub use build_number::{
    BuildNumber, BuildNumberResolver, BuildNumberSource, CommitCountError, CommitCounter,
    GitCommitCounter,
};
pub use generator::{GenerateError, GenerationReport, VersionGenerator, WriteOutcome};
pub use version::{VersionError, VersionRequest, VersionString, assemble, display_version};
