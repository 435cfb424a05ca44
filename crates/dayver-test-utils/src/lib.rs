#![deny(unsafe_code)]

//! Shared test utilities for the dayver workspace.
//!
//! Provides fake commit counters, config builders, temporary project
//! directories and tracing helpers so that individual crate tests stay
//! concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! dayver-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod counter;
pub mod project;
pub mod tracing_setup;

pub use config::TestConfigBuilder;
pub use counter::FakeCommitCounter;
pub use project::TestProject;
