//! Build-time metadata embedded by the build script.
//!
//! Identifies the dayver binary itself (not the project it versions) in
//! `--version` output and debug logs.

/// The git commit hash at build time (short form).
pub const GIT_HASH: &str = env!("DAYVER_GIT_HASH");

/// The build profile (`debug` or `release`).
pub const BUILD_PROFILE: &str = env!("DAYVER_BUILD_PROFILE");

/// The crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version string including git hash and profile, for `--version`.
///
/// Example: `"0.1.0 (abc1234, debug)"`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("DAYVER_GIT_HASH"),
    ", ",
    env!("DAYVER_BUILD_PROFILE"),
    ")"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_version_contains_parts() {
        assert!(LONG_VERSION.starts_with(VERSION));
        assert!(LONG_VERSION.contains(GIT_HASH));
        assert!(LONG_VERSION.ends_with(&format!("{BUILD_PROFILE})")));
    }

    #[test]
    fn test_git_hash_not_empty() {
        assert!(!GIT_HASH.is_empty());
    }

    #[test]
    fn test_build_profile() {
        assert!(
            ["debug", "release"].contains(&BUILD_PROFILE),
            "unexpected build profile {BUILD_PROFILE:?}"
        );
    }
}
