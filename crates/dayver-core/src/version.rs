//! Version assembly.
//!
//! Turns a release type, a calendar date and a build number into a version
//! string of one of two shapes:
//!
//! ```text
//! YY.MM.DD.N           clean / release build (empty release type)
//! YY.MM.DD-type.N      typed build ("dev", "beta", ...)
//! ```
//!
//! Assembly is a pure function of its inputs: the same request always
//! yields the same [`VersionString`].

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Errors from version assembly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("release type must not contain whitespace: {0:?}")]
    InvalidReleaseType(String),

    #[error("year {0} cannot be rendered as a two-digit version component")]
    DateOutOfRange(i32),
}

/// An assembled version string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionString(String);

impl VersionString {
    /// Borrow the version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the value, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// The version without its release type and build number segment.
    ///
    /// See [`display_version`].
    pub fn display_form(&self) -> &str {
        display_version(&self.0)
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VersionString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Inputs to version assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRequest {
    /// Release type label; empty (or all whitespace) selects the clean format.
    pub release_type: String,
    /// Calendar date the version is stamped with.
    pub date: NaiveDate,
    /// Resolved build number.
    pub build_number: u64,
}

impl VersionRequest {
    /// Create a new request.
    pub fn new(release_type: impl Into<String>, date: NaiveDate, build_number: u64) -> Self {
        Self {
            release_type: release_type.into(),
            date,
            build_number,
        }
    }

    /// Assemble the version string for this request.
    pub fn assemble(&self) -> Result<VersionString, VersionError> {
        assemble(&self.release_type, self.date, self.build_number)
    }
}

/// Check that a release type can be embedded in a version string.
///
/// Leading and trailing whitespace is ignored; anything left must be free
/// of whitespace.
pub fn validate_release_type(release_type: &str) -> Result<(), VersionError> {
    if release_type.trim().chars().any(char::is_whitespace) {
        return Err(VersionError::InvalidReleaseType(release_type.to_string()));
    }
    Ok(())
}

/// Assemble a version string from its parts.
///
/// The year is reduced to its last two decimal digits, month and day are
/// zero-padded, and the build number is rendered without padding.
pub fn assemble(
    release_type: &str,
    date: NaiveDate,
    build_number: u64,
) -> Result<VersionString, VersionError> {
    validate_release_type(release_type)?;

    let year = date.year();
    if year < 0 {
        return Err(VersionError::DateOutOfRange(year));
    }
    let date_block = format!("{:02}.{:02}.{:02}", year % 100, date.month(), date.day());

    let release_type = release_type.trim();
    let version = if release_type.is_empty() {
        format!("{date_block}.{build_number}")
    } else {
        format!("{date_block}-{release_type}.{build_number}")
    };

    Ok(VersionString(version))
}

/// Display form of a version: everything before the first hyphen.
///
/// A version without a hyphen is returned unchanged.
pub fn display_version(version: &str) -> &str {
    version.split_once('-').map_or(version, |(head, _)| head)
}
