//! Build number resolution from git history.
//!
//! The build number is the count of commits made on the target day and
//! reachable from `HEAD`, or a caller-supplied override. Resolution never
//! fails: when history cannot be queried the build number is `0`.
//!
//! The history query sits behind the [`CommitCounter`] trait so the
//! resolver can be driven by a fake in tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::NaiveDate;

/// Errors from a commit-count query.
#[derive(Debug, thiserror::Error)]
pub enum CommitCountError {
    #[error("failed to run {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("unparsable commit count output: {0:?}")]
    Parse(String),
}

/// Counts commits made on a calendar day.
pub trait CommitCounter: Send + Sync {
    /// Human-readable name of this counter (used in logs).
    fn name(&self) -> &str;

    /// Count commits reachable from `HEAD` of the repository at `dir` whose
    /// timestamps fall within `date` 00:00:00 ..= 23:59:59.
    fn count_commits(&self, date: NaiveDate, dir: &Path) -> Result<u64, CommitCountError>;
}

/// [`CommitCounter`] backed by the `git` CLI.
///
/// Runs `git rev-list --count` with a day-long `--since`/`--until` window.
/// Read-only: never touches the index, refs or working tree.
#[derive(Debug, Clone)]
pub struct GitCommitCounter {
    git_bin: PathBuf,
}

impl GitCommitCounter {
    /// Create a counter that invokes the given git binary.
    pub fn new(git_bin: impl Into<PathBuf>) -> Self {
        Self {
            git_bin: git_bin.into(),
        }
    }

    /// Whether the git binary is on PATH and responsive.
    pub fn available(&self) -> bool {
        Command::new(&self.git_bin)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    /// Build the `git rev-list` argument list for a day.
    fn build_args(date: NaiveDate) -> Vec<String> {
        let day = date.format("%Y-%m-%d");
        vec![
            "rev-list".to_string(),
            "--count".to_string(),
            format!("--since={day} 00:00:00"),
            format!("--until={day} 23:59:59"),
            "HEAD".to_string(),
        ]
    }
}

impl Default for GitCommitCounter {
    fn default() -> Self {
        Self::new("git")
    }
}

impl CommitCounter for GitCommitCounter {
    fn name(&self) -> &str {
        "git"
    }

    fn count_commits(&self, date: NaiveDate, dir: &Path) -> Result<u64, CommitCountError> {
        let args = Self::build_args(date);
        tracing::trace!(dir = %dir.display(), args = ?args, "Querying git history");

        let output = Command::new(&self.git_bin)
            .args(&args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CommitCountError::Spawn {
                bin: self.git_bin.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(CommitCountError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_count(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse `rev-list --count` output. Empty output counts as zero.
fn parse_count(stdout: &str) -> Result<u64, CommitCountError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| CommitCountError::Parse(trimmed.to_string()))
}

/// Where a resolved build number came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildNumberSource {
    /// Supplied by the caller; history was not queried.
    Override,
    /// Counted from git history.
    History,
    /// History could not be queried; the value is the `0` fallback.
    Unavailable,
}

/// A resolved build number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildNumber {
    /// The number used as the final version component.
    pub value: u64,
    /// How the value was obtained.
    pub source: BuildNumberSource,
}

impl BuildNumber {
    /// Whether a caller override was used. Callers surface a warning for
    /// this unless running silent.
    pub fn override_used(&self) -> bool {
        self.source == BuildNumberSource::Override
    }
}

/// Resolve the build number for `date` in the repository at `dir`.
///
/// An override is returned unchanged without invoking the counter. Any
/// counter failure resolves to `0`.
pub fn resolve_build_number(
    counter: &dyn CommitCounter,
    date: NaiveDate,
    dir: &Path,
    override_count: Option<u64>,
) -> BuildNumber {
    if let Some(value) = override_count {
        return BuildNumber {
            value,
            source: BuildNumberSource::Override,
        };
    }

    match counter.count_commits(date, dir) {
        Ok(value) => {
            tracing::debug!(counter = counter.name(), %date, value, "Counted commits");
            BuildNumber {
                value,
                source: BuildNumberSource::History,
            }
        }
        Err(e) => {
            tracing::debug!(
                counter = counter.name(),
                %date,
                error = %e,
                "Commit history unavailable, using build number 0"
            );
            BuildNumber {
                value: 0,
                source: BuildNumberSource::Unavailable,
            }
        }
    }
}

/// Resolver owning its [`CommitCounter`].
///
/// Results are never cached: each call queries the counter again unless an
/// override is supplied.
pub struct BuildNumberResolver {
    counter: Box<dyn CommitCounter>,
}

impl BuildNumberResolver {
    /// Create a resolver around the given counter.
    pub fn new(counter: Box<dyn CommitCounter>) -> Self {
        Self { counter }
    }

    /// The counter's name.
    pub fn counter_name(&self) -> &str {
        self.counter.name()
    }

    /// Resolve the build number. See [`resolve_build_number`].
    pub fn resolve(&self, date: NaiveDate, dir: &Path, override_count: Option<u64>) -> BuildNumber {
        resolve_build_number(self.counter.as_ref(), date, dir, override_count)
    }
}

impl Default for BuildNumberResolver {
    fn default() -> Self {
        Self::new(Box::new(GitCommitCounter::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    struct CountingFake {
        result: Option<u64>,
        calls: Arc<AtomicUsize>,
    }

    impl CommitCounter for CountingFake {
        fn name(&self) -> &str {
            "fake"
        }

        fn count_commits(&self, _date: NaiveDate, _dir: &Path) -> Result<u64, CommitCountError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .ok_or_else(|| CommitCountError::Parse("fatal: not a git repository".to_string()))
        }
    }

    fn fake(result: Option<u64>) -> (CountingFake, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            CountingFake {
                result,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 26).unwrap()
    }

    #[test]
    fn test_override_skips_counter() {
        let (counter, calls) = fake(Some(99));
        let bn = resolve_build_number(&counter, day(), Path::new("."), Some(10));
        assert_eq!(bn.value, 10);
        assert!(bn.override_used());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_override_is_still_an_override() {
        let (counter, calls) = fake(Some(5));
        let bn = resolve_build_number(&counter, day(), Path::new("."), Some(0));
        assert_eq!(bn.value, 0);
        assert_eq!(bn.source, BuildNumberSource::Override);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_history_count() {
        let (counter, _) = fake(Some(4));
        let bn = resolve_build_number(&counter, day(), Path::new("."), None);
        assert_eq!(
            bn,
            BuildNumber {
                value: 4,
                source: BuildNumberSource::History
            }
        );
        assert!(!bn.override_used());
    }

    #[test]
    fn test_counter_failure_falls_back_to_zero() {
        let (counter, _) = fake(None);
        let bn = resolve_build_number(&counter, day(), Path::new("."), None);
        assert_eq!(bn.value, 0);
        assert_eq!(bn.source, BuildNumberSource::Unavailable);
    }

    #[test]
    fn test_resolver_queries_every_call() {
        let (counter, calls) = fake(Some(2));
        let resolver = BuildNumberResolver::new(Box::new(counter));
        resolver.resolve(day(), Path::new("."), None);
        resolver.resolve(day(), Path::new("."), None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.counter_name(), "fake");
    }

    #[test]
    fn test_git_args_cover_whole_day() {
        let args = GitCommitCounter::build_args(day());
        assert_eq!(
            args,
            vec![
                "rev-list",
                "--count",
                "--since=2025-12-26 00:00:00",
                "--until=2025-12-26 23:59:59",
                "HEAD",
            ]
        );
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12\n").unwrap(), 12);
        assert_eq!(parse_count("  \n").unwrap(), 0);
        assert!(matches!(parse_count("twelve"), Err(CommitCountError::Parse(_))));
        assert!(parse_count("-1").is_err());
    }

    #[test]
    fn test_missing_git_binary_is_a_spawn_error() {
        let counter = GitCommitCounter::new("/nonexistent/bin/git-does-not-exist");
        assert!(!counter.available());
        let err = counter.count_commits(day(), Path::new(".")).unwrap_err();
        assert!(matches!(err, CommitCountError::Spawn { .. }));
    }

    #[test]
    fn test_missing_git_binary_resolves_to_zero() {
        let counter = GitCommitCounter::new("/nonexistent/bin/git-does-not-exist");
        let bn = resolve_build_number(&counter, day(), Path::new("."), None);
        assert_eq!(bn.value, 0);
        assert_eq!(bn.source, BuildNumberSource::Unavailable);
    }

    #[test]
    fn test_outside_repository_resolves_to_zero() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bn = resolve_build_number(&GitCommitCounter::default(), day(), tmp.path(), None);
        assert_eq!(bn.value, 0);
    }
}
