//! Fake [`CommitCounter`] implementations.
//!
//! Tests drive the build number resolver through these instead of running
//! git against a real repository.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use dayver_core::{CommitCountError, CommitCounter};

/// A single recorded `count_commits` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountCall {
    pub date: NaiveDate,
    pub dir: PathBuf,
}

/// Scripted commit counter that records every query it receives.
///
/// Clones share the call log, so a test can keep one handle while the
/// generator owns another.
#[derive(Debug, Clone)]
pub struct FakeCommitCounter {
    result: Result<u64, String>,
    calls: Arc<Mutex<Vec<CountCall>>>,
}

impl FakeCommitCounter {
    /// A counter that always reports `count` commits.
    pub fn returning(count: u64) -> Self {
        Self {
            result: Ok(count),
            calls: Arc::default(),
        }
    }

    /// A counter that always fails, as git does outside a repository.
    pub fn failing() -> Self {
        Self {
            result: Err("fatal: not a git repository".to_string()),
            calls: Arc::default(),
        }
    }

    /// Queries received so far.
    pub fn calls(&self) -> Vec<CountCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of queries received so far.
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Boxed clone, ready to hand to a resolver or generator.
    pub fn boxed(&self) -> Box<dyn CommitCounter> {
        Box::new(self.clone())
    }
}

impl CommitCounter for FakeCommitCounter {
    fn name(&self) -> &str {
        "fake"
    }

    fn count_commits(&self, date: NaiveDate, dir: &Path) -> Result<u64, CommitCountError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(CountCall {
                date,
                dir: dir.to_path_buf(),
            });
        }
        self.result
            .clone()
            .map_err(|stderr| CommitCountError::Exit {
                status: "exit status: 128".to_string(),
                stderr,
            })
    }
}
