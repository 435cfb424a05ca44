//! Temporary project directories.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A throwaway project directory with an optional `package.json`.
///
/// The directory is deleted when this value is dropped, even on panic.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// An empty project directory.
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// A project whose `package.json` holds `content` verbatim.
    pub fn with_manifest(content: &str) -> Self {
        let project = Self::empty();
        project.write("package.json", content);
        project
    }

    /// The project root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `package.json`.
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.path().join("package.json")
    }

    /// Write a file relative to the project root.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(path, content).expect("failed to write test file");
    }

    /// Read a file relative to the project root.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(relative)).expect("failed to read test file")
    }

    /// Whether a file exists relative to the project root.
    pub fn exists(&self, relative: &str) -> bool {
        self.dir.path().join(relative).exists()
    }
}
