use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A Mix project in a temporary directory, removed on drop.
///
/// ```ignore
/// let project = MixProject::new().with_file("lib/sample.ex", SAMPLE_SOURCE);
/// let path = project.path("lib/sample.ex");
/// ```
pub struct MixProject {
    dir: TempDir,
}

impl MixProject {
    /// Create a project containing only `mix.exs`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let project = Self { dir };
        project.write("mix.exs", "defmodule Sample.MixProject do\nend\n");
        project
    }

    /// Create an umbrella project: root `mix.exs` and `apps/<app>/mix.exs`.
    #[must_use]
    pub fn umbrella(app: &str) -> Self {
        let project = Self::new();
        project.write(&format!("apps/{app}/mix.exs"), "defmodule App.MixProject do\nend\n");
        project
    }

    #[must_use]
    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        self.write(relative, contents);
        self
    }

    /// Write a file relative to the project root, creating parent folders.
    ///
    /// # Panics
    ///
    /// Panics on I/O errors.
    #[allow(clippy::expect_used)]
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create directory");
        }
        std::fs::write(path, contents).expect("failed to write file");
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

impl Default for MixProject {
    fn default() -> Self {
        Self::new()
    }
}
