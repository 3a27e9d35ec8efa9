//! Locating the Mix project a document belongs to.

use std::path::{Path, PathBuf};

const MIX_FILE: &str = "mix.exs";

/// Directory containing `name`, searching upward from `start`.
///
/// The search stops after checking `stop_at` when given, otherwise at the
/// filesystem root.
#[must_use]
pub fn find_up(name: &str, start: &Path, stop_at: Option<&Path>) -> Option<PathBuf> {
    for dir in start.ancestors() {
        if dir.join(name).exists() {
            return Some(dir.to_path_buf());
        }
        if stop_at == Some(dir) {
            break;
        }
    }
    None
}

/// The workspace folder that contains `file`; the deepest one wins.
#[must_use]
pub fn workspace_for<'a>(file: &Path, workspace_folders: &'a [PathBuf]) -> Option<&'a Path> {
    workspace_folders
        .iter()
        .filter(|folder| file.starts_with(folder))
        .max_by_key(|folder| folder.components().count())
        .map(PathBuf::as_path)
}

/// Where a document lives relative to its Mix project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Working directory for credo: the nearest folder with a `mix.exs`,
    /// else the workspace folder, else the document's folder.
    pub folder: PathBuf,
    /// Whether a `mix.exs` was found.
    pub is_mix_project: bool,
}

impl ProjectLayout {
    #[tracing::instrument(level = "trace", fields(file = %file.display()))]
    #[must_use]
    pub fn discover(file: &Path, workspace: Option<&Path>) -> Self {
        let document_dir = file.parent().unwrap_or(file);

        if let Some(folder) = find_up(MIX_FILE, document_dir, workspace) {
            return Self {
                folder,
                is_mix_project: true,
            };
        }

        Self {
            folder: workspace.unwrap_or(document_dir).to_path_buf(),
            is_mix_project: false,
        }
    }

    /// Root of the umbrella project when the folder is one of its apps,
    /// i.e. `../..` has both an `apps` folder and a `mix.exs`.
    #[must_use]
    pub fn umbrella_root(&self) -> Option<PathBuf> {
        let root = self.folder.parent()?.parent()?;
        (root.join("apps").is_dir() && root.join(MIX_FILE).is_file()).then(|| root.to_path_buf())
    }

    /// Path of `file` relative to the project folder.
    #[must_use]
    pub fn relative_path(&self, file: &Path) -> Option<PathBuf> {
        file.strip_prefix(&self.folder).ok().map(Path::to_path_buf)
    }

    /// Find the Credo config file to pass as `--config-file`.
    ///
    /// An absolute `configured` path that exists is used as-is. Otherwise
    /// the project folder, its `config/` folder, and the umbrella root's
    /// equivalents are searched.
    #[must_use]
    pub fn credo_config_file(&self, configured: &str) -> ConfigFileLookup {
        let configured_path = Path::new(configured);
        if configured_path.is_absolute() && configured_path.exists() {
            return ConfigFileLookup {
                path: Some(configured_path.to_path_buf()),
                warning: None,
            };
        }

        let mut candidates = vec![
            self.folder.join(configured),
            self.folder.join("config").join(configured),
        ];
        if let Some(umbrella) = self.umbrella_root() {
            candidates.push(umbrella.join(configured));
            candidates.push(umbrella.join("config").join(configured));
        }

        let found: Vec<PathBuf> = candidates.into_iter().filter(|path| path.exists()).collect();

        let Some(first) = found.first() else {
            return ConfigFileLookup {
                path: None,
                warning: Some(format!("{configured} file does not exist. Ignoring...")),
            };
        };

        let warning = (found.len() > 1).then(|| {
            let all = found
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("Found multiple files ({all}). I will use {}", first.display())
        });

        let path = first
            .strip_prefix(&self.folder)
            .map_or_else(|_| first.clone(), Path::to_path_buf);

        ConfigFileLookup {
            path: Some(path),
            warning,
        }
    }
}

/// Result of [`ProjectLayout::credo_config_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFileLookup {
    /// Relative to the project folder when inside it, absolute otherwise.
    pub path: Option<PathBuf>,
    /// Something the user should know about: no file, or several.
    pub warning: Option<String>,
}
