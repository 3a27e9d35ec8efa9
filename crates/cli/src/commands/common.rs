//! Shared setup for commands that run Credo.

use anyhow::{Context, Result};
use colored::Colorize;
use credo_config::{find_config, load_config, CredoConfig};
use std::path::{Path, PathBuf};

/// Load the configuration for a command.
///
/// An explicit `--config` path must exist. Without one, `.credo-ls.toml` or
/// `.credo-ls.json` is looked up from `start_dir` upward; when none exists
/// the defaults are used.
pub fn load_command_config(config_path: Option<&Path>, start_dir: &Path) -> Result<CredoConfig> {
    let path: Option<PathBuf> = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(start_dir)?,
    };

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Using config file");
            load_config(&path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => {
            tracing::debug!("No config file found, using defaults");
            Ok(CredoConfig::default())
        }
    }
}

pub fn print_error(message: impl std::fmt::Display) {
    eprintln!("{} {message}", "error:".red().bold());
}

pub fn print_warning(message: impl std::fmt::Display) {
    eprintln!("{} {message}", "warning:".yellow().bold());
}
