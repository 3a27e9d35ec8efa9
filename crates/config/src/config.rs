use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the mix executable for the current platform.
pub const DEFAULT_MIX_COMMAND: &str = if cfg!(windows) { "mix.bat" } else { "mix" };

/// Credo's own configuration file name.
pub const DEFAULT_CONFIGURATION_FILE: &str = ".credo.exs";

/// Server configuration.
///
/// Field names are camelCase on the wire so the same shape works for editor
/// settings (`elixir.credo.*`) and for `.credo-ls.toml` / `.credo-ls.json`.
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredoConfig {
    /// The mix executable, either a bare name looked up on `PATH` or a path.
    pub mix_command: String,
    /// Extra directory appended to `PATH` for the credo process and searched
    /// for the mix executable.
    #[serde(alias = "executePath", skip_serializing_if = "Option::is_none")]
    pub mix_binary_path: Option<PathBuf>,
    /// Credo config file, absolute or relative to the project folder.
    pub configuration_file: String,
    /// Named configuration inside the Credo config file (`--config-name`).
    pub credo_configuration: String,
    pub strict_mode: bool,
    /// Only run checks with these tags. Takes precedence over
    /// `checks_without_tag`.
    pub checks_with_tag: Vec<String>,
    pub checks_without_tag: Vec<String>,
    /// Do not log or show warnings Credo prints on stderr.
    pub ignore_warning_messages: bool,
    /// Lint every Elixir file, skipping the `credo info` file-list check.
    pub lint_everything: bool,
    pub enable_debug: bool,
    pub diff_mode: DiffMode,
    /// Report `refactor` issues as hints instead of information.
    pub refactor_as_hint: bool,
}

/// Only report issues introduced since a git merge base (`credo diff`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffMode {
    pub enabled: bool,
    pub merge_base: String,
}

impl Default for DiffMode {
    fn default() -> Self {
        Self {
            enabled: false,
            merge_base: "HEAD".to_string(),
        }
    }
}

impl Default for CredoConfig {
    fn default() -> Self {
        Self {
            mix_command: DEFAULT_MIX_COMMAND.to_string(),
            mix_binary_path: None,
            configuration_file: DEFAULT_CONFIGURATION_FILE.to_string(),
            credo_configuration: "default".to_string(),
            strict_mode: false,
            checks_with_tag: Vec::new(),
            checks_without_tag: Vec::new(),
            ignore_warning_messages: false,
            lint_everything: false,
            enable_debug: false,
            diff_mode: DiffMode::default(),
            refactor_as_hint: false,
        }
    }
}

impl CredoConfig {
    /// Read the configuration out of editor settings.
    ///
    /// Accepts the settings object sent with `workspace/didChangeConfiguration`
    /// (`{"elixir": {"credo": {...}}}` or `{"credo": {...}}`) as well as the
    /// bare configuration object clients put in `initializationOptions`.
    /// `null` yields the defaults.
    pub fn from_settings(settings: &serde_json::Value) -> Result<Self> {
        let section = settings
            .pointer("/elixir/credo")
            .or_else(|| settings.get("credo"))
            .unwrap_or(settings);

        if section.is_null() {
            return Ok(Self::default());
        }

        let config: Self = serde_json::from_value(section.clone())
            .map_err(|e| ConfigError::Settings(e.to_string()))?;
        config.validate().map_err(ConfigError::Settings)?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.mix_command.trim().is_empty() {
            return Err("mixCommand must not be empty".to_string());
        }
        if self.diff_mode.enabled && self.diff_mode.merge_base.trim().is_empty() {
            return Err("diffMode.mergeBase must not be empty when diff mode is enabled".to_string());
        }
        if let Some(tag) = self
            .checks_with_tag
            .iter()
            .chain(&self.checks_without_tag)
            .find(|tag| tag.trim().is_empty())
        {
            return Err(format!("check tags must not be empty (got {tag:?})"));
        }
        if !self.checks_with_tag.is_empty() && !self.checks_without_tag.is_empty() {
            tracing::warn!("Both checksWithTag and checksWithoutTag are set; checksWithoutTag is ignored");
        }
        Ok(())
    }

    /// Default `RUST_LOG`-style filter for the server.
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        if self.enable_debug {
            "debug"
        } else {
            "info"
        }
    }
}
