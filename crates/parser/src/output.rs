//! Output models for the Credo commands and JSON recovery from raw output.

use crate::{Issue, OutputError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Output of `mix credo suggest --format json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CredoOutput {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// Issues grouped by how they relate to the merge base.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiffIssues {
    #[serde(default)]
    pub new: Vec<Issue>,
    #[serde(default)]
    pub fixed: Vec<Issue>,
    #[serde(default)]
    pub old: Vec<Issue>,
}

/// Output of `mix credo diff --format json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CredoDiffOutput {
    pub diff: DiffIssues,
}

/// Either kind of lint output.
#[derive(Debug, Clone, PartialEq)]
pub enum LintOutput {
    Suggest(CredoOutput),
    Diff(CredoDiffOutput),
}

impl LintOutput {
    /// The issues to show: everything from `suggest`, only new ones from `diff`.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Suggest(output) => &output.issues,
            Self::Diff(output) => &output.diff.new,
        }
    }
}

impl From<CredoOutput> for LintOutput {
    fn from(output: CredoOutput) -> Self {
        Self::Suggest(output)
    }
}

impl From<CredoDiffOutput> for LintOutput {
    fn from(output: CredoDiffOutput) -> Self {
        Self::Diff(output)
    }
}

/// The `config` section of `mix credo info --verbose`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InfoConfig {
    #[serde(default)]
    pub checks: Vec<serde_json::Value>,
    /// Files Credo would analyze, relative to the project folder, `/`-separated.
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub credo: String,
    #[serde(default)]
    pub elixir: String,
    #[serde(default)]
    pub erlang: String,
}

/// Output of `mix credo info --format json --verbose`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CredoInfo {
    pub config: InfoConfig,
    #[serde(default)]
    pub system: SystemInfo,
}

impl CredoInfo {
    /// Whether Credo's file list contains `relative_path`.
    ///
    /// Credo prints paths with `/`; `relative_path` may use the platform
    /// separator.
    #[must_use]
    pub fn includes_file(&self, relative_path: &str) -> bool {
        let wanted = relative_path.replace(std::path::MAIN_SEPARATOR, "/");
        self.config.files.iter().any(|file| *file == wanted)
    }
}

/// Recover and decode the JSON payload from raw command output.
///
/// Everything outside the first `{` and the last `}` is ignored, which skips
/// compiler warnings printed before the payload.
///
/// Returns `Ok(None)` when decoding fails but the output mentions `SIGTERM`:
/// that is what a process killed mid-write leaves behind, not a real error.
///
/// # Errors
///
/// [`OutputError::Empty`] for empty output and [`OutputError::Malformed`]
/// when no JSON can be decoded.
pub fn parse_output<T: DeserializeOwned>(raw: &str) -> Result<Option<T>> {
    if raw.is_empty() {
        return Err(OutputError::Empty);
    }

    let decoded = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => {
            serde_json::from_str::<T>(&raw[start..=end]).map_err(|e| e.to_string())
        }
        _ => Err("no JSON object in output".to_string()),
    };

    match decoded {
        Ok(value) => Ok(Some(value)),
        Err(reason) => {
            if raw.contains("SIGTERM") {
                tracing::debug!("Ignoring unparsable output of a terminated process");
                return Ok(None);
            }
            tracing::debug!(%reason, "Could not decode command output");
            Err(OutputError::Malformed {
                output: collapse_whitespace(raw),
            })
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
