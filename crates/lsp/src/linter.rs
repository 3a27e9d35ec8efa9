//! One lint run: `credo info` to check the file is included, then
//! `credo suggest` (or `credo diff`) with the document text on stdin.

use crate::args::{diff_args, info_args, suggest_args};
use crate::process::{command_env, locate_mix, CommandRunner, CommandSpec, ProcessOutput};
use crate::project::ProjectLayout;
use crate::{LintError, Result};
use credo_config::CredoConfig;
use credo_parser::{parse_output, CredoDiffOutput, CredoInfo, CredoOutput, LintOutput};
use credo_types::Document;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A document resolved to a file inside a project.
#[derive(Debug, Clone)]
pub struct LintTarget {
    pub document: Document,
    pub file: PathBuf,
    pub layout: ProjectLayout,
}

impl LintTarget {
    /// Fails with [`LintError::NotAFile`] when the document is not a file on
    /// disk.
    pub fn new(document: Document, workspace: Option<&Path>) -> Result<Self> {
        let file = document.uri.to_file_path().ok_or(LintError::NotAFile)?;
        let layout = ProjectLayout::discover(&file, workspace);
        Ok(Self {
            document,
            file,
            layout,
        })
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    /// `None` when Credo's configuration excludes the file.
    pub output: Option<LintOutput>,
    /// Messages worth showing the user (stderr output, config file lookup).
    pub warnings: Vec<String>,
}

/// Runs Credo for documents with one configuration snapshot.
pub struct Linter<R> {
    runner: Arc<R>,
    config: Arc<CredoConfig>,
    program: PathBuf,
    env: Vec<(OsString, OsString)>,
}

impl<R> Clone for Linter<R> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
            config: Arc::clone(&self.config),
            program: self.program.clone(),
            env: self.env.clone(),
        }
    }
}

impl<R: CommandRunner> Linter<R> {
    pub fn new(runner: Arc<R>, config: Arc<CredoConfig>) -> Self {
        let path_var = std::env::var_os("PATH");
        Self {
            program: locate_mix(&config, path_var.as_deref()),
            env: command_env(&config, path_var.as_deref()),
            runner,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &CredoConfig {
        &self.config
    }

    /// Lint one document.
    #[tracing::instrument(skip_all, fields(uri = %target.document.uri))]
    pub async fn run(&self, target: &LintTarget) -> Result<LintReport> {
        let mut report = LintReport::default();

        if !self.config.lint_everything {
            let info = self.info(&target.layout, &mut report.warnings).await?;
            let included = target
                .layout
                .relative_path(&target.file)
                .is_some_and(|relative| info.includes_file(&relative.to_string_lossy()));
            if !included {
                tracing::debug!("File is not included in the Credo configuration");
                return Ok(report);
            }
        }

        let output = if self.config.diff_mode.enabled {
            self.diff(target, &mut report.warnings).await?.into()
        } else {
            self.suggest(target, &mut report.warnings).await?.into()
        };
        report.output = Some(output);
        Ok(report)
    }

    /// `credo info` for the project.
    pub async fn info(&self, layout: &ProjectLayout, warnings: &mut Vec<String>) -> Result<CredoInfo> {
        let stdout = self.mix(info_args(), &layout.folder, None, warnings).await?;
        self.decode(&stdout)
    }

    pub async fn suggest(&self, target: &LintTarget, warnings: &mut Vec<String>) -> Result<CredoOutput> {
        let config_file = self.config_file(&target.layout, warnings);
        let args = suggest_args(&self.config, config_file.as_deref());
        let stdout = self
            .mix(args, &target.layout.folder, Some(&target.document), warnings)
            .await?;
        self.decode(&stdout)
    }

    pub async fn diff(&self, target: &LintTarget, warnings: &mut Vec<String>) -> Result<CredoDiffOutput> {
        let config_file = self.config_file(&target.layout, warnings);
        let args = diff_args(&self.config, config_file.as_deref());
        let stdout = self
            .mix(args, &target.layout.folder, Some(&target.document), warnings)
            .await?;
        self.decode(&stdout)
    }

    fn config_file(&self, layout: &ProjectLayout, warnings: &mut Vec<String>) -> Option<PathBuf> {
        let lookup = layout.credo_config_file(&self.config.configuration_file);
        if let Some(warning) = lookup.warning {
            tracing::warn!("{warning}");
            warnings.push(warning);
        }
        lookup.path
    }

    async fn mix(
        &self,
        args: Vec<String>,
        cwd: &Path,
        document: Option<&Document>,
        warnings: &mut Vec<String>,
    ) -> Result<String> {
        let command = CommandSpec {
            program: self.program.clone(),
            args,
            cwd: cwd.to_path_buf(),
            env: self.env.clone(),
            stdin: document.map(|doc| Arc::clone(&doc.text)),
        };
        tracing::debug!(command = %command, cwd = %cwd.display(), "Executing command");

        let output = self.runner.run(command).await?;
        self.check(output, warnings)
    }

    /// Classify the exit status; stderr alone is only a warning.
    fn check(&self, output: ProcessOutput, warnings: &mut Vec<String>) -> Result<String> {
        match output.status {
            None => Err(LintError::Terminated),
            Some(code @ (126 | 127)) => Err(LintError::CommandFailed {
                code,
                stderr: output.stderr.trim().to_string(),
            }),
            Some(_) => {
                let stderr = output.stderr.trim();
                if !stderr.is_empty() {
                    tracing::warn!(stderr, "Command wrote to stderr");
                    if !self.config.ignore_warning_messages {
                        warnings.push(format!("Warning: \"{stderr}\""));
                    }
                }
                Ok(output.stdout)
            }
        }
    }

    fn decode<T: DeserializeOwned>(&self, stdout: &str) -> Result<T> {
        parse_output(stdout)
            .map_err(|e| LintError::from_output(e, &self.config.mix_command))?
            .ok_or(LintError::Discarded)
    }
}
