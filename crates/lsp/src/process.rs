//! Running external commands.
//!
//! The linter only talks to [`CommandRunner`]; [`TokioCommandRunner`] is the
//! real implementation and tests substitute their own. Cancelling a run means
//! dropping its future: the tokio child is spawned with `kill_on_drop`.

use crate::ExecError;
use credo_config::CredoConfig;
use std::ffi::{OsStr, OsString};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// A fully resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Variables set on top of the inherited environment.
    pub env: Vec<(OsString, OsString)>,
    /// Written to the child's stdin, which is then closed.
    pub stdin: Option<Arc<str>>,
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// What a finished process left behind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub trait CommandRunner: Send + Sync + 'static {
    fn run(
        &self,
        command: CommandSpec,
    ) -> impl Future<Output = Result<ProcessOutput, ExecError>> + Send;
}

/// Spawns real processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    #[tracing::instrument(skip_all, fields(command = %command, cwd = %command.cwd.display()))]
    async fn run(&self, command: CommandSpec) -> Result<ProcessOutput, ExecError> {
        let program = command.program.display().to_string();
        tracing::debug!("Spawning process");

        let mut child = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .envs(command.env.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str())))
            .stdin(if command.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecError::from_spawn(&program, e))?;

        let stdin = child.stdin.take();
        let input = command.stdin;
        let write_input = async move {
            if let (Some(mut pipe), Some(input)) = (stdin, input) {
                // The process may exit without reading everything
                if let Err(e) = pipe.write_all(input.as_bytes()).await {
                    tracing::debug!(error = %e, "Could not write to stdin");
                }
            }
        };

        let ((), output) = tokio::join!(write_input, child.wait_with_output());
        let output = output.map_err(|source| ExecError::Io {
            program: program.clone(),
            source,
        })?;

        let status = output.status.code();
        tracing::debug!(?status, stdout_len = output.stdout.len(), "Process exited");

        Ok(ProcessOutput {
            status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Environment overrides for the credo process: `PATH` with the configured
/// mix directory appended.
#[must_use]
pub fn command_env(config: &CredoConfig, current_path: Option<&OsStr>) -> Vec<(OsString, OsString)> {
    let Some(extra) = &config.mix_binary_path else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = current_path
        .map(|path| std::env::split_paths(path).collect())
        .unwrap_or_default();
    paths.push(extra.clone());

    match std::env::join_paths(paths) {
        Ok(joined) => vec![(OsString::from("PATH"), joined)],
        Err(e) => {
            tracing::warn!(error = %e, path = %extra.display(), "Cannot add mixBinaryPath to PATH");
            Vec::new()
        }
    }
}

/// Resolve the mix executable.
///
/// A command containing a path separator is used as-is. Otherwise the
/// configured `mixBinaryPath` is checked first, then every `PATH` entry. If
/// nothing matches the bare command name is returned and left to the OS.
#[must_use]
pub fn locate_mix(config: &CredoConfig, current_path: Option<&OsStr>) -> PathBuf {
    let command = Path::new(&config.mix_command);
    if command.components().count() > 1 {
        return command.to_path_buf();
    }

    let search = config
        .mix_binary_path
        .iter()
        .cloned()
        .chain(current_path.into_iter().flat_map(std::env::split_paths));

    for dir in search {
        let candidate = dir.join(command);
        if candidate.is_file() {
            tracing::trace!(path = %candidate.display(), "Found mix executable");
            return candidate;
        }
    }

    command.to_path_buf()
}
