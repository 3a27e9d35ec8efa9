use credo_parser::OutputError;
use credo_queue::QueueError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LintError>;

/// Failure to start or wait for a process.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("`{program}` is not executable. Try setting \"mixBinaryPath\" to the directory of the mix binary.")]
    NotFound { program: String },

    #[error("`{program}` is not executable: permission denied")]
    NotExecutable { program: String },

    #[error("Failed to run `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    pub(crate) fn from_spawn(program: &str, source: std::io::Error) -> Self {
        let program = program.to_string();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { program },
            std::io::ErrorKind::PermissionDenied => Self::NotExecutable { program },
            _ => Self::Io { program, source },
        }
    }
}

/// Why a lint run produced no result.
#[derive(Debug, Error)]
pub enum LintError {
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// Killed by a signal, normally because the run was canceled.
    #[error("Process was terminated")]
    Terminated,

    /// The shell could not find or execute the command (exit status 126/127).
    #[error("An error occurred: \"{stderr}\" (exit status {code})")]
    CommandFailed { code: i32, stderr: String },

    #[error(
        "Command `{command} credo` returns empty output! Please check your configuration. \
         Did you add or modify your dependencies? You might need to run `mix deps.get` or recompile."
    )]
    EmptyOutput { command: String },

    #[error(transparent)]
    MalformedOutput(OutputError),

    /// Output could not be decoded, but it came from a terminated process.
    #[error("Output of a terminated process was discarded")]
    Discarded,

    #[error("The document is not a file on disk")]
    NotAFile,
}

impl LintError {
    /// Errors that are an expected side effect of cancellation and should not
    /// be shown to the user.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::Terminated | Self::Discarded)
    }

    pub(crate) fn from_output(error: OutputError, command: &str) -> Self {
        match error {
            OutputError::Empty => Self::EmptyOutput {
                command: command.to_string(),
            },
            malformed @ OutputError::Malformed { .. } => Self::MalformedOutput(malformed),
        }
    }
}

/// Errors surfaced by [`CredoProvider`](crate::CredoProvider).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A task object was enqueued twice. Always a bug in the caller.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_classification() {
        let not_found = ExecError::from_spawn("mix", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(not_found, ExecError::NotFound { .. }));
        assert!(not_found.to_string().starts_with("`mix` is not executable."));

        let denied =
            ExecError::from_spawn("mix", std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, ExecError::NotExecutable { .. }));

        let other = ExecError::from_spawn("mix", std::io::Error::other("boom"));
        assert!(matches!(other, ExecError::Io { .. }));
    }

    #[test]
    fn test_empty_output_message_names_command() {
        let error = LintError::from_output(OutputError::Empty, "/usr/local/bin/mix");
        assert!(error
            .to_string()
            .starts_with("Command `/usr/local/bin/mix credo` returns empty output!"));
        assert!(!error.is_silent());
    }

    #[test]
    fn test_silent_errors() {
        assert!(LintError::Terminated.is_silent());
        assert!(LintError::Discarded.is_silent());
        assert!(!LintError::CommandFailed {
            code: 127,
            stderr: String::new()
        }
        .is_silent());
    }
}
