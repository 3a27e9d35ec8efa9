//! Exit codes for the Credo CLI.
//!
//! Scripts and CI systems can tell "Credo found issues" apart from "Credo
//! could not run".

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no issues
    Success = 0,
    /// Credo reported issues for the file
    IssuesFound = 1,
    /// Configuration error (unreadable or invalid config file)
    ConfigError = 2,
    /// `mix credo` could not be run or produced unusable output
    ToolError = 3,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::IssuesFound => write!(f, "issues found"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::ToolError => write!(f, "credo error"),
        }
    }
}
