use thiserror::Error;

pub type Result<T> = std::result::Result<T, OutputError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    /// The command printed nothing at all. Usually the tool could not run,
    /// e.g. dependencies are missing or need recompiling.
    #[error("Command returned empty output")]
    Empty,

    /// The output did not contain decodable JSON. Carries the output with
    /// whitespace collapsed to single spaces.
    #[error("Error on parsing output (It might be non-JSON output): \"{output}\"")]
    Malformed { output: String },
}
