use credo_types::DocumentUri;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    /// A [`Task`](crate::Task) is single-use; enqueuing it again is a caller bug.
    #[error("Task is already enqueued (uri: {key})")]
    DuplicateEnqueue { key: DocumentUri },

    #[error("Task queue requires a running Tokio runtime")]
    NoRuntime,
}
