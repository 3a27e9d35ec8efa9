//! Cancelable, single-concurrency task queue.
//!
//! Running `mix credo` is expensive, and editors fire open/save events in
//! bursts. This crate bounds the work to one analysis process at a time and
//! makes newer work for a document supersede older work for the same
//! document.
//!
//! - [`Task`] wraps one unit of asynchronous work bound to a [`DocumentUri`].
//!   Its body receives a [`TaskToken`] and hands back a [`CancelHandle`].
//! - [`TaskQueue`] runs tasks strictly one at a time, in FIFO order, and
//!   cancels any queued task for a document when a new one is enqueued.
//!
//! Cancellation is cooperative: canceling flips a flag the body can check
//! through its token and invokes the body's cleanup handle (typically
//! killing a child process). A cancel always resolves the task, so the queue
//! moves on immediately.
//!
//! [`DocumentUri`]: credo_types::DocumentUri

mod error;
mod queue;
mod task;

pub use error::{QueueError, Result};
pub use queue::TaskQueue;
pub use task::{CancelHandle, Task, TaskState, TaskToken};
