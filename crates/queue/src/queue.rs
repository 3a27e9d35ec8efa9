//! Single-concurrency task scheduling.

use crate::{QueueError, Result, Task};
use credo_types::DocumentUri;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

struct QueueState {
    tasks: VecDeque<Task>,
    busy: bool,
}

struct QueueInner {
    state: Mutex<QueueState>,
    /// `true` while no drain loop is running.
    idle: watch::Sender<bool>,
}

impl QueueInner {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs [`Task`]s one at a time, in the order they were enqueued.
///
/// At most one task per document is queued at any time: enqueuing a task
/// cancels every queued (or running) task with the same key. Canceled tasks
/// are skipped when they reach the head of the queue.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct TaskQueue {
    inner: Arc<QueueInner>,
}

impl TaskQueue {
    #[must_use]
    pub fn new() -> Self {
        let (idle, _) = watch::channel(true);
        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState {
                    tasks: VecDeque::new(),
                    busy: false,
                }),
                idle,
            }),
        }
    }

    /// Number of queued tasks, including the running one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().tasks.is_empty()
    }

    /// Add a task to the tail of the queue and start draining if idle.
    ///
    /// Any task already queued for the same document is canceled first.
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`QueueError::DuplicateEnqueue`] if this task was enqueued before, and
    /// [`QueueError::NoRuntime`] outside a Tokio runtime.
    pub fn enqueue(&self, task: Task) -> Result<()> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| QueueError::NoRuntime)?;

        if !task.mark_enqueued() {
            return Err(QueueError::DuplicateEnqueue {
                key: task.key().clone(),
            });
        }

        self.cancel(task.key());

        let start_draining = {
            let mut state = self.inner.lock();
            tracing::debug!(
                task = task.id(),
                uri = %task.key(),
                queued = state.tasks.len(),
                "Task enqueued"
            );
            state.tasks.push_back(task);
            if state.busy {
                false
            } else {
                state.busy = true;
                self.inner.idle.send_replace(false);
                true
            }
        };

        if start_draining {
            runtime.spawn(drain(Arc::clone(&self.inner)));
        }
        Ok(())
    }

    /// Cancel every queued or running task for `key`.
    pub fn cancel(&self, key: &DocumentUri) {
        let matching: Vec<Task> = self
            .inner
            .lock()
            .tasks
            .iter()
            .filter(|task| task.key() == key)
            .cloned()
            .collect();

        // Cancel outside the lock: cleanup handles are arbitrary code
        for task in matching {
            task.cancel();
        }
    }

    /// Cancel every queued or running task.
    pub fn cancel_all(&self) {
        let tasks: Vec<Task> = self.inner.lock().tasks.iter().cloned().collect();
        for task in tasks {
            task.cancel();
        }
    }

    /// Wait until the queue has drained every task.
    pub async fn wait_idle(&self) {
        let mut idle = self.inner.idle.subscribe();
        let _ = idle.wait_for(|idle| *idle).await;
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("TaskQueue")
            .field("tasks", &state.tasks)
            .field("busy", &state.busy)
            .finish()
    }
}

/// The drain loop. Only one runs per queue at a time (guarded by `busy`).
async fn drain(inner: Arc<QueueInner>) {
    loop {
        let head = {
            let mut state = inner.lock();
            if let Some(task) = state.tasks.front() {
                task.clone()
            } else {
                state.busy = false;
                inner.idle.send_replace(true);
                return;
            }
        };

        // Run each task on its own Tokio task so a panicking body surfaces
        // as a JoinError here instead of killing the loop.
        let runner = head.clone();
        if let Err(err) = tokio::spawn(async move { runner.run().await }).await {
            tracing::error!(
                task = head.id(),
                uri = %head.key(),
                error = %err,
                "Error while running credo task"
            );
            head.cancel();
            if err.is_cancelled() {
                // Runtime is shutting down
                let mut state = inner.lock();
                state.tasks.clear();
                state.busy = false;
                inner.idle.send_replace(true);
                return;
            }
        }

        inner.lock().tasks.pop_front();
    }
}
