//! A single cancelable unit of asynchronous work.

use credo_types::DocumentUri;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

type Body = Box<dyn FnOnce(TaskToken) -> CancelHandle + Send>;

/// Cleanup supplied by a task body, invoked at most once if the task is
/// canceled after the body started.
pub struct CancelHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl CancelHandle {
    /// Create a handle that runs `cancel` when the task is canceled.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to clean up.
    #[must_use]
    pub const fn noop() -> Self {
        Self { cancel: None }
    }

    fn invoke(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Lifecycle of a [`Task`].
///
/// `Pending -> Running -> Finished | Canceled`, or `Pending -> Canceled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Created, body not started yet
    Pending,
    /// Body started, waiting for it to call [`TaskToken::finished`]
    Running,
    /// Body reported completion
    Finished,
    /// Canceled before the body reported completion
    Canceled,
}

impl TaskState {
    /// Returns `true` for `Finished` and `Canceled`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Canceled)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Finished => write!(f, "finished"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

struct Inner {
    state: TaskState,
    body: Option<Body>,
    on_cancel: Option<CancelHandle>,
}

struct Shared {
    id: u64,
    key: DocumentUri,
    enqueued: AtomicBool,
    inner: Mutex<Inner>,
    /// Flips to `true` exactly once, on the first terminal transition.
    done: watch::Sender<bool>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self) {
        self.done.send_if_modified(|done| !std::mem::replace(done, true));
    }

    fn complete(&self) {
        {
            let mut inner = self.lock();
            if inner.state.is_terminal() {
                return;
            }
            inner.state = TaskState::Finished;
            inner.on_cancel = None;
        }
        tracing::trace!(task = self.id, uri = %self.key, "Task finished");
        self.resolve();
    }
}

/// One unit of cancelable asynchronous work for a document.
///
/// A task is single-use: it can be enqueued once and its body runs at most
/// once. Cloning yields another handle to the same task.
#[derive(Clone)]
pub struct Task {
    shared: Arc<Shared>,
}

impl Task {
    /// Create a task for `key`.
    ///
    /// `body` is called when the task starts. It should kick off its
    /// asynchronous work, keep the [`TaskToken`] alive until that work is
    /// done, call [`TaskToken::finished`], and return a [`CancelHandle`]
    /// that stops the work early.
    pub fn new(
        key: DocumentUri,
        body: impl FnOnce(TaskToken) -> CancelHandle + Send + 'static,
    ) -> Self {
        let (done, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                id: NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed),
                key,
                enqueued: AtomicBool::new(false),
                inner: Mutex::new(Inner {
                    state: TaskState::Pending,
                    body: Some(Box::new(body)),
                    on_cancel: None,
                }),
                done,
            }),
        }
    }

    /// Process-unique task id, for logging.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// Identity of the document this task works on.
    #[must_use]
    pub fn key(&self) -> &DocumentUri {
        &self.shared.key
    }

    #[must_use]
    pub fn state(&self) -> TaskState {
        self.shared.lock().state
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.state() == TaskState::Canceled
    }

    /// Marks the task as enqueued. Returns `false` if it already was.
    pub(crate) fn mark_enqueued(&self) -> bool {
        !self.shared.enqueued.swap(true, Ordering::AcqRel)
    }

    /// Start the body and wait until the task reaches a terminal state.
    ///
    /// A task canceled before `run` resolves immediately and its body is
    /// never invoked. Running an already started task only waits for it.
    pub async fn run(&self) {
        let body = {
            let mut inner = self.shared.lock();
            if inner.state == TaskState::Pending {
                inner.state = TaskState::Running;
                inner.body.take()
            } else {
                None
            }
        };

        if let Some(body) = body {
            tracing::debug!(task = self.id(), uri = %self.key(), "Task started");
            let token = TaskToken {
                shared: Arc::clone(&self.shared),
            };
            let handle = body(token);

            let mut inner = self.shared.lock();
            if inner.state == TaskState::Running {
                inner.on_cancel = Some(handle);
            } else if inner.state == TaskState::Canceled {
                // Canceled while the body was still setting up
                drop(inner);
                handle.invoke();
            }
        }

        self.finished().await;
    }

    /// Wait for the task to reach a terminal state without starting it.
    pub fn finished(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut done = self.shared.done.subscribe();
        async move {
            // The sender lives as long as the task; an error means nobody can
            // resolve it anymore.
            let _ = done.wait_for(|done| *done).await;
        }
    }

    /// Cancel the task.
    ///
    /// Invokes the body's [`CancelHandle`] (if the body already started)
    /// before resolving completion. Calling `cancel` on a task that already
    /// finished or was canceled is a no-op.
    pub fn cancel(&self) {
        let handle = {
            let mut inner = self.shared.lock();
            if inner.state.is_terminal() {
                return;
            }
            inner.state = TaskState::Canceled;
            inner.body = None;
            inner.on_cancel.take()
        };

        tracing::debug!(task = self.id(), uri = %self.key(), "Task canceled");
        if let Some(handle) = handle {
            handle.invoke();
        }
        self.shared.resolve();
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id())
            .field("key", self.key())
            .field("state", &self.state())
            .finish()
    }
}

/// Handed to a task body so it can observe cancellation and report completion.
///
/// Dropping the token counts as finishing, so a body whose work panics or is
/// torn down cannot leave the task (and the queue behind it) waiting forever.
pub struct TaskToken {
    shared: Arc<Shared>,
}

impl TaskToken {
    /// Whether the task was canceled. Check this before acting on output.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.shared.lock().state == TaskState::Canceled
    }

    #[must_use]
    pub fn key(&self) -> &DocumentUri {
        &self.shared.key
    }

    /// Report that the work completed (successfully or not).
    ///
    /// Has no effect if the task was canceled first.
    pub fn finished(self) {
        // Completion happens in Drop
    }
}

impl Drop for TaskToken {
    fn drop(&mut self) {
        self.shared.complete();
    }
}

impl std::fmt::Debug for TaskToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskToken")
            .field("task", &self.shared.id)
            .field("canceled", &self.is_canceled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn uri() -> DocumentUri {
        DocumentUri::new("file:///project/lib/sample.ex")
    }

    /// A task whose body parks its token in `slot` and counts cancellations.
    fn parked_task(
        body_calls: &Arc<AtomicUsize>,
        cancel_calls: &Arc<AtomicUsize>,
        slot: &Arc<Mutex<Option<TaskToken>>>,
    ) -> Task {
        let body_calls = Arc::clone(body_calls);
        let cancel_calls = Arc::clone(cancel_calls);
        let slot = Arc::clone(slot);
        Task::new(uri(), move |token| {
            body_calls.fetch_add(1, Ordering::SeqCst);
            *slot.lock().unwrap() = Some(token);
            CancelHandle::new(move || {
                cancel_calls.fetch_add(1, Ordering::SeqCst);
            })
        })
    }

    #[tokio::test]
    async fn test_run_after_cancel_skips_body() {
        let body_calls = Arc::new(AtomicUsize::new(0));
        let cancel_calls = Arc::new(AtomicUsize::new(0));
        let slot = Arc::new(Mutex::new(None));
        let task = parked_task(&body_calls, &cancel_calls, &slot);

        task.cancel();
        task.run().await;

        assert_eq!(body_calls.load(Ordering::SeqCst), 0);
        // The body never handed out a cleanup handle
        assert_eq!(cancel_calls.load(Ordering::SeqCst), 0);
        assert_eq!(task.state(), TaskState::Canceled);
    }

    #[tokio::test]
    async fn test_cancel_twice_invokes_cleanup_once() {
        let body_calls = Arc::new(AtomicUsize::new(0));
        let cancel_calls = Arc::new(AtomicUsize::new(0));
        let slot = Arc::new(Mutex::new(None));
        let task = parked_task(&body_calls, &cancel_calls, &slot);

        let running = tokio::spawn({
            let task = task.clone();
            async move { task.run().await }
        });
        while task.state() == TaskState::Pending {
            tokio::task::yield_now().await;
        }

        task.cancel();
        task.cancel();
        running.await.unwrap();

        assert_eq!(body_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cancel_calls.load(Ordering::SeqCst), 1);
        assert!(slot.lock().unwrap().as_ref().unwrap().is_canceled());
    }

    #[tokio::test]
    async fn test_finished_resolves_run() {
        let body_calls = Arc::new(AtomicUsize::new(0));
        let cancel_calls = Arc::new(AtomicUsize::new(0));
        let slot = Arc::new(Mutex::new(None));
        let task = parked_task(&body_calls, &cancel_calls, &slot);

        let running = tokio::spawn({
            let task = task.clone();
            async move { task.run().await }
        });
        while task.state() == TaskState::Pending {
            tokio::task::yield_now().await;
        }

        let token = slot.lock().unwrap().take().unwrap();
        assert!(!token.is_canceled());
        token.finished();
        running.await.unwrap();

        assert_eq!(task.state(), TaskState::Finished);
    }

    #[tokio::test]
    async fn test_cancel_after_finished_is_noop() {
        let body_calls = Arc::new(AtomicUsize::new(0));
        let cancel_calls = Arc::new(AtomicUsize::new(0));
        let slot = Arc::new(Mutex::new(None));
        let task = parked_task(&body_calls, &cancel_calls, &slot);

        let running = tokio::spawn({
            let task = task.clone();
            async move { task.run().await }
        });
        while task.state() == TaskState::Pending {
            tokio::task::yield_now().await;
        }

        slot.lock().unwrap().take().unwrap().finished();
        task.cancel();
        running.await.unwrap();

        assert_eq!(task.state(), TaskState::Finished);
        assert_eq!(cancel_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_finished_after_cancel_is_noop() {
        let body_calls = Arc::new(AtomicUsize::new(0));
        let cancel_calls = Arc::new(AtomicUsize::new(0));
        let slot = Arc::new(Mutex::new(None));
        let task = parked_task(&body_calls, &cancel_calls, &slot);

        let running = tokio::spawn({
            let task = task.clone();
            async move { task.run().await }
        });
        while task.state() == TaskState::Pending {
            tokio::task::yield_now().await;
        }

        task.cancel();
        slot.lock().unwrap().take().unwrap().finished();
        running.await.unwrap();

        assert_eq!(task.state(), TaskState::Canceled);
        assert_eq!(cancel_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dropped_token_finishes_task() {
        let task = Task::new(uri(), |token| {
            drop(token);
            CancelHandle::noop()
        });

        task.run().await;
        assert_eq!(task.state(), TaskState::Finished);
    }

    #[tokio::test]
    async fn test_cancel_pending_resolves_finished_future() {
        let task = Task::new(uri(), |_token| CancelHandle::noop());
        let waiting = tokio::spawn(task.finished());

        task.cancel();
        waiting.await.unwrap();
        assert!(task.is_canceled());
    }

    #[tokio::test]
    async fn test_cancel_during_body_invokes_returned_handle() {
        let cancel_calls = Arc::new(AtomicUsize::new(0));
        let this: Arc<Mutex<Option<Task>>> = Arc::new(Mutex::new(None));
        let task = Task::new(uri(), {
            let this = Arc::clone(&this);
            let cancel_calls = Arc::clone(&cancel_calls);
            move |token| {
                let task = this.lock().unwrap().take().unwrap();
                task.cancel();
                assert!(token.is_canceled());
                CancelHandle::new(move || {
                    cancel_calls.fetch_add(1, Ordering::SeqCst);
                })
            }
        });
        *this.lock().unwrap() = Some(task.clone());

        task.run().await;

        assert_eq!(task.state(), TaskState::Canceled);
        assert_eq!(cancel_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mark_enqueued_once() {
        let task = Task::new(uri(), |_token| CancelHandle::noop());
        assert!(task.mark_enqueued());
        assert!(!task.clone().mark_enqueued());
    }

    #[test]
    fn test_task_ids_are_unique() {
        let a = Task::new(uri(), |_token| CancelHandle::noop());
        let b = Task::new(uri(), |_token| CancelHandle::noop());
        assert_ne!(a.id(), b.id());
    }
}
