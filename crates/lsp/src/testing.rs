//! Test doubles for [`CommandRunner`] and [`DiagnosticSink`].

use crate::process::{CommandRunner, CommandSpec, ProcessOutput};
use crate::sink::{DiagnosticSink, MessageLevel};
use crate::ExecError;
use credo_parser::Diagnostic;
use credo_types::DocumentUri;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

enum ReplyKind {
    Output(ProcessOutput),
    NotFound,
    Hang,
}

/// Scripted result for one command.
pub struct Reply(ReplyKind);

impl Reply {
    pub fn stdout(stdout: &str) -> Self {
        Self(ReplyKind::Output(ProcessOutput {
            status: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }))
    }

    pub fn killed() -> Self {
        Self(ReplyKind::Output(ProcessOutput {
            status: None,
            stdout: String::new(),
            stderr: String::new(),
        }))
    }

    pub const fn not_found() -> Self {
        Self(ReplyKind::NotFound)
    }

    /// Never completes; counts as killed once its future is dropped.
    pub const fn hang() -> Self {
        Self(ReplyKind::Hang)
    }

    pub fn status(mut self, code: i32) -> Self {
        if let ReplyKind::Output(output) = &mut self.0 {
            output.status = Some(code);
        }
        self
    }

    pub fn stderr(mut self, stderr: &str) -> Self {
        if let ReplyKind::Output(output) = &mut self.0 {
            output.stderr = stderr.to_string();
        }
        self
    }
}

/// Replays scripted replies in order and records every command.
pub struct FakeRunner {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<CommandSpec>>,
    called: Notify,
    drops: Arc<AtomicUsize>,
    dropped: Arc<Notify>,
}

impl FakeRunner {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
            called: Notify::new(),
            drops: Arc::new(AtomicUsize::new(0)),
            dropped: Arc::new(Notify::new()),
        }
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        loop {
            let notified = self.called.notified();
            if self.calls.lock().unwrap().len() >= count {
                return;
            }
            notified.await;
        }
    }

    pub async fn wait_for_drops(&self, count: usize) {
        loop {
            let notified = self.dropped.notified();
            if self.drops.load(Ordering::SeqCst) >= count {
                return;
            }
            notified.await;
        }
    }
}

struct DropCounter {
    drops: Arc<AtomicUsize>,
    dropped: Arc<Notify>,
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
        self.dropped.notify_waiters();
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, command: CommandSpec) -> Result<ProcessOutput, ExecError> {
        let program = command.program.display().to_string();
        self.calls.lock().unwrap().push(command);
        self.called.notify_waiters();

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command: {program}"));

        match reply.0 {
            ReplyKind::Output(output) => Ok(output),
            ReplyKind::NotFound => Err(ExecError::NotFound { program }),
            ReplyKind::Hang => {
                let _guard = DropCounter {
                    drops: Arc::clone(&self.drops),
                    dropped: Arc::clone(&self.dropped),
                };
                std::future::pending().await
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Publish(DocumentUri, Vec<Diagnostic>),
    Clear(DocumentUri),
    Notify(MessageLevel, String),
}

/// Records everything sent to it.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// The most recent diagnostics published for `uri`.
    pub fn published(&self, uri: &DocumentUri) -> Option<Vec<Diagnostic>> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|event| match event {
                SinkEvent::Publish(published, diagnostics) if published == uri => {
                    Some(diagnostics.clone())
                }
                _ => None,
            })
    }
}

impl DiagnosticSink for RecordingSink {
    async fn publish(&self, uri: DocumentUri, diagnostics: Vec<Diagnostic>) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Publish(uri, diagnostics));
    }

    async fn clear(&self, uri: DocumentUri) {
        self.events.lock().unwrap().push(SinkEvent::Clear(uri));
    }

    async fn notify(&self, level: MessageLevel, message: String) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Notify(level, message));
    }
}
