//! Glue between editor events, the task queue and the linter.

use crate::linter::{LintReport, LintTarget, Linter};
use crate::process::CommandRunner;
use crate::project::{workspace_for, ProjectLayout};
use crate::sink::{DiagnosticSink, MessageLevel};
use crate::ProviderError;
use credo_config::CredoConfig;
use credo_parser::{parse_issues, SeverityMap};
use credo_queue::{CancelHandle, Task, TaskQueue};
use credo_types::{Document, DocumentUri};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Severity mapping for a configuration.
#[must_use]
pub const fn severity_map(config: &CredoConfig) -> SeverityMap {
    if config.refactor_as_hint {
        SeverityMap::refactor_as_hint()
    } else {
        SeverityMap {
            refactor: credo_types::DiagnosticSeverity::Information,
        }
    }
}

/// Lints documents through a shared [`TaskQueue`] and publishes the results.
pub struct CredoProvider<R, S> {
    runner: Arc<R>,
    sink: Arc<S>,
    queue: TaskQueue,
    config: RwLock<Arc<CredoConfig>>,
    workspace_folders: RwLock<Vec<PathBuf>>,
    /// Documents that may have diagnostics or a run in flight
    tracked: Mutex<HashSet<DocumentUri>>,
    /// Warnings already shown, so repeated runs do not repeat them
    notified: Arc<Mutex<HashSet<String>>>,
}

impl<R: CommandRunner, S: DiagnosticSink> CredoProvider<R, S> {
    pub fn new(runner: Arc<R>, sink: Arc<S>, config: CredoConfig) -> Self {
        Self {
            runner,
            sink,
            queue: TaskQueue::new(),
            config: RwLock::new(Arc::new(config)),
            workspace_folders: RwLock::new(Vec::new()),
            tracked: Mutex::new(HashSet::new()),
            notified: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    #[must_use]
    pub const fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    /// The current configuration snapshot.
    #[must_use]
    pub fn config(&self) -> Arc<CredoConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the configuration. Runs already queued keep the snapshot they
    /// were created with.
    pub fn on_config_changed(&self, config: CredoConfig) {
        tracing::info!(
            diff_mode = config.diff_mode.enabled,
            lint_everything = config.lint_everything,
            "Configuration changed"
        );
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
        self.notified
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn set_workspace_folders(&self, folders: Vec<PathBuf>) {
        tracing::debug!(count = folders.len(), "Workspace folders set");
        *self
            .workspace_folders
            .write()
            .unwrap_or_else(PoisonError::into_inner) = folders;
    }

    /// Queue a lint run for `document`.
    ///
    /// Documents that are not Elixir files inside a Mix project, or that are
    /// empty, are ignored and `Ok(None)` is returned. Otherwise the queued
    /// task is returned; any earlier run for the same document is canceled.
    #[tracing::instrument(skip_all, fields(uri = %document.uri))]
    pub fn execute(&self, document: Document) -> Result<Option<Task>, ProviderError> {
        let Some(target) = self.lint_target(document) else {
            return Ok(None);
        };
        let uri = target.document.uri.clone();

        let linter = Linter::new(Arc::clone(&self.runner), self.config());
        let severities = severity_map(linter.config());
        let sink = Arc::clone(&self.sink);
        let notified = Arc::clone(&self.notified);

        let task = Task::new(uri.clone(), move |token| {
            let run = tokio::spawn(async move {
                let result = linter.run(&target).await;
                if token.is_canceled() {
                    tracing::debug!(uri = %target.document.uri, "Discarding result of canceled run");
                    return;
                }
                publish(&*sink, &notified, &target, result, &severities).await;
                token.finished();
            });
            CancelHandle::new(move || run.abort())
        });

        self.tracked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uri);
        self.queue.enqueue(task.clone())?;
        Ok(Some(task))
    }

    /// Cancel any run for `uri` and remove its diagnostics.
    #[tracing::instrument(skip(self), fields(uri = %uri))]
    pub async fn clear(&self, uri: &DocumentUri) {
        if !uri.is_file() {
            return;
        }
        tracing::debug!("Removing diagnostics and canceling runs");
        self.queue.cancel(uri);
        self.tracked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uri);
        self.sink.clear(uri.clone()).await;
    }

    /// [`clear`](Self::clear) every document this provider has linted.
    pub async fn clear_all(&self) {
        let uris: Vec<DocumentUri> = self
            .tracked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        for uri in &uris {
            self.clear(uri).await;
        }
    }

    /// Cancel everything without touching published diagnostics.
    pub fn shutdown(&self) {
        self.queue.cancel_all();
    }

    fn lint_target(&self, document: Document) -> Option<LintTarget> {
        if !document.is_elixir() {
            tracing::trace!(language = %document.language_id, "Not an Elixir document");
            return None;
        }
        if !document.uri.is_file() {
            tracing::trace!("Not a file document");
            return None;
        }
        if document.text.is_empty() {
            tracing::trace!("Empty document");
            return None;
        }

        let file = document.uri.to_file_path()?;
        let layout = {
            let folders = self
                .workspace_folders
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            ProjectLayout::discover(&file, workspace_for(&file, &folders))
        };
        if !layout.is_mix_project {
            tracing::debug!("Document is not part of a Mix project");
            return None;
        }

        Some(LintTarget {
            document,
            file,
            layout,
        })
    }
}

async fn publish<S: DiagnosticSink>(
    sink: &S,
    notified: &Mutex<HashSet<String>>,
    target: &LintTarget,
    result: crate::Result<LintReport>,
    severities: &SeverityMap,
) {
    let uri = target.document.uri.clone();
    let report = match result {
        Ok(report) => report,
        Err(error) if error.is_silent() => {
            tracing::debug!(%uri, %error, "Lint run ended without output");
            return;
        }
        Err(error) => {
            tracing::error!(%uri, %error, "Lint run failed");
            sink.notify(MessageLevel::Error, error.to_string()).await;
            return;
        }
    };

    for warning in report.warnings {
        let first_time = notified
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(warning.clone());
        if first_time {
            sink.notify(MessageLevel::Warning, warning).await;
        }
    }

    let diagnostics = report.output.map_or_else(Vec::new, |output| {
        parse_issues(output.issues(), &target.document.text, severities)
    });
    tracing::debug!(%uri, count = diagnostics.len(), "Setting linter issues");
    sink.publish(uri, diagnostics).await;
}
