use credo_parser::Diagnostic;
use credo_types::DocumentUri;
use std::future::Future;

/// How prominently a user-facing message should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Error,
    Warning,
    Info,
}

/// Where diagnostics and user-facing messages go.
pub trait DiagnosticSink: Send + Sync + 'static {
    /// Replace all diagnostics for `uri`.
    fn publish(&self, uri: DocumentUri, diagnostics: Vec<Diagnostic>) -> impl Future<Output = ()> + Send;

    /// Remove all diagnostics for `uri`.
    fn clear(&self, uri: DocumentUri) -> impl Future<Output = ()> + Send;

    fn notify(&self, level: MessageLevel, message: String) -> impl Future<Output = ()> + Send;
}
