//! Credo Language Server Protocol implementation.
//!
//! Runs `mix credo` on Elixir documents when they are opened or saved and
//! publishes the reported issues as diagnostics. The server communicates
//! over stdio and is typically invoked via `credo-ls lsp`.
//!
//! The lint machinery ([`CredoProvider`], [`Linter`]) is independent of the
//! transport: process execution goes through [`CommandRunner`] and results
//! through [`DiagnosticSink`], so the CLI can reuse it directly.

mod args;
mod conversions;
mod error;
mod linter;
mod process;
mod project;
mod provider;
mod server;
mod sink;

#[cfg(test)]
mod testing;

pub use error::{ExecError, LintError, ProviderError, Result};
pub use linter::{LintReport, LintTarget, Linter};
pub use process::{
    command_env, locate_mix, CommandRunner, CommandSpec, ProcessOutput, TokioCommandRunner,
};
pub use project::{find_up, workspace_for, ConfigFileLookup, ProjectLayout};
pub use provider::{severity_map, CredoProvider};
pub use server::CredoLanguageServer;
pub use sink::{DiagnosticSink, MessageLevel};

use credo_config::CredoConfig;
use tower_lsp_server::{LspService, Server};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Handle for raising or lowering the log level after startup.
///
/// Has no effect when `RUST_LOG` is set; an explicit filter always wins.
#[derive(Clone)]
pub struct LogFilter {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogFilter {
    /// Follow the `enableDebug` setting.
    pub fn apply(&self, config: &CredoConfig) {
        if self.from_env {
            return;
        }
        if let Err(error) = self.handle.reload(EnvFilter::new(config.log_filter())) {
            tracing::warn!(%error, "Failed to update log filter");
        }
    }
}

/// Initialize tracing for the LSP server.
///
/// Returns `None` if a global subscriber is already set (for example when
/// running as a CLI subcommand that set up its own).
pub fn init_tracing() -> Option<LogFilter> {
    // stdout carries JSON-RPC, so logs go to stderr without colors
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, handle) = reload::Layer::new(
        env_filter.unwrap_or_else(|| EnvFilter::new(CredoConfig::default().log_filter())),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .try_init()
        .ok()?;

    Some(LogFilter { handle, from_env })
}

/// Run the Credo language server over stdio.
pub async fn run_server() {
    let log_filter = init_tracing();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(move |client| CredoLanguageServer::new(client, log_filter));

    Server::new(stdin, stdout, socket).serve(service).await;
}
