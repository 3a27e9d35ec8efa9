//! LSP server command

use anyhow::Result;

/// Run the Credo language server on stdio.
pub async fn run() -> Result<()> {
    credo_lsp::run_server().await;
    Ok(())
}
