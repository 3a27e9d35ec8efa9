//! Standalone language server binary; `credo-ls lsp` runs the same server.

#[tokio::main]
async fn main() {
    credo_lsp::run_server().await;
}
