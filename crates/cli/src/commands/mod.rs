pub mod common;
pub mod info;
pub mod lint;
pub mod lsp;
