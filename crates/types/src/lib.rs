//! Foundation types for the Credo language server.
//!
//! This crate provides shared types used across the Credo LSP stack.
//! Its only dependency is `url`, for `file://` conversion.
//!
//! # Type Categories
//!
//! - **Document types**: [`DocumentUri`], [`Document`]
//! - **Position types**: [`Position`], [`Range`]
//! - **Severity types**: [`DiagnosticSeverity`]

mod document;
mod position;
mod severity;

pub use document::{Document, DocumentUri, ELIXIR_LANGUAGE_ID};
pub use position::{utf16_len, Position, Range};
pub use severity::DiagnosticSeverity;
