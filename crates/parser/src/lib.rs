//! Turns `mix credo` output into diagnostics.
//!
//! The pipeline has three stages:
//!
//! 1. [`parse_output`] recovers the JSON payload from noisy process output
//!    (compiler warnings often precede it) and decodes it into one of the
//!    output models: [`CredoOutput`], [`CredoDiffOutput`] or [`CredoInfo`].
//! 2. [`resolve_range`] maps an [`Issue`]'s reported location onto a precise
//!    single-line [`Range`](credo_types::Range) in the live document, falling
//!    back from explicit columns to the issue's trigger text to the whole line.
//! 3. [`parse_issue`] / [`parse_issues`] attach severity and message.

mod diagnostic;
mod error;
mod issue;
mod output;
mod range;

pub use diagnostic::{parse_issue, parse_issues, Diagnostic, SeverityMap, DIAGNOSTIC_SOURCE};
pub use error::{OutputError, Result};
pub use issue::{Category, Issue};
pub use output::{
    parse_output, CredoDiffOutput, CredoInfo, CredoOutput, DiffIssues, InfoConfig, LintOutput,
    SystemInfo,
};
pub use range::{resolve_range, strip_arity};
