//! Shared test utilities for the Credo language server crates.
//!
//! - [`fixtures`]: captured `mix credo` output and matching source text
//! - [`format_diagnostics`]: stable rendering for snapshot tests
//! - [`MixProject`]: a throwaway Mix project on disk

pub mod assertions;
pub mod fixtures;
mod project;

pub use assertions::format_diagnostics;
pub use project::MixProject;
