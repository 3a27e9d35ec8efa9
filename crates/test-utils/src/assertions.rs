//! Snapshot testing helpers.
//!
//! Diagnostics are formatted one per line, numbered, so snapshots stay
//! readable.

/// Format a list of diagnostics for snapshot testing.
///
/// # Example
///
/// ```ignore
/// use credo_test_utils::format_diagnostics;
///
/// let diagnostics = parse_issues(&output.issues, text, &SeverityMap::default());
/// insta::assert_snapshot!(format_diagnostics(&diagnostics));
/// ```
pub fn format_diagnostics<D: std::fmt::Display>(diagnostics: &[D]) -> String {
    if diagnostics.is_empty() {
        return String::from("(no diagnostics)");
    }

    diagnostics
        .iter()
        .enumerate()
        .map(|(i, d)| format!("[{}] {d}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
