//! Issue to diagnostic conversion.

use crate::{resolve_range, Category, Issue};
use credo_types::{DiagnosticSeverity, Range};

/// Value of [`Diagnostic::source`] for everything this crate produces.
pub const DIAGNOSTIC_SOURCE: &str = "credo";

/// A diagnostic ready to publish, independent of the LSP wire types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: DiagnosticSeverity,
    /// `"{message} ({category}:{check})"`
    pub message: String,
    /// The check that fired, e.g. `Credo.Check.Readability.ModuleDoc`
    pub code: String,
    pub category: Category,
    pub source: &'static str,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.range, self.severity, self.message)
    }
}

/// Category to severity mapping.
///
/// Older Credo versions rank `refactor` below the other informational
/// categories; [`SeverityMap::refactor`] lets callers pick which one they
/// want.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityMap {
    pub refactor: DiagnosticSeverity,
}

impl Default for SeverityMap {
    fn default() -> Self {
        Self {
            refactor: DiagnosticSeverity::Information,
        }
    }
}

impl SeverityMap {
    /// Mapping that reports `refactor` issues as hints.
    #[must_use]
    pub const fn refactor_as_hint() -> Self {
        Self {
            refactor: DiagnosticSeverity::Hint,
        }
    }

    #[must_use]
    pub const fn severity(&self, category: &Category) -> DiagnosticSeverity {
        match category {
            Category::Consistency | Category::Warning => DiagnosticSeverity::Warning,
            Category::Design | Category::Readability => DiagnosticSeverity::Information,
            Category::Refactor => self.refactor,
            Category::Other(_) => DiagnosticSeverity::Error,
        }
    }
}

/// Convert one issue into a diagnostic against the document's current text.
#[must_use]
pub fn parse_issue(issue: &Issue, text: &str, severities: &SeverityMap) -> Diagnostic {
    Diagnostic {
        range: resolve_range(issue, text),
        severity: severities.severity(&issue.category),
        message: format!("{} ({}:{})", issue.message, issue.category, issue.check),
        code: issue.check.clone(),
        category: issue.category.clone(),
        source: DIAGNOSTIC_SOURCE,
    }
}

/// Convert every issue, preserving order.
#[must_use]
pub fn parse_issues(issues: &[Issue], text: &str, severities: &SeverityMap) -> Vec<Diagnostic> {
    issues
        .iter()
        .map(|issue| parse_issue(issue, text, severities))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_output, CredoOutput};
    use credo_test_utils::{fixtures, format_diagnostics};
    use serde_json::json;

    fn issue(value: serde_json::Value) -> Issue {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_severity_map() {
        let map = SeverityMap::default();
        assert_eq!(map.severity(&Category::Consistency), DiagnosticSeverity::Warning);
        assert_eq!(map.severity(&Category::Design), DiagnosticSeverity::Information);
        assert_eq!(map.severity(&Category::Readability), DiagnosticSeverity::Information);
        assert_eq!(map.severity(&Category::Refactor), DiagnosticSeverity::Information);
        assert_eq!(map.severity(&Category::Warning), DiagnosticSeverity::Warning);
        assert_eq!(
            map.severity(&Category::Other("unknown".to_string())),
            DiagnosticSeverity::Error
        );

        let hints = SeverityMap::refactor_as_hint();
        assert_eq!(hints.severity(&Category::Refactor), DiagnosticSeverity::Hint);
        assert_eq!(hints.severity(&Category::Design), DiagnosticSeverity::Information);
    }

    #[test]
    fn test_module_doc_issue_with_columns() {
        let issue = issue(json!({
            "category": "readability",
            "check": "Credo.Check.Readability.ModuleDoc",
            "column": 11,
            "column_end": 32,
            "filename": "lib/sample_web/telemetry.ex",
            "line_no": 1,
            "message": "Modules should have a @moduledoc tag.",
            "priority": 1,
            "trigger": "SampleWeb.Telemetry"
        }));

        let diagnostic = parse_issue(
            &issue,
            "defmodule SampleWeb.Telemetry\nend\n",
            &SeverityMap::default(),
        );

        assert_eq!(diagnostic.range, Range::on_line(0, 10, 31));
        assert_eq!(diagnostic.severity, DiagnosticSeverity::Information);
        assert_eq!(
            diagnostic.message,
            "Modules should have a @moduledoc tag. (readability:Credo.Check.Readability.ModuleDoc)"
        );
        assert_eq!(diagnostic.code, "Credo.Check.Readability.ModuleDoc");
        assert_eq!(diagnostic.source, "credo");
    }

    #[test]
    fn test_todo_issue_without_columns() {
        let text = "defmodule Sample do\n  # TODO: any\nend\n";
        let found = issue(json!({
            "category": "design",
            "check": "Credo.Check.Design.TagTODO",
            "column": null,
            "column_end": null,
            "line_no": 2,
            "message": "Found a TODO tag in a comment: # TODO: any",
            "priority": -5,
            "trigger": "# TODO: any"
        }));
        let mut missing = found.clone();
        missing.trigger = Some(json!("# TODO: nothing"));

        let map = SeverityMap::default();
        assert_eq!(parse_issue(&found, text, &map).range, Range::on_line(1, 2, 13));
        assert_eq!(parse_issue(&missing, text, &map).range, Range::on_line(1, 0, 13));
    }

    #[test]
    fn test_parse_fixture_issues() {
        let output: CredoOutput = parse_output(fixtures::SUGGEST_OUTPUT).unwrap().unwrap();
        let diagnostics = parse_issues(&output.issues, fixtures::SAMPLE_SOURCE, &SeverityMap::default());

        insta::assert_snapshot!(format_diagnostics(&diagnostics), @r"
        [1] 0:10-0:16 info: Modules should have a @moduledoc tag. (readability:Credo.Check.Readability.ModuleDoc)
        [2] 3:4-3:23 warning: Avoid Application.get_env/2 in module body (warning:Credo.Check.Warning.ApplicationConfigInModuleAttribute)
        ");
    }

    #[test]
    fn test_parse_no_issues() {
        let diagnostics = parse_issues(&[], fixtures::SAMPLE_SOURCE, &SeverityMap::default());
        insta::assert_snapshot!(format_diagnostics(&diagnostics), @"(no diagnostics)");
    }
}
