//! Conversions between this crate's types and `lsp_types`.

use crate::sink::MessageLevel;
use credo_parser::Diagnostic;
use credo_types::{DiagnosticSeverity, DocumentUri, Position, Range};
use lsp_types::{MessageType, NumberOrString, Uri};

#[must_use]
pub const fn to_lsp_position(position: Position) -> lsp_types::Position {
    lsp_types::Position {
        line: position.line,
        character: position.character,
    }
}

#[must_use]
pub const fn to_lsp_range(range: Range) -> lsp_types::Range {
    lsp_types::Range {
        start: to_lsp_position(range.start),
        end: to_lsp_position(range.end),
    }
}

#[must_use]
pub const fn to_lsp_severity(severity: DiagnosticSeverity) -> lsp_types::DiagnosticSeverity {
    match severity {
        DiagnosticSeverity::Error => lsp_types::DiagnosticSeverity::ERROR,
        DiagnosticSeverity::Warning => lsp_types::DiagnosticSeverity::WARNING,
        DiagnosticSeverity::Information => lsp_types::DiagnosticSeverity::INFORMATION,
        DiagnosticSeverity::Hint => lsp_types::DiagnosticSeverity::HINT,
    }
}

#[must_use]
pub fn to_lsp_diagnostic(diagnostic: Diagnostic) -> lsp_types::Diagnostic {
    lsp_types::Diagnostic {
        range: to_lsp_range(diagnostic.range),
        severity: Some(to_lsp_severity(diagnostic.severity)),
        code: Some(NumberOrString::String(diagnostic.code)),
        source: Some(diagnostic.source.to_string()),
        message: diagnostic.message,
        ..Default::default()
    }
}

#[must_use]
pub const fn to_message_type(level: MessageLevel) -> MessageType {
    match level {
        MessageLevel::Error => MessageType::ERROR,
        MessageLevel::Warning => MessageType::WARNING,
        MessageLevel::Info => MessageType::INFO,
    }
}

#[must_use]
pub fn to_document_uri(uri: &Uri) -> DocumentUri {
    DocumentUri::new(uri.as_str())
}

/// `None` if the string is not a valid URI.
#[must_use]
pub fn to_lsp_uri(uri: &DocumentUri) -> Option<Uri> {
    uri.as_str().parse().ok()
}
