//! Maps an issue's reported location onto a range in the live document.

use crate::Issue;
use credo_types::{utf16_len, Range};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static ARITY_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"/\d+$").unwrap()
});

/// Strip a trailing `/<arity>` from a function reference.
///
/// `Application.get_env/2` becomes `Application.get_env`; anything without
/// the suffix is returned unchanged.
#[must_use]
pub fn strip_arity(trigger: &str) -> Cow<'_, str> {
    ARITY_SUFFIX.replace(trigger, "")
}

/// 1-based tool value to 0-based; missing, zero and negative become 0.
fn zero_based(value: Option<i64>) -> u32 {
    match value {
        Some(v) if v > 0 => u32::try_from(v - 1).unwrap_or(u32::MAX),
        _ => 0,
    }
}

/// Compute the single-line range to highlight for `issue` in `text`.
///
/// In order of preference:
///
/// 1. The issue's own columns, converted to 0-based.
/// 2. The first occurrence of the trigger text (arity suffix stripped) on
///    the issue's line.
/// 3. The whole line, or `0..1` when the line is empty or absent so the
///    marker stays visible.
///
/// Columns are UTF-16 offsets. Never panics.
#[must_use]
pub fn resolve_range(issue: &Issue, text: &str) -> Range {
    let line = zero_based(issue.line_no);

    if !issue.lacks_columns() {
        let start = zero_based(issue.column);
        let end = zero_based(issue.column_end).max(start);
        return Range::on_line(line, start, end);
    }

    let Some(line_text) = text.split('\n').nth(line as usize) else {
        tracing::trace!(line, "Issue line is outside the document");
        return Range::on_line(line, 0, 1);
    };
    let line_text = line_text.strip_suffix('\r').unwrap_or(line_text);

    if let Some(trigger) = issue.trigger_text() {
        let trigger = strip_arity(trigger);
        if !trigger.is_empty() {
            if let Some(offset) = line_text.find(trigger.as_ref()) {
                let start = utf16_len(&line_text[..offset]);
                return Range::on_line(line, start, start + utf16_len(&trigger));
            }
        }
    }

    match utf16_len(line_text) {
        0 => Range::on_line(line, 0, 1),
        len => Range::on_line(line, 0, len),
    }
}
