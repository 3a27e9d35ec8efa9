//! A single issue as reported by `mix credo --format json`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Issue category. Credo uses it as the severity tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Consistency,
    Design,
    Readability,
    Refactor,
    Warning,
    /// Any category this crate does not know; treated as the most severe.
    Other(String),
}

impl Category {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Consistency => "consistency",
            Self::Design => "design",
            Self::Readability => "readability",
            Self::Refactor => "refactor",
            Self::Warning => "warning",
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value {
            "consistency" => Self::Consistency,
            "design" => Self::Design,
            "readability" => Self::Readability,
            "refactor" => Self::Refactor,
            "warning" => Self::Warning,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value.as_str()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One issue from Credo's JSON output.
///
/// Lines and columns are 1-based. `column` and `column_end` are both `null`
/// when Credo could not determine them; `trigger` then names the source text
/// that caused the issue. Malformed output has been seen to carry a list in
/// `trigger`, so it is kept as raw JSON and only used when it is a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub category: Category,
    pub check: String,
    pub message: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub line_no: Option<i64>,
    #[serde(default)]
    pub column: Option<i64>,
    #[serde(default)]
    pub column_end: Option<i64>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub trigger: Option<serde_json::Value>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl Issue {
    /// The trigger text, if the tool supplied one as a string.
    #[must_use]
    pub fn trigger_text(&self) -> Option<&str> {
        self.trigger.as_ref().and_then(serde_json::Value::as_str)
    }

    /// `true` when Credo reported no column information at all.
    #[must_use]
    pub const fn lacks_columns(&self) -> bool {
        self.column.is_none() && self.column_end.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_from_str() {
        assert_eq!(Category::from("consistency"), Category::Consistency);
        assert_eq!(Category::from("design"), Category::Design);
        assert_eq!(Category::from("readability"), Category::Readability);
        assert_eq!(Category::from("refactor"), Category::Refactor);
        assert_eq!(Category::from("warning"), Category::Warning);
        assert_eq!(
            Category::from("experimental"),
            Category::Other("experimental".to_string())
        );
    }

    #[test]
    fn test_deserialize_issue() {
        let issue: Issue = serde_json::from_value(json!({
            "category": "readability",
            "check": "Credo.Check.Readability.ModuleDoc",
            "column": 11,
            "column_end": 32,
            "filename": "lib/sample_web/telemetry.ex",
            "line_no": 1,
            "message": "Modules should have a @moduledoc tag.",
            "priority": 1,
            "scope": "SampleWeb.Telemetry",
            "trigger": "SampleWeb.Telemetry"
        }))
        .unwrap();

        assert_eq!(issue.category, Category::Readability);
        assert_eq!(issue.line_no, Some(1));
        assert_eq!(issue.column, Some(11));
        assert_eq!(issue.column_end, Some(32));
        assert_eq!(issue.trigger_text(), Some("SampleWeb.Telemetry"));
        assert!(!issue.lacks_columns());
    }

    #[test]
    fn test_deserialize_issue_with_null_columns_and_list_trigger() {
        let issue: Issue = serde_json::from_value(json!({
            "category": "warning",
            "check": "Credo.Check.Warning.MixEnv",
            "column": null,
            "column_end": null,
            "line_no": 4,
            "message": "Avoid Application.get_env/2 in module body",
            "priority": -10,
            "trigger": ["Application.get_env/2", "Dep1"]
        }))
        .unwrap();

        assert!(issue.lacks_columns());
        assert_eq!(issue.priority, -10);
        assert_eq!(issue.trigger_text(), None);
        assert_eq!(issue.filename, None);
    }

    #[test]
    fn test_serialize_category_round_trips_unknown() {
        let value = serde_json::to_value(Category::Other("custom".to_string())).unwrap();
        assert_eq!(value, json!("custom"));
    }
}
