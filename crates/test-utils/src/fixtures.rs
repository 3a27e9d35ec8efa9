//! Captured `mix credo` output for [`SAMPLE_SOURCE`].

/// `lib/sample.ex` as analyzed by the fixtures below.
pub const SAMPLE_SOURCE: &str = "defmodule Sample do
  def key do
    # TODO: any
    Application.get_env(:sample, :key)
  end
end
";

/// `mix credo suggest --format json --read-from-stdin`
pub const SUGGEST_OUTPUT: &str = r#"{
  "issues": [
    {
      "category": "readability",
      "check": "Credo.Check.Readability.ModuleDoc",
      "column": 11,
      "column_end": 17,
      "filename": "lib/sample.ex",
      "line_no": 1,
      "message": "Modules should have a @moduledoc tag.",
      "priority": 1,
      "scope": "Sample",
      "trigger": "Sample"
    },
    {
      "category": "warning",
      "check": "Credo.Check.Warning.ApplicationConfigInModuleAttribute",
      "column": null,
      "column_end": null,
      "filename": "lib/sample.ex",
      "line_no": 4,
      "message": "Avoid Application.get_env/2 in module body",
      "priority": 12,
      "scope": "Sample.key",
      "trigger": "Application.get_env/2"
    }
  ]
}"#;

/// Suggest output for a file without issues.
pub const EMPTY_SUGGEST_OUTPUT: &str = r#"{ "issues": [] }"#;

/// `mix credo diff --from-git-merge-base HEAD --format json --read-from-stdin`
pub const DIFF_OUTPUT: &str = r##"{
  "diff": {
    "new": [
      {
        "category": "design",
        "check": "Credo.Check.Design.TagTODO",
        "column": null,
        "column_end": null,
        "filename": "lib/sample.ex",
        "line_no": 3,
        "message": "Found a TODO tag in a comment: # TODO: any",
        "priority": -5,
        "scope": "Sample.key",
        "trigger": "# TODO: any"
      }
    ],
    "fixed": [],
    "old": [
      {
        "category": "readability",
        "check": "Credo.Check.Readability.ModuleDoc",
        "column": 11,
        "column_end": 17,
        "filename": "lib/sample.ex",
        "line_no": 1,
        "message": "Modules should have a @moduledoc tag.",
        "priority": 1,
        "scope": "Sample",
        "trigger": "Sample"
      }
    ]
  }
}"##;

/// `mix credo info --format json --verbose`
pub const INFO_OUTPUT: &str = r#"{
  "config": {
    "checks": [
      ["Credo.Check.Design.TagTODO", {"exit_status": 2}],
      ["Credo.Check.Readability.ModuleDoc", []]
    ],
    "files": ["lib/sample.ex", "mix.exs"]
  },
  "system": {
    "credo": "1.7.5",
    "elixir": "1.16.1",
    "erlang": "26"
  }
}"#;
