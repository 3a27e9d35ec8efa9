use crate::commands::common::{load_command_config, print_error, print_warning};
use crate::exit_code::ExitCode;
use crate::{OutputFormat, OutputOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use credo_lsp::{severity_map, LintTarget, Linter, TokioCommandRunner};
use credo_parser::{parse_issues, Diagnostic};
use credo_types::{DiagnosticSeverity, Document, DocumentUri, ELIXIR_LANGUAGE_ID};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One diagnostic in `--format json` output. Positions are 1-based.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct DiagnosticOutput<'a> {
    file: &'a str,
    line: u32,
    column: u32,
    end_line: u32,
    end_column: u32,
    severity: String,
    category: &'a str,
    check: &'a str,
    message: &'a str,
}

impl<'a> DiagnosticOutput<'a> {
    fn new(file: &'a str, diagnostic: &'a Diagnostic) -> Self {
        Self {
            file,
            line: diagnostic.range.start.line + 1,
            column: diagnostic.range.start.character + 1,
            end_line: diagnostic.range.end.line + 1,
            end_column: diagnostic.range.end.character + 1,
            severity: diagnostic.severity.to_string(),
            category: diagnostic.category.as_str(),
            check: &diagnostic.code,
            message: &diagnostic.message,
        }
    }
}

pub async fn run(
    config_path: Option<PathBuf>,
    file: &Path,
    format: OutputFormat,
    output_opts: OutputOptions,
) -> Result<ExitCode> {
    let file = std::fs::canonicalize(file)
        .with_context(|| format!("Cannot find {}", file.display()))?;
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Cannot read {}", file.display()))?;

    let start_dir = file.parent().unwrap_or(&file);
    let config = match load_command_config(config_path.as_deref(), start_dir) {
        Ok(config) => config,
        Err(error) => {
            print_error(format!("{error:#}"));
            return Ok(ExitCode::ConfigError);
        }
    };

    let Some(uri) = DocumentUri::from_file_path(&file) else {
        print_error(format!("{} is not an absolute path", file.display()));
        return Ok(ExitCode::ToolError);
    };
    let document = Document::new(uri, ELIXIR_LANGUAGE_ID, text.as_str());
    let target = match LintTarget::new(document, None) {
        Ok(target) => target,
        Err(error) => {
            print_error(format!("{}: {error}", file.display()));
            return Ok(ExitCode::ToolError);
        }
    };
    if !target.layout.is_mix_project {
        print_error(format!("No mix.exs found above {}", file.display()));
        return Ok(ExitCode::ToolError);
    }

    let linter = Linter::new(Arc::new(TokioCommandRunner), Arc::new(config));
    let report = match linter.run(&target).await {
        Ok(report) => report,
        Err(error) => {
            print_error(&error);
            return Ok(ExitCode::ToolError);
        }
    };

    if output_opts.show_info {
        for warning in &report.warnings {
            print_warning(warning);
        }
    }

    let display_path = target
        .layout
        .relative_path(&file)
        .unwrap_or_else(|| file.clone())
        .display()
        .to_string();

    let Some(output) = report.output else {
        if output_opts.show_info && matches!(format, OutputFormat::Human) {
            println!(
                "{}",
                format!("{display_path} is excluded by the Credo configuration").yellow()
            );
        }
        if matches!(format, OutputFormat::Json) {
            println!("[]");
        }
        return Ok(ExitCode::Success);
    };

    let diagnostics = parse_issues(output.issues(), &text, &severity_map(linter.config()));

    match format {
        OutputFormat::Human => print_human(&display_path, &diagnostics, output_opts),
        OutputFormat::Json => println!("{}", render_json(&display_path, &diagnostics)?),
    }

    if diagnostics.is_empty() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::IssuesFound)
    }
}

fn print_human(path: &str, diagnostics: &[Diagnostic], output_opts: OutputOptions) {
    for diagnostic in diagnostics {
        let severity = diagnostic.severity.to_string();
        let severity = match diagnostic.severity {
            DiagnosticSeverity::Error => severity.red().bold(),
            DiagnosticSeverity::Warning => severity.yellow().bold(),
            DiagnosticSeverity::Information => severity.blue().bold(),
            DiagnosticSeverity::Hint => severity.cyan(),
        };
        println!(
            "{}: {severity} {}",
            location(path, diagnostic),
            diagnostic.message
        );
    }

    if !output_opts.show_info {
        return;
    }
    if diagnostics.is_empty() {
        println!("{}", "✓ No issues found".green());
    } else {
        let noun = if diagnostics.len() == 1 { "issue" } else { "issues" };
        println!(
            "\n{}",
            format!("✗ Found {} {noun}", diagnostics.len()).yellow()
        );
    }
}

/// `path:line:column`, 1-based.
fn location(path: &str, diagnostic: &Diagnostic) -> String {
    format!(
        "{path}:{}:{}",
        diagnostic.range.start.line + 1,
        diagnostic.range.start.character + 1
    )
}

fn render_json(path: &str, diagnostics: &[Diagnostic]) -> Result<String> {
    let output: Vec<DiagnosticOutput<'_>> = diagnostics
        .iter()
        .map(|diagnostic| DiagnosticOutput::new(path, diagnostic))
        .collect();
    Ok(serde_json::to_string_pretty(&output)?)
}
