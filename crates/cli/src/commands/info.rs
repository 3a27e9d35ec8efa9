use crate::commands::common::{load_command_config, print_error, print_warning};
use crate::exit_code::ExitCode;
use crate::{OutputFormat, OutputOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use credo_lsp::{find_up, Linter, ProjectLayout, TokioCommandRunner};
use credo_parser::CredoInfo;
use std::path::PathBuf;
use std::sync::Arc;

/// Print what `mix credo info` reports for the project containing `dir`.
pub async fn run(
    config_path: Option<PathBuf>,
    dir: Option<PathBuf>,
    format: OutputFormat,
    output_opts: OutputOptions,
) -> Result<ExitCode> {
    let start = match dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    let start = std::fs::canonicalize(&start)
        .with_context(|| format!("Cannot find {}", start.display()))?;

    let config = match load_command_config(config_path.as_deref(), &start) {
        Ok(config) => config,
        Err(error) => {
            print_error(format!("{error:#}"));
            return Ok(ExitCode::ConfigError);
        }
    };

    let Some(folder) = find_up("mix.exs", &start, None) else {
        print_error(format!("No mix.exs found above {}", start.display()));
        return Ok(ExitCode::ToolError);
    };
    let layout = ProjectLayout {
        folder,
        is_mix_project: true,
    };

    let linter = Linter::new(Arc::new(TokioCommandRunner), Arc::new(config));
    let mut warnings = Vec::new();
    let result = linter.info(&layout, &mut warnings).await;

    if output_opts.show_info {
        for warning in &warnings {
            print_warning(warning);
        }
    }

    let info = match result {
        Ok(info) => info,
        Err(error) => {
            print_error(&error);
            return Ok(ExitCode::ToolError);
        }
    };

    match format {
        OutputFormat::Human => {
            for line in summary(&layout, &info) {
                println!("{line}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
    }

    Ok(ExitCode::Success)
}

fn summary(layout: &ProjectLayout, info: &CredoInfo) -> Vec<String> {
    let system = &info.system;
    vec![
        format!(
            "{} {} (Elixir {}, Erlang/OTP {})",
            "Credo".bold(),
            system.credo,
            system.elixir,
            system.erlang
        ),
        format!("Project: {}", layout.folder.display()),
        format!("Checks enabled: {}", info.config.checks.len()),
        format!("Files analyzed: {}", info.config.files.len()),
    ]
}
