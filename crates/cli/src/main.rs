mod commands;
mod exit_code;

use clap::{Parser, Subcommand};
use exit_code::ExitCode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "credo-ls")]
#[command(about = "Credo language server and command-line linter for Elixir", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a .credo-ls.toml or .credo-ls.json config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except results and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show informational output (warnings, summaries)
    pub show_info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Language Server Protocol (LSP) server
    ///
    /// Lints Elixir documents with `mix credo` when they are opened or saved
    /// and publishes the issues as diagnostics. The server communicates via
    /// stdio using JSON-RPC.
    Lsp,

    /// Run Credo once on a file and print its issues
    Lint {
        /// Elixir file inside a Mix project
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Show Credo, Elixir and Erlang versions and what Credo would analyze
    Info {
        /// Directory inside the Mix project (defaults to the current directory)
        dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The server sets up its own subscriber without ANSI colors; initializing
    // the CLI one first would make its try_init fail.
    if matches!(cli.command, Commands::Lsp) {
        return commands::lsp::run().await;
    }

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_info: !cli.quiet,
    };

    let code = match cli.command {
        Commands::Lint { file, format } => {
            commands::lint::run(cli.config, &file, format, output_opts).await?
        }
        Commands::Info { dir, format } => {
            commands::info::run(cli.config, dir, format, output_opts).await?
        }
        Commands::Lsp => unreachable!("handled above"),
    };

    tracing::debug!(%code, "Command finished");
    if code != ExitCode::Success {
        code.exit();
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color || std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if std::env::var("CLICOLOR").is_ok_and(|val| val == "0") {
        control::set_override(false);
    }
}
