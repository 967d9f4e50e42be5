//! titlefmt CLI entry point.
//!
//! Provides command-line tools for working with title-formatting scripts:
//! - `titlefmt check` - Report syntax errors and lint warnings
//! - `titlefmt eval` - Evaluate a script against a track
//! - `titlefmt functions` - List the built-in functions

mod commands;
mod output;

use std::io;
use std::process::exit;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{CheckArgs, EvalArgs, FunctionsArgs, run_check, run_eval, run_functions};
use tracing_subscriber::EnvFilter;

/// Title-formatting script tools.
#[derive(Debug, Parser)]
#[command(name = "titlefmt")]
#[command(about = "Title-formatting script tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Log parser and evaluator activity to stderr (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check a script for syntax errors and suspicious constructs
    Check(CheckArgs),
    /// Evaluate a script against track metadata
    Eval(EvalArgs),
    /// List the built-in functions
    Functions(FunctionsArgs),
}

/// Set up color output based on user preference.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {
            // owo-colors automatically checks TTY, NO_COLOR, FORCE_COLOR
        }
        ColorWhen::Always => {
            owo_colors::set_override(true);
        }
        ColorWhen::Never => {
            owo_colors::set_override(false);
        }
    }
}

/// Route `tracing` events to stderr. `RUST_LOG` takes precedence over
/// `--verbose`.
fn setup_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "titlefmt=debug",
        _ => "titlefmt=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_tracing(cli.verbose);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Eval(args) => run_eval(args),
        Commands::Functions(args) => run_functions(args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{e:?}");
            exit(exitcode::SOFTWARE);
        }
    }
}
