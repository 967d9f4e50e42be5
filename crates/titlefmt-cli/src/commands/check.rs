//! Implementation of the `titlefmt check` command.

use clap::Args;
use miette::{IntoDiagnostic, Report, Result, miette};
use owo_colors::OwoColorize;
use serde::Serialize;
use titlefmt::{LintWarning, ScriptError, ScriptRegistry, lint_script, parse};

use crate::commands::source::ScriptSource;
use crate::output::{LintDiagnostic, ScriptDiagnostic};

/// Arguments for the check command.
#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: ScriptSource,

    /// Declare a single-valued field; once any field is declared, undeclared
    /// fields are reported (repeatable)
    #[arg(long = "var", value_name = "NAME")]
    pub vars: Vec<String>,

    /// Declare a multi-valued field (repeatable)
    #[arg(long = "list", value_name = "NAME")]
    pub lists: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat lint warnings as failures
    #[arg(long)]
    pub strict: bool,
}

/// JSON output for the check command.
#[derive(Serialize)]
struct CheckJson<'a> {
    valid: bool,
    errors: &'a [ScriptError],
    warnings: &'a [LintWarning],
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let (name, text) = args.source.load()?;
    let script = parse(&text);
    let registry = build_registry(&args.vars, &args.lists)?;
    let warnings = lint_script(&script, &registry);

    if args.json {
        let output = CheckJson {
            valid: script.is_valid(),
            errors: &script.errors,
            warnings: &warnings,
        };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| miette!("Failed to serialize output: {}", e))?;
        println!("{json}");
    } else {
        for error in &script.errors {
            let diagnostic = ScriptDiagnostic::from_script_error(&name, &text, error);
            eprintln!("{:?}", Report::new(diagnostic));
        }
        for warning in &warnings {
            let diagnostic = LintDiagnostic::from_warning(&name, &text, warning);
            eprintln!("{:?}", Report::new(diagnostic));
        }
        print_summary(script.errors.len(), warnings.len());
    }

    let failed = !script.is_valid() || (args.strict && !warnings.is_empty());
    Ok(if failed {
        exitcode::DATAERR
    } else {
        exitcode::OK
    })
}

/// An open registry unless fields were declared on the command line.
fn build_registry(vars: &[String], lists: &[String]) -> Result<ScriptRegistry> {
    let registry = ScriptRegistry::new();
    if vars.is_empty() && lists.is_empty() {
        return Ok(registry);
    }
    registry
        .closed()
        .with_variables(vars)
        .and_then(|registry| registry.with_list_variables(lists))
        .into_diagnostic()
}

fn print_summary(errors: usize, warnings: usize) {
    if errors == 0 && warnings == 0 {
        println!("{} script is valid", "✓".green());
    } else if errors == 0 {
        println!("{} script is valid, {warnings} warning(s)", "!".yellow());
    } else {
        println!("{} {errors} error(s), {warnings} warning(s)", "✗".red());
    }
}

#[cfg(test)]
mod tests {
    use titlefmt::NameKind;

    use super::*;

    #[test]
    fn registry_is_open_without_declarations() {
        let registry = build_registry(&[], &[]).unwrap();
        assert!(registry.is_open());
    }

    #[test]
    fn declared_fields_close_the_registry() {
        let registry =
            build_registry(&["title".to_string()], &["genre".to_string()]).unwrap();
        assert!(!registry.is_open());
        assert_eq!(registry.classify("title"), NameKind::Variable);
        assert_eq!(registry.classify("genre"), NameKind::VariableList);
        assert_eq!(registry.classify("artist"), NameKind::Unknown);
    }

    #[test]
    fn undeclarable_field_is_an_error() {
        assert!(build_registry(&["a,b".to_string()], &[]).is_err());
    }
}
