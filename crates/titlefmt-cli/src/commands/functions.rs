//! Implementation of the `titlefmt functions` command.

use clap::Args;
use miette::{Result, miette};
use serde::Serialize;
use titlefmt_semantics::FunctionId;

use crate::output::table::{format_functions_table, strategy_label};

/// Arguments for the functions command.
#[derive(Debug, Args)]
pub struct FunctionsArgs {
    /// Only list functions whose name or alias contains this text
    pub filter: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output format for one built-in function.
#[derive(Debug, Serialize)]
struct FunctionJson {
    name: &'static str,
    aliases: &'static [&'static str],
    arguments: String,
    strategy: &'static str,
}

/// Run the functions command.
pub fn run_functions(args: FunctionsArgs) -> Result<i32> {
    let functions = matching_functions(args.filter.as_deref());

    if args.json {
        let output: Vec<FunctionJson> = functions
            .iter()
            .map(|id| FunctionJson {
                name: id.name(),
                aliases: id.aliases(),
                arguments: id.arity().to_string(),
                strategy: strategy_label(id.strategy()),
            })
            .collect();
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| miette!("Failed to serialize output: {}", e))?;
        println!("{json}");
    } else if functions.is_empty() {
        println!("no matching functions");
    } else {
        println!("{}", format_functions_table(&functions));
    }

    Ok(exitcode::OK)
}

fn matching_functions(filter: Option<&str>) -> Vec<FunctionId> {
    let Some(filter) = filter.map(str::to_lowercase) else {
        return FunctionId::ALL.to_vec();
    };
    FunctionId::ALL
        .iter()
        .copied()
        .filter(|id| {
            id.name().contains(&filter) || id.aliases().iter().any(|alias| alias.contains(&filter))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filter_lists_everything() {
        assert_eq!(matching_functions(None).len(), FunctionId::ALL.len());
    }

    #[test]
    fn filter_matches_names_case_insensitively() {
        let found = matching_functions(Some("UPPER"));
        assert!(found.iter().any(|id| id.name() == "upper"));
        assert!(found.iter().all(|id| id.name().contains("upper")
            || id.aliases().iter().any(|a| a.contains("upper"))));
    }

    #[test]
    fn unmatched_filter_is_empty() {
        assert!(matching_functions(Some("zzz")).is_empty());
    }
}
