//! Table formatting utilities for CLI output.

use comfy_table::{ContentArrangement, Table, presets};
use titlefmt_semantics::{FunctionId, Strategy};

/// Format the built-in function list as a table.
pub fn format_functions_table(functions: &[FunctionId]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Function", "Aliases", "Arguments", "Evaluation"]);

    for id in functions {
        table.add_row(vec![
            format!("${}", id.name()),
            id.aliases().join(", "),
            id.arity().to_string(),
            strategy_label(id.strategy()).to_string(),
        ]);
    }

    table
}

pub fn strategy_label(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Eager => "eager",
        Strategy::Lazy => "lazy",
    }
}
