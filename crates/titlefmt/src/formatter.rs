//! Joining per-branch results into final output.

use crate::interpreter::EvalConfig;
use crate::types::ScriptResult;

/// The text of every branch, de-duplicated in first-seen order when
/// [`EvalConfig::dedup_results`] is set.
pub fn collect_values(results: &[ScriptResult], config: &EvalConfig) -> Vec<String> {
    let mut values: Vec<String> = Vec::with_capacity(results.len());
    for result in results {
        if !config.dedup_results || !values.contains(&result.value) {
            values.push(result.value.clone());
        }
    }
    values
}

/// All branches joined with [`EvalConfig::result_separator`].
///
/// A script without list fields has a single branch, so its output carries
/// no separator at all.
pub fn format_results(results: &[ScriptResult], config: &EvalConfig) -> String {
    collect_values(results, config).join(&config.result_separator)
}
