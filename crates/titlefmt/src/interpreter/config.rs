//! Evaluation settings.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Separator placed between the results of a fanned-out script when they are
/// joined into one string (ASCII unit separator).
pub const RESULT_SEPARATOR: &str = "\u{1f}";

/// Separator between the values of a multi-valued field referenced as a
/// plain `%name%` variable.
pub const VALUE_SEPARATOR: &str = ", ";

/// Default cap on the number of fan-out branches evaluated per record.
pub const MAX_BRANCHES: usize = 64;

/// Upper bound, in bytes, on the text any single function call produces.
/// Longer results are cut at a character boundary.
pub const MAX_RESULT_LEN: usize = 64 * 1024;

/// Settings that shape evaluation output.
///
/// # Example
///
/// ```
/// use titlefmt::EvalConfig;
///
/// let config = EvalConfig::builder()
///     .result_separator("\n")
///     .max_branches(8)
///     .build();
///
/// assert_eq!(config.multi_value_separator, ", ");
/// assert_eq!(config.max_branches, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
#[serde(default)]
pub struct EvalConfig {
    /// Joins the values of a multi-valued field used as `%name%`.
    #[builder(default = VALUE_SEPARATOR.to_string())]
    pub multi_value_separator: String,

    /// Joins fan-out results in [`crate::ScriptEngine::evaluate_script`].
    #[builder(default = RESULT_SEPARATOR.to_string())]
    pub result_separator: String,

    /// Upper bound on fan-out branches; extra combinations are dropped.
    #[builder(default = MAX_BRANCHES)]
    pub max_branches: usize,

    /// Drop repeated results, keeping the first occurrence. Off by default,
    /// so a list field with N values yields N results.
    #[builder(default)]
    pub dedup_results: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig::builder().build()
    }
}
