//! Error and warning types for the titlefmt interpreter.

use serde::Serialize;
use strsim::levenshtein;
use thiserror::Error;

use titlefmt_semantics::Arity;

/// Errors raised when configuring a [`crate::ScriptRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Function names must be usable after `$` in a script.
    #[error("invalid function name '{name}': use letters, digits and '_' only")]
    InvalidFunctionName { name: String },

    /// Variable names must be usable between `%` delimiters.
    #[error("invalid variable name '{name}'")]
    InvalidVariableName { name: String },
}

/// A finding from [`crate::lint_script`]. Advisory only: it never affects
/// parse validity or evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LintWarning {
    #[error("unknown variable '%{name}%'{}", format_suggestions(suggestions, "%", "%"))]
    UnknownVariable {
        name: String,
        position: usize,
        suggestions: Vec<String>,
    },

    #[error("unknown function '${name}'{}", format_suggestions(suggestions, "$", ""))]
    UnknownFunction {
        name: String,
        position: usize,
        suggestions: Vec<String>,
    },

    #[error("function '${name}' expects {expected} arguments, got {got}")]
    ArgumentCount {
        name: String,
        position: usize,
        #[serde(serialize_with = "serialize_arity")]
        expected: Arity,
        got: usize,
    },

    #[error("'%<{name}>%' fans out over a single-valued field; use '%{name}%'")]
    ListOfSingleValue { name: String, position: usize },

    #[error("conditional group has no fields and is always shown")]
    StaticConditional { position: usize },
}

impl LintWarning {
    /// Byte offset of the offending construct.
    pub fn position(&self) -> usize {
        match self {
            LintWarning::UnknownVariable { position, .. }
            | LintWarning::UnknownFunction { position, .. }
            | LintWarning::ArgumentCount { position, .. }
            | LintWarning::ListOfSingleValue { position, .. }
            | LintWarning::StaticConditional { position } => *position,
        }
    }

    /// Suggested replacement names, if any.
    pub fn suggestions(&self) -> &[String] {
        match self {
            LintWarning::UnknownVariable { suggestions, .. }
            | LintWarning::UnknownFunction { suggestions, .. } => suggestions,
            LintWarning::ArgumentCount { .. }
            | LintWarning::ListOfSingleValue { .. }
            | LintWarning::StaticConditional { .. } => &[],
        }
    }
}

fn serialize_arity<S: serde::Serializer>(arity: &Arity, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(arity)
}

fn format_suggestions(suggestions: &[String], prefix: &str, suffix: &str) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let names: Vec<String> = suggestions
        .iter()
        .map(|s| format!("'{prefix}{s}{suffix}'"))
        .collect();
    format!(", did you mean {}?", names.join(" or "))
}

/// Compute typo suggestions using Levenshtein distance.
///
/// - Max distance 1 for names of 3 characters or fewer, 2 otherwise
/// - At most 3 suggestions, closest first, ties in input order
pub fn compute_suggestions<'a>(
    name: &str,
    available: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let max_distance = if name.chars().count() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, &str)> = available
        .into_iter()
        .filter_map(|candidate| {
            let dist = levenshtein(name, candidate);
            (dist > 0 && dist <= max_distance).then_some((dist, candidate))
        })
        .collect();

    suggestions.sort_by_key(|(dist, _)| *dist);
    suggestions.dedup_by(|a, b| a.1 == b.1);
    suggestions
        .into_iter()
        .take(3)
        .map(|(_, s)| s.to_string())
        .collect()
}
