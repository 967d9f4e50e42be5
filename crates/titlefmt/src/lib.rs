pub mod formatter;
pub mod interpreter;
pub mod parser;
pub mod types;

pub use formatter::{collect_values, format_results};
pub use interpreter::{
    EvalConfig, EvalContext, FunctionDef, FunctionImpl, LazyArgs, LintWarning, NameKind,
    RegistryError, ScriptEngine, ScriptRegistry, VariableKind, compute_suggestions, evaluate,
    lint_script,
};
pub use parser::{
    Expression, ExpressionKind, ExpressionList, MAX_NESTING_DEPTH, ParsedScript, ScriptError,
    SyntaxErrorKind,
};
pub use titlefmt_semantics::{Arity, FunctionId, Strategy};
pub use types::{FieldValue, Metadata, ScriptResult, Track};

/// Parses a script without an engine.
///
/// Equivalent to [`ScriptEngine::parse`] minus remembering the result.
///
/// # Example
///
/// ```
/// let script = titlefmt::parse("[%artist% - ]%title%");
/// assert!(script.is_valid());
/// assert_eq!(script.expressions.len(), 2);
/// ```
pub fn parse(text: &str) -> ParsedScript {
    parser::parse_script(text)
}
