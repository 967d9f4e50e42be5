//! titlefmt interpreter: name registry, fan-out planning, evaluation and
//! static lint.

mod config;
mod context;
mod engine;
mod error;
mod evaluator;
mod fanout;
mod functions;
mod lint;
mod registry;

pub use config::{EvalConfig, MAX_BRANCHES, MAX_RESULT_LEN, RESULT_SEPARATOR, VALUE_SEPARATOR};
pub use context::{EvalContext, LazyArgs};
pub use engine::ScriptEngine;
pub use error::{LintWarning, RegistryError, compute_suggestions};
pub use evaluator::{eval_expression, eval_expressions, eval_function_arg, evaluate};
pub use fanout::{Bindings, FanOut};
pub use lint::lint_script;
pub use registry::{
    EagerFn, FunctionDef, FunctionImpl, LazyFn, NameKind, ScriptRegistry, VariableKind,
};
