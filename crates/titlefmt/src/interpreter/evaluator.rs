//! Tree-walking evaluation of parsed scripts.
//!
//! [`evaluate`] plans the fan-out for a record and walks the tree once per
//! branch. Evaluation never fails: names that do not resolve produce an
//! unsuccessful empty result, which a surrounding conditional group turns into
//! no output at all.

use tracing::trace;

use crate::interpreter::config::{EvalConfig, MAX_RESULT_LEN};
use crate::interpreter::context::{EvalContext, LazyArgs};
use crate::interpreter::fanout::FanOut;
use crate::interpreter::registry::{FunctionImpl, ScriptRegistry};
use crate::parser::ast::{Expression, ExpressionKind, ExpressionList};
use crate::types::{FieldValue, Metadata, ScriptResult};

/// Evaluate `expressions` against `metadata`, producing one result per
/// fan-out branch. Scripts without `%<list>%` fields produce exactly one.
pub fn evaluate(
    expressions: &[Expression],
    registry: &ScriptRegistry,
    metadata: &dyn Metadata,
    config: &EvalConfig,
) -> Vec<ScriptResult> {
    let plan = FanOut::plan(expressions, registry, metadata);
    plan.branches(config.max_branches)
        .iter()
        .map(|bindings| {
            let ctx = EvalContext::new(registry, metadata, bindings, config);
            eval_expressions(expressions, &ctx)
        })
        .collect()
}

/// Evaluate a sequence, concatenating text and combining flags.
pub fn eval_expressions(expressions: &[Expression], ctx: &EvalContext<'_>) -> ScriptResult {
    let mut result = ScriptResult::default();
    for expression in expressions {
        result.append(eval_expression(expression, ctx));
    }
    result
}

pub fn eval_expression(expression: &Expression, ctx: &EvalContext<'_>) -> ScriptResult {
    match &expression.kind {
        ExpressionKind::Literal { text } | ExpressionKind::QuotedLiteral { text } => {
            eval_literal(text)
        }
        ExpressionKind::Variable { name } => eval_variable(name, ctx),
        ExpressionKind::VariableList { name } => eval_variable_list(name, ctx),
        ExpressionKind::Function { name, args } => eval_function(name, args, ctx),
        ExpressionKind::Conditional { content } => eval_conditional(content, ctx),
    }
}

fn eval_literal(text: &str) -> ScriptResult {
    ScriptResult::literal(text)
}

fn eval_variable(name: &str, ctx: &EvalContext<'_>) -> ScriptResult {
    if !ctx.registry().resolves_variable(name) {
        trace!(name, "unresolved variable");
        return ScriptResult::unresolved();
    }
    match ctx.metadata().field(name) {
        FieldValue::Missing => ScriptResult::missing(),
        FieldValue::Single(value) => ScriptResult::field(value),
        FieldValue::Multi(values) => {
            ScriptResult::field(values.join(&ctx.config().multi_value_separator))
        }
    }
}

fn eval_variable_list(name: &str, ctx: &EvalContext<'_>) -> ScriptResult {
    if !ctx.registry().resolves_variable(name) {
        trace!(name, "unresolved list variable");
        return ScriptResult::unresolved();
    }
    match ctx.bindings().get(name) {
        Some(value) => ScriptResult::field(value),
        None => ScriptResult::missing(),
    }
}

fn eval_function(name: &str, args: &[ExpressionList], ctx: &EvalContext<'_>) -> ScriptResult {
    let Some(def) = ctx.registry().function(name) else {
        trace!(name, "unresolved function");
        return ScriptResult::unresolved();
    };
    if !def.arity.accepts(args.len()) {
        trace!(name, got = args.len(), expected = %def.arity, "argument count mismatch");
        return ScriptResult::unresolved();
    }

    let mut result = match def.call {
        FunctionImpl::Eager(call) => {
            let values: Vec<ScriptResult> =
                args.iter().map(|arg| eval_function_arg(arg, ctx)).collect();
            let mut result = call(&values, ctx);
            for value in &values {
                result.absorb_flags(value);
            }
            result
        }
        FunctionImpl::Lazy(call) => call(&LazyArgs::new(args, ctx)),
    };
    if result.value.len() > MAX_RESULT_LEN {
        trace!(name, len = result.value.len(), "function result truncated");
        result.truncate(MAX_RESULT_LEN);
    }
    result
}

/// Evaluate one function argument in the current branch.
pub fn eval_function_arg(arg: &[Expression], ctx: &EvalContext<'_>) -> ScriptResult {
    eval_expressions(arg, ctx)
}

/// A group renders its content only if every field inside resolved to a
/// value. A suppressed group keeps its flags, so an enclosing group is
/// suppressed as well.
fn eval_conditional(content: &[Expression], ctx: &EvalContext<'_>) -> ScriptResult {
    let inner = eval_expressions(content, ctx);
    if !inner.success || inner.is_empty {
        return ScriptResult {
            value: String::new(),
            ..inner
        };
    }
    ScriptResult::literal(inner.value)
}
