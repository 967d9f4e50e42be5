//! Evaluation context shared by every node of one fan-out branch.

use crate::interpreter::config::EvalConfig;
use crate::interpreter::evaluator::eval_function_arg;
use crate::interpreter::fanout::Bindings;
use crate::interpreter::registry::ScriptRegistry;
use crate::parser::ast::ExpressionList;
use crate::types::{Metadata, ScriptResult};

/// Read-only state for evaluating one branch of a script.
///
/// The context carries:
/// - the registry used to resolve names
/// - the record being formatted
/// - the values bound to `%<list>%` fields for this branch
/// - the evaluation settings
pub struct EvalContext<'a> {
    registry: &'a ScriptRegistry,
    metadata: &'a dyn Metadata,
    bindings: &'a Bindings,
    config: &'a EvalConfig,
}

impl<'a> EvalContext<'a> {
    pub fn new(
        registry: &'a ScriptRegistry,
        metadata: &'a dyn Metadata,
        bindings: &'a Bindings,
        config: &'a EvalConfig,
    ) -> Self {
        Self {
            registry,
            metadata,
            bindings,
            config,
        }
    }

    pub fn registry(&self) -> &'a ScriptRegistry {
        self.registry
    }

    /// The record being formatted. Built-ins such as `$meta` read raw field
    /// values through this.
    pub fn metadata(&self) -> &'a dyn Metadata {
        self.metadata
    }

    pub fn bindings(&self) -> &'a Bindings {
        self.bindings
    }

    pub fn config(&self) -> &'a EvalConfig {
        self.config
    }
}

/// Unevaluated arguments handed to a lazy function.
///
/// Each call to [`LazyArgs::eval`] evaluates the argument afresh in the
/// caller's branch, so a function pays only for the arguments it inspects.
pub struct LazyArgs<'a, 'b> {
    args: &'a [ExpressionList],
    ctx: &'a EvalContext<'b>,
}

impl<'a, 'b> LazyArgs<'a, 'b> {
    pub fn new(args: &'a [ExpressionList], ctx: &'a EvalContext<'b>) -> Self {
        Self { args, ctx }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Evaluate argument `index`. Out-of-range arguments evaluate to an
    /// empty, successful result.
    pub fn eval(&self, index: usize) -> ScriptResult {
        self.args
            .get(index)
            .map(|arg| eval_function_arg(arg, self.ctx))
            .unwrap_or_default()
    }

    pub fn context(&self) -> &'a EvalContext<'b> {
        self.ctx
    }
}
