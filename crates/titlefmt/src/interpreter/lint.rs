//! Static lint rules for parsed scripts.
//!
//! Checks a script against a registry without evaluating it: unknown names,
//! argument counts, and constructs that cannot behave the way they read.

use crate::interpreter::error::{LintWarning, compute_suggestions};
use crate::interpreter::registry::{ScriptRegistry, VariableKind};
use crate::parser::ast::{Expression, ExpressionKind, ParsedScript};

/// Runs every lint rule over `script`, returning warnings ordered by position.
///
/// Warnings are advisory. A script with warnings still parses as valid and
/// evaluates exactly as it would without them.
pub fn lint_script(script: &ParsedScript, registry: &ScriptRegistry) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    lint_expressions(&script.expressions, registry, &mut warnings);
    warnings.sort_by_key(LintWarning::position);
    warnings
}

fn lint_expressions(
    expressions: &[Expression],
    registry: &ScriptRegistry,
    warnings: &mut Vec<LintWarning>,
) {
    for expression in expressions {
        let position = expression.position;
        match &expression.kind {
            ExpressionKind::Literal { .. } | ExpressionKind::QuotedLiteral { .. } => {}
            ExpressionKind::Variable { name } => {
                lint_unknown_variable(name, position, registry, warnings);
            }
            ExpressionKind::VariableList { name } => {
                if registry.variable_kind(name) == Some(VariableKind::Single) {
                    warnings.push(LintWarning::ListOfSingleValue {
                        name: name.clone(),
                        position,
                    });
                } else {
                    lint_unknown_variable(name, position, registry, warnings);
                }
            }
            ExpressionKind::Function { name, args } => {
                match registry.function(name) {
                    None => warnings.push(LintWarning::UnknownFunction {
                        name: name.clone(),
                        position,
                        suggestions: compute_suggestions(
                            &name.to_lowercase(),
                            registry.function_names(),
                        ),
                    }),
                    Some(def) if !def.arity.accepts(args.len()) => {
                        warnings.push(LintWarning::ArgumentCount {
                            name: name.clone(),
                            position,
                            expected: def.arity,
                            got: args.len(),
                        });
                    }
                    Some(_) => {}
                }
                for arg in args {
                    lint_expressions(arg, registry, warnings);
                }
            }
            ExpressionKind::Conditional { content } => {
                if !content.iter().any(is_dynamic) {
                    warnings.push(LintWarning::StaticConditional { position });
                }
                lint_expressions(content, registry, warnings);
            }
        }
    }
}

fn lint_unknown_variable(
    name: &str,
    position: usize,
    registry: &ScriptRegistry,
    warnings: &mut Vec<LintWarning>,
) {
    if registry.resolves_variable(name) {
        return;
    }
    let lowered = name.to_lowercase();
    warnings.push(LintWarning::UnknownVariable {
        name: name.to_string(),
        position,
        suggestions: compute_suggestions(&lowered, registry.variable_names()),
    });
}

/// Whether a node can make an enclosing conditional drop its output.
fn is_dynamic(expression: &Expression) -> bool {
    match &expression.kind {
        ExpressionKind::Variable { .. }
        | ExpressionKind::VariableList { .. }
        | ExpressionKind::Function { .. } => true,
        // A suppressed inner group suppresses the outer one.
        ExpressionKind::Conditional { content } => content.iter().any(is_dynamic),
        ExpressionKind::Literal { .. } | ExpressionKind::QuotedLiteral { .. } => false,
    }
}
