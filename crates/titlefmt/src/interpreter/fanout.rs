//! Multi-value fan-out planning.
//!
//! Every distinct `%<name>%` field in a script is resolved once per record.
//! The plan then enumerates one [`Bindings`] per combination of values, and
//! the evaluator walks the whole tree once per binding. All occurrences of a
//! field in one branch see the same value.

use std::borrow::Cow;

use tracing::debug;

use crate::interpreter::registry::ScriptRegistry;
use crate::parser::ast::{Expression, ExpressionKind};
use crate::types::Metadata;

/// The value bound to each list field in one branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: Vec<(String, String)>,
}

impl Bindings {
    /// The value bound to `name` in this branch, if the field has one.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.entries
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The resolved list fields of a script for one record.
#[derive(Debug, Clone, Default)]
pub struct FanOut {
    /// Fields in first-seen order with their values.
    fields: Vec<(String, Vec<String>)>,
}

impl FanOut {
    /// Collect the distinct list fields of `expressions` and resolve them
    /// against `metadata`. Names the registry cannot resolve are skipped;
    /// they evaluate as unresolved in every branch.
    pub fn plan(
        expressions: &[Expression],
        registry: &ScriptRegistry,
        metadata: &dyn Metadata,
    ) -> Self {
        let mut names = Vec::new();
        collect_list_fields(expressions, &mut names);

        let fields = names
            .into_iter()
            .filter(|name| registry.resolves_variable(name))
            .map(|name| {
                let values = metadata
                    .field(&name)
                    .into_values()
                    .into_iter()
                    .map(Cow::into_owned)
                    .collect();
                (name, values)
            })
            .collect();
        Self { fields }
    }

    /// Total number of combinations, before any cap. Empty fields count once.
    pub fn branch_count(&self) -> usize {
        self.fields
            .iter()
            .fold(1usize, |count, (_, values)| count.saturating_mul(values.len().max(1)))
    }

    /// Enumerate up to `max_branches` bindings in odometer order: the field
    /// seen first varies slowest.
    pub fn branches(&self, max_branches: usize) -> Vec<Bindings> {
        let total = self.branch_count();
        let limit = total.min(max_branches.max(1));
        if limit < total {
            debug!(total, limit, "fan-out truncated");
        }

        let mut indices = vec![0usize; self.fields.len()];
        let mut branches = Vec::with_capacity(limit);
        for _ in 0..limit {
            branches.push(self.bind(&indices));
            self.advance(&mut indices);
        }
        branches
    }

    fn bind(&self, indices: &[usize]) -> Bindings {
        let entries = self
            .fields
            .iter()
            .zip(indices)
            .filter_map(|((name, values), &index)| {
                values.get(index).map(|value| (name.clone(), value.clone()))
            })
            .collect();
        Bindings { entries }
    }

    /// Step the odometer: the last field turns fastest and carries left.
    fn advance(&self, indices: &mut [usize]) {
        for (index, (_, values)) in indices.iter_mut().zip(&self.fields).rev() {
            *index += 1;
            if *index < values.len() {
                return;
            }
            *index = 0;
        }
    }
}

/// Distinct list field names in pre-order, lowercased.
fn collect_list_fields(expressions: &[Expression], names: &mut Vec<String>) {
    for expression in expressions {
        match &expression.kind {
            ExpressionKind::VariableList { name } => {
                let name = name.to_lowercase();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            ExpressionKind::Function { args, .. } => {
                for arg in args {
                    collect_list_fields(arg, names);
                }
            }
            ExpressionKind::Conditional { content } => collect_list_fields(content, names),
            ExpressionKind::Literal { .. }
            | ExpressionKind::QuotedLiteral { .. }
            | ExpressionKind::Variable { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_script;
    use crate::types::Track;

    fn plan(script: &str, track: &Track) -> FanOut {
        let parsed = parse_script(script);
        FanOut::plan(&parsed.expressions, &ScriptRegistry::new(), track)
    }

    #[test]
    fn repeated_fields_are_collected_once() {
        let track = Track::new().with_values("genre", ["Rock", "Jazz"]);
        let fanout = plan("%<genre>% [$upper(%<GENRE>%)]", &track);
        assert_eq!(fanout.fields.len(), 1);
        assert_eq!(fanout.branch_count(), 2);
    }

    #[test]
    fn odometer_varies_first_field_slowest() {
        let track = Track::new()
            .with_values("a", ["1", "2"])
            .with_values("b", ["x", "y"]);
        let branches = plan("%<a>%%<b>%", &track).branches(64);
        let pairs: Vec<(Option<&str>, Option<&str>)> =
            branches.iter().map(|b| (b.get("a"), b.get("b"))).collect();
        assert_eq!(
            pairs,
            vec![
                (Some("1"), Some("x")),
                (Some("1"), Some("y")),
                (Some("2"), Some("x")),
                (Some("2"), Some("y")),
            ]
        );
    }

    #[test]
    fn empty_field_yields_one_unbound_branch() {
        let branches = plan("%<genre>%", &Track::new()).branches(64);
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].get("genre"), None);
    }

    #[test]
    fn branch_cap_truncates() {
        let track = Track::new()
            .with_values("a", ["1", "2", "3"])
            .with_values("b", ["x", "y", "z"]);
        let fanout = plan("%<a>%%<b>%", &track);
        assert_eq!(fanout.branch_count(), 9);
        assert_eq!(fanout.branches(4).len(), 4);
    }
}
