//! The caller-facing script engine.
//!
//! `ScriptEngine` bundles a shared registry, evaluation settings, the most
//! recently parsed script and an ambient record, so that simple callers can
//! `parse` once and `evaluate` repeatedly.

use std::slice;
use std::sync::Arc;

use bon::Builder;

use crate::formatter::{collect_values, format_results};
use crate::interpreter::config::EvalConfig;
use crate::interpreter::evaluator::evaluate;
use crate::interpreter::registry::ScriptRegistry;
use crate::parser::ast::{Expression, ParsedScript};
use crate::parser::parse_script;
use crate::types::{Metadata, ScriptResult, Track};

/// Parses and evaluates title-formatting scripts.
///
/// Every `evaluate*` method returns a string: malformed scripts and
/// unresolved names degrade to partial output rather than errors. Inspect
/// [`ParsedScript::errors`] for diagnostics.
///
/// The engine's ambient record is owned by this value and never shared. For
/// concurrent use, share the registry and a [`ParsedScript`] across threads
/// and call the methods that take the record explicitly.
///
/// # Example
///
/// ```
/// use titlefmt::{ScriptEngine, Track};
///
/// let mut engine = ScriptEngine::new();
/// engine.set_metadata(Track::new().with("artist", "Nina Simone").with("title", "Sinnerman"));
/// engine.parse("%artist% - %title%[ (%year%)]");
///
/// assert_eq!(engine.evaluate(), "Nina Simone - Sinnerman");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ScriptEngine {
    /// Names and functions scripts may reference.
    #[builder(default = Arc::new(ScriptRegistry::new()))]
    registry: Arc<ScriptRegistry>,

    #[builder(default)]
    config: EvalConfig,

    /// The ambient record used by [`ScriptEngine::evaluate`] and
    /// [`ScriptEngine::evaluate_current`].
    metadata: Option<Track>,

    #[builder(skip)]
    last_script: ParsedScript,
}

impl Default for ScriptEngine {
    fn default() -> Self {
        ScriptEngine::builder().build()
    }
}

impl ScriptEngine {
    /// Create an engine with the built-in functions and default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine over an existing, possibly shared, registry.
    pub fn with_registry(registry: Arc<ScriptRegistry>) -> Self {
        ScriptEngine::builder().registry(registry).build()
    }

    pub fn registry(&self) -> &Arc<ScriptRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EvalConfig) {
        self.config = config;
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Parse `text`, remembering the result as the engine's current script.
    pub fn parse(&mut self, text: &str) -> ParsedScript {
        self.last_script = parse_script(text);
        self.last_script.clone()
    }

    /// The script most recently passed to [`ScriptEngine::parse`].
    pub fn last_script(&self) -> &ParsedScript {
        &self.last_script
    }

    // =========================================================================
    // Ambient record
    // =========================================================================

    /// Replace the ambient record.
    pub fn set_metadata(&mut self, track: Track) {
        self.metadata = Some(track);
    }

    pub fn clear_metadata(&mut self) {
        self.metadata = None;
    }

    pub fn metadata(&self) -> Option<&Track> {
        self.metadata.as_ref()
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Evaluate the last parsed script against the ambient record.
    pub fn evaluate(&self) -> String {
        self.evaluate_current(&self.last_script)
    }

    /// Evaluate a single expression node against `metadata`.
    pub fn evaluate_expression(&self, expression: &Expression, metadata: &impl Metadata) -> String {
        let results = self.run(slice::from_ref(expression), metadata);
        format_results(&results, &self.config)
    }

    /// Evaluate `script` against `metadata`, joining fan-out branches with
    /// [`EvalConfig::result_separator`].
    #[tracing::instrument(level = "trace", skip_all, fields(len = script.input.len()))]
    pub fn evaluate_script(&self, script: &ParsedScript, metadata: &impl Metadata) -> String {
        format_results(&self.evaluate_results(script, metadata), &self.config)
    }

    /// Evaluate `script` against the ambient record. Without one, every field
    /// evaluates as absent.
    pub fn evaluate_current(&self, script: &ParsedScript) -> String {
        match &self.metadata {
            Some(track) => self.evaluate_script(script, track),
            None => self.evaluate_script(script, &Track::new()),
        }
    }

    /// Evaluate `script` against `metadata`, returning one string per
    /// fan-out branch.
    pub fn evaluate_all(&self, script: &ParsedScript, metadata: &impl Metadata) -> Vec<String> {
        collect_values(&self.evaluate_results(script, metadata), &self.config)
    }

    /// The raw per-branch results, flags included.
    pub fn evaluate_results(
        &self,
        script: &ParsedScript,
        metadata: &impl Metadata,
    ) -> Vec<ScriptResult> {
        self.run(&script.expressions, metadata)
    }

    fn run(&self, expressions: &[Expression], metadata: &impl Metadata) -> Vec<ScriptResult> {
        evaluate(expressions, &self.registry, metadata, &self.config)
    }
}
