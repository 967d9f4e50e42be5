//! Integration tests for evaluation: variables, functions, flags and
//! conditional groups.

use titlefmt::{
    EvalConfig, EvalContext, FunctionDef, LazyArgs, NameKind, ScriptEngine,
    ScriptRegistry, ScriptResult, Track, VariableKind, parse,
};
use titlefmt_semantics::Arity;

fn track() -> Track {
    Track::new()
        .with("artist", "Nina Simone")
        .with("title", "Sinnerman")
        .with("album", "Pastel Blues")
        .with("date", "1965")
        .with("tracknumber", "7")
        .with("comment", "")
        .with_values("genre", ["Jazz", "Soul"])
}

fn eval(script: &str) -> String {
    ScriptEngine::new().evaluate_script(&parse(script), &track())
}

fn result(script: &str) -> ScriptResult {
    let mut results = ScriptEngine::new().evaluate_results(&parse(script), &track());
    assert_eq!(results.len(), 1, "{script}");
    results.remove(0)
}

// =============================================================================
// Literals and variables
// =============================================================================

#[test]
fn test_text_without_markers_renders_verbatim() {
    for text in ["", "plain", "a, b (c)", "1 + 1 = 2"] {
        assert_eq!(eval(text), text);
    }
}

#[test]
fn test_quoted_delimiters_render_verbatim() {
    assert_eq!(eval(r#""%title%" '$x' "[no]""#), "%title% '$x' [no]");
}

#[test]
fn test_variables() {
    assert_eq!(eval("%artist% - %title%"), "Nina Simone - Sinnerman");
}

#[test]
fn test_variable_names_are_case_insensitive() {
    assert_eq!(eval("%ARTIST%"), "Nina Simone");
}

#[test]
fn test_multi_valued_variable_joins_values() {
    assert_eq!(eval("%genre%"), "Jazz, Soul");
}

#[test]
fn test_multi_value_separator_is_configurable() {
    let config = EvalConfig::builder().multi_value_separator(" / ").build();
    let engine = ScriptEngine::builder().config(config).build();
    assert_eq!(engine.evaluate_script(&parse("%genre%"), &track()), "Jazz / Soul");
}

#[test]
fn test_absent_field_is_empty() {
    let r = result("%composer%");
    assert_eq!(r.value, "");
    assert!(r.success);
    assert!(r.is_empty);
}

#[test]
fn test_empty_field_is_empty() {
    let r = result("%comment%");
    assert!(r.success);
    assert!(r.is_empty);
}

#[test]
fn test_literal_flags() {
    let r = result("text");
    assert!(r.success);
    assert!(!r.is_empty);
    assert!(r.is_truthy());
}

#[test]
fn test_unknown_variable_in_closed_registry() {
    let registry = ScriptRegistry::new()
        .closed()
        .with_variables(["title"])
        .unwrap();
    let engine = ScriptEngine::with_registry(registry.into());
    let results = engine.evaluate_results(&parse("%artist%"), &track());
    assert!(!results[0].success);
    assert_eq!(results[0].value, "");
    assert_eq!(
        engine.evaluate_script(&parse("%title%"), &track()),
        "Sinnerman"
    );
}

// =============================================================================
// Functions
// =============================================================================

#[test]
fn test_function_call() {
    assert_eq!(eval("$upper(%title%)"), "SINNERMAN");
    assert_eq!(eval("$left(%title%,3)"), "Sin");
}

#[test]
fn test_function_names_are_case_insensitive() {
    assert_eq!(eval("$UPPER(x)"), "X");
}

#[test]
fn test_aliases_resolve() {
    assert_eq!(eval("$cut(%album%,6)"), "Pastel");
    assert_eq!(eval("$length(%album%)"), "12");
}

#[test]
fn test_unknown_function_fails_silently() {
    let r = result("$nosuch(%title%)");
    assert_eq!(r.value, "");
    assert!(!r.success);
}

#[test]
fn test_wrong_arity_fails_silently() {
    let r = result("$upper(a,b)");
    assert_eq!(r.value, "");
    assert!(!r.success);
}

#[test]
fn test_eager_function_inherits_argument_emptiness() {
    let r = result("$upper(%composer%)");
    assert_eq!(r.value, "");
    assert!(r.is_empty);
}

#[test]
fn test_lazy_function_reports_own_flags() {
    let r = result("$if(%composer%,yes,no)");
    assert_eq!(r.value, "no");
    assert!(r.success);
    assert!(!r.is_empty);
}

#[test]
fn test_not_of_missing_field_is_true() {
    assert_eq!(eval("$not(%composer%)"), "1");
    assert_eq!(eval("$not(%title%)"), "");
}

#[test]
fn test_custom_eager_function() {
    fn shout(args: &[ScriptResult], _ctx: &EvalContext<'_>) -> ScriptResult {
        ScriptResult::literal(format!("{}!", args[0].value))
    }

    let mut registry = ScriptRegistry::new();
    registry
        .register_function("shout", FunctionDef::eager(Arity::exactly(1), shout))
        .unwrap();
    let engine = ScriptEngine::with_registry(registry.into());
    assert_eq!(
        engine.evaluate_script(&parse("$shout(%title%)"), &track()),
        "Sinnerman!"
    );
}

#[test]
fn test_custom_lazy_function_sees_record() {
    fn first_field(args: &LazyArgs<'_, '_>) -> ScriptResult {
        for index in 0..args.len() {
            let name = args.eval(index).value;
            if let Some(value) = args
                .context()
                .metadata()
                .field(&name)
                .into_values()
                .into_iter()
                .next()
            {
                return ScriptResult::field(value);
            }
        }
        ScriptResult::missing()
    }

    let mut registry = ScriptRegistry::new();
    registry
        .register_function("first", FunctionDef::lazy(Arity::at_least(1), first_field))
        .unwrap();
    let engine = ScriptEngine::with_registry(registry.into());
    assert_eq!(
        engine.evaluate_script(&parse("$first(composer,album)"), &track()),
        "Pastel Blues"
    );
}

#[test]
fn test_register_rejects_unreachable_names() {
    let mut registry = ScriptRegistry::empty();
    assert!(
        registry
            .register_function("two words", FunctionDef::eager(Arity::exactly(0), |_, _| {
                ScriptResult::default()
            }))
            .is_err()
    );
    assert!(registry.register_variable("%x%", VariableKind::Single).is_err());
    assert!(registry.register_variable("", VariableKind::Single).is_err());
    assert!(registry.register_variable("Album Artist", VariableKind::Single).is_ok());
    assert_eq!(registry.variable_kind("album artist"), Some(VariableKind::Single));
}

#[test]
fn test_unreferenceable_variable_names_are_rejected() {
    let mut registry = ScriptRegistry::empty();
    for name in ["a$b", "a[b", "a]b", "a\"b", "a\\b", "a,b", "a(b", "a)b", "<a>", "a\nb"] {
        assert!(
            registry.register_variable(name, VariableKind::Single).is_err(),
            "{name:?}"
        );
    }
    assert!(registry.variable_names().is_empty());

    assert!(ScriptRegistry::empty().with_variables(["ok", "not,ok"]).is_err());
    assert!(ScriptRegistry::empty().with_list_variables(["(genre)"]).is_err());
}

#[test]
fn test_registered_names_are_referenceable() {
    let registry = ScriptRegistry::empty()
        .with_variables(["album artist", "disc#"])
        .unwrap();
    let engine = ScriptEngine::with_registry(registry.into());
    let track = Track::new().with("album artist", "Various").with("disc#", "2");
    assert_eq!(
        engine.evaluate_script(&parse("%album artist%/%disc#%"), &track),
        "Various/2"
    );
}

// =============================================================================
// Conditional groups
// =============================================================================

#[test]
fn test_conditional_with_present_field_is_shown() {
    assert_eq!(eval("%title%[ (%date%)]"), "Sinnerman (1965)");
}

#[test]
fn test_conditional_with_absent_field_is_suppressed() {
    assert_eq!(eval("%title%[ (%composer%)]"), "Sinnerman");
}

#[test]
fn test_conditional_with_empty_field_is_suppressed() {
    assert_eq!(eval("[comment: %comment%]"), "");
}

#[test]
fn test_conditional_with_unknown_function_is_suppressed() {
    assert_eq!(eval("a[b$nosuch()]c"), "ac");
}

#[test]
fn test_conditional_needs_every_field() {
    assert_eq!(eval("[%artist% %composer%]"), "");
}

#[test]
fn test_conditional_without_fields_is_shown() {
    assert_eq!(eval("[static]"), "static");
}

#[test]
fn test_missing_field_in_nested_group_suppresses_outer_group() {
    assert_eq!(eval("[%title%[ %composer%]]"), "");
    assert_eq!(eval("[%composer%[ %title%]]"), "");
    assert_eq!(eval("a[b[c[%composer%]]]d"), "ad");
}

#[test]
fn test_nested_groups_with_values_render() {
    assert_eq!(eval("[%title%[ (%date%)]]"), "Sinnerman (1965)");
}

#[test]
fn test_suppressed_conditional_carries_flags() {
    let r = result("[%composer%]");
    assert!(r.success);
    assert!(r.is_empty);
    assert_eq!(r.value, "");

    let r = result("[$nosuch()]");
    assert!(!r.success);
    assert_eq!(r.value, "");
}

#[test]
fn test_rendered_conditional_is_neutral() {
    let r = result("[%title%]");
    assert!(r.success);
    assert!(!r.is_empty);
    assert_eq!(r.value, "Sinnerman");
}

#[test]
fn test_suppressed_group_does_not_hide_siblings() {
    assert_eq!(eval("%title%[ %composer%] - %artist%"), "Sinnerman - Nina Simone");
}

#[test]
fn test_if_inside_conditional_absorbs_missing_condition() {
    assert_eq!(eval("[$if(%composer%,%composer%,unknown)]"), "unknown");
}

#[test]
fn test_typical_file_name_pattern() {
    assert_eq!(
        eval("[%artist% - ][%album% - ][$num(%tracknumber%,2). ]%title%"),
        "Nina Simone - Pastel Blues - 07. Sinnerman"
    );
}

// =============================================================================
// Degraded input
// =============================================================================

#[test]
fn test_unterminated_call_still_produces_output() {
    let script = parse("$left(%title%,3");
    assert_eq!(script.errors[0].position, 0);
    let output = ScriptEngine::new().evaluate_script(&script, &track());
    assert_eq!(output, "Sin");
}

#[test]
fn test_unterminated_variable_renders_literally() {
    assert_eq!(eval("100%"), "100%");
}

#[test]
fn test_stray_bracket_renders_literally() {
    assert_eq!(eval("%title%]"), "Sinnerman]");
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_classify() {
    let registry = ScriptRegistry::new().with_list_variables(["genre"]).unwrap();
    assert_eq!(registry.classify("GENRE"), NameKind::VariableList);
    assert_eq!(registry.classify("title"), NameKind::Variable);
    assert_eq!(registry.classify("left"), NameKind::Function(Arity::exactly(2)));

    let closed = registry.closed();
    assert_eq!(closed.classify("title"), NameKind::Unknown);
    assert!(closed.resolves_variable("genre"));
}
