//! Integration tests for script parsing and error recovery.

use titlefmt::{Expression, ExpressionKind, MAX_NESTING_DEPTH, SyntaxErrorKind, parse};

fn kinds(script: &str) -> Vec<SyntaxErrorKind> {
    parse(script).errors.iter().map(|e| e.kind).collect()
}

// =============================================================================
// Literals, quotes and escapes
// =============================================================================

#[test]
fn test_plain_text_is_one_literal() {
    let script = parse("Hello, world (live)");
    assert!(script.is_valid());
    assert_eq!(
        script.expressions,
        vec![Expression::literal("Hello, world (live)", 0)]
    );
}

#[test]
fn test_empty_script() {
    let script = parse("");
    assert!(script.is_valid());
    assert!(script.expressions.is_empty());
}

#[test]
fn test_quoted_text_keeps_delimiters() {
    let script = parse(r#""%[x]%""#);
    assert!(script.is_valid());
    assert_eq!(script.expressions, vec![Expression::quoted("%[x]%", 0)]);
}

#[test]
fn test_double_quote_emits_quote_character() {
    let script = parse(r#"a""b"#);
    assert!(script.is_valid());
    assert_eq!(
        script.expressions,
        vec![
            Expression::literal("a", 0),
            Expression::quoted("\"", 1),
            Expression::literal("b", 3),
        ]
    );
}

#[test]
fn test_escape_merges_into_literal() {
    let script = parse(r"100\% \$ \[ok\]");
    assert!(script.is_valid());
    assert_eq!(script.expressions, vec![Expression::literal("100% $ [ok]", 0)]);
}

// =============================================================================
// Variables
// =============================================================================

#[test]
fn test_variables_carry_positions() {
    let script = parse("%artist% - %title%");
    assert!(script.is_valid());
    assert_eq!(
        script.expressions,
        vec![
            Expression::variable("artist", 0),
            Expression::literal(" - ", 8),
            Expression::variable("title", 11),
        ]
    );
}

#[test]
fn test_list_variable() {
    let script = parse("%<genre>%");
    assert_eq!(script.expressions, vec![Expression::variable_list("genre", 0)]);
}

#[test]
fn test_variable_names_may_contain_spaces() {
    let script = parse("%album artist%");
    assert_eq!(
        script.expressions,
        vec![Expression::variable("album artist", 0)]
    );
}

#[test]
fn test_position_is_byte_offset() {
    let script = parse("ü%title%");
    assert_eq!(script.expressions[1], Expression::variable("title", 2));
}

// =============================================================================
// Functions
// =============================================================================

#[test]
fn test_function_arguments() {
    let script = parse("$left(%title%,3)");
    assert!(script.is_valid());
    assert_eq!(
        script.expressions,
        vec![Expression::function(
            "left",
            vec![
                vec![Expression::variable("title", 6)],
                vec![Expression::literal("3", 14)],
            ],
            0,
        )]
    );
}

#[test]
fn test_empty_call_has_no_arguments() {
    let script = parse("$crlf()");
    let ExpressionKind::Function { args, .. } = &script.expressions[0].kind else {
        panic!("expected function");
    };
    assert!(args.is_empty());
}

#[test]
fn test_lone_comma_makes_two_empty_arguments() {
    let script = parse("$f(,)");
    let ExpressionKind::Function { args, .. } = &script.expressions[0].kind else {
        panic!("expected function");
    };
    assert_eq!(args.len(), 2);
    assert!(args.iter().all(Vec::is_empty));
}

#[test]
fn test_nested_commas_do_not_split() {
    let script = parse(r#"$if(%a%,$upper(b,c),"x,y")"#);
    assert!(script.is_valid());
    let ExpressionKind::Function { args, .. } = &script.expressions[0].kind else {
        panic!("expected function");
    };
    assert_eq!(args.len(), 3);
    assert_eq!(args[2], vec![Expression::quoted("x,y", 20)]);
}

#[test]
fn test_bare_parentheses_stay_in_one_argument() {
    let script = parse("$f(a (b, c) d)");
    assert!(script.is_valid());
    let ExpressionKind::Function { args, .. } = &script.expressions[0].kind else {
        panic!("expected function");
    };
    assert_eq!(args.len(), 1);
    assert_eq!(args[0], vec![Expression::literal("a (b, c) d", 3)]);
}

#[test]
fn test_parentheses_outside_calls_are_text() {
    let script = parse("%title% (%year%)");
    assert!(script.is_valid());
    assert_eq!(script.expressions.len(), 4);
    assert_eq!(script.expressions[1].as_text(), Some(" ("));
}

// =============================================================================
// Conditionals
// =============================================================================

#[test]
fn test_conditional_content() {
    let script = parse("[%artist% - ]%title%");
    assert!(script.is_valid());
    assert_eq!(
        script.expressions,
        vec![
            Expression::conditional(
                vec![
                    Expression::variable("artist", 1),
                    Expression::literal(" - ", 9),
                ],
                0,
            ),
            Expression::variable("title", 13),
        ]
    );
}

#[test]
fn test_nested_conditionals() {
    let script = parse("[a[%b%]]");
    assert!(script.is_valid());
    let ExpressionKind::Conditional { content } = &script.expressions[0].kind else {
        panic!("expected conditional");
    };
    assert!(matches!(
        content[1].kind,
        ExpressionKind::Conditional { .. }
    ));
}

// =============================================================================
// Error recovery
// =============================================================================

#[test]
fn test_unterminated_variable() {
    let script = parse("%title");
    assert_eq!(kinds("%title"), vec![SyntaxErrorKind::UnterminatedVariable]);
    assert_eq!(script.errors[0].position, 0);
    assert_eq!(script.expressions, vec![Expression::literal("%title", 0)]);
}

#[test]
fn test_empty_variable() {
    let script = parse("a%%b");
    assert_eq!(kinds("a%%b"), vec![SyntaxErrorKind::EmptyVariable]);
    assert_eq!(script.expressions, vec![Expression::literal("a%%b", 0)]);
}

#[test]
fn test_stray_angle_bracket_in_name() {
    let script = parse("%a<b%");
    assert_eq!(kinds("%a<b%"), vec![SyntaxErrorKind::InvalidVariableName]);
    assert_eq!(script.expressions, vec![Expression::literal("%a<b%", 0)]);
}

#[test]
fn test_missing_function_name() {
    let script = parse("$(x)");
    assert_eq!(kinds("$(x)"), vec![SyntaxErrorKind::MissingFunctionName]);
    assert_eq!(script.expressions, vec![Expression::literal("$(x)", 0)]);
}

#[test]
fn test_missing_open_paren() {
    let script = parse("$foo bar");
    assert_eq!(kinds("$foo bar"), vec![SyntaxErrorKind::ExpectedOpenParen]);
    assert_eq!(script.expressions, vec![Expression::literal("$foo bar", 0)]);
}

#[test]
fn test_unterminated_function_keeps_arguments() {
    let script = parse("$left(%title%,3");
    assert_eq!(script.errors.len(), 1);
    assert_eq!(script.errors[0].kind, SyntaxErrorKind::UnterminatedFunction);
    assert_eq!(script.errors[0].position, 0);
    let ExpressionKind::Function { name, args } = &script.expressions[0].kind else {
        panic!("expected function");
    };
    assert_eq!(name, "left");
    assert_eq!(args.len(), 2);
}

#[test]
fn test_unterminated_conditional_splices_content() {
    let script = parse("x[abc");
    assert_eq!(kinds("x[abc"), vec![SyntaxErrorKind::UnterminatedConditional]);
    assert_eq!(script.errors[0].position, 1);
    assert_eq!(script.expressions, vec![Expression::literal("x[abc", 0)]);
}

#[test]
fn test_unterminated_conditional_keeps_fields() {
    let script = parse("[%artist%");
    assert_eq!(
        script.expressions,
        vec![
            Expression::literal("[", 0),
            Expression::variable("artist", 1),
        ]
    );
}

#[test]
fn test_stray_closing_bracket() {
    let script = parse("a]b");
    assert_eq!(kinds("a]b"), vec![SyntaxErrorKind::UnexpectedBracket]);
    assert_eq!(script.errors[0].position, 1);
    assert_eq!(script.expressions, vec![Expression::literal("a]b", 0)]);
}

#[test]
fn test_unterminated_quote() {
    let script = parse(r#"ab"cd"#);
    assert_eq!(kinds(r#"ab"cd"#), vec![SyntaxErrorKind::UnterminatedQuote]);
    assert_eq!(script.errors[0].position, 2);
    assert_eq!(script.expressions, vec![Expression::literal(r#"ab"cd"#, 0)]);
}

#[test]
fn test_dangling_escape() {
    let script = parse("abc\\");
    assert_eq!(kinds("abc\\"), vec![SyntaxErrorKind::DanglingEscape]);
    assert_eq!(script.errors[0].position, 3);
}

#[test]
fn test_errors_are_collected_in_position_order() {
    let script = parse("%a [b");
    let positions: Vec<usize> = script.errors.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![0, 3]);
    assert_eq!(
        kinds("%a [b"),
        vec![
            SyntaxErrorKind::UnterminatedVariable,
            SyntaxErrorKind::UnterminatedConditional,
        ]
    );
}

#[test]
fn test_error_display() {
    let script = parse("$left(%title%,3");
    insta::assert_snapshot!(
        script.errors[0].to_string(),
        @"unterminated function call, expected ')' at position 0: '$left('"
    );
}

#[test]
fn test_deep_nesting_is_reported_not_overflowed() {
    let deep = "[".repeat(MAX_NESTING_DEPTH * 4);
    assert!(kinds(&deep).contains(&SyntaxErrorKind::NestingTooDeep));

    let calls = "$f(".repeat(MAX_NESTING_DEPTH * 4);
    assert!(kinds(&calls).contains(&SyntaxErrorKind::NestingTooDeep));
}

#[test]
fn test_nesting_at_limit_is_accepted() {
    let script = format!(
        "{}x{}",
        "[".repeat(MAX_NESTING_DEPTH),
        "]".repeat(MAX_NESTING_DEPTH)
    );
    assert!(parse(&script).is_valid());
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_parsing_is_idempotent() {
    for script in [
        "%artist% - %title%",
        "$if2(%album artist%,%artist%)",
        "[%a% [b] $f(",
        r#""unterminated"#,
        "%<genre>%]",
    ] {
        assert_eq!(parse(script), parse(script), "{script}");
    }
}

#[test]
fn test_ast_serializes_with_type_tags() {
    let script = parse("[%a%]");
    let json = serde_json::to_string(&script.expressions).unwrap();
    insta::assert_snapshot!(
        json,
        @r#"[{"kind":{"type":"conditional","content":[{"kind":{"type":"variable","name":"a"},"position":1}]},"position":0}]"#
    );
}
