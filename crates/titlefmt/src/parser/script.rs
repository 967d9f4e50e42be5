//! Recursive-descent parser for titlefmt scripts.
//!
//! Handles:
//! - Literal text runs
//! - Variables `%name%` and multi-value variables `%<name>%`
//! - Function calls `$name(arg, ...)` with nested argument scripts
//! - Conditional groups `[...]`
//! - Quoted text `"..."` and single-character escapes `\x`
//!
//! The parser never fails. Each malformed construct is reduced to its most
//! literal reading plus one [`ScriptError`], and parsing resumes right after it.

use tracing::debug;

use super::ast::{Expression, ExpressionKind, ExpressionList, ParsedScript};
use super::error::{ScriptError, SyntaxErrorKind};
use super::scanner::{ARGUMENT, STRUCTURAL, Scanner, is_variable_char};

/// Maximum depth of nested function calls and conditional groups.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Parse a script into its expression tree and syntax error list.
///
/// Parsing is a pure function of `input`: the same text always produces the
/// same tree and the same errors, sorted by position.
#[tracing::instrument(level = "debug", skip_all, fields(len = input.len()))]
pub fn parse_script(input: &str) -> ParsedScript {
    let mut parser = Parser::new(input);
    let Parsed {
        value: expressions,
        mut errors,
    } = parser.expressions(Context::TopLevel, 0);
    errors.sort_by_key(|e| e.position);

    if !errors.is_empty() {
        debug!(errors = errors.len(), "script parsed with errors");
    }

    ParsedScript {
        input: input.to_string(),
        expressions,
        errors,
    }
}

/// A parse step result: the node(s) built plus the errors found on the way.
/// Steps never abort, so there is always a value.
struct Parsed<T> {
    value: T,
    errors: Vec<ScriptError>,
}

impl<T> Parsed<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    fn with_error(value: T, error: ScriptError) -> Self {
        Self {
            value,
            errors: vec![error],
        }
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: f(self.value),
            errors: self.errors,
        }
    }

    /// Move this step's errors into the caller's list and return the value.
    fn merge_into(self, errors: &mut Vec<ScriptError>) -> T {
        errors.extend(self.errors);
        self.value
    }
}

/// Where an expression sequence is being parsed. Decides which characters
/// end the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    TopLevel,
    Conditional,
    Argument,
}

impl Context {
    fn is_stop(self, c: char) -> bool {
        STRUCTURAL.contains(&c) || (self == Context::Argument && ARGUMENT.contains(&c))
    }
}

struct Parser<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            scanner: Scanner::new(input),
        }
    }

    /// Parse expressions until end of input or a terminator of `context`.
    ///
    /// The terminator itself is left for the caller. Inside an argument list
    /// bare parentheses are tracked so that `(a, b)` stays one argument.
    fn expressions(&mut self, context: Context, depth: usize) -> Parsed<ExpressionList> {
        let mut list = ExpressionList::new();
        let mut errors = Vec::new();
        let mut paren_depth = 0usize;

        while let Some(c) = self.scanner.peek() {
            let in_argument = context == Context::Argument;
            match c {
                ']' if context == Context::Conditional => break,
                ',' | ')' if in_argument && paren_depth == 0 => break,
                '(' if in_argument => {
                    paren_depth += 1;
                    self.punctuation(&mut list);
                }
                ')' if in_argument => {
                    paren_depth -= 1;
                    self.punctuation(&mut list);
                }
                ',' if in_argument => self.punctuation(&mut list),
                _ => {
                    for node in self.expression(context, depth).merge_into(&mut errors) {
                        push_merged(&mut list, node);
                    }
                }
            }
        }

        Parsed {
            value: list,
            errors,
        }
    }

    /// Dispatch on the next structural marker.
    fn expression(&mut self, context: Context, depth: usize) -> Parsed<Vec<Expression>> {
        match self.scanner.peek() {
            Some('%') => self.variable().map(|e| vec![e]),
            Some('$') => self.function(depth).map(|e| vec![e]),
            Some('[') => self.conditional(depth),
            Some(']') => self.stray_bracket().map(|e| vec![e]),
            Some('"') => self.quote().map(|e| vec![e]),
            Some('\\') => self.escape().map(|e| vec![e]),
            Some(_) => self.literal(context).map(|e| vec![e]),
            None => Parsed::clean(Vec::new()),
        }
    }

    /// A maximal run of plain text.
    fn literal(&mut self, context: Context) -> Parsed<Expression> {
        let start = self.scanner.offset();
        let text = self.scanner.consume_until(|c| context.is_stop(c));
        if text.is_empty() {
            let c = self.scanner.advance().map(String::from).unwrap_or_default();
            return Parsed::clean(Expression::literal(c, start));
        }
        Parsed::clean(Expression::literal(text, start))
    }

    /// A single character taken verbatim (commas and parentheses inside
    /// nested argument parentheses).
    fn punctuation(&mut self, list: &mut ExpressionList) {
        let start = self.scanner.offset();
        if let Some(c) = self.scanner.advance() {
            push_merged(list, Expression::literal(c, start));
        }
    }

    /// `"text"`; `""` yields a literal quote character.
    fn quote(&mut self) -> Parsed<Expression> {
        let start = self.scanner.offset();
        self.scanner.advance();

        if self.scanner.eat('"') {
            return Parsed::clean(Expression::quoted("\"", start));
        }

        let text = self.scanner.consume_until(|c| c == '"');
        if self.scanner.eat('"') {
            Parsed::clean(Expression::quoted(text, start))
        } else {
            Parsed::with_error(
                Expression::literal(format!("\"{text}"), start),
                ScriptError::new(SyntaxErrorKind::UnterminatedQuote, start, "\""),
            )
        }
    }

    /// `\x` emits `x` verbatim.
    fn escape(&mut self) -> Parsed<Expression> {
        let start = self.scanner.offset();
        self.scanner.advance();

        match self.scanner.advance() {
            Some(c) => Parsed::clean(Expression::literal(c, start)),
            None => Parsed::with_error(
                Expression::literal("\\", start),
                ScriptError::new(SyntaxErrorKind::DanglingEscape, start, "\\"),
            ),
        }
    }

    /// `%name%` or `%<name>%`.
    fn variable(&mut self) -> Parsed<Expression> {
        let start = self.scanner.offset();
        self.scanner.advance();

        let name = self
            .scanner
            .consume_until(|c| !is_variable_char(c));

        if !self.scanner.eat('%') {
            let text = format!("%{name}");
            return Parsed::with_error(
                Expression::literal(text.clone(), start),
                ScriptError::new(SyntaxErrorKind::UnterminatedVariable, start, text),
            );
        }

        if name.is_empty() {
            return Parsed::with_error(
                Expression::literal("%%", start),
                ScriptError::new(SyntaxErrorKind::EmptyVariable, start, "%%"),
            );
        }

        let list_name = name.strip_prefix('<').and_then(|n| n.strip_suffix('>'));
        match list_name {
            Some(inner) if is_valid_variable_name(inner) => {
                Parsed::clean(Expression::variable_list(inner, start))
            }
            None if is_valid_variable_name(name) => {
                Parsed::clean(Expression::variable(name, start))
            }
            _ => {
                let text = format!("%{name}%");
                Parsed::with_error(
                    Expression::literal(text.clone(), start),
                    ScriptError::new(SyntaxErrorKind::InvalidVariableName, start, text),
                )
            }
        }
    }

    /// `$name(arg, ...)`.
    ///
    /// A call missing its closing parenthesis keeps the arguments parsed so
    /// far; whatever text remained became the final argument.
    fn function(&mut self, depth: usize) -> Parsed<Expression> {
        let start = self.scanner.offset();
        self.scanner.advance();

        let name = self.scanner.consume_name();
        if name.is_empty() {
            return Parsed::with_error(
                Expression::literal("$", start),
                ScriptError::new(SyntaxErrorKind::MissingFunctionName, start, "$"),
            );
        }

        if !self.scanner.eat('(') {
            let text = format!("${name}");
            return Parsed::with_error(
                Expression::literal(text.clone(), start),
                ScriptError::new(SyntaxErrorKind::ExpectedOpenParen, start, text),
            );
        }

        if depth >= MAX_NESTING_DEPTH {
            let text = format!("${name}(");
            return Parsed::with_error(
                Expression::literal(text.clone(), start),
                ScriptError::new(SyntaxErrorKind::NestingTooDeep, start, text),
            );
        }

        let Parsed {
            value: mut args,
            mut errors,
        } = self.function_args(depth);

        if !self.scanner.eat(')') {
            errors.push(ScriptError::new(
                SyntaxErrorKind::UnterminatedFunction,
                start,
                format!("${name}("),
            ));
        }

        if args.len() == 1 && args[0].is_empty() {
            args.clear();
        }

        Parsed {
            value: Expression::function(name, args, start),
            errors,
        }
    }

    /// Arguments separated by top-level commas. Stops before the closing
    /// parenthesis or at end of input.
    fn function_args(&mut self, depth: usize) -> Parsed<Vec<ExpressionList>> {
        let mut args = Vec::new();
        let mut errors = Vec::new();

        loop {
            let arg = self
                .expressions(Context::Argument, depth + 1)
                .merge_into(&mut errors);
            args.push(arg);
            if !self.scanner.eat(',') {
                break;
            }
        }

        Parsed {
            value: args,
            errors,
        }
    }

    /// `[content]`. An unterminated group splices a literal `[` and its
    /// content into the enclosing sequence.
    fn conditional(&mut self, depth: usize) -> Parsed<Vec<Expression>> {
        let start = self.scanner.offset();
        self.scanner.advance();

        if depth >= MAX_NESTING_DEPTH {
            return Parsed::with_error(
                vec![Expression::literal("[", start)],
                ScriptError::new(SyntaxErrorKind::NestingTooDeep, start, "["),
            );
        }

        let mut errors = Vec::new();
        let content = self
            .expressions(Context::Conditional, depth + 1)
            .merge_into(&mut errors);

        if self.scanner.eat(']') {
            return Parsed {
                value: vec![Expression::conditional(content, start)],
                errors,
            };
        }

        errors.push(ScriptError::new(
            SyntaxErrorKind::UnterminatedConditional,
            start,
            "[",
        ));
        let mut nodes = vec![Expression::literal("[", start)];
        nodes.extend(content);
        Parsed {
            value: nodes,
            errors,
        }
    }

    /// `]` with no open group.
    fn stray_bracket(&mut self) -> Parsed<Expression> {
        let start = self.scanner.offset();
        self.scanner.advance();
        Parsed::with_error(
            Expression::literal("]", start),
            ScriptError::new(SyntaxErrorKind::UnexpectedBracket, start, "]"),
        )
    }
}

/// Append `node`, folding it into a preceding literal run.
fn push_merged(list: &mut ExpressionList, node: Expression) {
    if let ExpressionKind::Literal { text } = &node.kind {
        if text.is_empty() {
            return;
        }
        if let Some(Expression {
            kind: ExpressionKind::Literal { text: prev },
            ..
        }) = list.last_mut()
        {
            prev.push_str(text);
            return;
        }
    }
    list.push(node);
}

fn is_valid_variable_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(['<', '>'])
}

/// Whether `%name%` and `%<name>%` can both be written for `name`.
pub fn is_referenceable_variable(name: &str) -> bool {
    is_valid_variable_name(name) && name.chars().all(is_variable_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_merged_joins_adjacent_literals() {
        let mut list = ExpressionList::new();
        push_merged(&mut list, Expression::literal("ab", 0));
        push_merged(&mut list, Expression::literal("c", 2));
        push_merged(&mut list, Expression::quoted("d", 3));
        push_merged(&mut list, Expression::literal("e", 6));
        assert_eq!(
            list,
            vec![
                Expression::literal("abc", 0),
                Expression::quoted("d", 3),
                Expression::literal("e", 6),
            ]
        );
    }

    #[test]
    fn push_merged_drops_empty_literals() {
        let mut list = ExpressionList::new();
        push_merged(&mut list, Expression::literal("", 0));
        assert!(list.is_empty());
    }

    #[test]
    fn variable_names_reject_angle_brackets() {
        assert!(is_valid_variable_name("album artist"));
        assert!(!is_valid_variable_name("<genre"));
        assert!(!is_valid_variable_name("   "));
    }
}
