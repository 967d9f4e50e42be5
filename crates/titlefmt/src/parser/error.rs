//! Syntax error types for titlefmt scripts.

use serde::Serialize;
use thiserror::Error;

/// A syntax error with its location in the script.
///
/// Parsing never stops at one of these; the parser records it, falls back to
/// the most literal reading of the offending text and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind} at position {position}: '{value}'")]
pub struct ScriptError {
    /// Byte offset into the script input.
    pub position: usize,
    /// The offending token or lexeme.
    pub value: String,
    pub kind: SyntaxErrorKind,
}

impl ScriptError {
    pub fn new(kind: SyntaxErrorKind, position: usize, value: impl Into<String>) -> Self {
        Self {
            position,
            value: value.into(),
            kind,
        }
    }

    /// Human-readable description of the problem.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// The kinds of syntax error the parser reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxErrorKind {
    #[error("unterminated variable, expected closing '%'")]
    UnterminatedVariable,

    #[error("empty variable name")]
    EmptyVariable,

    #[error("invalid variable name")]
    InvalidVariableName,

    #[error("expected function name after '$'")]
    MissingFunctionName,

    #[error("expected '(' after function name")]
    ExpectedOpenParen,

    #[error("unterminated function call, expected ')'")]
    UnterminatedFunction,

    #[error("unterminated conditional, expected ']'")]
    UnterminatedConditional,

    #[error("unterminated quote, expected closing '\"'")]
    UnterminatedQuote,

    #[error("unexpected ']' without matching '['")]
    UnexpectedBracket,

    #[error("escape character at end of input")]
    DanglingEscape,

    #[error("nesting too deep")]
    NestingTooDeep,
}
