//! Public AST types for titlefmt scripts.
//!
//! These types are public to enable external tooling (linters, editors, etc.).

use serde::Serialize;

use crate::parser::error::ScriptError;

/// An ordered sequence of expressions. Top-level script text, every function
/// argument and every conditional body is one of these.
pub type ExpressionList = Vec<Expression>;

/// One parsed node together with the byte offset where it began.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    /// Byte offset into the script input.
    pub position: usize,
}

/// The kind of a parsed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpressionKind {
    /// Verbatim output text.
    Literal { text: String },
    /// Text written inside `"..."`.
    QuotedLiteral { text: String },
    /// `%name%`
    Variable { name: String },
    /// `%<name>%`
    VariableList { name: String },
    /// `$name(arg, ...)`
    Function {
        name: String,
        args: Vec<ExpressionList>,
    },
    /// `[...]`
    Conditional { content: ExpressionList },
}

impl Expression {
    pub fn new(kind: ExpressionKind, position: usize) -> Self {
        Self { kind, position }
    }

    pub fn literal(text: impl Into<String>, position: usize) -> Self {
        Self::new(ExpressionKind::Literal { text: text.into() }, position)
    }

    pub fn quoted(text: impl Into<String>, position: usize) -> Self {
        Self::new(ExpressionKind::QuotedLiteral { text: text.into() }, position)
    }

    pub fn variable(name: impl Into<String>, position: usize) -> Self {
        Self::new(ExpressionKind::Variable { name: name.into() }, position)
    }

    pub fn variable_list(name: impl Into<String>, position: usize) -> Self {
        Self::new(ExpressionKind::VariableList { name: name.into() }, position)
    }

    pub fn function(name: impl Into<String>, args: Vec<ExpressionList>, position: usize) -> Self {
        Self::new(
            ExpressionKind::Function {
                name: name.into(),
                args,
            },
            position,
        )
    }

    pub fn conditional(content: ExpressionList, position: usize) -> Self {
        Self::new(ExpressionKind::Conditional { content }, position)
    }

    /// Returns the literal text if this node renders verbatim.
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Literal { text } | ExpressionKind::QuotedLiteral { text } => Some(text),
            _ => None,
        }
    }
}

/// The result of parsing a script: the best-effort tree plus every syntax
/// error encountered on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedScript {
    pub input: String,
    pub expressions: ExpressionList,
    pub errors: Vec<ScriptError>,
}

impl ParsedScript {
    /// A script is valid when it parsed without syntax errors. Whether its
    /// fields resolve for a given record does not matter here.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
