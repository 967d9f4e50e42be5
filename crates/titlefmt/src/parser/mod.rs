//! titlefmt script parser.
//!
//! This module turns script text into an expression tree. Parsing is
//! error-tolerant: every input produces a tree, and syntax problems are
//! reported alongside it rather than instead of it.

pub mod ast;
pub mod error;
mod scanner;
mod script;

pub use ast::{Expression, ExpressionKind, ExpressionList, ParsedScript};
pub use error::{ScriptError, SyntaxErrorKind};
pub use script::{MAX_NESTING_DEPTH, is_referenceable_variable, parse_script};
