//! Miette diagnostic wrappers for script errors and lint warnings.
//!
//! Fields are read by the miette derive macros, not directly by code.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;
use titlefmt::{LintWarning, ScriptError, SyntaxErrorKind};

/// A miette-compatible diagnostic for a script syntax error.
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(code(titlefmt::syntax))]
pub struct ScriptDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl ScriptDiagnostic {
    pub fn from_script_error(name: &str, script: &str, err: &ScriptError) -> Self {
        ScriptDiagnostic {
            src: NamedSource::new(name, script.to_string()),
            span: span_at(script, err.position, err.value.len()),
            message: err.message(),
            help: syntax_help(err.kind).map(str::to_string),
        }
    }
}

/// A miette-compatible diagnostic for a lint warning.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(titlefmt::lint), severity(Warning))]
pub struct LintDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl LintDiagnostic {
    pub fn from_warning(name: &str, script: &str, warning: &LintWarning) -> Self {
        let help = match warning {
            LintWarning::StaticConditional { .. } => {
                Some("a group without fields or functions is always shown".to_string())
            }
            LintWarning::ArgumentCount { .. } => {
                Some("the call evaluates to nothing until the count matches".to_string())
            }
            LintWarning::UnknownVariable { .. }
            | LintWarning::UnknownFunction { .. }
            | LintWarning::ListOfSingleValue { .. } => None,
        };
        LintDiagnostic {
            src: NamedSource::new(name, script.to_string()),
            span: span_at(script, warning.position(), 1),
            message: warning.to_string(),
            help,
        }
    }
}

/// A span starting at `offset`, clamped to the script so miette never
/// indexes out of bounds.
fn span_at(script: &str, offset: usize, len: usize) -> SourceSpan {
    let offset = offset.min(script.len());
    let len = len.max(1).min(script.len() - offset);
    (offset, len).into()
}

fn syntax_help(kind: SyntaxErrorKind) -> Option<&'static str> {
    match kind {
        SyntaxErrorKind::UnterminatedVariable | SyntaxErrorKind::EmptyVariable => {
            Some(r"write '\%' for a literal percent sign")
        }
        SyntaxErrorKind::MissingFunctionName | SyntaxErrorKind::ExpectedOpenParen => {
            Some(r"write '\$' for a literal dollar sign")
        }
        SyntaxErrorKind::UnterminatedConditional | SyntaxErrorKind::UnexpectedBracket => {
            Some(r"write '\[' or '\]' for literal brackets")
        }
        SyntaxErrorKind::UnterminatedQuote => Some("write '\"\"' for a literal quote"),
        SyntaxErrorKind::InvalidVariableName => {
            Some("list fields are written '%<name>%' with nothing outside the brackets")
        }
        SyntaxErrorKind::UnterminatedFunction
        | SyntaxErrorKind::DanglingEscape
        | SyntaxErrorKind::NestingTooDeep => None,
    }
}
