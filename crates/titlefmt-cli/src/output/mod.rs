//! Rendering helpers for CLI output.

pub mod diagnostic;
pub mod table;

pub use diagnostic::{LintDiagnostic, ScriptDiagnostic};
