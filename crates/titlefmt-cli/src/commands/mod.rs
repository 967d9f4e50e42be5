//! CLI command implementations.

mod check;
mod eval;
mod functions;
mod source;

pub use check::{CheckArgs, run_check};
pub use eval::{EvalArgs, run_eval};
pub use functions::{FunctionsArgs, run_functions};
