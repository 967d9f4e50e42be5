//! Name registry for variables and functions.

use std::collections::HashMap;
use std::fmt;

use titlefmt_semantics::{Arity, FunctionId, Strategy, accepted_function_names, resolve_function};
use tracing::debug;

use crate::interpreter::context::{EvalContext, LazyArgs};
use crate::interpreter::error::RegistryError;
use crate::interpreter::functions::builtin;
use crate::parser::is_referenceable_variable;
use crate::types::ScriptResult;

/// An eager function: receives its arguments already evaluated.
pub type EagerFn = fn(&[ScriptResult], &EvalContext<'_>) -> ScriptResult;

/// A lazy function: receives unevaluated argument scripts and evaluates only
/// those it needs.
pub type LazyFn = fn(&LazyArgs<'_, '_>) -> ScriptResult;

/// The callable behind a function name.
#[derive(Clone, Copy)]
pub enum FunctionImpl {
    Eager(EagerFn),
    Lazy(LazyFn),
}

impl fmt::Debug for FunctionImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionImpl::Eager(_) => f.write_str("Eager(..)"),
            FunctionImpl::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// A registered function: its arity check and implementation.
#[derive(Debug, Clone, Copy)]
pub struct FunctionDef {
    pub arity: Arity,
    pub call: FunctionImpl,
}

impl FunctionDef {
    pub fn eager(arity: Arity, call: EagerFn) -> Self {
        Self {
            arity,
            call: FunctionImpl::Eager(call),
        }
    }

    pub fn lazy(arity: Arity, call: LazyFn) -> Self {
        Self {
            arity,
            call: FunctionImpl::Lazy(call),
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self.call {
            FunctionImpl::Eager(_) => Strategy::Eager,
            FunctionImpl::Lazy(_) => Strategy::Lazy,
        }
    }
}

/// Whether a variable may hold several values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Single,
    Multi,
}

/// What a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Variable,
    VariableList,
    Function(Arity),
    Unknown,
}

/// A registry mapping names to variables and functions.
///
/// Names are case-insensitive. Variables and functions live in separate
/// namespaces because the script syntax already tells them apart; `classify`
/// checks registered variables first, then functions.
///
/// An *open* registry treats every unregistered variable name as a
/// single-valued field and lets the record decide whether it has a value.
/// A closed registry only resolves the variables registered on it.
///
/// The registry holds no interior mutability, so one instance can be shared
/// across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    variables: HashMap<String, VariableKind>,
    functions: HashMap<String, FunctionDef>,
    open_variables: bool,
}

impl ScriptRegistry {
    /// Create an open registry with every built-in function.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.open_variables = true;
        for &name in accepted_function_names() {
            if let Some(id) = resolve_function(name) {
                registry
                    .functions
                    .insert(name.to_string(), builtin_def(id));
            }
        }
        registry
    }

    /// Create a closed registry with nothing registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder-style: only registered variables resolve from now on.
    pub fn closed(mut self) -> Self {
        self.open_variables = false;
        self
    }

    pub fn is_open(&self) -> bool {
        self.open_variables
    }

    /// Builder-style: register single-valued variables.
    pub fn with_variables<I, S>(mut self, names: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.register_variable(name.as_ref(), VariableKind::Single)?;
        }
        Ok(self)
    }

    /// Builder-style: register multi-valued variables.
    pub fn with_list_variables<I, S>(mut self, names: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.register_variable(name.as_ref(), VariableKind::Multi)?;
        }
        Ok(self)
    }

    /// Register a variable name. Names a script could not reference, such as
    /// ones containing `%`, `$`, brackets, quotes, commas or parentheses, are
    /// rejected.
    pub fn register_variable(&mut self, name: &str, kind: VariableKind) -> Result<(), RegistryError> {
        let trimmed = name.trim();
        if !is_referenceable_variable(trimmed) {
            return Err(RegistryError::InvalidVariableName {
                name: name.to_string(),
            });
        }
        self.insert_variable(trimmed, kind);
        Ok(())
    }

    /// Register a function, replacing any existing definition of that name.
    pub fn register_function(&mut self, name: &str, def: FunctionDef) -> Result<(), RegistryError> {
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(RegistryError::InvalidFunctionName {
                name: name.to_string(),
            });
        }
        debug!(name, arity = %def.arity, "registered function");
        self.functions.insert(name.to_lowercase(), def);
        Ok(())
    }

    /// Classify a name.
    pub fn classify(&self, name: &str) -> NameKind {
        if let Some(kind) = self.variable_kind(name) {
            return match kind {
                VariableKind::Single => NameKind::Variable,
                VariableKind::Multi => NameKind::VariableList,
            };
        }
        match self.function(name) {
            Some(def) => NameKind::Function(def.arity),
            None if self.open_variables => NameKind::Variable,
            None => NameKind::Unknown,
        }
    }

    /// The registered kind of a variable. Open registries return `None` for
    /// names that resolve only because the registry is open.
    pub fn variable_kind(&self, name: &str) -> Option<VariableKind> {
        self.variables.get(normalize(name).as_str()).copied()
    }

    /// Whether `%name%` or `%<name>%` resolves against a record.
    pub fn resolves_variable(&self, name: &str) -> bool {
        self.open_variables || self.variable_kind(name).is_some()
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(normalize(name).as_str())
    }

    /// Registered variable names, sorted.
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered function names, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn insert_variable(&mut self, name: &str, kind: VariableKind) {
        self.variables.insert(normalize(name), kind);
    }
}

fn builtin_def(id: FunctionId) -> FunctionDef {
    FunctionDef {
        arity: id.arity(),
        call: builtin(id),
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
