//! Shared titlefmt semantic tables used by the runtime registry and the CLI.
//!
//! This crate centralizes built-in function names, aliases, arity and
//! evaluation strategy so the interpreter and tooling never drift apart.

use std::fmt;

/// Canonical built-in function identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionId {
    If,
    If2,
    If3,
    IfEqual,
    IfGreater,
    IfLonger,
    Select,
    And,
    Or,
    Not,
    StrCmp,
    StrICmp,
    Greater,
    Longer,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Min,
    Max,
    Num,
    Left,
    Right,
    Substr,
    Len,
    Upper,
    Lower,
    Caps,
    Trim,
    Pad,
    Replace,
    Insert,
    Repeat,
    Abbr,
    Crlf,
    Tab,
    Char,
    Meta,
    MetaSep,
    MetaNum,
    TimeMs,
}

/// How a function receives its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Arguments are evaluated before the call.
    Eager,
    /// The function receives unevaluated argument scripts and evaluates
    /// only the ones it needs.
    Lazy,
}

/// Accepted argument counts for a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity {
    pub min: usize,
    /// `None` means unbounded.
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Check whether a call with `count` arguments is valid.
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{max}"),
            Some(max) => write!(f, "{}-{max}", self.min),
            None => write!(f, "{}+", self.min),
        }
    }
}

impl FunctionId {
    /// Every built-in, in documentation order.
    pub const ALL: &'static [FunctionId] = &[
        FunctionId::If,
        FunctionId::If2,
        FunctionId::If3,
        FunctionId::IfEqual,
        FunctionId::IfGreater,
        FunctionId::IfLonger,
        FunctionId::Select,
        FunctionId::And,
        FunctionId::Or,
        FunctionId::Not,
        FunctionId::StrCmp,
        FunctionId::StrICmp,
        FunctionId::Greater,
        FunctionId::Longer,
        FunctionId::Add,
        FunctionId::Sub,
        FunctionId::Mul,
        FunctionId::Div,
        FunctionId::Mod,
        FunctionId::Min,
        FunctionId::Max,
        FunctionId::Num,
        FunctionId::Left,
        FunctionId::Right,
        FunctionId::Substr,
        FunctionId::Len,
        FunctionId::Upper,
        FunctionId::Lower,
        FunctionId::Caps,
        FunctionId::Trim,
        FunctionId::Pad,
        FunctionId::Replace,
        FunctionId::Insert,
        FunctionId::Repeat,
        FunctionId::Abbr,
        FunctionId::Crlf,
        FunctionId::Tab,
        FunctionId::Char,
        FunctionId::Meta,
        FunctionId::MetaSep,
        FunctionId::MetaNum,
        FunctionId::TimeMs,
    ];

    /// The canonical name used in scripts (without the `$`).
    pub fn name(self) -> &'static str {
        match self {
            FunctionId::If => "if",
            FunctionId::If2 => "if2",
            FunctionId::If3 => "if3",
            FunctionId::IfEqual => "ifequal",
            FunctionId::IfGreater => "ifgreater",
            FunctionId::IfLonger => "iflonger",
            FunctionId::Select => "select",
            FunctionId::And => "and",
            FunctionId::Or => "or",
            FunctionId::Not => "not",
            FunctionId::StrCmp => "strcmp",
            FunctionId::StrICmp => "stricmp",
            FunctionId::Greater => "greater",
            FunctionId::Longer => "longer",
            FunctionId::Add => "add",
            FunctionId::Sub => "sub",
            FunctionId::Mul => "mul",
            FunctionId::Div => "div",
            FunctionId::Mod => "mod",
            FunctionId::Min => "min",
            FunctionId::Max => "max",
            FunctionId::Num => "num",
            FunctionId::Left => "left",
            FunctionId::Right => "right",
            FunctionId::Substr => "substr",
            FunctionId::Len => "len",
            FunctionId::Upper => "upper",
            FunctionId::Lower => "lower",
            FunctionId::Caps => "caps",
            FunctionId::Trim => "trim",
            FunctionId::Pad => "pad",
            FunctionId::Replace => "replace",
            FunctionId::Insert => "insert",
            FunctionId::Repeat => "repeat",
            FunctionId::Abbr => "abbr",
            FunctionId::Crlf => "crlf",
            FunctionId::Tab => "tab",
            FunctionId::Char => "char",
            FunctionId::Meta => "meta",
            FunctionId::MetaSep => "meta_sep",
            FunctionId::MetaNum => "meta_num",
            FunctionId::TimeMs => "timems",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            FunctionId::If => Arity::between(2, 3),
            FunctionId::If2 => Arity::exactly(2),
            FunctionId::If3 => Arity::at_least(2),
            FunctionId::IfEqual | FunctionId::IfGreater | FunctionId::IfLonger => {
                Arity::exactly(4)
            }
            FunctionId::Select => Arity::at_least(2),
            FunctionId::And | FunctionId::Or => Arity::at_least(1),
            FunctionId::Not
            | FunctionId::Len
            | FunctionId::Upper
            | FunctionId::Lower
            | FunctionId::Caps
            | FunctionId::Trim
            | FunctionId::Abbr
            | FunctionId::Char
            | FunctionId::MetaNum
            | FunctionId::TimeMs => Arity::exactly(1),
            FunctionId::StrCmp
            | FunctionId::StrICmp
            | FunctionId::Greater
            | FunctionId::Longer
            | FunctionId::Mod
            | FunctionId::Num
            | FunctionId::Left
            | FunctionId::Right
            | FunctionId::Repeat
            | FunctionId::MetaSep => Arity::exactly(2),
            FunctionId::Add
            | FunctionId::Sub
            | FunctionId::Mul
            | FunctionId::Div
            | FunctionId::Min
            | FunctionId::Max => Arity::at_least(1),
            FunctionId::Substr | FunctionId::Insert => Arity::exactly(3),
            FunctionId::Pad => Arity::between(2, 3),
            FunctionId::Replace => Arity::at_least(3),
            FunctionId::Crlf => Arity::exactly(0),
            FunctionId::Tab => Arity::between(0, 1),
            FunctionId::Meta => Arity::between(1, 2),
        }
    }

    pub fn strategy(self) -> Strategy {
        match self {
            FunctionId::If
            | FunctionId::If2
            | FunctionId::If3
            | FunctionId::IfEqual
            | FunctionId::IfGreater
            | FunctionId::IfLonger
            | FunctionId::Select
            | FunctionId::And
            | FunctionId::Or
            | FunctionId::Not => Strategy::Lazy,
            _ => Strategy::Eager,
        }
    }

    /// Alternative spellings accepted for this function.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            FunctionId::Left => &["cut"],
            FunctionId::Len => &["length"],
            FunctionId::Substr => &["substring"],
            _ => &[],
        }
    }
}

/// Resolve a function name to its canonical id.
///
/// Names are matched after lowercasing, so `$IF(...)` and `$if(...)` agree.
pub fn resolve_function(name: &str) -> Option<FunctionId> {
    let lowered = name.to_ascii_lowercase();
    let canonical = canonicalize_alias(&lowered);
    FunctionId::ALL
        .iter()
        .copied()
        .find(|id| id.name() == canonical)
}

/// Every accepted function name, including aliases.
///
/// Used for diagnostics and typo suggestions.
pub fn accepted_function_names() -> &'static [&'static str] {
    ACCEPTED_NAMES
}

fn canonicalize_alias(name: &str) -> &str {
    match name {
        "cut" => "left",
        "length" => "len",
        "substring" => "substr",
        other => other,
    }
}

const ACCEPTED_NAMES: &[&str] = &[
    "if",
    "if2",
    "if3",
    "ifequal",
    "ifgreater",
    "iflonger",
    "select",
    "and",
    "or",
    "not",
    "strcmp",
    "stricmp",
    "greater",
    "longer",
    "add",
    "sub",
    "mul",
    "div",
    "mod",
    "min",
    "max",
    "num",
    "left",
    "cut",
    "right",
    "substr",
    "substring",
    "len",
    "length",
    "upper",
    "lower",
    "caps",
    "trim",
    "pad",
    "replace",
    "insert",
    "repeat",
    "abbr",
    "crlf",
    "tab",
    "char",
    "meta",
    "meta_sep",
    "meta_num",
    "timems",
];
