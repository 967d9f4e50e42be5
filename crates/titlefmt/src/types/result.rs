use std::fmt;

/// The outcome of evaluating an expression for one fan-out branch.
///
/// Three states matter to conditional groups and to `$if`-style functions:
/// a name that did not resolve at all (`success == false`), a known field
/// with no value for this record (`is_empty == true`), and a resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptResult {
    pub value: String,
    /// False if any name inside failed to resolve.
    pub success: bool,
    /// True if any field inside resolved but had no value.
    pub is_empty: bool,
}

impl Default for ScriptResult {
    /// An empty, successful result: what an empty script evaluates to.
    fn default() -> Self {
        Self {
            value: String::new(),
            success: true,
            is_empty: false,
        }
    }
}

impl ScriptResult {
    /// Resolved text.
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// A field value, which counts as empty if the text is empty.
    pub fn field(value: impl Into<String>) -> Self {
        let value = value.into();
        let is_empty = value.is_empty();
        Self {
            value,
            success: true,
            is_empty,
        }
    }

    /// A known field with no value for this record.
    pub fn missing() -> Self {
        Self {
            value: String::new(),
            success: true,
            is_empty: true,
        }
    }

    /// A name that could not be resolved.
    pub fn unresolved() -> Self {
        Self {
            value: String::new(),
            success: false,
            is_empty: true,
        }
    }

    /// Boolean result for comparison functions: `"1"` or `""`.
    pub fn from_bool(value: bool) -> Self {
        if value {
            Self::literal("1")
        } else {
            Self::default()
        }
    }

    /// Whether this result counts as true in a condition.
    pub fn is_truthy(&self) -> bool {
        self.success && !self.is_empty && !self.value.is_empty()
    }

    /// Append a sibling result: text concatenates, failure and emptiness
    /// are sticky.
    pub fn append(&mut self, other: ScriptResult) {
        self.value.push_str(&other.value);
        self.absorb_flags(&other);
    }

    /// Cut the text to at most `max_len` bytes, backing off to the previous
    /// character boundary.
    pub fn truncate(&mut self, max_len: usize) {
        if self.value.len() <= max_len {
            return;
        }
        let mut end = max_len;
        while !self.value.is_char_boundary(end) {
            end -= 1;
        }
        self.value.truncate(end);
    }

    /// Take over another result's failure and emptiness without its text.
    pub fn absorb_flags(&mut self, other: &ScriptResult) {
        self.success &= other.success;
        self.is_empty |= other.is_empty;
    }
}

impl fmt::Display for ScriptResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<String> for ScriptResult {
    fn from(value: String) -> Self {
        ScriptResult::literal(value)
    }
}

impl From<&str> for ScriptResult {
    fn from(value: &str) -> Self {
        ScriptResult::literal(value)
    }
}
