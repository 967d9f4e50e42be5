//! Position-tracking character cursor over script text.
//!
//! The scanner does not produce a token list. It hands the parser exactly the
//! structural signals it asks for (the next character, a run of plain text, a
//! function name) and reports the byte offset of the cursor at any time.

use winnow::prelude::*;
use winnow::token::{any, take_till, take_while};

/// Characters that carry meaning anywhere in a script.
pub const STRUCTURAL: [char; 6] = ['%', '$', '[', ']', '"', '\\'];

/// Characters that carry meaning only inside a function argument list.
pub const ARGUMENT: [char; 3] = [',', '(', ')'];

/// Returns true if `c` can appear between the `%` delimiters of a variable.
pub fn is_variable_char(c: char) -> bool {
    c != '\n' && !STRUCTURAL.contains(&c) && !ARGUMENT.contains(&c)
}

/// Returns true if `c` can appear in a function name.
pub fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A cursor over the script input.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
        }
    }

    /// Byte offset of the next unread character.
    pub fn offset(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Consume and return the next character.
    pub fn advance(&mut self) -> Option<char> {
        next_char(&mut self.rest).ok()
    }

    /// Consume `expected` if it is the next character.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume characters up to (not including) the first one matching `stop`.
    /// Returns the consumed text, which may be empty.
    pub fn consume_until(&mut self, stop: impl Fn(char) -> bool) -> &'a str {
        run_until(&mut self.rest, stop).unwrap_or_default()
    }

    /// Consume a function name. Returns an empty string if the next character
    /// cannot start a name.
    pub fn consume_name(&mut self) -> &'a str {
        name(&mut self.rest).unwrap_or_default()
    }
}

fn next_char(input: &mut &str) -> ModalResult<char> {
    any.parse_next(input)
}

fn run_until<'i>(input: &mut &'i str, stop: impl Fn(char) -> bool) -> ModalResult<&'i str> {
    take_till(0.., stop).parse_next(input)
}

fn name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., is_name_char).parse_next(input)
}
