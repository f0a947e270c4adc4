//! Literal decoding error type.

use std::fmt;

use thiserror::Error;

/// The literal grammar a [`FormatError`] was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Number,
    DayTimeDuration,
    YearMonthDuration,
    Date,
    Time,
    DateTime,
    /// A `@"…"` escape that is not closed.
    Escape,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LiteralKind::Number => "number",
            LiteralKind::DayTimeDuration => "day-time duration",
            LiteralKind::YearMonthDuration => "year-month duration",
            LiteralKind::Date => "date",
            LiteralKind::Time => "time",
            LiteralKind::DateTime => "date-time",
            LiteralKind::Escape => "literal escape",
        })
    }
}

/// A literal of a recognized kind whose internal grammar is malformed.
///
/// `pointer` is an RFC 6901 JSON Pointer to the failing element inside a
/// composite payload; it is empty when the failing value is the top-level
/// one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind} `{literal}`: {reason}{}", location(.pointer))]
pub struct FormatError {
    pub kind: LiteralKind,
    pub literal: String,
    pub reason: &'static str,
    pub pointer: String,
}

fn location(pointer: &str) -> String {
    if pointer.is_empty() {
        String::new()
    } else {
        format!(" (at {pointer})")
    }
}

impl FormatError {
    pub fn new(kind: LiteralKind, literal: impl Into<String>, reason: &'static str) -> Self {
        Self {
            kind,
            literal: literal.into(),
            reason,
            pointer: String::new(),
        }
    }

    /// Prefix the pointer with one enclosing array index or object key.
    pub fn within(mut self, component: &str) -> Self {
        let mut pointer = String::with_capacity(component.len() + self.pointer.len() + 1);
        pointer.push('/');
        pointer.push_str(&escape_component(component));
        pointer.push_str(&self.pointer);
        self.pointer = pointer;
        self
    }
}

fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}
