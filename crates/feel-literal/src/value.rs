//! [`Value`], the typed FEEL literal model.

use chrono::NaiveDate;

use crate::duration::{DayTimeDuration, YearMonthDuration};
use crate::temporal::{ZonedDateTime, ZonedTime};

/// A decoded FEEL literal.
///
/// Values are created per request from wire input or engine output and are
/// never shared between requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Wire integers are promoted to float on decode.
    Number(f64),
    Boolean(bool),
    #[default]
    Null,
    String(String),
    YearMonthDuration(YearMonthDuration),
    DayTimeDuration(DayTimeDuration),
    Date(NaiveDate),
    Time(ZonedTime),
    DateTime(ZonedDateTime),
    /// Produced by the engine only; never decoded from the wire.
    Range(Range),
    List(Vec<Value>),
    /// Insertion-ordered; keys are unique.
    Map(Vec<(String, Value)>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a member of a [`Value::Map`].
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// True for variants that JSON carries natively.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Number(_) | Value::Boolean(_) | Value::Null | Value::String(_)
        )
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<YearMonthDuration> for Value {
    fn from(value: YearMonthDuration) -> Self {
        Value::YearMonthDuration(value)
    }
}

impl From<DayTimeDuration> for Value {
    fn from(value: DayTimeDuration) -> Self {
        Value::DayTimeDuration(value)
    }
}

impl From<ZonedTime> for Value {
    fn from(value: ZonedTime) -> Self {
        Value::Time(value)
    }
}

impl From<ZonedDateTime> for Value {
    fn from(value: ZonedDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<Range> for Value {
    fn from(value: Range) -> Self {
        Value::Range(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

// ── Range ─────────────────────────────────────────────────────────────────

/// Whether an interval endpoint belongs to the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Inclusivity {
    Closed,
    Open,
}

impl Inclusivity {
    /// Bracket written before the low endpoint: `[` or `(`.
    pub fn low_symbol(self) -> char {
        match self {
            Inclusivity::Closed => '[',
            Inclusivity::Open => '(',
        }
    }

    /// Bracket written after the high endpoint: `]` or `)`.
    pub fn high_symbol(self) -> char {
        match self {
            Inclusivity::Closed => ']',
            Inclusivity::Open => ')',
        }
    }
}

/// An interval such as `[1 .. 10)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub start: Inclusivity,
    pub low: Box<Value>,
    pub high: Box<Value>,
    pub end: Inclusivity,
}

impl Range {
    pub fn new(
        start: Inclusivity,
        low: impl Into<Value>,
        high: impl Into<Value>,
        end: Inclusivity,
    ) -> Self {
        Self {
            start,
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            end,
        }
    }

    /// Closed on both ends.
    pub fn closed(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::new(Inclusivity::Closed, low, high, Inclusivity::Closed)
    }
}
