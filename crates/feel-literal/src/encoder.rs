//! [`Value`] → wire value.
//!
//! The structural inverse of the [decoder](crate::decoder). JSON-native
//! variants encode as themselves; durations, dates, times and ranges become
//! literal text, wrapped in `@"…"` under [`WrapMode::Wrapped`].

use serde_json::{Map, Number, Value as JsonValue};

use crate::constants::{ESCAPE_PREFIX, ESCAPE_SUFFIX};
use crate::decoder::{keyword, unwrap_escape};
use crate::lexer::{classify, TokenKind};
use crate::temporal::date_text;
use crate::value::{Range, Value};

/// How typed literals are carried as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// `@"P1Y6M"`; the decoder turns it back into the typed value.
    #[default]
    Wrapped,
    /// `P1Y6M`; readable, but decodes back as a plain string only when it is
    /// ambiguous.
    Plain,
}

/// How string values are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StringPolicy {
    /// Strings are emitted unchanged.
    #[default]
    Bare,
    /// Strings that would decode as something else (`"true"`, `"12"`,
    /// `"P1D"`) are emitted in double quotes so they decode as strings.
    Quoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncoderOptions {
    pub wrap: WrapMode,
    pub strings: StringPolicy,
    /// Write `@zone` instead of the numeric offset for times and date-times
    /// decoded with a zone suffix. Dates carry no zone, so `2020-01-01@Zone`
    /// always encodes as `2020-01-01`.
    pub zone_suffix: bool,
}

impl EncoderOptions {
    pub fn new(wrap: WrapMode) -> Self {
        Self {
            wrap,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LiteralEncoder {
    options: EncoderOptions,
}

impl LiteralEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EncoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> EncoderOptions {
        self.options
    }

    pub fn encode(&self, value: &Value) -> JsonValue {
        match value {
            Value::Number(n) => encode_number(*n),
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Null => JsonValue::Null,
            Value::String(s) => JsonValue::String(self.string_text(s)),
            Value::List(items) => JsonValue::Array(items.iter().map(|v| self.encode(v)).collect()),
            Value::Map(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), self.encode(v)))
                    .collect::<Map<String, JsonValue>>(),
            ),
            Value::YearMonthDuration(_)
            | Value::DayTimeDuration(_)
            | Value::Date(_)
            | Value::Time(_)
            | Value::DateTime(_)
            | Value::Range(_) => match self.literal_text(value) {
                Some(text) => JsonValue::String(self.wrap(text)),
                None => JsonValue::Null,
            },
        }
    }

    /// Unwrapped literal text of a typed value; `None` for JSON-native
    /// variants.
    pub fn literal_text(&self, value: &Value) -> Option<String> {
        let text = match value {
            Value::YearMonthDuration(d) => d.to_string(),
            Value::DayTimeDuration(d) => d.to_string(),
            Value::Date(d) => date_text(*d),
            Value::Time(t) => t.to_literal(self.options.zone_suffix),
            Value::DateTime(t) => t.to_literal(self.options.zone_suffix),
            Value::Range(r) => self.range_text(r),
            _ => return None,
        };
        Some(text)
    }

    fn wrap(&self, text: String) -> String {
        match self.options.wrap {
            WrapMode::Wrapped => format!("{ESCAPE_PREFIX}{text}{ESCAPE_SUFFIX}"),
            WrapMode::Plain => text,
        }
    }

    fn string_text(&self, s: &str) -> String {
        match self.options.strings {
            StringPolicy::Quoted if !decodes_as_itself(s) => quote(s),
            _ => s.to_owned(),
        }
    }

    fn range_text(&self, range: &Range) -> String {
        format!(
            "{}{} .. {}{}",
            range.start.low_symbol(),
            self.bound_text(&range.low),
            self.bound_text(&range.high),
            range.end.high_symbol()
        )
    }

    /// Text of a value nested inside a range.
    fn bound_text(&self, value: &Value) -> String {
        match value {
            Value::Number(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_owned(),
            Value::String(s) => quote(s),
            Value::List(items) => {
                let items: Vec<_> = items.iter().map(|v| self.bound_text(v)).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Map(fields) => {
                let fields: Vec<_> = fields
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", self.bound_text(v)))
                    .collect();
                format!("{{{}}}", fields.join(", "))
            }
            typed => self.literal_text(typed).unwrap_or_default(),
        }
    }
}

/// Encode with the given wrap mode and default options otherwise.
pub fn encode(value: &Value, wrap: WrapMode) -> JsonValue {
    LiteralEncoder::with_options(EncoderOptions::new(wrap)).encode(value)
}

fn encode_number(n: f64) -> JsonValue {
    // NaN and infinities have no JSON form.
    Number::from_f64(n).map_or_else(|| JsonValue::String(n.to_string()), JsonValue::Number)
}

/// True when decoding `s` bare yields the string `s` again.
fn decodes_as_itself(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let trimmed = s.trim();
    if unwrap_escape(trimmed).is_some() || trimmed.starts_with(ESCAPE_PREFIX) {
        return false;
    }
    match classify(trimmed) {
        TokenKind::Ambiguous => true,
        TokenKind::Name => keyword(trimmed).is_none(),
        _ => false,
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::{DayTimeDuration, YearMonthDuration};
    use crate::value::Inclusivity;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn primitives_are_mode_independent() {
        let value = Value::Map(vec![
            ("n".into(), Value::Number(1.5)),
            ("b".into(), Value::Boolean(false)),
            ("z".into(), Value::Null),
            ("s".into(), Value::String("x".into())),
            ("l".into(), Value::List(vec![Value::Number(2.0)])),
        ]);
        let expected = json!({"n": 1.5, "b": false, "z": null, "s": "x", "l": [2.0]});
        assert_eq!(encode(&value, WrapMode::Wrapped), expected);
        assert_eq!(encode(&value, WrapMode::Plain), expected);
    }

    #[test]
    fn typed_values_wrap_or_not() {
        let value = Value::from(YearMonthDuration::from_months(-18));
        assert_eq!(encode(&value, WrapMode::Wrapped), json!("@\"-P1Y6M\""));
        assert_eq!(encode(&value, WrapMode::Plain), json!("-P1Y6M"));

        let value = Value::from(DayTimeDuration::from_seconds(3 * 86_400 + 4 * 3_600 + 5 * 60 + 6));
        assert_eq!(encode(&value, WrapMode::Plain), json!("P3DT4H5M6S"));

        let value = Value::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(encode(&value, WrapMode::Wrapped), json!("@\"2020-01-01\""));
    }

    #[test]
    fn range_text_uses_symbols() {
        let range = Range::new(
            Inclusivity::Closed,
            Value::Number(1.0),
            Value::Number(10.0),
            Inclusivity::Open,
        );
        assert_eq!(encode(&Value::from(range.clone()), WrapMode::Wrapped), json!("@\"[1 .. 10)\""));
        assert_eq!(encode(&Value::from(range), WrapMode::Plain), json!("[1 .. 10)"));

        let dates = Range::new(
            Inclusivity::Open,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
            Inclusivity::Closed,
        );
        assert_eq!(
            encode(&Value::from(dates), WrapMode::Plain),
            json!("(2020-01-01 .. 2020-12-31]")
        );
        let words = Range::closed("a", "m");
        assert_eq!(encode(&Value::from(words), WrapMode::Plain), json!("[\"a\" .. \"m\"]"));
    }

    #[test]
    fn quoted_policy_protects_literal_looking_strings() {
        let encoder = LiteralEncoder::with_options(EncoderOptions {
            strings: StringPolicy::Quoted,
            ..EncoderOptions::default()
        });
        assert_eq!(encoder.encode(&Value::from("true")), json!("\"true\""));
        assert_eq!(encoder.encode(&Value::from("12")), json!("\"12\""));
        assert_eq!(encoder.encode(&Value::from("P1D")), json!("\"P1D\""));
        assert_eq!(encoder.encode(&Value::from("")), json!("\"\""));
        assert_eq!(encoder.encode(&Value::from("say \"hi\"")), json!("say \"hi\""));
        assert_eq!(encoder.encode(&Value::from("\"hi\"")), json!("\"\\\"hi\\\"\""));
        assert_eq!(encoder.encode(&Value::from("Gold")), json!("Gold"));
        assert_eq!(encoder.encode(&Value::from("12 apples")), json!("12 apples"));
    }

    #[test]
    fn non_finite_numbers_fall_back_to_text() {
        assert_eq!(encode(&Value::Number(f64::NAN), WrapMode::Plain), json!("NaN"));
        assert_eq!(encode(&Value::Number(f64::INFINITY), WrapMode::Plain), json!("inf"));
    }
}
