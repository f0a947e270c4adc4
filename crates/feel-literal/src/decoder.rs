//! Wire value → [`Value`].
//!
//! Native JSON types map directly (integers are promoted to float). Strings
//! are classified by the [lexer](crate::lexer) and parsed by the matching
//! literal grammar. A string that is not a single literal token stays a
//! string.

use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::constants::{
    ESCAPE_PREFIX, ESCAPE_SUFFIX, FALSE_KEYWORDS, NULL_KEYWORDS, TRUE_KEYWORDS,
};
use crate::duration::{DayTimeDuration, YearMonthDuration};
use crate::error::{FormatError, LiteralKind};
use crate::lexer::{classify, TokenKind};
use crate::temporal::{parse_date, parse_date_time, parse_time, TzDatabase, ZoneResolver};
use crate::value::Value;

/// Decodes wire values into typed literals.
///
/// Cheap to clone; the zone resolver is shared.
#[derive(Clone)]
pub struct LiteralDecoder {
    resolver: Arc<dyn ZoneResolver>,
}

impl Default for LiteralDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LiteralDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiteralDecoder").finish_non_exhaustive()
    }
}

impl LiteralDecoder {
    /// Decoder resolving zone names against the IANA database.
    pub fn new() -> Self {
        Self::with_resolver(TzDatabase)
    }

    pub fn with_resolver(resolver: impl ZoneResolver + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    pub fn with_shared_resolver(resolver: Arc<dyn ZoneResolver>) -> Self {
        Self { resolver }
    }

    /// Decode a parsed JSON value.
    ///
    /// Arrays and objects decode element-wise; the first malformed element
    /// fails the whole value and its position is recorded in the error's
    /// pointer.
    pub fn decode(&self, wire: &JsonValue) -> Result<Value, FormatError> {
        match wire {
            JsonValue::Null => Ok(Value::Null),
            JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
            JsonValue::Number(n) => n.as_f64().map(Value::Number).ok_or_else(|| {
                FormatError::new(
                    LiteralKind::Number,
                    n.to_string(),
                    "not representable as a 64-bit float",
                )
            }),
            JsonValue::String(s) => self.decode_str(s),
            JsonValue::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    self.decode(item)
                        .map_err(|err| err.within(&index.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            JsonValue::Object(fields) => fields
                .iter()
                .map(|(key, item)| match self.decode(item) {
                    Ok(value) => Ok((key.clone(), value)),
                    Err(err) => Err(err.within(key)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Map),
        }
    }

    /// Decode one string, such as a form field or a JSON string member.
    pub fn decode_str(&self, text: &str) -> Result<Value, FormatError> {
        let mut text = text;
        let mut trimmed = text.trim();
        while let Some(inner) = unwrap_escape(trimmed) {
            text = inner;
            trimmed = inner.trim();
        }
        if text.is_empty() {
            return Ok(Value::Null);
        }
        if trimmed.starts_with(ESCAPE_PREFIX) {
            return Err(FormatError::new(
                LiteralKind::Escape,
                trimmed,
                "missing closing quote",
            ));
        }

        match classify(trimmed) {
            TokenKind::Number => trimmed.parse().map(Value::Number).map_err(|_| {
                FormatError::new(LiteralKind::Number, trimmed, "not a decimal number")
            }),
            TokenKind::Name => Ok(keyword(trimmed).unwrap_or_else(|| Value::String(text.to_owned()))),
            TokenKind::String => {
                let unquoted = unquote(trimmed);
                if unquoted.starts_with(ESCAPE_PREFIX) {
                    return Err(FormatError::new(
                        LiteralKind::Escape,
                        trimmed,
                        "quoted string opens a literal escape",
                    ));
                }
                Ok(Value::String(unquoted))
            }
            TokenKind::DayTimeDuration => trimmed.parse::<DayTimeDuration>().map(Value::from),
            TokenKind::YearMonthDuration => trimmed.parse::<YearMonthDuration>().map(Value::from),
            TokenKind::Date => parse_date(trimmed).map(Value::Date),
            TokenKind::Time => parse_time(trimmed, self.resolver.as_ref()).map(Value::Time),
            TokenKind::DateTime => {
                parse_date_time(trimmed, self.resolver.as_ref()).map(Value::DateTime)
            }
            TokenKind::Ambiguous => Ok(Value::String(text.to_owned())),
        }
    }

    /// Re-run string decoding over an already-decoded value.
    ///
    /// Only [`Value::String`] members are reinterpreted; every other variant
    /// passes through untouched.
    pub fn decode_value(&self, value: Value) -> Result<Value, FormatError> {
        match value {
            Value::String(s) => self.decode_str(&s),
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    self.decode_value(item)
                        .map_err(|err| err.within(&index.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Value::Map(fields) => fields
                .into_iter()
                .map(|(key, item)| match self.decode_value(item) {
                    Ok(value) => Ok((key, value)),
                    Err(err) => Err(err.within(&key)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Map),
            other => Ok(other),
        }
    }
}

/// Decode with the default IANA zone resolver.
pub fn decode(wire: &JsonValue) -> Result<Value, FormatError> {
    LiteralDecoder::new().decode(wire)
}

/// Inner text of `@"…"`, or `None` when `text` is not a complete escape.
pub fn unwrap_escape(text: &str) -> Option<&str> {
    if text.len() < ESCAPE_PREFIX.len() + ESCAPE_SUFFIX.len() {
        return None;
    }
    text.strip_prefix(ESCAPE_PREFIX)?.strip_suffix(ESCAPE_SUFFIX)
}

/// Boolean and null keywords, matched case-insensitively.
pub fn keyword(name: &str) -> Option<Value> {
    let matches = |words: &[&str]| words.iter().any(|w| w.eq_ignore_ascii_case(name));
    if matches(TRUE_KEYWORDS) {
        Some(Value::Boolean(true))
    } else if matches(FALSE_KEYWORDS) {
        Some(Value::Boolean(false))
    } else if matches(NULL_KEYWORDS) {
        Some(Value::Null)
    } else {
        None
    }
}

/// Strip the outer quotes of a string token and undo `\"` and `\\`.
fn unquote(token: &str) -> String {
    let body = &token[1..token.len() - 1];
    if !body.contains('\\') {
        return body.to_owned();
    }
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::FixedZones;
    use chrono::{FixedOffset, NaiveDate};
    use serde_json::json;

    fn decoder() -> LiteralDecoder {
        LiteralDecoder::with_resolver(
            FixedZones::new().with("Australia/Sydney", FixedOffset::east_opt(11 * 3_600).unwrap()),
        )
    }

    #[test]
    fn integers_promote_to_float() {
        assert_eq!(decoder().decode(&json!(5)).unwrap(), Value::Number(5.0));
        assert_eq!(decoder().decode(&json!("5")).unwrap(), Value::Number(5.0));
    }

    #[test]
    fn keywords_any_case() {
        for text in ["true", "True", "TRUE", "tRuE"] {
            assert_eq!(decoder().decode_str(text).unwrap(), Value::Boolean(true));
        }
        for text in ["false", "False", "FALSE"] {
            assert_eq!(decoder().decode_str(text).unwrap(), Value::Boolean(false));
        }
        for text in ["none", "None", "null", "NULL"] {
            assert_eq!(decoder().decode_str(text).unwrap(), Value::Null);
        }
    }

    #[test]
    fn empty_string_is_null() {
        assert_eq!(decoder().decode(&json!("")).unwrap(), Value::Null);
    }

    #[test]
    fn quoted_string_is_unwrapped_once() {
        assert_eq!(
            decoder().decode_str("\"12\"").unwrap(),
            Value::String("12".into())
        );
        assert_eq!(
            decoder().decode_str(r#""say \"hi\"""#).unwrap(),
            Value::String("say \"hi\"".into())
        );
    }

    #[test]
    fn escape_forces_literal_reading() {
        assert_eq!(
            decoder().decode_str("@\"2020-01-01\"").unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
        );
        assert_eq!(
            decoder().decode_str("@\"hello world\"").unwrap(),
            Value::String("hello world".into())
        );
        assert_eq!(decoder().decode_str("@\"\"").unwrap(), Value::Null);
    }

    #[test]
    fn unterminated_escape_is_rejected() {
        let err = decoder().decode_str("@\"P1Y").unwrap_err();
        assert_eq!(err.kind, LiteralKind::Escape);
    }

    #[test]
    fn quoted_escape_prefix_is_rejected() {
        let err = decoder().decode(&json!("\"@\\\"x\"")).unwrap_err();
        assert_eq!(err.kind, LiteralKind::Escape);
        assert_eq!(err.literal, "\"@\\\"x\"");
        // `@` followed by anything else is an ordinary string.
        assert_eq!(
            decoder().decode_str("\"@home\"").unwrap(),
            Value::String("@home".into())
        );
    }

    #[test]
    fn deeply_nested_escapes_unwrap_iteratively() {
        let depth = 200_000;
        let nested = format!(
            "{}P1D{}",
            ESCAPE_PREFIX.repeat(depth),
            ESCAPE_SUFFIX.repeat(depth)
        );
        let value = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(move || decoder().decode_str(&nested))
            .unwrap()
            .join()
            .unwrap()
            .unwrap();
        assert_eq!(value, Value::DayTimeDuration(DayTimeDuration::from_seconds(86_400)));

        let unterminated = format!("{}P1D", ESCAPE_PREFIX.repeat(3));
        let err = decoder().decode_str(&unterminated).unwrap_err();
        assert_eq!(err.kind, LiteralKind::Escape);
    }

    #[test]
    fn ambiguous_text_is_kept_verbatim() {
        assert_eq!(
            decoder().decode_str("12 apples").unwrap(),
            Value::String("12 apples".into())
        );
        assert_eq!(
            decoder().decode_str("[1 .. 5]").unwrap(),
            Value::String("[1 .. 5]".into())
        );
        assert_eq!(
            decoder().decode_str(" Gold ").unwrap(),
            Value::String(" Gold ".into())
        );
    }

    #[test]
    fn malformed_literal_is_a_format_error() {
        let err = decoder().decode(&json!("PxDT")).unwrap_err();
        assert_eq!(err.kind, LiteralKind::DayTimeDuration);
        assert_eq!(err.literal, "PxDT");
    }

    #[test]
    fn composite_errors_carry_a_pointer() {
        let err = decoder()
            .decode(&json!({"ok": "P1D", "items": [1, "2020-02-30"]}))
            .unwrap_err();
        assert_eq!(err.kind, LiteralKind::Date);
        assert_eq!(err.pointer, "/items/1");
    }

    #[test]
    fn object_order_is_preserved() {
        let value = decoder().decode(&json!({"z": 1, "a": "x", "m": null})).unwrap();
        match value {
            Value::Map(fields) => {
                let keys: Vec<_> = fields.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["z", "a", "m"]);
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn decode_value_only_touches_strings() {
        let decoded = decoder()
            .decode(&json!({"n": 1, "d": "P1D", "s": "\"P1D\""}))
            .unwrap();
        let again = decoder().decode_value(decoded.clone()).unwrap();
        assert_eq!(again.get("n"), decoded.get("n"));
        assert_eq!(again.get("d"), decoded.get("d"));
    }

    #[test]
    fn keyword_table() {
        assert_eq!(keyword("None"), Some(Value::Null));
        assert_eq!(keyword("nil"), None);
    }
}
