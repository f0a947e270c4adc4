//! FEEL literal marshalling codec.
//!
//! Converts between wire values (JSON scalars, arrays and objects, or form
//! field strings) and [`Value`], a typed model of DMN FEEL literals: numbers,
//! booleans, null, strings, year-month and day-time durations, dates, times,
//! date-times and ranges.
//!
//! ```
//! use feel_literal::{decode, encode, Value, WrapMode};
//! use serde_json::json;
//!
//! let value = decode(&json!("-P1Y6M")).unwrap();
//! assert!(matches!(value, Value::YearMonthDuration(d) if d.months == -18));
//! assert_eq!(encode(&value, WrapMode::Wrapped), json!("@\"-P1Y6M\""));
//! ```

pub mod constants;
pub mod decoder;
pub mod duration;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod temporal;
pub mod value;

pub use decoder::{decode, LiteralDecoder};
pub use duration::{DayTimeDuration, YearMonthDuration};
pub use encoder::{encode, EncoderOptions, LiteralEncoder, StringPolicy, WrapMode};
pub use error::{FormatError, LiteralKind};
pub use lexer::{classify, tokenize, Lexeme, Token, TokenKind};
pub use temporal::{
    parse_date, parse_date_time, parse_time, FixedZones, TzDatabase, ZoneResolver, ZonedDateTime,
    ZonedTime,
};
pub use value::{Inclusivity, Range, Value};
