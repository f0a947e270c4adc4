//! Year-month and day-time duration grammars.
//!
//! ```text
//! year-month = "-"? "P" (digits "Y")? (digits "M")?          ; at least one
//! day-time   = "-"? "P" (digits "D")? ("T" (digits "H")? (digits "M")? (seconds "S")?)?
//! seconds    = digits ("." digits)?
//! ```
//!
//! The sign applies once, to the whole magnitude. Omitted components are
//! zero.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;

use crate::constants::{NANOS_PER_SECOND, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::error::{FormatError, LiteralKind};

// ── Year-month ────────────────────────────────────────────────────────────

/// A signed number of months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct YearMonthDuration {
    pub months: i64,
}

impl YearMonthDuration {
    pub fn from_months(months: i64) -> Self {
        Self { months }
    }

    /// Whole years of the magnitude.
    pub fn years_part(&self) -> u64 {
        self.months.unsigned_abs() / 12
    }

    /// Months left over after [`Self::years_part`].
    pub fn months_part(&self) -> u64 {
        self.months.unsigned_abs() % 12
    }

    pub fn is_negative(&self) -> bool {
        self.months < 0
    }
}

impl FromStr for YearMonthDuration {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let err = |reason| FormatError::new(LiteralKind::YearMonthDuration, text, reason);
        let (negative, body) = split_sign(text);
        let body = body
            .strip_prefix('P')
            .ok_or_else(|| err("missing `P` designator"))?;

        let (years, rest) = match body.split_once('Y') {
            Some((years, rest)) => (Some(years), rest),
            None => (None, body),
        };
        let months = if rest.is_empty() {
            None
        } else {
            Some(
                rest.strip_suffix('M')
                    .ok_or_else(|| err("expected `M` after the months component"))?,
            )
        };
        if years.is_none() && months.is_none() {
            return Err(err("no years or months component"));
        }

        let years = match years {
            Some(digits) => {
                parse_digits(digits).ok_or_else(|| err("years component is not an integer"))?
            }
            None => 0,
        };
        let months = match months {
            Some(digits) => {
                parse_digits(digits).ok_or_else(|| err("months component is not an integer"))?
            }
            None => 0,
        };

        let total = years
            .checked_mul(12)
            .and_then(|m| m.checked_add(months))
            .and_then(|m| i64::try_from(m).ok())
            .ok_or_else(|| err("value out of range"))?;
        Ok(Self::from_months(if negative { -total } else { total }))
    }
}

impl fmt::Display for YearMonthDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "P{}Y{}M", self.years_part(), self.months_part())
    }
}

// ── Day-time ──────────────────────────────────────────────────────────────

/// A signed span of seconds with a sub-second fraction.
///
/// The magnitude is kept unsigned with a separate sign flag; a zero span is
/// never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DayTimeDuration {
    negative: bool,
    seconds: u64,
    nanos: u32,
}

impl DayTimeDuration {
    pub fn new(negative: bool, seconds: u64, nanos: u32) -> Self {
        let seconds = seconds.saturating_add(u64::from(nanos / NANOS_PER_SECOND));
        let nanos = nanos % NANOS_PER_SECOND;
        Self {
            negative: negative && (seconds != 0 || nanos != 0),
            seconds,
            nanos,
        }
    }

    pub fn from_seconds(seconds: i64) -> Self {
        Self::new(seconds < 0, seconds.unsigned_abs(), 0)
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Whole seconds of the magnitude.
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Fraction of the magnitude below one second.
    pub fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    pub fn subsec_millis(&self) -> u32 {
        self.nanos / 1_000_000
    }

    pub fn as_secs_f64(&self) -> f64 {
        let magnitude = self.seconds as f64 + f64::from(self.nanos) / f64::from(NANOS_PER_SECOND);
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// `None` when the magnitude does not fit a [`TimeDelta`].
    pub fn to_time_delta(&self) -> Option<TimeDelta> {
        let delta = TimeDelta::new(i64::try_from(self.seconds).ok()?, self.nanos)?;
        Some(if self.negative { -delta } else { delta })
    }

    pub fn from_time_delta(delta: TimeDelta) -> Self {
        let negative = delta < TimeDelta::zero();
        let magnitude = delta.abs();
        Self::new(
            negative,
            magnitude.num_seconds().unsigned_abs(),
            magnitude.subsec_nanos().unsigned_abs(),
        )
    }
}

impl From<TimeDelta> for DayTimeDuration {
    fn from(delta: TimeDelta) -> Self {
        Self::from_time_delta(delta)
    }
}

impl FromStr for DayTimeDuration {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let err = |reason| FormatError::new(LiteralKind::DayTimeDuration, text, reason);
        let (negative, body) = split_sign(text);
        let body = body
            .strip_prefix('P')
            .ok_or_else(|| err("missing `P` designator"))?;
        let (date_part, time_part) = match body.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (body, None),
        };
        if date_part.is_empty() && time_part.is_none() {
            return Err(err("no days or time component"));
        }

        let mut seconds: u64 = 0;
        let mut nanos: u32 = 0;
        let add = |total: u64, count: u64, unit: u64| {
            count
                .checked_mul(unit)
                .and_then(|s| total.checked_add(s))
                .ok_or_else(|| err("value out of range"))
        };

        if !date_part.is_empty() {
            let days = date_part
                .strip_suffix('D')
                .ok_or_else(|| err("expected `D` after the days component"))?;
            let days = parse_digits(days).ok_or_else(|| err("days component is not an integer"))?;
            seconds = add(seconds, days, SECONDS_PER_DAY)?;
        }

        if let Some(mut rest) = time_part {
            if rest.is_empty() {
                return Err(err("`T` must be followed by hours, minutes or seconds"));
            }
            if let Some((hours, tail)) = rest.split_once('H') {
                let hours =
                    parse_digits(hours).ok_or_else(|| err("hours component is not an integer"))?;
                seconds = add(seconds, hours, SECONDS_PER_HOUR)?;
                rest = tail;
            }
            if let Some((minutes, tail)) = rest.split_once('M') {
                let minutes = parse_digits(minutes)
                    .ok_or_else(|| err("minutes component is not an integer"))?;
                seconds = add(seconds, minutes, SECONDS_PER_MINUTE)?;
                rest = tail;
            }
            if !rest.is_empty() {
                let secs = rest
                    .strip_suffix('S')
                    .ok_or_else(|| err("expected `S` after the seconds component"))?;
                let (whole, fraction) = parse_seconds(secs)
                    .ok_or_else(|| err("seconds component is not a decimal number"))?;
                seconds = add(seconds, whole, 1)?;
                nanos = fraction;
            }
        }

        Ok(Self::new(negative, seconds, nanos))
    }
}

impl fmt::Display for DayTimeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;

        let days = self.seconds / SECONDS_PER_DAY;
        let hours = self.seconds % SECONDS_PER_DAY / SECONDS_PER_HOUR;
        let minutes = self.seconds % SECONDS_PER_HOUR / SECONDS_PER_MINUTE;
        let seconds = self.seconds % SECONDS_PER_MINUTE;

        if days > 0 {
            write!(f, "{days}D")?;
        }
        if hours == 0 && minutes == 0 && seconds == 0 && self.nanos == 0 {
            if days == 0 {
                f.write_str("T0S")?;
            }
            return Ok(());
        }
        f.write_str("T")?;
        if hours > 0 {
            write!(f, "{hours}H")?;
        }
        if minutes > 0 {
            write!(f, "{minutes}M")?;
        }
        if seconds > 0 || self.nanos > 0 {
            write!(f, "{seconds}{}S", fraction_text(self.nanos))?;
        }
        Ok(())
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────

fn split_sign(text: &str) -> (bool, &str) {
    match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    }
}

/// Unsigned decimal integer; rejects empty input and any non-digit.
pub(crate) fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Digits after a decimal point as nanoseconds; digits past the ninth are
/// dropped.
pub(crate) fn parse_fraction(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut nanos: u32 = 0;
    for position in 0..9 {
        let digit = digits.as_bytes().get(position).map_or(0, |b| u32::from(b - b'0'));
        nanos = nanos * 10 + digit;
    }
    Some(nanos)
}

fn parse_seconds(text: &str) -> Option<(u64, u32)> {
    match text.split_once('.') {
        Some((whole, fraction)) => Some((parse_digits(whole)?, parse_fraction(fraction)?)),
        None => Some((parse_digits(text)?, 0)),
    }
}

/// `.5`, `.125`, … with trailing zeros removed; empty for zero.
pub(crate) fn fraction_text(nanos: u32) -> String {
    if nanos == 0 {
        return String::new();
    }
    let digits = format!("{nanos:09}");
    format!(".{}", digits.trim_end_matches('0'))
}
