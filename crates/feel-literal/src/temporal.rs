//! Date, time and date-time literals with an optional `@zone` suffix.
//!
//! The primary component is ISO-8601 (`2020-01-01`, `10:00:00.5`,
//! `2020-01-01T10:00:00+10:00`). A trailing `@Area/City` names a zone that is
//! resolved to a UTC offset through a [`ZoneResolver`]. An unknown zone is
//! not an error: the value keeps the zone name and no resolved offset.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use chrono::{
    Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Timelike,
};
use chrono_tz::Tz;
use regex::{Captures, Regex};

use crate::constants::{NANOS_PER_SECOND, ZONE_SEPARATOR};
use crate::duration::{fraction_text, parse_digits, parse_fraction};
use crate::error::{FormatError, LiteralKind};

// ── Zone resolution ───────────────────────────────────────────────────────

/// Maps a zone name to the UTC offset in force at a local date-time.
///
/// Implementations are shared across concurrent requests and must only read.
pub trait ZoneResolver: Send + Sync {
    fn resolve(&self, zone: &str, local: NaiveDateTime) -> Option<FixedOffset>;
}

/// Resolves IANA zone names (`Australia/Sydney`) from the compiled-in
/// `chrono-tz` database.
#[derive(Debug, Clone, Copy, Default)]
pub struct TzDatabase;

impl ZoneResolver for TzDatabase {
    fn resolve(&self, zone: &str, local: NaiveDateTime) -> Option<FixedOffset> {
        let tz: Tz = zone.parse().ok()?;
        // Ambiguous local times (DST fall-back) take the earlier offset; times
        // inside a DST gap take the offset in force at that instant read as UTC.
        let offset = match tz.offset_from_local_datetime(&local).earliest() {
            Some(offset) => offset,
            None => tz.offset_from_utc_datetime(&local),
        };
        Some(offset.fix())
    }
}

/// A fixed name → offset table.
#[derive(Debug, Clone, Default)]
pub struct FixedZones {
    zones: HashMap<String, FixedOffset>,
}

impl FixedZones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, zone: impl Into<String>, offset: FixedOffset) -> Self {
        self.zones.insert(zone.into(), offset);
        self
    }

    pub fn insert(&mut self, zone: impl Into<String>, offset: FixedOffset) {
        self.zones.insert(zone.into(), offset);
    }
}

impl ZoneResolver for FixedZones {
    fn resolve(&self, zone: &str, _local: NaiveDateTime) -> Option<FixedOffset> {
        self.zones.get(zone).copied()
    }
}

// ── Values ────────────────────────────────────────────────────────────────

/// A time of day with an optional UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZonedTime {
    pub time: NaiveTime,
    pub offset: Option<FixedOffset>,
    /// Zone name as written after `@`, resolved or not.
    pub zone: Option<String>,
}

impl ZonedTime {
    pub fn new(time: NaiveTime) -> Self {
        Self {
            time,
            offset: None,
            zone: None,
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Literal text; with `zone_suffix` a named zone is written as `@zone`
    /// in place of the numeric offset.
    pub fn to_literal(&self, zone_suffix: bool) -> String {
        match (&self.zone, zone_suffix) {
            (Some(zone), true) => format!("{}{ZONE_SEPARATOR}{zone}", time_text(self.time)),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for ZonedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&time_text(self.time))?;
        if let Some(offset) = self.offset {
            f.write_str(&offset_text(offset))?;
        }
        Ok(())
    }
}

/// A calendar date and time of day with an optional UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    pub datetime: NaiveDateTime,
    pub offset: Option<FixedOffset>,
    /// Zone name as written after `@`, resolved or not.
    pub zone: Option<String>,
}

impl ZonedDateTime {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self {
            datetime,
            offset: None,
            zone: None,
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn to_literal(&self, zone_suffix: bool) -> String {
        match (&self.zone, zone_suffix) {
            (Some(zone), true) => format!(
                "{}T{}{ZONE_SEPARATOR}{zone}",
                date_text(self.datetime.date()),
                time_text(self.datetime.time())
            ),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}T{}",
            date_text(self.datetime.date()),
            time_text(self.datetime.time())
        )?;
        if let Some(offset) = self.offset {
            f.write_str(&offset_text(offset))?;
        }
        Ok(())
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<year>[+-]?[0-9]{4,})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})$")
            .expect("valid date pattern")
    })
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})(?:\.(?P<fraction>[0-9]+))?(?P<offset>Z|[+-][0-9]{2}:[0-9]{2})?$",
        )
        .expect("valid time pattern")
    })
}

/// Split `primary@zone`. An empty zone name is reported as `Err(())`.
fn split_zone(text: &str) -> Result<(&str, Option<&str>), ()> {
    match text.split_once(ZONE_SEPARATOR) {
        Some((_, "")) => Err(()),
        Some((primary, zone)) => Ok((primary, Some(zone))),
        None => Ok((text, None)),
    }
}

/// Parse `YYYY-MM-DD`. A zone suffix is accepted and dropped: a date has no
/// time of day to resolve an offset for.
pub fn parse_date(text: &str) -> Result<NaiveDate, FormatError> {
    let err = |reason| FormatError::new(LiteralKind::Date, text, reason);
    let (primary, _) = split_zone(text).map_err(|_| err("empty zone name"))?;
    parse_date_part(primary).map_err(err)
}

/// Parse `hh:mm:ss[.f][offset][@zone]`.
pub fn parse_time(text: &str, resolver: &dyn ZoneResolver) -> Result<ZonedTime, FormatError> {
    let err = |reason| FormatError::new(LiteralKind::Time, text, reason);
    let (primary, zone) = split_zone(text).map_err(|_| err("empty zone name"))?;
    let (time, explicit) = parse_time_part(primary).map_err(err)?;

    let mut value = ZonedTime::new(time);
    value.offset = explicit;
    if let Some(zone) = zone {
        // A bare time has no date to pick a DST rule from; use the epoch date.
        let resolved = NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| resolver.resolve(zone, epoch.and_time(time)));
        value.offset = resolved.or(explicit);
        value.zone = Some(zone.to_owned());
    }
    Ok(value)
}

/// Parse `YYYY-MM-DDThh:mm:ss[.f][offset][@zone]`.
pub fn parse_date_time(
    text: &str,
    resolver: &dyn ZoneResolver,
) -> Result<ZonedDateTime, FormatError> {
    let err = |reason| FormatError::new(LiteralKind::DateTime, text, reason);
    let (primary, zone) = split_zone(text).map_err(|_| err("empty zone name"))?;
    let (date, time) = primary
        .split_once('T')
        .ok_or_else(|| err("missing `T` between date and time"))?;
    let date = parse_date_part(date).map_err(err)?;
    let (time, explicit) = parse_time_part(time).map_err(err)?;

    let datetime = date.and_time(time);
    let mut value = ZonedDateTime::new(datetime);
    value.offset = explicit;
    if let Some(zone) = zone {
        value.offset = resolver.resolve(zone, datetime).or(explicit);
        value.zone = Some(zone.to_owned());
    }
    Ok(value)
}

fn parse_date_part(text: &str) -> Result<NaiveDate, &'static str> {
    let caps = date_pattern()
        .captures(text)
        .ok_or("expected YYYY-MM-DD")?;
    let year: i32 = caps["year"].parse().map_err(|_| "year out of range")?;
    let month = capture_number(&caps, "month")?;
    let day = capture_number(&caps, "day")?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or("no such calendar date")
}

fn parse_time_part(text: &str) -> Result<(NaiveTime, Option<FixedOffset>), &'static str> {
    let caps = time_pattern()
        .captures(text)
        .ok_or("expected hh:mm:ss")?;
    let hour = capture_number(&caps, "hour")?;
    let minute = capture_number(&caps, "minute")?;
    let second = capture_number(&caps, "second")?;
    let nanos = match caps.name("fraction") {
        Some(fraction) => parse_fraction(fraction.as_str()).ok_or("bad fractional seconds")?,
        None => 0,
    };
    let time =
        NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or("no such time of day")?;
    let offset = match caps.name("offset") {
        Some(offset) => Some(parse_offset(offset.as_str()).ok_or("offset out of range")?),
        None => None,
    };
    Ok((time, offset))
}

fn capture_number(caps: &Captures<'_>, name: &str) -> Result<u32, &'static str> {
    parse_digits(&caps[name])
        .and_then(|n| u32::try_from(n).ok())
        .ok_or("component out of range")
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    if text == "Z" {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match text.split_at(1) {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours = i32::try_from(parse_digits(hours)?).ok()?;
    let minutes = i32::try_from(parse_digits(minutes)?).ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3_600 + minutes * 60))
}

// ── Printing ──────────────────────────────────────────────────────────────

pub(crate) fn date_text(date: NaiveDate) -> String {
    let year = date.year();
    if (0..=9999).contains(&year) {
        format!("{year:04}-{:02}-{:02}", date.month(), date.day())
    } else {
        format!("{year:+05}-{:02}-{:02}", date.month(), date.day())
    }
}

fn time_text(time: NaiveTime) -> String {
    format!(
        "{:02}:{:02}:{:02}{}",
        time.hour(),
        time.minute(),
        time.second(),
        fraction_text(time.nanosecond() % NANOS_PER_SECOND)
    )
}

fn offset_text(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let seconds = seconds.unsigned_abs();
    let (hours, minutes, rest) = (seconds / 3_600, seconds % 3_600 / 60, seconds % 60);
    if rest == 0 {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{rest:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(h: i32) -> FixedOffset {
        FixedOffset::east_opt(h * 3_600).unwrap()
    }

    fn zones() -> FixedZones {
        FixedZones::new().with("Australia/Sydney", hours(11))
    }

    #[test]
    fn date_parses_and_prints() {
        let date = parse_date("2020-02-29").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
        assert_eq!(date_text(date), "2020-02-29");
    }

    #[test]
    fn date_rejects_impossible_day() {
        let err = parse_date("2021-02-29").unwrap_err();
        assert_eq!(err.kind, LiteralKind::Date);
        assert_eq!(err.reason, "no such calendar date");
    }

    #[test]
    fn date_ignores_zone_suffix() {
        assert_eq!(
            parse_date("2020-01-01@Australia/Sydney").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
    }

    #[test]
    fn time_with_fraction_and_offset() {
        let time = parse_time("10:30:00.250+02:00", &zones()).unwrap();
        assert_eq!(time.time, NaiveTime::from_hms_milli_opt(10, 30, 0, 250).unwrap());
        assert_eq!(time.offset, Some(hours(2)));
        assert_eq!(time.to_string(), "10:30:00.25+02:00");
    }

    #[test]
    fn time_zone_suffix_resolves() {
        let time = parse_time("10:00:00@Australia/Sydney", &zones()).unwrap();
        assert_eq!(time.offset, Some(hours(11)));
        assert_eq!(time.zone.as_deref(), Some("Australia/Sydney"));
        assert_eq!(time.to_literal(false), "10:00:00+11:00");
        assert_eq!(time.to_literal(true), "10:00:00@Australia/Sydney");
    }

    #[test]
    fn unknown_zone_degrades_to_no_offset() {
        let value = parse_date_time("2020-01-01T10:00:00@Nowhere", &zones()).unwrap();
        assert_eq!(value.offset, None);
        assert_eq!(value.zone.as_deref(), Some("Nowhere"));
        assert_eq!(value.to_string(), "2020-01-01T10:00:00");
    }

    #[test]
    fn zone_overrides_explicit_offset() {
        let value = parse_date_time("2020-01-01T10:00:00Z@Australia/Sydney", &zones()).unwrap();
        assert_eq!(value.offset, Some(hours(11)));
    }

    #[test]
    fn tz_database_applies_daylight_saving() {
        let summer = parse_date_time("2020-01-01T10:00:00@Australia/Sydney", &TzDatabase).unwrap();
        assert_eq!(summer.offset, Some(hours(11)));
        let winter = parse_date_time("2020-07-01T10:00:00@Australia/Sydney", &TzDatabase).unwrap();
        assert_eq!(winter.offset, Some(hours(10)));
        assert_eq!(winter.to_string(), "2020-07-01T10:00:00+10:00");
    }

    #[test]
    fn tz_database_rejects_unknown_names() {
        let local = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(TzDatabase.resolve("Nowhere", local), None);
    }

    #[test]
    fn malformed_times_are_errors() {
        for text in ["25:00:00", "10:61:00", "10:00", "10:00:00@", "10:00:00+25:00"] {
            let err = parse_time(text, &zones()).unwrap_err();
            assert_eq!(err.kind, LiteralKind::Time, "{text}");
        }
        let err = parse_date_time("2020-01-01 10:00:00", &zones()).unwrap_err();
        assert_eq!(err.kind, LiteralKind::DateTime);
    }

    #[test]
    fn negative_offsets_print_with_sign() {
        let value = parse_date_time("2020-01-01T10:00:00-05:30", &zones()).unwrap();
        assert_eq!(value.to_string(), "2020-01-01T10:00:00-05:30");
    }
}
