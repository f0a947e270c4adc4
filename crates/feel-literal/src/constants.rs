//! Shared literal constants.

/// Opening marker of a wrapped literal: `@"…"`.
pub const ESCAPE_PREFIX: &str = "@\"";

/// Closing marker of a wrapped literal.
pub const ESCAPE_SUFFIX: &str = "\"";

/// Separator between a temporal literal and its zone name.
pub const ZONE_SEPARATOR: char = '@';

/// Keyword names that decode to `true`, compared case-insensitively.
pub const TRUE_KEYWORDS: &[&str] = &["true"];

/// Keyword names that decode to `false`, compared case-insensitively.
pub const FALSE_KEYWORDS: &[&str] = &["false"];

/// Keyword names that decode to null, compared case-insensitively.
pub const NULL_KEYWORDS: &[&str] = &["none", "null"];

pub(crate) const SECONDS_PER_MINUTE: u64 = 60;
pub(crate) const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
pub(crate) const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
pub(crate) const NANOS_PER_SECOND: u32 = 1_000_000_000;
