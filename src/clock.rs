// Clock and timezone provider
//
// The validators never read wall-clock time directly; "now" is always
// injected through the `Clock` trait so validation runs are deterministic.
// `TimezoneSpec` resolves the campaign's textual timezone, which may be a
// named IANA identifier or a fixed `±HH:MM` offset.

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// Injected time source for the validators
pub trait Clock: Send + Sync {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;

    /// Number of UTC-offset transitions (DST boundaries) a named zone
    /// undergoes between two instants
    fn dst_transitions(&self, zone: Tz, from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
        count_offset_transitions(zone, from, to)
    }
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock pinned to one instant, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Pin the clock to a `YYYY-MM-DD HH:MM` UTC timestamp
    pub fn at(timestamp: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M")
            .ok()
            .map(|naive| Self::new(Utc.from_utc_datetime(&naive)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// A campaign timezone: a named IANA zone or a fixed UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimezoneSpec {
    /// Named IANA zone, e.g. `Europe/Berlin`
    Named(Tz),

    /// Fixed offset from a `±HH:MM` string
    Fixed(FixedOffset),
}

impl Default for TimezoneSpec {
    fn default() -> Self {
        TimezoneSpec::Named(Tz::UTC)
    }
}

impl fmt::Display for TimezoneSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimezoneSpec::Named(tz) => write!(f, "{}", tz),
            TimezoneSpec::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl TimezoneSpec {
    /// Parse a timezone string. Empty means "system default", resolved to
    /// UTC so library behavior stays deterministic.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Some(TimezoneSpec::default());
        }
        if let Ok(tz) = Tz::from_str(trimmed) {
            return Some(TimezoneSpec::Named(tz));
        }
        parse_offset(trimmed).map(TimezoneSpec::Fixed)
    }

    /// The named zone, when one was configured
    pub fn named(&self) -> Option<Tz> {
        match self {
            TimezoneSpec::Named(tz) => Some(*tz),
            TimezoneSpec::Fixed(_) => None,
        }
    }

    /// Resolve a local wall-clock datetime to a UTC instant.
    ///
    /// DST gaps and ambiguities pick the earliest valid interpretation, the
    /// same choice the admin calendar widget displays.
    pub fn to_instant(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            TimezoneSpec::Named(tz) => resolve_local(tz.from_local_datetime(&local)),
            TimezoneSpec::Fixed(offset) => resolve_local(offset.from_local_datetime(&local)),
        }
    }
}

fn resolve_local<T: TimeZone>(result: LocalResult<DateTime<T>>) -> Option<DateTime<Utc>> {
    match result {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Parse a strict `±HH:MM` offset string
fn parse_offset(input: &str) -> Option<FixedOffset> {
    let bytes = input.as_bytes();
    if bytes.len() != 6 || bytes[3] != b':' {
        return None;
    }
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let hours: i32 = input.get(1..3)?.parse().ok()?;
    let minutes: i32 = input.get(4..6)?.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Count UTC-offset transitions in a named zone between two instants.
///
/// Scans hour boundaries. Two offset changes inside the same hour would
/// collapse into one detected transition; no tzdb zone shifts that fast.
pub fn count_offset_transitions(zone: Tz, from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    if to <= from {
        return 0;
    }
    let mut transitions = 0;
    let mut cursor = from;
    let mut previous_offset = zone.offset_from_utc_datetime(&cursor.naive_utc()).fix();
    while cursor < to {
        cursor = (cursor + Duration::hours(1)).min(to);
        let offset = zone.offset_from_utc_datetime(&cursor.naive_utc()).fix();
        if offset != previous_offset {
            transitions += 1;
            previous_offset = offset;
        }
    }
    transitions
}
