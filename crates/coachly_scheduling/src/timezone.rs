// --- File: crates/coachly_scheduling/src/timezone.rs ---
//! Conversion between stored UTC (date, time-of-day) pairs and a viewer's
//! local wall clock.
//!
//! Bookings are persisted as a UTC calendar date plus a UTC wall-clock time;
//! the pair is an absolute instant by construction. A UTC evening slot can
//! land on the next local calendar day (or the previous one), so callers
//! must always compare on the *converted* local date, never on the stored
//! UTC date.

use chrono::{Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// How trustworthy a conversion result is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneConfidence {
    /// The zone was recognized and the conversion is exact.
    Exact,
    /// The zone identifier was not recognized; the instant was passed
    /// through as if it were already in the target zone.
    ZoneFallback,
}

/// A (date, time) pair in some wall clock, with the conversion confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub confidence: ZoneConfidence,
}

impl WallClock {
    fn exact(dt: NaiveDateTime) -> Self {
        Self {
            date: dt.date(),
            time: dt.time(),
            confidence: ZoneConfidence::Exact,
        }
    }

    fn fallback(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            time,
            confidence: ZoneConfidence::ZoneFallback,
        }
    }
}

/// Convert a stored UTC (date, time) pair into the viewer's local clock.
///
/// Unrecognized zone identifiers degrade instead of erroring: the wall-clock
/// components pass through unchanged and the result is flagged low
/// confidence. Falsely erroring here would blank a coach's whole calendar.
pub fn to_local(utc_date: NaiveDate, utc_time: NaiveTime, zone: &str) -> WallClock {
    match Tz::from_str(zone) {
        Ok(tz) => {
            let instant = Utc.from_utc_datetime(&utc_date.and_time(utc_time));
            WallClock::exact(instant.with_timezone(&tz).naive_local())
        }
        Err(_) => {
            debug!("Unrecognized time zone {:?}, passing instant through", zone);
            WallClock::fallback(utc_date, utc_time)
        }
    }
}

/// Convert a viewer-local (date, time) pair into UTC for storage.
///
/// The same fallback policy applies as in [`to_local`]. Ambiguous local
/// times (the repeated hour when clocks fall back) resolve to their earliest
/// mapping; nonexistent times (the spring-forward gap) roll forward to the
/// next instant the zone can represent.
pub fn to_utc(local_date: NaiveDate, local_time: NaiveTime, zone: &str) -> WallClock {
    match Tz::from_str(zone) {
        Ok(tz) => {
            let instant = resolve_local(tz, local_date.and_time(local_time));
            WallClock::exact(instant.naive_utc())
        }
        Err(_) => {
            debug!("Unrecognized time zone {:?}, storing wall clock as UTC", zone);
            WallClock::fallback(local_date, local_time)
        }
    }
}

/// Pin a naive local datetime onto a zone's timeline.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> chrono::DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Inside a DST gap. Real gaps are at most a few hours; probe
            // forward at slot granularity until the zone resolves again.
            let mut probe = naive;
            for _ in 0..96 {
                probe += Duration::minutes(30);
                match tz.from_local_datetime(&probe) {
                    LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                        return dt.with_timezone(&Utc);
                    }
                    LocalResult::None => continue,
                }
            }
            // A 48-hour gap does not exist in the tz database.
            Utc.from_utc_datetime(&naive)
        }
    }
}
