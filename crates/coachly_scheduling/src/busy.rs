// --- File: crates/coachly_scheduling/src/busy.rs ---
//! Aggregation of the two busy-interval sources for one local calendar day.
//!
//! Internal bookings are stored as UTC (date, time) pairs; external calendar
//! events arrive as absolute instants. Both are projected onto the viewer's
//! local day and reduced to minute-of-day ranges. The two sets are merely
//! concatenated: the conflict predicate treats the list as a disjunction, so
//! no interval merging is needed here.

use chrono::{NaiveDate, Timelike};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

use crate::models::{minute_of_day, Booking, BusyInterval, BusySource};
use crate::timezone;
use coachly_common::services::ExternalCalendarEvent;

/// Project the coach's bookings and external events onto `target_date` in
/// `zone`, returning the unified, ordered busy set for that one local day.
///
/// Inputs that cannot be projected are dropped rather than allowed to block
/// the calendar: falsely marking a coach busy is worse than missing an
/// unparseable event. The drops are logged at debug level.
pub fn aggregate_busy_intervals(
    target_date: NaiveDate,
    zone: &str,
    bookings: &[Booking],
    events: &[ExternalCalendarEvent],
) -> Vec<BusyInterval> {
    let mut intervals = Vec::with_capacity(bookings.len() + events.len());

    for booking in bookings {
        let local = timezone::to_local(booking.session_date, booking.session_time, zone);
        if local.date != target_date {
            continue;
        }
        let start = minute_of_day(local.time);
        intervals.push(BusyInterval::new(
            start,
            start + booking.duration_minutes as i32,
            BusySource::InternalBooking,
        ));
    }

    let tz = Tz::from_str(zone).ok();
    for event in events {
        match event_interval(target_date, tz, event) {
            Some(interval) => intervals.push(interval),
            None => {
                debug!(
                    "Dropping external event {:?} outside {} in zone {}",
                    event.summary, target_date, zone
                );
            }
        }
    }

    intervals.sort_by_key(|interval| (interval.start_minute, interval.end_minute));
    intervals
}

/// Reduce one external event to a minute range on the target local day.
///
/// All-day events blanket the whole day regardless of their stated hours.
/// Timed events contribute the local hour/minute components of their start
/// and end independently; an event whose converted start date is not the
/// target date is discarded. When the zone is unrecognized the instants'
/// UTC components stand in for local ones, matching the converter's
/// fallback.
fn event_interval(
    target_date: NaiveDate,
    tz: Option<Tz>,
    event: &ExternalCalendarEvent,
) -> Option<BusyInterval> {
    if event.all_day {
        // All-day events are calendar dates, not instants; their bounding
        // midnights are UTC placeholders and must not be shifted through the
        // viewer zone. Block every stated day of the span, end exclusive.
        let first = event.start.date_naive();
        let last = event.end.date_naive();
        let covers = if last > first {
            target_date >= first && target_date < last
        } else {
            target_date == first
        };
        if !covers {
            return None;
        }
        return Some(BusyInterval::all_day());
    }

    let (start_date, start_minute, end_minute) = match tz {
        Some(tz) => {
            let start = event.start.with_timezone(&tz);
            let end = event.end.with_timezone(&tz);
            (
                start.date_naive(),
                to_minute(start.hour(), start.minute()),
                to_minute(end.hour(), end.minute()),
            )
        }
        None => (
            event.start.date_naive(),
            to_minute(event.start.hour(), event.start.minute()),
            to_minute(event.end.hour(), event.end.minute()),
        ),
    };

    if start_date != target_date {
        return None;
    }

    Some(BusyInterval::new(
        start_minute,
        end_minute,
        BusySource::ExternalCalendar,
    ))
}

fn to_minute(hour: u32, minute: u32) -> i32 {
    (hour * 60 + minute) as i32
}
