// --- File: crates/coachly_scheduling/src/conflict.rs ---
//! The single overlap predicate shared by the availability filter and the
//! commit-time re-validation.
//!
//! Both paths must link this exact function; duplicating the test would let
//! what the UI shows as "available" drift from what the server enforces.

use crate::models::BusyInterval;

/// True when the candidate `[start, start + duration)` range overlaps any of
/// the busy intervals.
///
/// Intervals are half-open, so touching endpoints do not conflict: a session
/// ending at exactly 10:00 leaves a 10:00 start free.
pub fn overlaps(
    candidate_start_minute: i32,
    candidate_duration_minutes: u32,
    busy_intervals: &[BusyInterval],
) -> bool {
    let candidate_end = candidate_start_minute + candidate_duration_minutes as i32;
    busy_intervals.iter().any(|interval| {
        candidate_start_minute < interval.end_minute && candidate_end > interval.start_minute
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusyInterval, BusySource};

    fn busy(start: i32, end: i32) -> BusyInterval {
        BusyInterval::new(start, end, BusySource::InternalBooking)
    }

    #[test]
    fn detects_partial_overlap() {
        let intervals = [busy(540, 600)]; // 09:00-10:00
        assert!(overlaps(570, 60, &intervals)); // 09:30-10:30
        assert!(overlaps(510, 60, &intervals)); // 08:30-09:30
    }

    #[test]
    fn detects_containment_both_ways() {
        let intervals = [busy(540, 600)];
        assert!(overlaps(550, 10, &intervals)); // inside the busy range
        assert!(overlaps(500, 180, &intervals)); // swallows the busy range
    }

    #[test]
    fn touching_endpoints_do_not_conflict() {
        let intervals = [busy(540, 600)];
        // ends exactly when the busy interval starts
        assert!(!overlaps(510, 30, &intervals));
        // starts exactly when the busy interval ends
        assert!(!overlaps(600, 30, &intervals));
    }

    #[test]
    fn empty_busy_set_never_conflicts() {
        assert!(!overlaps(0, 480, &[]));
    }

    #[test]
    fn any_interval_in_the_disjunction_suffices() {
        let intervals = [busy(60, 120), busy(540, 600), busy(1380, 1440)];
        assert!(overlaps(90, 30, &intervals));
        assert!(overlaps(1410, 30, &intervals));
        assert!(!overlaps(300, 60, &intervals));
    }
}
