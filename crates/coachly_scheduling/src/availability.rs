// --- File: crates/coachly_scheduling/src/availability.rs ---
//! Filtering the slot catalog down to the times a coach can actually take.

use chrono::NaiveTime;

use crate::conflict::overlaps;
use crate::models::{minute_of_day, BusyInterval, CandidateSlot};

/// Keep every catalog start time whose `[start, start + duration)` range is
/// clear of the busy set.
///
/// Client-side availability computed from this list is advisory only; the
/// commit path re-runs the same predicate against the live booking table.
pub fn available_slots(
    catalog: &[NaiveTime],
    busy_intervals: &[BusyInterval],
    duration_minutes: u32,
) -> Vec<CandidateSlot> {
    catalog
        .iter()
        .filter(|start| !overlaps(minute_of_day(**start), duration_minutes, busy_intervals))
        .map(|start| CandidateSlot {
            start: *start,
            duration_minutes,
        })
        .collect()
}

/// Re-check a previously chosen start time against the freshly filtered
/// list.
///
/// When the selection is no longer available (the duration changed, or new
/// busy data arrived), the caller must clear it rather than keep an invalid
/// choice; `None` is that signal.
pub fn validate_selection(
    selected: Option<NaiveTime>,
    slots: &[CandidateSlot],
) -> Option<NaiveTime> {
    selected.filter(|time| slots.iter().any(|slot| slot.start == *time))
}
