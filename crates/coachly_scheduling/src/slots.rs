// --- File: crates/coachly_scheduling/src/slots.rs ---
//! The fixed catalog of candidate session start times.
//!
//! Both the availability filter and any alternate front end must share one
//! source of truth for "what start times exist at all", so the catalog lives
//! here and nowhere else. Policy: 30-minute granularity, 01:00 through 23:30
//! inclusive. 23:59 can never start a session because the booking window
//! does not wrap past midnight.

use chrono::NaiveTime;

/// Spacing between candidate start times, in minutes.
pub const SLOT_GRANULARITY_MINUTES: u32 = 30;
/// First bookable hour of the day.
pub const FIRST_SLOT_HOUR: u32 = 1;
/// Last bookable hour of the day (inclusive; its :30 slot is the final one).
pub const LAST_SLOT_HOUR: u32 = 23;

/// The ordered list of allowed daily start times.
///
/// Deterministic and day-independent; callers filter it per day against the
/// busy set.
pub fn slot_catalog() -> Vec<NaiveTime> {
    let mut slots = Vec::with_capacity(((LAST_SLOT_HOUR - FIRST_SLOT_HOUR + 1) * 2) as usize);
    for hour in FIRST_SLOT_HOUR..=LAST_SLOT_HOUR {
        for minute in [0, SLOT_GRANULARITY_MINUTES] {
            // from_hms_opt cannot fail for hour <= 23, minute <= 30
            if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                slots.push(time);
            }
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::minute_of_day;

    #[test]
    fn catalog_spans_first_to_last_slot() {
        let catalog = slot_catalog();
        assert_eq!(catalog.len(), 46);
        assert_eq!(catalog[0], NaiveTime::from_hms_opt(1, 0, 0).unwrap());
        assert_eq!(
            *catalog.last().unwrap(),
            NaiveTime::from_hms_opt(23, 30, 0).unwrap()
        );
    }

    #[test]
    fn catalog_is_ordered_at_fixed_granularity() {
        let catalog = slot_catalog();
        for pair in catalog.windows(2) {
            assert_eq!(
                minute_of_day(pair[1]) - minute_of_day(pair[0]),
                SLOT_GRANULARITY_MINUTES as i32
            );
        }
    }

    #[test]
    fn catalog_is_deterministic() {
        assert_eq!(slot_catalog(), slot_catalog());
    }
}
