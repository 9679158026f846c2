#[cfg(test)]
mod tests {
    use crate::availability::{available_slots, validate_selection};
    use crate::busy::aggregate_busy_intervals;
    use crate::models::{
        Booking, BookingStatus, BusyInterval, MeetingPlatform, Subject,
    };
    use crate::slots::slot_catalog;
    use chrono::{NaiveDate, NaiveTime};
    use uuid::Uuid;

    fn time(h: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, min, 0).unwrap()
    }

    fn booking_at(session_time: NaiveTime, duration: u32) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            coach_id: "coach-1".into(),
            subject: Subject::Client {
                client_id: "client-1".into(),
            },
            title: "Anna Session".into(),
            session_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            session_time,
            duration_minutes: duration,
            origin_zone: "UTC".into(),
            status: BookingStatus::Scheduled,
            meeting_platform: MeetingPlatform::None,
            meeting_link: None,
            external_meeting_id: None,
            location: None,
            notes: None,
        }
    }

    /// Coach busy 09:00-10:00; 30-minute requests around the boundary.
    #[test]
    fn half_hour_requests_around_an_hour_long_booking() {
        let target = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let bookings = [booking_at(time(9, 0), 60)];
        let busy = aggregate_busy_intervals(target, "UTC", &bookings, &[]);

        let catalog = slot_catalog();
        let slots = available_slots(&catalog, &busy, 30);
        let starts: Vec<NaiveTime> = slots.iter().map(|slot| slot.start).collect();

        // 09:00 and 09:30 fall inside the booked hour
        assert!(!starts.contains(&time(9, 0)));
        assert!(!starts.contains(&time(9, 30)));
        // 08:00 is clear; 08:30 ends exactly at 09:00, which is not an
        // overlap under half-open semantics
        assert!(starts.contains(&time(8, 0)));
        assert!(starts.contains(&time(8, 30)));
        // 10:00 starts exactly when the booking ends
        assert!(starts.contains(&time(10, 0)));
    }

    #[test]
    fn hour_long_request_loses_the_slot_before_the_booking() {
        let target = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let bookings = [booking_at(time(9, 0), 60)];
        let busy = aggregate_busy_intervals(target, "UTC", &bookings, &[]);

        let slots = available_slots(&slot_catalog(), &busy, 60);
        let starts: Vec<NaiveTime> = slots.iter().map(|slot| slot.start).collect();

        // 08:30 + 60 runs into the booking
        assert!(!starts.contains(&time(8, 30)));
        assert!(starts.contains(&time(8, 0)));
        assert!(starts.contains(&time(10, 0)));
    }

    #[test]
    fn all_day_block_leaves_nothing() {
        let busy = [BusyInterval::all_day()];
        assert!(available_slots(&slot_catalog(), &busy, 30).is_empty());
    }

    #[test]
    fn unchanged_inputs_yield_identical_slot_lists() {
        let target = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let bookings = [booking_at(time(9, 0), 60), booking_at(time(14, 0), 90)];
        let catalog = slot_catalog();

        let first = available_slots(
            &catalog,
            &aggregate_busy_intervals(target, "Europe/Zurich", &bookings, &[]),
            45,
        );
        let second = available_slots(
            &catalog,
            &aggregate_busy_intervals(target, "Europe/Zurich", &bookings, &[]),
            45,
        );
        assert_eq!(first, second);
    }

    #[test]
    fn invalidated_selection_is_cleared() {
        let target = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let bookings = [booking_at(time(9, 0), 60)];
        let busy = aggregate_busy_intervals(target, "UTC", &bookings, &[]);
        let slots = available_slots(&slot_catalog(), &busy, 30);

        // The user had picked 09:00 before the busy data arrived
        assert_eq!(validate_selection(Some(time(9, 0)), &slots), None);
        // A still-free pick survives
        assert_eq!(
            validate_selection(Some(time(10, 0)), &slots),
            Some(time(10, 0))
        );
        // No selection stays no selection
        assert_eq!(validate_selection(None, &slots), None);
    }
}
