#[cfg(test)]
mod tests {
    use crate::busy::aggregate_busy_intervals;
    use crate::models::{
        Booking, BookingStatus, BusyInterval, BusySource, MeetingPlatform, Subject,
        MINUTES_PER_DAY,
    };
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use coachly_common::services::ExternalCalendarEvent;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, min, 0).unwrap()
    }

    fn booking(session_date: NaiveDate, session_time: NaiveTime, duration: u32) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            coach_id: "coach-1".into(),
            subject: Subject::Client {
                client_id: "client-1".into(),
            },
            title: "Session".into(),
            session_date,
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

    fn timed_event(start: (i32, u32, u32, u32, u32), end: (i32, u32, u32, u32, u32)) -> ExternalCalendarEvent {
        ExternalCalendarEvent {
            start: Utc
                .with_ymd_and_hms(start.0, start.1, start.2, start.3, start.4, 0)
                .unwrap(),
            end: Utc
                .with_ymd_and_hms(end.0, end.1, end.2, end.3, end.4, 0)
                .unwrap(),
            all_day: false,
            summary: Some("external".into()),
        }
    }

    #[test]
    fn booking_on_target_day_becomes_interval() {
        let bookings = [booking(date(2024, 3, 10), time(9, 0), 60)];
        let intervals = aggregate_busy_intervals(date(2024, 3, 10), "UTC", &bookings, &[]);

        assert_eq!(
            intervals,
            vec![BusyInterval::new(540, 600, BusySource::InternalBooking)]
        );
    }

    #[test]
    fn booking_is_grouped_by_converted_local_date() {
        // 23:00 UTC on March 9 is already 08:00 on March 10 in Tokyo
        let bookings = [booking(date(2024, 3, 9), time(23, 0), 60)];

        let tokyo = aggregate_busy_intervals(date(2024, 3, 10), "Asia/Tokyo", &bookings, &[]);
        assert_eq!(
            tokyo,
            vec![BusyInterval::new(480, 540, BusySource::InternalBooking)]
        );

        // In UTC the same booking belongs to March 9, not March 10
        let utc = aggregate_busy_intervals(date(2024, 3, 10), "UTC", &bookings, &[]);
        assert!(utc.is_empty());
    }

    #[test]
    fn all_day_event_blankets_the_whole_day() {
        let event = ExternalCalendarEvent {
            start: Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap(),
            all_day: true,
            summary: Some("conference".into()),
        };

        let intervals = aggregate_busy_intervals(date(2024, 3, 10), "UTC", &[], &[event.clone()]);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start_minute, 0);
        assert_eq!(intervals[0].end_minute, MINUTES_PER_DAY);
        assert_eq!(intervals[0].source, BusySource::AllDayBlock);

        // Calendar dates do not shift with the viewer zone
        let tokyo = aggregate_busy_intervals(date(2024, 3, 10), "Asia/Tokyo", &[], &[event.clone()]);
        assert_eq!(tokyo.len(), 1);

        // The end date is exclusive
        let next_day = aggregate_busy_intervals(date(2024, 3, 11), "UTC", &[], &[event]);
        assert!(next_day.is_empty());
    }

    #[test]
    fn timed_event_uses_local_minute_components() {
        // 13:00-14:30 UTC is 14:00-15:30 in Zurich (CET, winter)
        let event = timed_event((2024, 1, 15, 13, 0), (2024, 1, 15, 14, 30));
        let intervals =
            aggregate_busy_intervals(date(2024, 1, 15), "Europe/Zurich", &[], &[event]);

        assert_eq!(
            intervals,
            vec![BusyInterval::new(840, 930, BusySource::ExternalCalendar)]
        );
    }

    #[test]
    fn event_starting_on_another_local_date_is_dropped() {
        let event = timed_event((2024, 3, 11, 9, 0), (2024, 3, 11, 10, 0));
        let intervals = aggregate_busy_intervals(date(2024, 3, 10), "UTC", &[], &[event]);
        assert!(intervals.is_empty());
    }

    #[test]
    fn sources_are_concatenated_and_ordered() {
        let bookings = [booking(date(2024, 3, 10), time(15, 0), 30)];
        let event = timed_event((2024, 3, 10, 9, 0), (2024, 3, 10, 10, 0));

        let intervals = aggregate_busy_intervals(date(2024, 3, 10), "UTC", &bookings, &[event]);
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].source, BusySource::ExternalCalendar);
        assert_eq!(intervals[1].source, BusySource::InternalBooking);
        assert!(intervals[0].start_minute <= intervals[1].start_minute);
    }

    #[test]
    fn unknown_zone_falls_back_to_utc_components() {
        let bookings = [booking(date(2024, 3, 10), time(9, 0), 60)];
        let event = timed_event((2024, 3, 10, 12, 0), (2024, 3, 10, 13, 0));

        let intervals =
            aggregate_busy_intervals(date(2024, 3, 10), "Mars/OlympusMons", &bookings, &[event]);
        assert_eq!(
            intervals,
            vec![
                BusyInterval::new(540, 600, BusySource::InternalBooking),
                BusyInterval::new(720, 780, BusySource::ExternalCalendar),
            ]
        );
    }
}
