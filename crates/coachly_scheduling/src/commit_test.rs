#[cfg(test)]
mod tests {
    use crate::commit::{conflicting_bookings, BookingCommitter, BookingRequest};
    use crate::error::SchedulingError;
    use crate::models::{Booking, BookingStatus, MeetingPlatform, Subject};
    use crate::store::{BookingStore, CommitOutcome, Contact, Roster, StoreError};
    use chrono::{NaiveDate, NaiveTime};
    use coachly_common::services::BoxFuture;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, min, 0).unwrap()
    }

    fn stored_booking(
        session_date: NaiveDate,
        session_time: NaiveTime,
        duration: u32,
        title: &str,
    ) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            coach_id: "coach-1".into(),
            subject: Subject::Client {
                client_id: "client-1".into(),
            },
            title: title.into(),
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

    /// In-memory booking table. The mutex held across check-and-insert is
    /// the serialization point the trait contract asks for.
    struct MemoryBookingStore {
        bookings: Mutex<Vec<Booking>>,
    }

    impl MemoryBookingStore {
        fn new() -> Self {
            Self {
                bookings: Mutex::new(Vec::new()),
            }
        }
    }

    impl BookingStore for MemoryBookingStore {
        fn bookings_for_coach_window(
            &self,
            coach_id: &str,
            window_start: NaiveDate,
            window_end: NaiveDate,
        ) -> BoxFuture<'_, Vec<Booking>, StoreError> {
            let coach_id = coach_id.to_string();
            Box::pin(async move {
                let bookings = self.bookings.lock().await;
                Ok(bookings
                    .iter()
                    .filter(|b| {
                        b.coach_id == coach_id
                            && b.session_date >= window_start
                            && b.session_date <= window_end
                    })
                    .cloned()
                    .collect())
            })
        }

        fn commit_scheduled(&self, booking: Booking) -> BoxFuture<'_, CommitOutcome, StoreError> {
            Box::pin(async move {
                let mut bookings = self.bookings.lock().await;
                let existing: Vec<Booking> = bookings
                    .iter()
                    .filter(|b| b.coach_id == booking.coach_id)
                    .cloned()
                    .collect();
                let report = crate::commit::conflict_report(&booking, &existing);
                if !report.is_empty() {
                    return Ok(CommitOutcome::Conflicted(report));
                }
                bookings.push(booking.clone());
                Ok(CommitOutcome::Committed(booking))
            })
        }

        fn find(&self, booking_id: Uuid) -> BoxFuture<'_, Option<Booking>, StoreError> {
            Box::pin(async move {
                let bookings = self.bookings.lock().await;
                Ok(bookings.iter().find(|b| b.id == booking_id).cloned())
            })
        }

        fn attach_meeting_link(
            &self,
            booking_id: Uuid,
            platform: MeetingPlatform,
            join_link: &str,
            external_meeting_id: &str,
        ) -> BoxFuture<'_, (), StoreError> {
            let join_link = join_link.to_string();
            let external_meeting_id = external_meeting_id.to_string();
            Box::pin(async move {
                let mut bookings = self.bookings.lock().await;
                let booking = bookings
                    .iter_mut()
                    .find(|b| b.id == booking_id)
                    .ok_or(StoreError::NotFound(booking_id))?;
                booking.meeting_platform = platform;
                booking.meeting_link = Some(join_link);
                booking.external_meeting_id = Some(external_meeting_id);
                Ok(())
            })
        }
    }

    struct FixedRoster;

    impl Roster for FixedRoster {
        fn coach_contact(&self, coach_id: &str) -> BoxFuture<'_, Option<Contact>, StoreError> {
            let coach_id = coach_id.to_string();
            Box::pin(async move {
                Ok(Some(Contact {
                    user_id: coach_id,
                    name: "Coach".into(),
                    email: Some("coach@example.com".into()),
                }))
            })
        }

        fn client_contact(&self, client_id: &str) -> BoxFuture<'_, Option<Contact>, StoreError> {
            let client_id = client_id.to_string();
            Box::pin(async move {
                Ok(Some(Contact {
                    user_id: format!("user-{}", client_id),
                    name: "Anna".into(),
                    email: Some("anna@example.com".into()),
                }))
            })
        }

        fn group_contacts(&self, _group_id: &str) -> BoxFuture<'_, Vec<Contact>, StoreError> {
            Box::pin(async move { Ok(Vec::new()) })
        }

        fn group_name(&self, _group_id: &str) -> BoxFuture<'_, Option<String>, StoreError> {
            Box::pin(async move { Ok(Some("Morning Circle".into())) })
        }
    }

    fn committer(store: Arc<MemoryBookingStore>) -> BookingCommitter {
        BookingCommitter::new(store, Arc::new(FixedRoster), 60)
    }

    fn request_at(session_time: NaiveTime) -> BookingRequest {
        BookingRequest {
            coach_id: "coach-1".into(),
            client_id: Some("client-1".into()),
            group_id: None,
            title: Some("Check-in".into()),
            session_date: date(2024, 3, 10),
            session_time,
            duration_minutes: Some(60),
            time_zone: "UTC".into(),
            meeting_platform: MeetingPlatform::None,
            location: None,
            notes: None,
        }
    }

    #[test]
    fn scan_projects_stored_utc_into_the_origin_zone() {
        // Candidate picked 09:00 Zurich on March 10 (08:00 UTC in winter...
        // March 10 is still CET, +1). Stored booking at 08:30 UTC is 09:30
        // local and clashes.
        let mut candidate = stored_booking(date(2024, 3, 10), time(8, 0), 60, "new");
        candidate.origin_zone = "Europe/Zurich".into();
        let existing = [stored_booking(date(2024, 3, 10), time(8, 30), 60, "Anna Session")];

        let conflicts = conflicting_bookings(&candidate, &existing);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].title, "Anna Session");
        assert_eq!(conflicts[0].local_start, "09:30");
        assert_eq!(conflicts[0].local_end, "10:30");
    }

    #[test]
    fn scan_ignores_bookings_on_other_local_dates() {
        let candidate = stored_booking(date(2024, 3, 10), time(9, 0), 60, "new");
        let existing = [stored_booking(date(2024, 3, 11), time(9, 0), 60, "other day")];
        assert!(conflicting_bookings(&candidate, &existing).is_empty());
    }

    #[test]
    fn scan_allows_touching_sessions() {
        let candidate = stored_booking(date(2024, 3, 10), time(10, 0), 30, "new");
        let existing = [stored_booking(date(2024, 3, 10), time(9, 0), 60, "before")];
        assert!(conflicting_bookings(&candidate, &existing).is_empty());
    }

    #[tokio::test]
    async fn commit_persists_a_free_slot() {
        let store = Arc::new(MemoryBookingStore::new());
        let outcome = committer(store.clone())
            .commit(request_at(time(9, 0)))
            .await
            .expect("commit succeeds");

        let booking = match outcome {
            CommitOutcome::Committed(booking) => booking,
            CommitOutcome::Conflicted(_) => panic!("fresh table cannot conflict"),
        };
        assert_eq!(booking.status, BookingStatus::Scheduled);
        assert!(store.find(booking.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn second_overlapping_commit_is_rejected_with_the_first_named() {
        let store = Arc::new(MemoryBookingStore::new());
        let committer = committer(store);

        let first = committer.commit(request_at(time(9, 0))).await.unwrap();
        let first_id = match first {
            CommitOutcome::Committed(b) => b.id,
            CommitOutcome::Conflicted(_) => panic!("first commit must win"),
        };

        let second = committer.commit(request_at(time(9, 30))).await.unwrap();
        match second {
            CommitOutcome::Conflicted(report) => {
                assert_eq!(report.conflicts.len(), 1);
                assert_eq!(report.conflicts[0].booking_id, first_id);
            }
            CommitOutcome::Committed(_) => panic!("overlap must be rejected"),
        }
    }

    #[tokio::test]
    async fn rejects_out_of_range_duration_before_io() {
        let store = Arc::new(MemoryBookingStore::new());
        let mut request = request_at(time(9, 0));
        request.duration_minutes = Some(481);

        let err = committer(store).commit(request).await.unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidDuration(481)));
    }

    #[tokio::test]
    async fn rejects_subject_violations() {
        let store = Arc::new(MemoryBookingStore::new());
        let committer = committer(store);

        let mut both = request_at(time(9, 0));
        both.group_id = Some("group-1".into());
        assert!(matches!(
            committer.commit(both).await.unwrap_err(),
            SchedulingError::SubjectAmbiguous
        ));

        let mut neither = request_at(time(10, 0));
        neither.client_id = None;
        assert!(matches!(
            committer.commit(neither).await.unwrap_err(),
            SchedulingError::SubjectMissing
        ));
    }

    #[tokio::test]
    async fn derives_a_title_from_the_roster_when_missing() {
        let store = Arc::new(MemoryBookingStore::new());
        let mut request = request_at(time(9, 0));
        request.title = None;

        let outcome = committer(store).commit(request).await.unwrap();
        match outcome {
            CommitOutcome::Committed(booking) => assert_eq!(booking.title, "Anna Session"),
            CommitOutcome::Conflicted(_) => panic!("fresh table cannot conflict"),
        }
    }
}
