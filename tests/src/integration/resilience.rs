//! # Resilience Choreography
//!
//! Failure-path flows: store outages, the non-atomic write-then-retire
//! window, malformed stored state, cadence gates, and notification
//! failures. None of these may crash the process or corrupt the
//! surviving slot state.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use rota_core::service::{MEMBERSHIP_SLOT, ROTATION_POINTER_SLOT};
    use rota_core::{
        DailyRotationJob, EventIngest, EventRouter, InMemorySecretStore, Outcome, RawEvent,
        RecordingNotifier, RotaConfig, RotaError, RotationRun, StaticRosterProvider, StoreError,
    };

    struct Harness {
        store: Arc<InMemorySecretStore>,
        notifier: Arc<RecordingNotifier>,
        roster: Arc<StaticRosterProvider>,
        router: EventRouter<InMemorySecretStore, RecordingNotifier, StaticRosterProvider>,
        job: DailyRotationJob<InMemorySecretStore, RecordingNotifier>,
    }

    fn harness() -> Harness {
        let store = Arc::new(InMemorySecretStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let roster = Arc::new(StaticRosterProvider::new());
        let config = RotaConfig::default();

        let router = EventRouter::new(
            Arc::clone(&store),
            Arc::clone(&notifier),
            Arc::clone(&roster),
            config.clone(),
        );
        let job = DailyRotationJob::new(Arc::clone(&store), Arc::clone(&notifier), config);

        Harness {
            store,
            notifier,
            roster,
            router,
            job,
        }
    }

    fn raw(json: &str) -> RawEvent {
        serde_json::from_str(json).expect("test event should decode")
    }

    fn weekday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap() // Wednesday
    }

    #[tokio::test]
    async fn test_store_outage_then_recovery() {
        let h = harness();
        h.store.seed(MEMBERSHIP_SLOT, "C1=U1TOM");
        h.store.set_offline(true);

        let outcome = h
            .router
            .dispatch(raw(
                r#"{"type": "member_joined_channel", "channel": "C1", "user": "U2STEVE"}"#,
            ))
            .await;
        assert!(matches!(outcome, Outcome::Failed { .. }));

        // The same event succeeds once the store is back; no retry
        // happened in between.
        h.store.set_offline(false);
        let outcome = h
            .router
            .dispatch(raw(
                r#"{"type": "member_joined_channel", "channel": "C1", "user": "U2STEVE"}"#,
            ))
            .await;
        assert!(matches!(outcome, Outcome::MemberAdded { persisted: true, .. }));
        assert_eq!(
            h.store.current_payload(MEMBERSHIP_SLOT).as_deref(),
            Some("C1=U1TOM,U2STEVE")
        );
    }

    #[tokio::test]
    async fn test_retire_failure_window_is_tolerated() {
        let h = harness();
        h.store.seed(MEMBERSHIP_SLOT, "C1=U1TOM");
        h.store.set_retire_failing(true);

        let outcome = h
            .router
            .dispatch(raw(
                r#"{"type": "member_joined_channel", "channel": "C1", "user": "U2STEVE"}"#,
            ))
            .await;

        // The write landed before the retire step failed: the new list is
        // current and one extra stale version lingers, which the protocol
        // tolerates.
        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert_eq!(
            h.store.current_payload(MEMBERSHIP_SLOT).as_deref(),
            Some("C1=U1TOM,U2STEVE")
        );
        assert_eq!(h.store.live_versions(MEMBERSHIP_SLOT), 2);

        // Later writes proceed normally against the new current version.
        h.store.set_retire_failing(false);
        h.router
            .dispatch(raw(
                r#"{"type": "member_joined_channel", "channel": "C1", "user": "U3FELIX"}"#,
            ))
            .await;
        assert_eq!(
            h.store.current_payload(MEMBERSHIP_SLOT).as_deref(),
            Some("C1=U1TOM,U2STEVE,U3FELIX")
        );
    }

    #[tokio::test]
    async fn test_malformed_pointer_fails_pass_until_fixed() {
        let h = harness();
        h.store.seed(MEMBERSHIP_SLOT, "C1=U1TOM,U2STEVE");
        h.store.seed(ROTATION_POINTER_SLOT, "C1-no-delimiter-here");

        let err = h.job.run(weekday()).await.unwrap_err();
        assert!(matches!(
            err,
            RotaError::Store(StoreError::Malformed { .. })
        ));

        // A corrected payload (new version, as an operator would write it)
        // lets the next pass through.
        h.store.seed(ROTATION_POINTER_SLOT, "C1=U1TOM");
        let report = h.job.run(weekday()).await.unwrap();
        assert_eq!(report.advanced.len(), 1);
    }

    #[tokio::test]
    async fn test_roster_lookup_failure_leaves_state_untouched() {
        let h = harness();
        h.roster.set_failing(true);

        let outcome = h
            .router
            .dispatch(raw(
                r#"{"type": "app_mention", "channel": "C1", "text": "<@UROTA0000> add us"}"#,
            ))
            .await;

        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert_eq!(h.store.total_versions(MEMBERSHIP_SLOT), 0);
        assert_eq!(h.store.total_versions(ROTATION_POINTER_SLOT), 0);
        assert!(h.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_weekend_pass_touches_nothing() {
        let h = harness();
        h.store.seed(MEMBERSHIP_SLOT, "C1=U1TOM,U2STEVE");
        h.store.seed(ROTATION_POINTER_SLOT, "C1=U1TOM");
        let saturday = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();

        let report = h.job.run(saturday).await.unwrap();

        assert!(report.skipped.is_some());
        assert_eq!(h.store.total_versions(ROTATION_POINTER_SLOT), 1);
        assert!(h.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_notification_outage_does_not_lose_the_advance() {
        let h = harness();
        h.store.seed(MEMBERSHIP_SLOT, "C1=U1TOM,U2STEVE");
        h.store.seed(ROTATION_POINTER_SLOT, "C1=U1TOM");
        h.notifier.set_failing(true);

        let report = h.job.run(weekday()).await.unwrap();

        assert_eq!(report.notify_failures, 1);
        // The pointer advanced and persisted even though the announcement
        // never went out; the next pass continues from the new holder.
        assert_eq!(
            h.store.current_payload(ROTATION_POINTER_SLOT).as_deref(),
            Some("C1=U2STEVE")
        );
    }

    #[tokio::test]
    async fn test_unknown_event_and_gibberish_command_are_silent() {
        let h = harness();
        h.store.seed(MEMBERSHIP_SLOT, "C1=U1TOM");

        let unknown = h
            .router
            .dispatch(raw(r#"{"type": "reaction_added", "channel": "C1"}"#))
            .await;
        let gibberish = h
            .router
            .dispatch(raw(
                r#"{"type": "app_mention", "channel": "C1", "text": "<@UROTA0000> how are you?"}"#,
            ))
            .await;

        assert!(matches!(unknown, Outcome::Ignored(_)));
        assert!(matches!(gibberish, Outcome::Ignored(_)));
        assert_eq!(h.store.total_versions(MEMBERSHIP_SLOT), 1);
        assert!(h.notifier.sent().is_empty());

        let metrics = h.router.metrics().snapshot();
        assert_eq!(metrics.events_received, 2);
        assert_eq!(metrics.events_ignored, 2);
    }
}
