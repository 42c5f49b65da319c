//! # Lifecycle Choreography
//!
//! End-to-end flows over the in-memory adapters:
//!
//! 1. **Enroll**: `add us` resolves the live roster, replaces the stored
//!    member list, and seeds the rotation pointer.
//! 2. **Mutate**: join/leave events and mention commands keep the list
//!    in sync.
//! 3. **Rotate**: the daily pass advances every enrolled channel and
//!    announces the new duty holder.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use rota_core::{
        ChannelId, DailyRotationJob, EventIngest, EventRouter, InMemorySecretStore, MemberHandle,
        Outcome, RawEvent, RecordingNotifier, RotaConfig, RotationRun, StaticRosterProvider,
    };
    use rota_core::service::{MEMBERSHIP_SLOT, ROTATION_POINTER_SLOT};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

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

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    async fn enroll(h: &Harness, channel: &str, members: &[&str]) {
        h.roster.set_roster(
            ChannelId::new(channel),
            members.iter().map(|m| MemberHandle::new(*m)).collect(),
        );
        let outcome = h
            .router
            .dispatch(raw(&format!(
                r#"{{"type": "app_mention", "channel": "{}", "text": "<@UROTA0000> add us"}}"#,
                channel
            )))
            .await;
        assert!(matches!(outcome, Outcome::ChannelEnrolled { .. }));
    }

    // =========================================================================
    // ENROLL -> ROTATE
    // =========================================================================

    #[tokio::test]
    async fn test_enroll_then_first_rotation_picks_second_member() {
        let h = harness();
        enroll(&h, "C1", &["U1TOM", "U2STEVE", "U3FELIX"]).await;

        // Seeding records U1TOM as "last holder", so the first computed
        // pass appoints the second member of the list.
        let report = h.job.run(monday()).await.unwrap();
        assert_eq!(
            report.advanced.get(&ChannelId::new("C1")),
            Some(&MemberHandle::new("U2STEVE"))
        );

        let announcements = h.notifier.sent_to(&ChannelId::new("C1"));
        assert!(announcements
            .last()
            .unwrap()
            .contains("<@U2STEVE>'s turn to run standup"));
    }

    #[tokio::test]
    async fn test_rotation_cycles_through_the_whole_list_and_wraps() {
        let h = harness();
        enroll(&h, "C1", &["U1TOM", "U2STEVE", "U3FELIX"]).await;

        let holder_on = |report: rota_core::RotationReport| {
            report.advanced.get(&ChannelId::new("C1")).cloned().unwrap()
        };

        let first = holder_on(h.job.run(monday()).await.unwrap());
        let second = holder_on(h.job.run(tuesday()).await.unwrap());
        let third = holder_on(h.job.run(wednesday()).await.unwrap());
        let fourth = holder_on(h.job.run(NaiveDate::from_ymd_opt(2024, 6, 13).unwrap()).await.unwrap());

        assert_eq!(first, MemberHandle::new("U2STEVE"));
        assert_eq!(second, MemberHandle::new("U3FELIX"));
        // Wrapped back to the head of the list.
        assert_eq!(third, MemberHandle::new("U1TOM"));
        assert_eq!(fourth, MemberHandle::new("U2STEVE"));
    }

    #[tokio::test]
    async fn test_enrolling_the_automation_itself_never_happens() {
        let h = harness();
        enroll(&h, "C1", &["UROTA0000", "U1TOM"]).await;

        assert_eq!(
            h.store.current_payload(MEMBERSHIP_SLOT).as_deref(),
            Some("C1=U1TOM")
        );
    }

    // =========================================================================
    // LIVE MUTATIONS BETWEEN PASSES
    // =========================================================================

    #[tokio::test]
    async fn test_joined_member_enters_the_rotation_at_the_end() {
        let h = harness();
        enroll(&h, "C1", &["U1TOM", "U2STEVE"]).await;

        h.router
            .dispatch(raw(
                r#"{"type": "member_joined_channel", "channel": "C1", "user": "U3FELIX"}"#,
            ))
            .await;

        // U1TOM seeded as last holder; passes walk U2STEVE, then the
        // newly joined U3FELIX.
        let first = h.job.run(monday()).await.unwrap();
        let second = h.job.run(tuesday()).await.unwrap();
        assert_eq!(
            first.advanced.get(&ChannelId::new("C1")),
            Some(&MemberHandle::new("U2STEVE"))
        );
        assert_eq!(
            second.advanced.get(&ChannelId::new("C1")),
            Some(&MemberHandle::new("U3FELIX"))
        );
    }

    #[tokio::test]
    async fn test_departed_duty_holder_restarts_the_rotation() {
        let h = harness();
        enroll(&h, "C1", &["U1TOM", "U2STEVE", "U3FELIX"]).await;

        // U2STEVE becomes duty holder, then leaves the channel.
        h.job.run(monday()).await.unwrap();
        h.router
            .dispatch(raw(
                r#"{"type": "member_left_channel", "channel": "C1", "user": "U2STEVE"}"#,
            ))
            .await;

        let report = h.job.run(tuesday()).await.unwrap();
        assert_eq!(
            report.advanced.get(&ChannelId::new("C1")),
            Some(&MemberHandle::new("U1TOM"))
        );
    }

    #[tokio::test]
    async fn test_mention_add_and_remove_adjust_the_list() {
        let h = harness();
        enroll(&h, "C1", &["U1TOM", "U2STEVE"]).await;

        h.router
            .dispatch(raw(
                r#"{"type": "app_mention", "channel": "C1", "text": "<@UROTA0000> add <@U3FELIX>"}"#,
            ))
            .await;
        h.router
            .dispatch(raw(
                r#"{"type": "app_mention", "channel": "C1", "text": "<@UROTA0000> remove <@U1TOM>"}"#,
            ))
            .await;

        assert_eq!(
            h.store.current_payload(MEMBERSHIP_SLOT).as_deref(),
            Some("C1=U2STEVE,U3FELIX")
        );
    }

    #[tokio::test]
    async fn test_duplicate_join_welcomes_again_without_store_write() {
        let h = harness();
        enroll(&h, "C1", &["U1TOM", "U2STEVE"]).await;
        let versions_before = h.store.total_versions(MEMBERSHIP_SLOT);
        let welcomes_before = h.notifier.sent_to(&ChannelId::new("C1")).len();

        h.router
            .dispatch(raw(
                r#"{"type": "member_joined_channel", "channel": "C1", "user": "U1TOM"}"#,
            ))
            .await;

        assert_eq!(h.store.total_versions(MEMBERSHIP_SLOT), versions_before);
        assert_eq!(
            h.notifier.sent_to(&ChannelId::new("C1")).len(),
            welcomes_before + 1
        );
    }

    // =========================================================================
    // MULTI-CHANNEL
    // =========================================================================

    #[tokio::test]
    async fn test_channels_rotate_independently() {
        let h = harness();
        enroll(&h, "general", &["U1TOM", "U2STEVE"]).await;
        enroll(&h, "infra", &["U4DAVE", "U5SUSY", "U6CHRIS"]).await;

        let report = h.job.run(monday()).await.unwrap();

        assert_eq!(
            report.advanced.get(&ChannelId::new("general")),
            Some(&MemberHandle::new("U2STEVE"))
        );
        assert_eq!(
            report.advanced.get(&ChannelId::new("infra")),
            Some(&MemberHandle::new("U5SUSY"))
        );
        assert_eq!(report.notified, 2);
    }

    #[tokio::test]
    async fn test_re_enrolling_resets_the_rotation() {
        let h = harness();
        enroll(&h, "C1", &["U1TOM", "U2STEVE"]).await;
        h.job.run(monday()).await.unwrap(); // duty -> U2STEVE

        // The channel re-enrolls with a fresh roster.
        enroll(&h, "C1", &["U7NEW", "U8ALSO"]).await;

        let report = h.job.run(tuesday()).await.unwrap();
        assert_eq!(
            report.advanced.get(&ChannelId::new("C1")),
            Some(&MemberHandle::new("U8ALSO"))
        );
    }

    // =========================================================================
    // VERSION HYGIENE
    // =========================================================================

    #[tokio::test]
    async fn test_every_flow_leaves_exactly_one_live_version_per_slot() {
        let h = harness();
        enroll(&h, "C1", &["U1TOM", "U2STEVE"]).await;

        h.router
            .dispatch(raw(
                r#"{"type": "member_joined_channel", "channel": "C1", "user": "U3FELIX"}"#,
            ))
            .await;
        h.job.run(monday()).await.unwrap();
        h.job.run(tuesday()).await.unwrap();

        assert_eq!(h.store.live_versions(MEMBERSHIP_SLOT), 1);
        assert_eq!(h.store.live_versions(ROTATION_POINTER_SLOT), 1);
    }
}
