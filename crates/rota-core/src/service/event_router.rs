//! Event router: dispatches inbound chat events to the membership and
//! rotation engines and drives persistence and notifications.
//!
//! The router never fails toward the transport. Unknown event types and
//! unrecognized commands are logged no-ops; store and roster failures are
//! logged and reported as a `Failed` outcome.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::config::RotaConfig;
use crate::domain::commands::{self, MentionCommand};
use crate::domain::entities::{ChannelId, MemberHandle};
use crate::domain::errors::{CommandError, EventError, RotaError};
use crate::domain::membership::{self, MutationOutcome};
use crate::events::{InboundEvent, RawEvent};
use crate::metrics::Metrics;
use crate::ports::inbound::{EventIngest, IgnoreReason, Outcome};
use crate::ports::outbound::{Notifier, RosterProvider, SecretStore};
use crate::service::table_store::TableStore;

/// Event router service.
pub struct EventRouter<S, N, R> {
    tables: TableStore<S>,
    notifier: Arc<N>,
    roster: Arc<R>,
    config: RotaConfig,
    metrics: Arc<Metrics>,
}

impl<S, N, R> EventRouter<S, N, R>
where
    S: SecretStore,
    N: Notifier,
    R: RosterProvider,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, roster: Arc<R>, config: RotaConfig) -> Self {
        Self {
            tables: TableStore::new(store),
            notifier,
            roster,
            config,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Handle a typed event. Store and roster failures propagate; the
    /// [`EventIngest`] impl converts them to logged outcomes.
    pub async fn handle(&self, event: InboundEvent) -> Result<Outcome, RotaError> {
        match event {
            InboundEvent::MemberJoined { channel, user } => {
                self.on_member_added(channel, user).await
            }
            InboundEvent::MemberLeft { channel, user } => {
                self.on_member_removed(channel, user).await
            }
            InboundEvent::AppMention { channel, text } => self.on_app_mention(channel, text).await,
        }
    }

    /// Join events and explicit `add` commands. The mutation is idempotent;
    /// the welcome message is sent on every arrival, duplicates included.
    async fn on_member_added(
        &self,
        channel: ChannelId,
        user: MemberHandle,
    ) -> Result<Outcome, RotaError> {
        if user == self.config.own_handle {
            debug!(channel = %channel, "ignoring join of the automation's own handle");
            return Ok(Outcome::Ignored(IgnoreReason::SelfEvent));
        }

        let persisted = self
            .apply_list_mutation(&channel, |members| membership::add_member(members, &user))
            .await?;

        self.send(
            &channel,
            &format!(
                "{} says welcome {}",
                self.config.display_name,
                user.mention()
            ),
        )
        .await;

        info!(channel = %channel, user = %user, persisted, "member added");
        Ok(Outcome::MemberAdded {
            channel,
            user,
            persisted,
        })
    }

    /// Leave events and explicit `remove` commands.
    async fn on_member_removed(
        &self,
        channel: ChannelId,
        user: MemberHandle,
    ) -> Result<Outcome, RotaError> {
        let persisted = self
            .apply_list_mutation(&channel, |members| membership::remove_member(members, &user))
            .await?;

        self.send(
            &channel,
            &format!(
                "{} says bye bye {}",
                self.config.display_name,
                user.mention()
            ),
        )
        .await;

        info!(channel = %channel, user = %user, persisted, "member removed");
        Ok(Outcome::MemberRemoved {
            channel,
            user,
            persisted,
        })
    }

    async fn on_app_mention(
        &self,
        channel: ChannelId,
        text: String,
    ) -> Result<Outcome, RotaError> {
        match commands::parse_mention(&text, &self.config.own_handle) {
            Ok(MentionCommand::EnrollChannel) => self.enroll_channel(channel).await,
            Ok(MentionCommand::AddMember(user)) => self.on_member_added(channel, user).await,
            Ok(MentionCommand::RemoveMember(user)) => self.on_member_removed(channel, user).await,
            Err(CommandError::SelfTarget) => {
                debug!(channel = %channel, "mention targets the automation itself; ignoring");
                Ok(Outcome::Ignored(IgnoreReason::SelfEvent))
            }
            Err(err) => {
                debug!(channel = %channel, reason = %err, "mention text not actionable");
                Ok(Outcome::Ignored(IgnoreReason::InvalidCommand))
            }
        }
    }

    /// The `add us` path: resolve the live roster, replace the channel's
    /// stored member list, and seed the rotation pointer. Membership and
    /// pointer are two independent read-modify-write sequences, one slot
    /// each.
    async fn enroll_channel(&self, channel: ChannelId) -> Result<Outcome, RotaError> {
        let roster = self.roster.list_channel_members(&channel).await?;
        let replacement = membership::bulk_replace(roster, &self.config.own_handle);

        let (mut table, version) = self.tables.read_membership_or_empty().await?;
        table.set_members(channel.clone(), replacement.members.clone());
        self.tables
            .write_membership(&table, version.as_ref())
            .await?;
        self.metrics.record_store_write();

        match replacement.seeded_holder {
            Some(seed) => {
                let (mut pointers, pointer_version) =
                    self.tables.read_rotation_pointer_or_empty().await?;
                pointers.record_holder(channel.clone(), seed);
                self.tables
                    .write_rotation_pointer(&pointers, pointer_version.as_ref())
                    .await?;
                self.metrics.record_store_write();

                let mentions = replacement
                    .members
                    .iter()
                    .map(MemberHandle::mention)
                    .collect::<Vec<_>>()
                    .join(",");
                self.send(
                    &channel,
                    &format!(
                        "{} added {} for standup duties",
                        self.config.display_name, mentions
                    ),
                )
                .await;
            }
            None => {
                warn!(
                    channel = %channel,
                    "resolved roster is empty; stored without a rotation seed"
                );
            }
        }

        info!(
            channel = %channel,
            roster_size = replacement.members.len(),
            "channel enrolled"
        );
        Ok(Outcome::ChannelEnrolled {
            channel,
            roster_size: replacement.members.len(),
        })
    }

    /// Read-modify-write one channel's member list. Returns whether a new
    /// version was persisted: a no-op mutation or a channel with no stored
    /// list short-circuits the write path entirely.
    async fn apply_list_mutation<F>(
        &self,
        channel: &ChannelId,
        mutate: F,
    ) -> Result<bool, RotaError>
    where
        F: FnOnce(&[MemberHandle]) -> MutationOutcome,
    {
        let (mut table, version) = self.tables.read_membership_or_empty().await?;

        let Some(current) = table.members(channel) else {
            debug!(channel = %channel, "channel has no stored member list; store untouched");
            return Ok(false);
        };

        match mutate(current) {
            MutationOutcome::Unchanged => Ok(false),
            MutationOutcome::Applied(updated) => {
                table.set_members(channel.clone(), updated);
                self.tables
                    .write_membership(&table, version.as_ref())
                    .await?;
                self.metrics.record_store_write();
                Ok(true)
            }
        }
    }

    /// Fire-and-forget notification: failures are logged and counted, never
    /// propagated.
    async fn send(&self, channel: &ChannelId, text: &str) {
        match self.notifier.notify(channel, text).await {
            Ok(()) => self.metrics.record_notification(),
            Err(err) => {
                warn!(channel = %channel, error = %err, "notification delivery failed");
                self.metrics.record_notification_failure();
            }
        }
    }
}

#[async_trait]
impl<S, N, R> EventIngest for EventRouter<S, N, R>
where
    S: SecretStore,
    N: Notifier,
    R: RosterProvider,
{
    async fn dispatch(&self, raw: RawEvent) -> Outcome {
        self.metrics.record_event();

        let event = match InboundEvent::from_raw(raw) {
            Ok(event) => event,
            Err(EventError::UnknownEventType { kind }) => {
                warn!(kind = %kind, "no handler for event type; ignoring");
                self.metrics.record_ignored();
                return Outcome::Ignored(IgnoreReason::UnknownEventType(kind));
            }
            Err(err) => {
                warn!(error = %err, "malformed inbound event; ignoring");
                self.metrics.record_ignored();
                return Outcome::Ignored(IgnoreReason::MalformedEvent(err.to_string()));
            }
        };

        match self.handle(event).await {
            Ok(outcome) => {
                if matches!(outcome, Outcome::Ignored(_)) {
                    self.metrics.record_ignored();
                }
                outcome
            }
            Err(err) => {
                if matches!(err, RotaError::Store(_)) {
                    self.metrics.record_store_failure();
                }
                error!(error = %err, "event processing failed");
                Outcome::Failed {
                    detail: err.to_string(),
                }
            }
        }
    }
}
