//! Daily rotation pass: load state, advance every enrolled channel's duty
//! holder, persist, announce.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::RotaConfig;
use crate::domain::cadence;
use crate::domain::errors::RotaError;
use crate::domain::rotation;
use crate::metrics::Metrics;
use crate::ports::inbound::{RotationReport, RotationRun, SkipReason};
use crate::ports::outbound::{Notifier, SecretStore};
use crate::service::table_store::TableStore;

/// Scheduled rotation job.
pub struct DailyRotationJob<S, N> {
    tables: TableStore<S>,
    notifier: Arc<N>,
    config: RotaConfig,
    metrics: Arc<Metrics>,
}

impl<S, N> DailyRotationJob<S, N>
where
    S: SecretStore,
    N: Notifier,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, config: RotaConfig) -> Self {
        Self {
            tables: TableStore::new(store),
            notifier,
            config,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    fn cadence_skip(&self, today: NaiveDate) -> Option<SkipReason> {
        if self.config.skip_weekends && cadence::is_weekend(today) {
            return Some(SkipReason::Weekend);
        }
        if let Some(anchor) = self.config.sprint_anchor {
            if cadence::is_sprint_boundary(anchor, today) {
                return Some(SkipReason::SprintBoundary);
            }
        }
        None
    }
}

#[async_trait]
impl<S, N> RotationRun for DailyRotationJob<S, N>
where
    S: SecretStore,
    N: Notifier,
{
    async fn run(&self, today: NaiveDate) -> Result<RotationReport, RotaError> {
        if let Some(reason) = self.cadence_skip(today) {
            info!(?today, ?reason, "rotation pass skipped");
            return Ok(RotationReport::skipped(reason));
        }

        let (membership, _) = self.tables.read_membership_or_empty().await?;
        let (mut pointers, pointer_version) = self.tables.read_rotation_pointer_or_empty().await?;

        let advanced = rotation::next_holder_for_all(&membership, &pointers);
        if advanced.is_empty() {
            info!("no channel eligible for rotation; nothing persisted");
            return Ok(RotationReport::default());
        }

        // Entries for channels that produced no holder this pass are
        // carried forward unchanged; dropping them would silently
        // un-enroll the channel.
        for (channel, holder) in &advanced {
            pointers.record_holder(channel.clone(), holder.clone());
        }
        if let Err(err) = self
            .tables
            .write_rotation_pointer(&pointers, pointer_version.as_ref())
            .await
        {
            self.metrics.record_store_failure();
            return Err(err.into());
        }
        self.metrics.record_store_write();
        self.metrics.record_rotation_pass(advanced.len());

        // Announce after persisting, one channel at a time; a failed
        // delivery never blocks the remaining channels.
        let mut notified = 0;
        let mut notify_failures = 0;
        for (channel, holder) in &advanced {
            let text = format!(
                "{} says today it's {}'s turn to run standup",
                self.config.display_name,
                holder.mention()
            );
            match self.notifier.notify(channel, &text).await {
                Ok(()) => {
                    self.metrics.record_notification();
                    notified += 1;
                }
                Err(err) => {
                    warn!(channel = %channel, error = %err, "duty announcement failed");
                    self.metrics.record_notification_failure();
                    notify_failures += 1;
                }
            }
        }

        info!(
            channels = advanced.len(),
            notified, notify_failures, "rotation pass complete"
        );
        Ok(RotationReport {
            skipped: None,
            advanced,
            notified,
            notify_failures,
        })
    }
}
