//! In-memory implementations of the driven ports, for tests and local use.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use crate::domain::entities::{ChannelId, MemberHandle};
use crate::domain::errors::{NotifyError, RosterError, StoreError};
use crate::ports::outbound::{
    Notifier, RosterProvider, SecretStore, SecretVersion, VersionedPayload,
};

/// Retained versions allowed per slot before writes are refused.
const DEFAULT_VERSION_QUOTA: usize = 6;

#[derive(Default)]
struct SlotHistory {
    next_revision: u64,
    versions: Vec<StoredVersion>,
}

struct StoredVersion {
    name: String,
    payload: String,
    destroyed: bool,
}

impl SlotHistory {
    fn live(&self) -> impl Iterator<Item = &StoredVersion> {
        self.versions.iter().filter(|v| !v.destroyed)
    }
}

/// In-memory versioned secret store.
///
/// Mirrors the external service's contract: one current version per slot,
/// explicit retirement of superseded versions, and a small retained-version
/// quota. Failure injection covers the transient-unavailability path and
/// the window between writing the new version and retiring the old one.
pub struct InMemorySecretStore {
    slots: RwLock<HashMap<String, SlotHistory>>,
    version_quota: usize,
    offline: AtomicBool,
    fail_retire: AtomicBool,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            version_quota: DEFAULT_VERSION_QUOTA,
            offline: AtomicBool::new(false),
            fail_retire: AtomicBool::new(false),
        }
    }

    /// Pre-populate a slot with an initial version, bypassing retirement.
    pub fn seed(&self, slot: &str, payload: &str) {
        let mut slots = self.slots.write().expect("store lock");
        append_version(slots.entry(slot.to_owned()).or_default(), slot, payload);
    }

    /// Make every operation fail with `Unavailable` until reset.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make the retire sub-step fail after the new version is written,
    /// reproducing the documented non-atomic failure window.
    pub fn set_retire_failing(&self, failing: bool) {
        self.fail_retire.store(failing, Ordering::SeqCst);
    }

    /// Versions of a slot that have not been retired.
    pub fn live_versions(&self, slot: &str) -> usize {
        let slots = self.slots.read().expect("store lock");
        slots.get(slot).map(|s| s.live().count()).unwrap_or(0)
    }

    /// All versions ever written to a slot, retired ones included.
    pub fn total_versions(&self, slot: &str) -> usize {
        let slots = self.slots.read().expect("store lock");
        slots.get(slot).map(|s| s.versions.len()).unwrap_or(0)
    }

    pub fn current_payload(&self, slot: &str) -> Option<String> {
        let slots = self.slots.read().expect("store lock");
        slots
            .get(slot)
            .and_then(|s| s.live().last().map(|v| v.payload.clone()))
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store offline".to_owned()));
        }
        Ok(())
    }
}

impl Default for InMemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

fn append_version(history: &mut SlotHistory, slot: &str, payload: &str) -> SecretVersion {
    let name = format!("{}/versions/{}", slot, history.next_revision);
    history.next_revision += 1;
    history.versions.push(StoredVersion {
        name: name.clone(),
        payload: payload.to_owned(),
        destroyed: false,
    });
    SecretVersion::new(name)
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn read_current(&self, slot: &str) -> Result<VersionedPayload, StoreError> {
        self.check_online()?;
        let slots = self
            .slots
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_owned()))?;

        slots
            .get(slot)
            .and_then(|history| history.live().last())
            .map(|version| VersionedPayload {
                payload: version.payload.clone(),
                version: SecretVersion::new(version.name.clone()),
            })
            .ok_or_else(|| StoreError::NotFound {
                slot: slot.to_owned(),
            })
    }

    async fn write_new_version_and_retire(
        &self,
        slot: &str,
        payload: &str,
        retire: Option<&SecretVersion>,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        let mut slots = self
            .slots
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_owned()))?;

        let history = slots.entry(slot.to_owned()).or_default();
        if history.live().count() >= self.version_quota {
            return Err(StoreError::Unavailable(format!(
                "slot {:?} exceeds retained-version quota of {}",
                slot, self.version_quota
            )));
        }
        append_version(history, slot, payload);

        // The new version is current from here on; failing now leaves one
        // extra stale version behind, exactly like the real service.
        if self.fail_retire.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "retire step failed after write".to_owned(),
            ));
        }

        if let Some(version) = retire {
            let stored = history
                .versions
                .iter_mut()
                .find(|v| v.name == version.as_str())
                .ok_or_else(|| {
                    StoreError::Unavailable(format!("unknown version {:?}", version.as_str()))
                })?;
            stored.destroyed = true;
        }
        Ok(())
    }
}

/// Notifier that records every message for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(ChannelId, String)>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<(ChannelId, String)> {
        self.sent.lock().expect("notifier lock").clone()
    }

    pub fn sent_to(&self, channel: &ChannelId) -> Vec<String> {
        self.sent
            .lock()
            .expect("notifier lock")
            .iter()
            .filter(|(c, _)| c == channel)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, channel: &ChannelId, text: &str) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError("injected delivery failure".to_owned()));
        }
        self.sent
            .lock()
            .map_err(|_| NotifyError("notifier lock poisoned".to_owned()))?
            .push((channel.clone(), text.to_owned()));
        Ok(())
    }
}

/// Roster provider backed by a canned channel -> members map. Unknown
/// channels resolve to an empty roster, like the platform API's empty
/// fallback.
#[derive(Default)]
pub struct StaticRosterProvider {
    rosters: RwLock<HashMap<ChannelId, Vec<MemberHandle>>>,
    failing: AtomicBool,
}

impl StaticRosterProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_roster(&self, channel: ChannelId, members: Vec<MemberHandle>) {
        self.rosters
            .write()
            .expect("roster lock")
            .insert(channel, members);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl RosterProvider for StaticRosterProvider {
    async fn list_channel_members(
        &self,
        channel: &ChannelId,
    ) -> Result<Vec<MemberHandle>, RosterError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RosterError("injected lookup failure".to_owned()));
        }
        let rosters = self
            .rosters
            .read()
            .map_err(|_| RosterError("roster lock poisoned".to_owned()))?;
        Ok(rosters.get(channel).cloned().unwrap_or_default())
    }
}
