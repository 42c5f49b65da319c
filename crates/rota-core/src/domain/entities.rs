//! Core entities: channel/member identifiers and the two persisted tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque identifier of a chat channel.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Opaque handle of a chat user.
///
/// Uniqueness is per channel list, and list order defines the rotation
/// sequence.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberHandle(String);

impl MemberHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Chat-platform mention syntax for this handle.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl fmt::Display for MemberHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberHandle {
    fn from(handle: &str) -> Self {
        Self(handle.to_owned())
    }
}

/// Channel id -> ordered member list.
///
/// A member appears at most once per channel list; an empty list is a valid
/// state (channel stored before any members resolved). Backed by an ordered
/// map so encoding is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MembershipTable {
    channels: BTreeMap<ChannelId, Vec<MemberHandle>>,
}

impl MembershipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Member list for a channel, if the channel is stored at all.
    pub fn members(&self, channel: &ChannelId) -> Option<&[MemberHandle]> {
        self.channels.get(channel).map(Vec::as_slice)
    }

    /// Replace (or create) a channel's member list.
    pub fn set_members(&mut self, channel: ChannelId, members: Vec<MemberHandle>) {
        self.channels.insert(channel, members);
    }

    pub fn contains_channel(&self, channel: &ChannelId) -> bool {
        self.channels.contains_key(channel)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChannelId, &Vec<MemberHandle>)> {
        self.channels.iter()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl FromIterator<(ChannelId, Vec<MemberHandle>)> for MembershipTable {
    fn from_iter<I: IntoIterator<Item = (ChannelId, Vec<MemberHandle>)>>(iter: I) -> Self {
        Self {
            channels: iter.into_iter().collect(),
        }
    }
}

/// Channel id -> member who last held standup duty.
///
/// A channel may be absent (never enrolled) or point at a handle that has
/// since left the membership list; both are expected states, not errors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RotationPointerTable {
    entries: BTreeMap<ChannelId, MemberHandle>,
}

impl RotationPointerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_holder(&self, channel: &ChannelId) -> Option<&MemberHandle> {
        self.entries.get(channel)
    }

    /// Record `holder` as the channel's most recent duty holder.
    pub fn record_holder(&mut self, channel: ChannelId, holder: MemberHandle) {
        self.entries.insert(channel, holder);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChannelId, &MemberHandle)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ChannelId, MemberHandle)> for RotationPointerTable {
    fn from_iter<I: IntoIterator<Item = (ChannelId, MemberHandle)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
