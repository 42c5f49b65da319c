//! Membership engine: idempotent mutations of a channel's member list.

use crate::domain::entities::MemberHandle;

/// Result of a list mutation.
///
/// `Unchanged` is a first-class signal, not an empty list: callers use it to
/// short-circuit the persistence path entirely so no-op events cause no
/// version churn in the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The list changed; the new list must be persisted.
    Applied(Vec<MemberHandle>),
    /// The mutation was a no-op; do not persist.
    Unchanged,
}

impl MutationOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, MutationOutcome::Unchanged)
    }
}

/// Append `handle` to the list, or signal a no-op if already present.
pub fn add_member(current: &[MemberHandle], handle: &MemberHandle) -> MutationOutcome {
    if current.contains(handle) {
        return MutationOutcome::Unchanged;
    }
    let mut updated = current.to_vec();
    updated.push(handle.clone());
    MutationOutcome::Applied(updated)
}

/// Remove `handle` from the list preserving the order of the remainder, or
/// signal a no-op if absent.
pub fn remove_member(current: &[MemberHandle], handle: &MemberHandle) -> MutationOutcome {
    if !current.contains(handle) {
        return MutationOutcome::Unchanged;
    }
    let updated = current.iter().filter(|m| *m != handle).cloned().collect();
    MutationOutcome::Applied(updated)
}

/// Full roster replacement, produced when a channel is enrolled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterReplacement {
    /// The channel's new member list.
    pub members: Vec<MemberHandle>,
    /// Pointer entry to seed for the channel: the first member of the new
    /// list. Seeding the pointer to `members[0]` means the next *computed*
    /// holder is `members[1]` — the seed records a "last holder", not a
    /// "next holder".
    pub seeded_holder: Option<MemberHandle>,
}

/// Replace a channel's list with a live roster, excluding the automation's
/// own handle so it never schedules itself. Duplicates are dropped keeping
/// the first occurrence, preserving the roster order.
pub fn bulk_replace(roster: Vec<MemberHandle>, exclude: &MemberHandle) -> RosterReplacement {
    let mut members: Vec<MemberHandle> = Vec::with_capacity(roster.len());
    for handle in roster {
        if handle == *exclude || members.contains(&handle) {
            continue;
        }
        members.push(handle);
    }

    let seeded_holder = members.first().cloned();
    RosterReplacement {
        members,
        seeded_holder,
    }
}
