//! Rotation engine: deterministic selection of the next duty holder.

use std::collections::BTreeMap;

use crate::domain::entities::{ChannelId, MemberHandle, MembershipTable, RotationPointerTable};

/// Next duty holder for one channel.
///
/// Rules:
/// - empty member list -> `None` (no eligible rotation, caller must not
///   notify);
/// - `last` absent or no longer in the list -> restart at `members[0]`;
/// - otherwise the element after `last`, wrapping to `members[0]`.
///
/// Pure and O(n) in the list length; lists are tens of members at most.
pub fn next_holder<'a>(
    members: &'a [MemberHandle],
    last: Option<&MemberHandle>,
) -> Option<&'a MemberHandle> {
    if members.is_empty() {
        return None;
    }

    let next_index = match last.and_then(|l| members.iter().position(|m| m == l)) {
        Some(i) if i + 1 < members.len() => i + 1,
        Some(_) => 0,
        None => 0,
    };

    Some(&members[next_index])
}

/// Next duty holder for every channel in rotation scope.
///
/// Scope is the set of channels present in the pointer table: enrollment
/// seeds a pointer entry, and that entry is what brings a channel into the
/// daily pass. Channels whose membership list is missing or empty produce no
/// holder and are omitted from the result.
pub fn next_holder_for_all(
    membership: &MembershipTable,
    pointers: &RotationPointerTable,
) -> BTreeMap<ChannelId, MemberHandle> {
    pointers
        .iter()
        .filter_map(|(channel, last)| {
            let members = membership.members(channel)?;
            next_holder(members, Some(last)).map(|next| (channel.clone(), next.clone()))
        })
        .collect()
}
