//! Wire codec for the two persisted tables.
//!
//! This is the one bit-exact format shared with previously stored state:
//!
//! ```text
//! membership:        channel1=@tom,@charles;channel2=
//! rotation pointer:  channel1=@tom,channel2=@dave
//! ```
//!
//! Membership decoding is tolerant (a segment with no `=` or an empty
//! right-hand side is an empty member list); pointer decoding is strict
//! (every segment must be exactly `channel=handle`).

use crate::domain::entities::{ChannelId, MemberHandle, MembershipTable, RotationPointerTable};
use crate::domain::errors::CodecError;

const CHANNEL_SEPARATOR: char = ';';
const MEMBER_SEPARATOR: char = ',';
const KEY_VALUE_SEPARATOR: char = '=';

/// Encode the membership table: channels joined by `;`, each channel as
/// `channelId=h1,h2,h3`. An empty member list encodes as `channelId=`.
pub fn encode_membership(table: &MembershipTable) -> String {
    table
        .iter()
        .map(|(channel, members)| {
            let handles = members
                .iter()
                .map(MemberHandle::as_str)
                .collect::<Vec<_>>()
                .join(&MEMBER_SEPARATOR.to_string());
            format!("{}{}{}", channel, KEY_VALUE_SEPARATOR, handles)
        })
        .collect::<Vec<_>>()
        .join(&CHANNEL_SEPARATOR.to_string())
}

/// Decode the membership table. Never fails: a segment with no `=` or
/// nothing after it is a channel with an empty member list, and an empty
/// payload is an empty table.
pub fn decode_membership(raw: &str) -> MembershipTable {
    raw.split(CHANNEL_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (channel, handles) = match segment.split_once(KEY_VALUE_SEPARATOR) {
                Some((channel, rest)) => (channel, rest),
                None => (segment, ""),
            };
            let members = handles
                .split(MEMBER_SEPARATOR)
                .filter(|h| !h.is_empty())
                .map(MemberHandle::new)
                .collect();
            (ChannelId::new(channel), members)
        })
        .collect()
}

/// Encode the rotation pointer table: channels joined by `,`, each as
/// `channelId=handle`.
pub fn encode_rotation_pointer(table: &RotationPointerTable) -> String {
    table
        .iter()
        .map(|(channel, holder)| format!("{}{}{}", channel, KEY_VALUE_SEPARATOR, holder))
        .collect::<Vec<_>>()
        .join(&MEMBER_SEPARATOR.to_string())
}

/// Decode the rotation pointer table. An empty payload is an empty table;
/// any other segment that is not exactly `channel=handle` is malformed and
/// must not be coerced to an empty entry.
pub fn decode_rotation_pointer(raw: &str) -> Result<RotationPointerTable, CodecError> {
    if raw.is_empty() {
        return Ok(RotationPointerTable::new());
    }

    raw.split(MEMBER_SEPARATOR)
        .map(|segment| {
            let Some((channel, holder)) = segment.split_once(KEY_VALUE_SEPARATOR) else {
                return Err(CodecError::MalformedSegment {
                    segment: segment.to_owned(),
                    reason: "expected exactly one '=' between channel and handle",
                });
            };
            if holder.contains(KEY_VALUE_SEPARATOR) {
                return Err(CodecError::MalformedSegment {
                    segment: segment.to_owned(),
                    reason: "expected exactly one '=' between channel and handle",
                });
            }
            if channel.is_empty() || holder.is_empty() {
                return Err(CodecError::MalformedSegment {
                    segment: segment.to_owned(),
                    reason: "channel and handle must both be non-empty",
                });
            }
            Ok((ChannelId::new(channel), MemberHandle::new(holder)))
        })
        .collect()
}
