//! Inbound event boundary.
//!
//! The transport layer decodes a request body into [`RawEvent`] and hands it
//! to the router. Conversion into the typed [`InboundEvent`] happens in one
//! explicit match — there is no global event-type handler registry.

use serde::Deserialize;

use crate::domain::entities::{ChannelId, MemberHandle};
use crate::domain::errors::EventError;

pub const MEMBER_JOINED_CHANNEL: &str = "member_joined_channel";
pub const MEMBER_LEFT_CHANNEL: &str = "member_left_channel";
pub const APP_MENTION: &str = "app_mention";

/// A decoded inbound event as the transport hands it over: an event-type
/// string, the channel it happened in, and either the affected user
/// (join/leave) or the mention text.
#[derive(Clone, Debug, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub channel: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Typed inbound event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    MemberJoined {
        channel: ChannelId,
        user: MemberHandle,
    },
    MemberLeft {
        channel: ChannelId,
        user: MemberHandle,
    },
    AppMention {
        channel: ChannelId,
        text: String,
    },
}

impl InboundEvent {
    /// Convert a raw event. Unknown event types and missing fields are
    /// errors here; the router turns them into logged no-ops.
    pub fn from_raw(raw: RawEvent) -> Result<Self, EventError> {
        let channel = ChannelId::new(raw.channel);
        match raw.kind.as_str() {
            MEMBER_JOINED_CHANNEL => {
                let user = require_field(raw.user, MEMBER_JOINED_CHANNEL, "user")?;
                Ok(InboundEvent::MemberJoined {
                    channel,
                    user: MemberHandle::new(user),
                })
            }
            MEMBER_LEFT_CHANNEL => {
                let user = require_field(raw.user, MEMBER_LEFT_CHANNEL, "user")?;
                Ok(InboundEvent::MemberLeft {
                    channel,
                    user: MemberHandle::new(user),
                })
            }
            APP_MENTION => {
                let text = require_field(raw.text, APP_MENTION, "text")?;
                Ok(InboundEvent::AppMention { channel, text })
            }
            _ => Err(EventError::UnknownEventType { kind: raw.kind }),
        }
    }

    pub fn channel(&self) -> &ChannelId {
        match self {
            InboundEvent::MemberJoined { channel, .. }
            | InboundEvent::MemberLeft { channel, .. }
            | InboundEvent::AppMention { channel, .. } => channel,
        }
    }
}

fn require_field(
    value: Option<String>,
    kind: &str,
    field: &'static str,
) -> Result<String, EventError> {
    value.ok_or(EventError::MissingField {
        kind: kind.to_owned(),
        field,
    })
}
