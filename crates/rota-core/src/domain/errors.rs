//! Error types for the standup rotation core.
//!
//! Layering mirrors the component boundaries: the codec and the pure engines
//! only raise record-shape errors, the store layer raises I/O-class errors,
//! and the services compose both. The services convert everything to logged
//! outcomes at their top level; nothing here is expected to crash a process.

use thiserror::Error;

/// Raised when a stored payload does not match the wire format.
///
/// Never silently coerced to an empty table: a slot that fails to parse
/// fails that slot's operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("malformed record segment {segment:?}: {reason}")]
    MalformedSegment {
        segment: String,
        reason: &'static str,
    },
}

/// Errors from the versioned secret store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The slot has never been written. First-run condition; callers that
    /// can start from an empty table should do so instead of failing.
    #[error("slot {slot:?} has no stored version")]
    NotFound { slot: String },

    /// Transient I/O failure. Surfaced to the caller, never retried here.
    #[error("secret store unavailable: {0}")]
    Unavailable(String),

    /// The slot's current payload does not parse.
    #[error("stored payload in slot {slot:?} does not parse")]
    Malformed {
        slot: String,
        #[source]
        source: CodecError,
    },
}

/// Errors converting a raw inbound event into a typed one.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("no handler for event type {kind:?}")]
    UnknownEventType { kind: String },

    #[error("{kind:?} event is missing required field {field:?}")]
    MissingField { kind: String, field: &'static str },
}

/// Errors parsing a mention's command text. All of these are silently
/// ignored by the router (logged only).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("mention text matches no recognized action")]
    NoRecognizedAction,

    #[error("could not extract a mentioned handle for {action:?}")]
    MissingTarget { action: &'static str },

    #[error("command targets the automation itself")]
    SelfTarget,
}

/// Notification delivery failure. Logged by callers, never propagated past
/// the service layer.
#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Channel roster lookup failure.
#[derive(Debug, Error)]
#[error("channel roster lookup failed: {0}")]
pub struct RosterError(pub String);

/// Invalid static configuration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("automation handle must not be empty")]
    EmptyHandle,

    #[error("display name must not be empty")]
    EmptyDisplayName,
}

/// Composite error surfaced by the services' fallible inner paths.
#[derive(Debug, Error)]
pub enum RotaError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Roster(#[from] RosterError),
}
