//! Mention-command parsing.
//!
//! Commands arrive as free-form mention text ("@rota add @tom please").
//! Recognition is substring containment, case insensitive, with
//! first-match-wins precedence: `add us`, then `remove`, then `add`. The
//! order is load-bearing — "add us" also contains "add".

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::MemberHandle;
use crate::domain::errors::CommandError;

/// Matches `<...>` mention tokens in event text. In an app-mention event the
/// first token is the automation's own mention, the second (if any) is the
/// handle the command targets.
static MENTION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("mention token pattern should compile"));

const ENROLL_KEYWORD: &str = "add us";
const REMOVE_KEYWORD: &str = "remove";
const ADD_KEYWORD: &str = "add";

/// A recognized mention command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MentionCommand {
    /// Enroll the whole channel: resolve the live roster and replace the
    /// stored member list with it.
    EnrollChannel,
    /// Remove one explicitly mentioned member from the channel's list.
    RemoveMember(MemberHandle),
    /// Add one explicitly mentioned member to the channel's list.
    AddMember(MemberHandle),
}

/// Parse mention text into a command.
///
/// `own_handle` is the automation's identity; a command that targets the
/// automation itself is rejected so that mentioning the bot twice never
/// enrolls it into its own rotation.
pub fn parse_mention(text: &str, own_handle: &MemberHandle) -> Result<MentionCommand, CommandError> {
    let lowered = text.to_lowercase();

    if lowered.contains(ENROLL_KEYWORD) {
        return Ok(MentionCommand::EnrollChannel);
    }
    if lowered.contains(REMOVE_KEYWORD) {
        let target = mentioned_target(text, own_handle, REMOVE_KEYWORD)?;
        return Ok(MentionCommand::RemoveMember(target));
    }
    if lowered.contains(ADD_KEYWORD) {
        let target = mentioned_target(text, own_handle, ADD_KEYWORD)?;
        return Ok(MentionCommand::AddMember(target));
    }

    Err(CommandError::NoRecognizedAction)
}

/// The handle a command targets: the second `<...>` token in the text (the
/// first is the automation's own mention that delivered the event).
fn mentioned_target(
    text: &str,
    own_handle: &MemberHandle,
    action: &'static str,
) -> Result<MemberHandle, CommandError> {
    let mut tokens = MENTION_TOKEN.find_iter(text);
    let _own_mention = tokens
        .next()
        .ok_or(CommandError::MissingTarget { action })?;
    let target = tokens
        .next()
        .ok_or(CommandError::MissingTarget { action })?;

    let handle = strip_mention(target.as_str());
    if handle == own_handle.as_str() {
        return Err(CommandError::SelfTarget);
    }
    Ok(MemberHandle::new(handle))
}

fn strip_mention(token: &str) -> &str {
    token
        .trim_start_matches('<')
        .trim_start_matches('@')
        .trim_end_matches('>')
}
