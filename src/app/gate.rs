//! Dedup/authorization gate.
//!
//! The channel is polled for its single latest message, so the same message
//! comes back on every poll until someone posts again.  The gate turns that
//! stream of repeats into at-most-once delivery:
//!
//! 1. no message → nothing;
//! 2. an id already seen → nothing;
//! 3. new id → the cursor advances **before** authorization is checked, so
//!    a message from anyone else is consumed once and never re-examined;
//! 4. admitted only if it comes from the operator, in the control channel.

use core::fmt;

use heapless::Deque;
use log::debug;

use crate::config::AuthorizationContext;

use super::ports::InboundMessage;

/// Number of consumed ids remembered besides the latest one.
///
/// The latest message only changes when someone posts, so a deleted message
/// can make an older id resurface; it must still count as seen.
pub const SEEN_HISTORY: usize = 16;

/// Last-processed message id plus a short history of earlier ones.
#[derive(Debug, Clone, Default)]
pub struct DedupCursor {
    last_seen_message_id: String,
    history: Deque<String, SEEN_HISTORY>,
    awaiting_prime: bool,
}

impl DedupCursor {
    /// An empty cursor: the first message fetched is treated as new.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last message id consumed, empty before the first one.
    pub fn last_seen(&self) -> &str {
        &self.last_seen_message_id
    }

    /// Whether `message_id` was already consumed.
    pub fn has_seen(&self, message_id: &str) -> bool {
        self.last_seen_message_id == message_id
            || self.history.iter().any(|id| id == message_id)
    }

    /// Record the current latest message at boot without admitting it.
    ///
    /// Pass `None` when the channel is empty.
    pub fn prime(&mut self, latest: Option<&InboundMessage>) {
        if let Some(msg) = latest {
            self.advance(&msg.message_id);
        }
        self.awaiting_prime = false;
    }

    /// The boot-time priming fetch failed: the next message fetched
    /// is recorded instead of admitted, so no backlog is replayed.
    /// A later successful fetch of an empty channel completes the prime
    /// through [`DedupCursor::prime`] instead.
    pub fn defer_prime(&mut self) {
        self.awaiting_prime = true;
    }

    pub fn is_awaiting_prime(&self) -> bool {
        self.awaiting_prime
    }

    fn advance(&mut self, message_id: &str) {
        if !self.last_seen_message_id.is_empty() {
            if self.history.is_full() {
                self.history.pop_front();
            }
            let previous = core::mem::take(&mut self.last_seen_message_id);
            // Cannot fail: a slot was freed above.
            let _ = self.history.push_back(previous);
        }
        self.last_seen_message_id.push_str(message_id);
    }
}

/// Why a new message was consumed without being admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Author is not the configured operator.
    NotAdmin,
    /// Posted outside the control channel.
    WrongChannel,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAdmin => write!(f, "not admin"),
            Self::WrongChannel => write!(f, "wrong channel"),
        }
    }
}

/// Full verdict of the gate for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Nothing was fetched.
    Empty,
    /// Already seen; cursor unchanged.
    Duplicate,
    /// Recorded as the priming message after a failed boot fetch.
    Primed,
    /// New but unauthorized; cursor advanced past it.
    Rejected(RejectReason),
    /// New, from the operator, in the control channel.
    Admitted(InboundMessage),
}

impl Admission {
    pub fn into_message(self) -> Option<InboundMessage> {
        match self {
            Self::Admitted(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Run one fetched message through the gate, returning the full verdict.
pub fn evaluate(
    fetched: Option<InboundMessage>,
    cursor: &mut DedupCursor,
    context: &AuthorizationContext,
) -> Admission {
    let Some(msg) = fetched else {
        return Admission::Empty;
    };

    if cursor.has_seen(&msg.message_id) {
        return Admission::Duplicate;
    }

    cursor.advance(&msg.message_id);

    if cursor.awaiting_prime {
        cursor.awaiting_prime = false;
        debug!("gate: primed on {}", msg.message_id);
        return Admission::Primed;
    }

    if msg.author_id != context.admin_id {
        debug!("gate: {} not admin ({})", msg.message_id, msg.author_id);
        return Admission::Rejected(RejectReason::NotAdmin);
    }
    if msg.channel_id != context.channel_id {
        debug!("gate: {} in channel {}", msg.message_id, msg.channel_id);
        return Admission::Rejected(RejectReason::WrongChannel);
    }

    Admission::Admitted(msg)
}

/// Run one fetched message through the gate; `Some` only if admitted.
pub fn admit(
    fetched: Option<InboundMessage>,
    cursor: &mut DedupCursor,
    context: &AuthorizationContext,
) -> Option<InboundMessage> {
    evaluate(fetched, cursor, context).into_message()
}
