//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (log to serial, record in a test).

use crate::error::{ActuatorError, CommsError, TransportError};

use super::commands::Command;
use super::gate::RejectReason;
use super::power::{PowerState, PressKind};

/// Terminal result of executing one admitted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    PoweringOn,
    AlreadyOn,
    PoweringOff,
    AlreadyOff,
    /// Restart completed; the host powered off after `waited_ticks` ticks.
    Restarted { waited_ticks: u32 },
    /// The host was still on when the wait bound ran out; not re-energised.
    RestartTimedOut,
    StatusReported(PowerState),
    ForcedOff,
    /// Unrecognised text: nothing done.
    Ignored,
    /// The status pin could not be read; nothing actuated.
    SenseFailed,
}

/// Which best-effort notification was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Reaction,
    Reply,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The dedup cursor was armed at boot.  `None` if the channel was empty
    /// or the priming fetch failed.
    Primed { last_seen: Option<String> },

    /// A new message was consumed by the gate but not admitted.
    MessageSkipped { message_id: String, reason: RejectReason },

    /// A new message from the operator passed the gate.
    CommandAdmitted { message_id: String, command: Command },

    /// The relay was pulsed.
    PressIssued(PressKind),

    /// The relay pulse could not be completed.
    PressFailed { kind: PressKind, error: ActuatorError },

    /// A command ran to its terminal state.
    CommandCompleted { command: Command, outcome: CommandOutcome },

    /// Fetching the latest message failed; treated as "no new message".
    FetchFailed(TransportError),

    /// A reaction or reply could not be delivered.  Not retried.
    NotificationLost { kind: Notification, error: TransportError },

    /// The wall clock was re-synced.
    ClockSynced,

    /// Wall clock sync failed; retried at the next interval.
    ClockSyncFailed(CommsError),
}
