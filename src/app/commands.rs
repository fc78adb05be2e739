//! Operator command vocabulary.
//!
//! Message text polled from the channel is untrusted.  It is mapped onto a
//! closed set of commands by exact, case-sensitive comparison: no trimming,
//! no prefix matching.  Everything else is [`Command::Invalid`], which the
//! service ignores silently.

/// Commands the operator can issue from the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `!on`: power the host on if it is off.
    On,
    /// `!off`: ask the host to shut down if it is on.
    Off,
    /// `!restart`: shut down, wait for power loss, power back on.
    Restart,
    /// `!status`: report the sensed power state.
    Status,
    /// `!force-off`: hold the button to force the host off.
    ForceOff,
    /// Anything else.  Causes no actuation and no reply.
    Invalid,
}

const TABLE: [(&str, Command); 5] = [
    ("!on", Command::On),
    ("!off", Command::Off),
    ("!restart", Command::Restart),
    ("!status", Command::Status),
    ("!force-off", Command::ForceOff),
];

/// Translate message text into a [`Command`].
pub fn interpret(text: &str) -> Command {
    TABLE
        .iter()
        .find(|(keyword, _)| *keyword == text)
        .map_or(Command::Invalid, |(_, cmd)| *cmd)
}

impl Command {
    /// Whether receipt is acknowledged with a reaction before acting.
    ///
    /// `ForceOff` is the emergency path and goes straight to the relay.
    pub fn acknowledges(self) -> bool {
        matches!(self, Self::On | Self::Off | Self::Restart | Self::Status)
    }
}
