//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the dedup cursor and the authorization context and
//! runs the power-control sequences.  All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!  ChannelPort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                  │       AppService         │
//!    PowerPort ◀──│ Gate · Interpret · Power │
//!    ClockPort ◀──│                           │
//!                  └─────────────────────────┘
//! ```
//!
//! The power state is never tracked here.  Each sequence samples the status
//! pin at the moment it decides, since the host can change state outside
//! this agent's control.  Presses and the restart wait block the caller:
//! while a command runs, nothing else happens.

use log::{debug, info, warn};

use crate::config::{AgentConfig, AuthorizationContext, TimingConfig};

use super::commands::{Command, interpret};
use super::events::{AppEvent, CommandOutcome, Notification};
use super::gate::{self, Admission, DedupCursor};
use super::ports::{ChannelPort, ClockPort, EventSink, InboundMessage, PowerPort};
use super::power::{PowerState, PressKind};
use super::replies;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    auth: AuthorizationContext,
    timing: TimingConfig,
    ack_emoji: String,
    cursor: DedupCursor,
    commands_handled: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** prime the cursor; call [`prime`](Self::prime) next.
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            auth: config.auth.clone(),
            timing: config.timing,
            ack_emoji: config.ack_emoji.clone(),
            cursor: DedupCursor::new(),
            commands_handled: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the dedup cursor on the channel's current latest message so that
    /// nothing posted before boot is executed.
    pub fn prime(&mut self, channel: &mut impl ChannelPort, sink: &mut impl EventSink) {
        match channel.fetch_latest() {
            Ok(latest) => {
                self.cursor.prime(latest.as_ref());
                sink.emit(&AppEvent::Primed {
                    last_seen: latest.map(|m| m.message_id),
                });
            }
            Err(e) => {
                info!("Priming deferred to the next successful fetch");
                self.cursor.defer_prime();
                sink.emit(&AppEvent::FetchFailed(e));
            }
        }
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Run one message check: fetch → gate → interpret → execute.
    ///
    /// Returns the outcome if a command was admitted.
    pub fn poll(
        &mut self,
        channel: &mut impl ChannelPort,
        hw: &mut impl PowerPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Option<CommandOutcome> {
        let fetched = match channel.fetch_latest() {
            Ok(None) if self.cursor.is_awaiting_prime() => {
                // An empty channel has no backlog to skip.
                self.cursor.prime(None);
                sink.emit(&AppEvent::Primed { last_seen: None });
                return None;
            }
            Ok(fetched) => fetched,
            Err(e) => {
                sink.emit(&AppEvent::FetchFailed(e));
                None
            }
        };

        let msg = match gate::evaluate(fetched, &mut self.cursor, &self.auth) {
            Admission::Admitted(msg) => msg,
            Admission::Rejected(reason) => {
                sink.emit(&AppEvent::MessageSkipped {
                    message_id: self.cursor.last_seen().into(),
                    reason,
                });
                return None;
            }
            Admission::Primed => {
                sink.emit(&AppEvent::Primed {
                    last_seen: Some(self.cursor.last_seen().into()),
                });
                return None;
            }
            Admission::Empty | Admission::Duplicate => return None,
        };

        let command = interpret(&msg.content);
        sink.emit(&AppEvent::CommandAdmitted {
            message_id: msg.message_id.clone(),
            command,
        });
        Some(self.execute(command, &msg, channel, hw, clock, sink))
    }

    // ── Command handling ──────────────────────────────────────

    /// Run `command` (issued by `msg`) to its terminal state.
    pub fn execute(
        &mut self,
        command: Command,
        msg: &InboundMessage,
        channel: &mut impl ChannelPort,
        hw: &mut impl PowerPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> CommandOutcome {
        if command == Command::Invalid {
            return CommandOutcome::Ignored;
        }

        debug!("Executing {:?} for message {}", command, msg.message_id);
        if command.acknowledges() {
            self.acknowledge(msg, channel, sink);
        }

        let mut seq = Sequence {
            msg,
            timing: &self.timing,
            channel,
            hw,
            clock,
            sink,
        };
        let outcome = match command {
            Command::On => seq.power_on(),
            Command::Off => seq.power_off(),
            Command::Restart => seq.restart(),
            Command::Status => seq.status(),
            Command::ForceOff => seq.force_off(),
            Command::Invalid => CommandOutcome::Ignored,
        };

        self.commands_handled += 1;
        seq.sink.emit(&AppEvent::CommandCompleted { command, outcome });
        outcome
    }

    // ── Queries ───────────────────────────────────────────────

    /// The dedup cursor (read-only).
    pub fn cursor(&self) -> &DedupCursor {
        &self.cursor
    }

    /// Commands executed since boot, excluding ignored text.
    pub fn commands_handled(&self) -> u64 {
        self.commands_handled
    }

    // ── Internal ──────────────────────────────────────────────

    fn acknowledge(
        &self,
        msg: &InboundMessage,
        channel: &mut impl ChannelPort,
        sink: &mut impl EventSink,
    ) {
        if let Err(e) = channel.react(&msg.message_id, &self.ack_emoji) {
            sink.emit(&AppEvent::NotificationLost {
                kind: Notification::Reaction,
                error: e,
            });
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Per-command sequences
// ───────────────────────────────────────────────────────────────

/// Borrowed ports for the duration of one command.
struct Sequence<'a, C, H, K, S> {
    msg: &'a InboundMessage,
    timing: &'a TimingConfig,
    channel: &'a mut C,
    hw: &'a mut H,
    clock: &'a mut K,
    sink: &'a mut S,
}

impl<C, H, K, S> Sequence<'_, C, H, K, S>
where
    C: ChannelPort,
    H: PowerPort,
    K: ClockPort,
    S: EventSink,
{
    fn power_on(&mut self) -> CommandOutcome {
        match self.sense() {
            Some(PowerState::Off) => {
                self.reply(replies::POWERING_ON);
                self.press(PressKind::Momentary);
                CommandOutcome::PoweringOn
            }
            Some(PowerState::On) => {
                self.reply(replies::ALREADY_ON);
                CommandOutcome::AlreadyOn
            }
            None => self.sense_failed(),
        }
    }

    fn power_off(&mut self) -> CommandOutcome {
        match self.sense() {
            Some(PowerState::On) => {
                self.reply(replies::POWERING_OFF);
                self.press(PressKind::Momentary);
                CommandOutcome::PoweringOff
            }
            Some(PowerState::Off) => {
                self.reply(replies::ALREADY_OFF);
                CommandOutcome::AlreadyOff
            }
            None => self.sense_failed(),
        }
    }

    /// Off, wait for power loss, on.  Never re-energises a host that did
    /// not shut down within the bound.
    fn restart(&mut self) -> CommandOutcome {
        let mut waited_ticks = 0;
        match self.sense() {
            Some(PowerState::On) => {
                self.reply(replies::POWERING_OFF);
                self.press(PressKind::Momentary);
                match self.wait_for_power_off() {
                    Some(ticks) => waited_ticks = ticks,
                    None => {
                        warn!(
                            "Restart aborted: still on after {} ticks",
                            self.timing.restart_wait_ticks
                        );
                        self.reply(replies::NOT_OFF_IN_TIME);
                        return CommandOutcome::RestartTimedOut;
                    }
                }
            }
            Some(PowerState::Off) => {}
            None => return self.sense_failed(),
        }

        self.reply(replies::POWERING_ON);
        self.press(PressKind::Momentary);
        CommandOutcome::Restarted { waited_ticks }
    }

    fn status(&mut self) -> CommandOutcome {
        match self.sense() {
            Some(state) => {
                self.reply(replies::status(state));
                CommandOutcome::StatusReported(state)
            }
            None => self.sense_failed(),
        }
    }

    /// Emergency path: no reaction, no sensing, straight to a held press.
    fn force_off(&mut self) -> CommandOutcome {
        self.reply(replies::FORCING_OFF);
        self.press(PressKind::Hard);
        CommandOutcome::ForcedOff
    }

    // ── Helpers ───────────────────────────────────────────────

    /// Sample the status pin every tick until it reads off.
    ///
    /// Returns the number of ticks waited, or `None` if the host was still
    /// on after `restart_wait_ticks`.  A sense failure counts as still on.
    fn wait_for_power_off(&mut self) -> Option<u32> {
        for tick in 0..self.timing.restart_wait_ticks {
            if self.hw.sense() == Ok(PowerState::Off) {
                return Some(tick);
            }
            self.clock.delay_ms(self.timing.restart_tick_ms);
        }
        (self.hw.sense() == Ok(PowerState::Off)).then_some(self.timing.restart_wait_ticks)
    }

    fn sense(&mut self) -> Option<PowerState> {
        match self.hw.sense() {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("Power sense failed: {}", e);
                None
            }
        }
    }

    fn sense_failed(&mut self) -> CommandOutcome {
        self.reply(replies::SENSE_FAILED);
        CommandOutcome::SenseFailed
    }

    fn press(&mut self, kind: PressKind) {
        let hold_ms = self.timing.press_ms(kind);
        match self.hw.press(kind, hold_ms) {
            Ok(()) => self.sink.emit(&AppEvent::PressIssued(kind)),
            Err(error) => {
                self.sink.emit(&AppEvent::PressFailed { kind, error });
            }
        }
    }

    fn reply(&mut self, text: &str) {
        if let Err(e) = self
            .channel
            .reply(&self.msg.message_id, &self.msg.channel_id, text)
        {
            self.sink.emit(&AppEvent::NotificationLost {
                kind: Notification::Reply,
                error: e,
            });
        }
    }
}
