//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (Discord channel, relay hardware, clock, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches the
//! network or GPIO directly.
//!
//! All port errors are typed; the service handles every variant by logging
//! it and carrying on.  Nothing crossing this boundary is fatal.

use crate::error::{ActuatorError, CommsError, TransportError};

use super::power::{PowerState, PressKind};

// ───────────────────────────────────────────────────────────────
// Channel port (driven adapter: domain ↔ message channel)
// ───────────────────────────────────────────────────────────────

/// A message as fetched from the control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub message_id: String,
    pub author_id: String,
    pub channel_id: String,
    pub content: String,
}

/// The remote message channel commands arrive on and replies go to.
///
/// Implementations re-establish connectivity themselves before each
/// operation; the caller never manages the link.
pub trait ChannelPort {
    /// The most recent message in the channel, or `None` if it is empty.
    fn fetch_latest(&mut self) -> Result<Option<InboundMessage>, TransportError>;

    /// Add `emoji` (raw, not URL-encoded) as a reaction on `message_id`.
    fn react(&mut self, message_id: &str, emoji: &str) -> Result<(), TransportError>;

    /// Post `text` into `channel_id` as a reply to `message_id`.
    fn reply(
        &mut self,
        message_id: &str,
        channel_id: &str,
        text: &str,
    ) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Power port (driven adapter: domain ↔ relay + status pin)
// ───────────────────────────────────────────────────────────────

/// The host's power button relay and power-status sense line.
pub trait PowerPort {
    /// Sample the status pin.
    fn sense(&mut self) -> Result<PowerState, ActuatorError>;

    /// Close the relay for `hold_ms`, then release it.
    ///
    /// Blocks for the whole hold: a button press must not be cut short.
    fn press(&mut self, kind: PressKind, hold_ms: u32) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Clock ports
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock with a blocking delay.
pub trait ClockPort {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Block the calling thread for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Wall-clock synchronisation (SNTP on target).
pub trait ClockSyncPort {
    /// Synchronise the wall clock, blocking until done or timed out.
    fn sync(&mut self) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, a test
/// recorder, ...).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples the poll loop timing from the work)
// ───────────────────────────────────────────────────────────────

/// Periodic tasks driven by the [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Re-sync the wall clock.
    ClockSync,
    /// Fetch the latest channel message and act on it.
    MessageCheck,
}

/// Callback trait that the scheduler invokes when a task is due.
///
/// The scheduler only does interval bookkeeping; whoever implements this
/// trait owns the ports and performs the work.
pub trait SchedulerDelegate {
    /// Current monotonic time, read before and after each task.
    fn now_ms(&self) -> u64;

    /// Run `task` to completion.  May block for as long as it needs.
    fn on_task_due(&mut self, task: TaskKind);
}
