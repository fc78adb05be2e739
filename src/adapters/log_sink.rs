//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Primed { last_seen } => {
                info!("GATE  | primed, last_seen={}", last_seen.as_deref().unwrap_or("-"));
            }
            AppEvent::MessageSkipped { message_id, reason } => {
                info!("GATE  | skipped {} ({})", message_id, reason);
            }
            AppEvent::CommandAdmitted {
                message_id,
                command,
            } => {
                info!("CMD   | {} -> {:?}", message_id, command);
            }
            AppEvent::PressIssued(kind) => {
                info!("RELAY | {} press", kind);
            }
            AppEvent::PressFailed { kind, error } => {
                warn!("RELAY | {} press failed: {}", kind, error);
            }
            AppEvent::CommandCompleted { command, outcome } => {
                info!("CMD   | {:?} done: {:?}", command, outcome);
            }
            AppEvent::FetchFailed(e) => {
                warn!("CHAN  | fetch failed: {}", e);
            }
            AppEvent::NotificationLost { kind, error } => {
                warn!("CHAN  | {:?} lost: {}", kind, error);
            }
            AppEvent::ClockSynced => {
                info!("CLOCK | synced");
            }
            AppEvent::ClockSyncFailed(e) => {
                warn!("CLOCK | sync failed: {}", e);
            }
        }
    }
}
