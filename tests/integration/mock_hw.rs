//! Mock adapters for integration tests.
//!
//! Every port gets a recording mock so tests can assert on the full call
//! history (presses, replies, reactions, delays) without real GPIO or
//! network.

use std::collections::VecDeque;

use powerswitch::app::events::AppEvent;
use powerswitch::app::ports::{
    ChannelPort, ClockPort, ClockSyncPort, EventSink, InboundMessage, PowerPort,
};
use powerswitch::app::power::{PowerState, PressKind};
use powerswitch::config::{AgentConfig, AuthorizationContext, TimingConfig, WifiCredentials};
use powerswitch::error::{ActuatorError, CommsError, TransportError};

pub const ADMIN: &str = "100";
pub const CHANNEL: &str = "200";
pub const EYES: &str = "\u{1F440}";

pub fn config() -> AgentConfig {
    AgentConfig {
        auth: AuthorizationContext {
            admin_id: ADMIN.into(),
            channel_id: CHANNEL.into(),
            bot_credential: "test-token".into(),
        },
        wifi: WifiCredentials {
            ssid: "TestNet".into(),
            password: "password1".into(),
        },
        timing: TimingConfig::default(),
        ack_emoji: EYES.into(),
        api_base: "https://discord.test/api/v10".into(),
    }
}

pub fn msg(id: &str, author: &str, channel: &str, content: &str) -> InboundMessage {
    InboundMessage {
        message_id: id.into(),
        author_id: author.into(),
        channel_id: channel.into(),
        content: content.into(),
    }
}

/// A message from the operator in the control channel.
pub fn op_msg(id: &str, content: &str) -> InboundMessage {
    msg(id, ADMIN, CHANNEL, content)
}

// ── MockChannel ───────────────────────────────────────────────

/// Channel whose "latest message" stays put until a test posts another,
/// like a real channel polled with `limit=1`.
#[derive(Default)]
pub struct MockChannel {
    pub latest: Option<InboundMessage>,
    /// Scripted fetch results, consumed before falling back to `latest`.
    pub fetch_script: VecDeque<Result<Option<InboundMessage>, TransportError>>,
    pub fetches: usize,
    pub reacts: Vec<(String, String)>,
    pub replies: Vec<(String, String, String)>,
    pub react_error: Option<TransportError>,
    pub reply_error: Option<TransportError>,
}

#[allow(dead_code)]
impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latest(msg: InboundMessage) -> Self {
        Self {
            latest: Some(msg),
            ..Self::default()
        }
    }

    pub fn post(&mut self, msg: InboundMessage) {
        self.latest = Some(msg);
    }

    pub fn fail_next_fetch(&mut self, error: TransportError) {
        self.fetch_script.push_back(Err(error));
    }

    pub fn reply_texts(&self) -> Vec<&str> {
        self.replies.iter().map(|(_, _, t)| t.as_str()).collect()
    }
}

impl ChannelPort for MockChannel {
    fn fetch_latest(&mut self) -> Result<Option<InboundMessage>, TransportError> {
        self.fetches += 1;
        self.fetch_script
            .pop_front()
            .unwrap_or_else(|| Ok(self.latest.clone()))
    }

    fn react(&mut self, message_id: &str, emoji: &str) -> Result<(), TransportError> {
        self.reacts.push((message_id.into(), emoji.into()));
        self.react_error.map_or(Ok(()), Err)
    }

    fn reply(
        &mut self,
        message_id: &str,
        channel_id: &str,
        text: &str,
    ) -> Result<(), TransportError> {
        self.replies
            .push((message_id.into(), channel_id.into(), text.into()));
        self.reply_error.map_or(Ok(()), Err)
    }
}

// ── MockPower ─────────────────────────────────────────────────

/// Status pin playback plus a press recorder.
pub struct MockPower {
    /// Sensed states, consumed in order.
    pub script: VecDeque<Result<PowerState, ActuatorError>>,
    /// Returned once the script is exhausted.
    pub steady: Result<PowerState, ActuatorError>,
    pub senses: usize,
    pub presses: Vec<(PressKind, u32)>,
    pub press_error: Option<ActuatorError>,
}

#[allow(dead_code)]
impl MockPower {
    pub fn steady(state: PowerState) -> Self {
        Self::scripted(&[], Ok(state))
    }

    pub fn broken() -> Self {
        Self::scripted(&[], Err(ActuatorError::GpioReadFailed))
    }

    pub fn scripted(
        script: &[Result<PowerState, ActuatorError>],
        steady: Result<PowerState, ActuatorError>,
    ) -> Self {
        Self {
            script: script.iter().copied().collect(),
            steady,
            senses: 0,
            presses: Vec::new(),
            press_error: None,
        }
    }

    /// On for the first `on_reads` samples, off afterwards.
    pub fn shuts_down_after(on_reads: usize) -> Self {
        let script = vec![Ok(PowerState::On); on_reads];
        Self::scripted(&script, Ok(PowerState::Off))
    }

    pub fn press_kinds(&self) -> Vec<PressKind> {
        self.presses.iter().map(|(k, _)| *k).collect()
    }
}

impl PowerPort for MockPower {
    fn sense(&mut self) -> Result<PowerState, ActuatorError> {
        self.senses += 1;
        self.script.pop_front().unwrap_or(self.steady)
    }

    fn press(&mut self, kind: PressKind, hold_ms: u32) -> Result<(), ActuatorError> {
        self.presses.push((kind, hold_ms));
        self.press_error.map_or(Ok(()), Err)
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Virtual clock: delays advance time instantly.
#[derive(Default)]
pub struct MockClock {
    pub now: u64,
    pub delays: Vec<u32>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(now: u64) -> Self {
        Self {
            now,
            delays: Vec::new(),
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl ClockPort for MockClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.now += u64::from(ms);
    }
}

// ── MockClockSync ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockClockSync {
    pub calls: usize,
    pub script: VecDeque<Result<(), CommsError>>,
}

impl ClockSyncPort for MockClockSync {
    fn sync(&mut self) -> Result<(), CommsError> {
        self.calls += 1;
        self.script.pop_front().unwrap_or(Ok(()))
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink that keeps every event.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
