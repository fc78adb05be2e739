//! Integration tests for the fetch → gate → interpret → power-sequence
//! pipeline of [`AppService`], against mock ports.

use powerswitch::app::commands::Command;
use powerswitch::app::events::{AppEvent, CommandOutcome, Notification};
use powerswitch::app::gate::RejectReason;
use powerswitch::app::power::{PowerState, PressKind};
use powerswitch::app::replies;
use powerswitch::app::service::AppService;
use powerswitch::error::{ActuatorError, TransportError};

use crate::mock_hw::{
    CHANNEL, EYES, MockChannel, MockClock, MockPower, RecordingSink, config, msg, op_msg,
};

struct Rig {
    app: AppService,
    channel: MockChannel,
    hw: MockPower,
    clock: MockClock,
    sink: RecordingSink,
    next_id: u64,
}

impl Rig {
    /// Service primed on an empty channel.
    fn new(hw: MockPower) -> Self {
        let mut rig = Self {
            app: AppService::new(&config()),
            channel: MockChannel::new(),
            hw,
            clock: MockClock::default(),
            sink: RecordingSink::new(),
            next_id: 1_000,
        };
        rig.app.prime(&mut rig.channel, &mut rig.sink);
        rig
    }

    fn poll(&mut self) -> Option<CommandOutcome> {
        self.app
            .poll(&mut self.channel, &mut self.hw, &mut self.clock, &mut self.sink)
    }

    /// The operator posts `text`; the agent polls once.
    fn send(&mut self, text: &str) -> Option<CommandOutcome> {
        self.next_id += 1;
        self.channel.post(op_msg(&self.next_id.to_string(), text));
        self.poll()
    }
}

// ── ON / OFF ──────────────────────────────────────────────────

#[test]
fn on_when_off_presses_once_and_says_powering_on() {
    let mut rig = Rig::new(MockPower::steady(PowerState::Off));

    assert_eq!(rig.send("!on"), Some(CommandOutcome::PoweringOn));

    assert_eq!(rig.hw.presses, [(PressKind::Momentary, 1_000)]);
    assert_eq!(rig.channel.reply_texts(), [replies::POWERING_ON]);
    assert_eq!(rig.channel.reacts, [("1001".to_string(), EYES.to_string())]);
}

#[test]
fn on_when_on_only_replies() {
    let mut rig = Rig::new(MockPower::steady(PowerState::On));

    assert_eq!(rig.send("!on"), Some(CommandOutcome::AlreadyOn));

    assert!(rig.hw.presses.is_empty());
    assert_eq!(rig.channel.reply_texts(), [replies::ALREADY_ON]);
}

#[test]
fn off_when_on_presses_once_and_says_powering_off() {
    let mut rig = Rig::new(MockPower::steady(PowerState::On));

    assert_eq!(rig.send("!off"), Some(CommandOutcome::PoweringOff));

    assert_eq!(rig.hw.press_kinds(), [PressKind::Momentary]);
    assert_eq!(rig.channel.reply_texts(), [replies::POWERING_OFF]);
}

#[test]
fn off_when_off_only_replies() {
    let mut rig = Rig::new(MockPower::steady(PowerState::Off));

    assert_eq!(rig.send("!off"), Some(CommandOutcome::AlreadyOff));

    assert!(rig.hw.presses.is_empty());
    assert_eq!(rig.channel.reply_texts(), [replies::ALREADY_OFF]);
}

#[test]
fn replies_reference_the_command_message() {
    let mut rig = Rig::new(MockPower::steady(PowerState::Off));
    rig.send("!status");

    let (message_id, channel_id, _) = &rig.channel.replies[0];
    assert_eq!(message_id, "1001");
    assert_eq!(channel_id, CHANNEL);
}

// ── RESTART ───────────────────────────────────────────────────

#[test]
fn restart_waits_for_power_loss_then_powers_on() {
    // One decision sample, then five more "on" ticks before the host drops.
    let mut rig = Rig::new(MockPower::shuts_down_after(1 + 5));

    assert_eq!(
        rig.send("!restart"),
        Some(CommandOutcome::Restarted { waited_ticks: 5 })
    );

    assert_eq!(rig.hw.press_kinds(), [PressKind::Momentary, PressKind::Momentary]);
    assert_eq!(
        rig.channel.reply_texts(),
        [replies::POWERING_OFF, replies::POWERING_ON]
    );
    assert_eq!(rig.clock.delays, [1_000; 5]);
}

#[test]
fn restart_accepts_power_loss_on_the_last_tick() {
    let mut rig = Rig::new(MockPower::shuts_down_after(1 + 30));

    assert_eq!(
        rig.send("!restart"),
        Some(CommandOutcome::Restarted { waited_ticks: 30 })
    );
    assert_eq!(rig.hw.presses.len(), 2);
    assert_eq!(rig.clock.delays.len(), 30);
}

#[test]
fn restart_that_never_powers_off_is_abandoned_after_one_press() {
    let mut rig = Rig::new(MockPower::steady(PowerState::On));

    assert_eq!(rig.send("!restart"), Some(CommandOutcome::RestartTimedOut));

    assert_eq!(rig.hw.press_kinds(), [PressKind::Momentary]);
    assert_eq!(
        rig.channel.reply_texts(),
        [replies::POWERING_OFF, replies::NOT_OFF_IN_TIME]
    );
    assert_eq!(rig.clock.delays.iter().map(|d| u64::from(*d)).sum::<u64>(), 30_000);
}

#[test]
fn restart_from_off_just_powers_on() {
    let mut rig = Rig::new(MockPower::steady(PowerState::Off));

    assert_eq!(
        rig.send("!restart"),
        Some(CommandOutcome::Restarted { waited_ticks: 0 })
    );
    assert_eq!(rig.hw.press_kinds(), [PressKind::Momentary]);
    assert_eq!(rig.channel.reply_texts(), [replies::POWERING_ON]);
    assert!(rig.clock.delays.is_empty());
}

#[test]
fn sense_errors_during_restart_wait_count_as_still_on() {
    let script = [
        Ok(PowerState::On),
        Err(ActuatorError::GpioReadFailed),
        Err(ActuatorError::GpioReadFailed),
    ];
    let mut rig = Rig::new(MockPower::scripted(&script, Ok(PowerState::Off)));

    assert_eq!(
        rig.send("!restart"),
        Some(CommandOutcome::Restarted { waited_ticks: 2 })
    );
}

// ── STATUS / FORCE_OFF / INVALID ──────────────────────────────

#[test]
fn status_reports_sensed_state() {
    let mut rig = Rig::new(MockPower::steady(PowerState::On));
    assert_eq!(
        rig.send("!status"),
        Some(CommandOutcome::StatusReported(PowerState::On))
    );
    rig.hw.steady = Ok(PowerState::Off);
    rig.send("!status");

    assert_eq!(rig.channel.reply_texts(), ["The power is on.", "The power is off."]);
    assert_eq!(rig.channel.reacts.len(), 2);
    assert!(rig.hw.presses.is_empty());
}

#[test]
fn force_off_always_holds_the_button_without_reacting() {
    for hw in [
        MockPower::steady(PowerState::On),
        MockPower::steady(PowerState::Off),
        MockPower::broken(),
    ] {
        let mut rig = Rig::new(hw);

        assert_eq!(rig.send("!force-off"), Some(CommandOutcome::ForcedOff));

        assert_eq!(rig.hw.presses, [(PressKind::Hard, 5_000)]);
        assert_eq!(rig.channel.reply_texts(), [replies::FORCING_OFF]);
        assert!(rig.channel.reacts.is_empty());
        assert_eq!(rig.hw.senses, 0);
    }
}

#[test]
fn unrecognised_text_does_nothing() {
    let mut rig = Rig::new(MockPower::steady(PowerState::Off));

    assert_eq!(rig.send("!ON"), Some(CommandOutcome::Ignored));
    assert_eq!(rig.send("hello"), Some(CommandOutcome::Ignored));

    assert!(rig.hw.presses.is_empty());
    assert!(rig.channel.replies.is_empty());
    assert!(rig.channel.reacts.is_empty());
    assert_eq!(rig.app.commands_handled(), 0);
}

// ── Idempotence & gate ────────────────────────────────────────

#[test]
fn repeated_polls_of_one_message_actuate_once() {
    let mut rig = Rig::new(MockPower::steady(PowerState::Off));

    rig.send("!on");
    for _ in 0..5 {
        assert_eq!(rig.poll(), None);
    }

    assert_eq!(rig.hw.presses.len(), 1);
    assert_eq!(rig.channel.replies.len(), 1);
    assert_eq!(rig.app.commands_handled(), 1);
}

#[test]
fn stranger_is_skipped_once_and_never_actuates() {
    let mut rig = Rig::new(MockPower::steady(PowerState::On));
    rig.channel.post(msg("555", "999", CHANNEL, "!force-off"));

    assert_eq!(rig.poll(), None);
    assert_eq!(rig.poll(), None);

    assert!(rig.hw.presses.is_empty());
    assert_eq!(
        rig.sink.events.iter().filter(|e| matches!(e, AppEvent::MessageSkipped { .. })).count(),
        1
    );
    assert!(rig.sink.events.contains(&AppEvent::MessageSkipped {
        message_id: "555".into(),
        reason: RejectReason::NotAdmin,
    }));

    // The operator is still heard afterwards.
    assert_eq!(rig.send("!status"), Some(CommandOutcome::StatusReported(PowerState::On)));
}

#[test]
fn message_present_at_boot_is_not_executed() {
    let mut rig = Rig::new(MockPower::steady(PowerState::Off));
    let mut channel = MockChannel::with_latest(op_msg("41", "!on"));
    let mut app = AppService::new(&config());
    app.prime(&mut channel, &mut rig.sink);

    assert_eq!(app.poll(&mut channel, &mut rig.hw, &mut rig.clock, &mut rig.sink), None);
    assert!(rig.hw.presses.is_empty());
    assert!(rig.sink.events.contains(&AppEvent::Primed {
        last_seen: Some("41".into())
    }));
}

#[test]
fn failed_priming_swallows_the_first_message() {
    let mut channel = MockChannel::with_latest(op_msg("41", "!force-off"));
    channel.fail_next_fetch(TransportError::Status(503));
    let mut hw = MockPower::steady(PowerState::On);
    let mut clock = MockClock::default();
    let mut sink = RecordingSink::new();
    let mut app = AppService::new(&config());

    app.prime(&mut channel, &mut sink);
    assert!(app.cursor().is_awaiting_prime());
    assert_eq!(sink.events, [AppEvent::FetchFailed(TransportError::Status(503))]);

    assert_eq!(app.poll(&mut channel, &mut hw, &mut clock, &mut sink), None);
    assert!(hw.presses.is_empty());
    assert!(sink.events.contains(&AppEvent::Primed {
        last_seen: Some("41".into())
    }));

    channel.post(op_msg("42", "!off"));
    assert_eq!(
        app.poll(&mut channel, &mut hw, &mut clock, &mut sink),
        Some(CommandOutcome::PoweringOff)
    );
}

#[test]
fn empty_channel_after_failed_priming_completes_the_prime() {
    let mut channel = MockChannel::new();
    channel.fail_next_fetch(TransportError::Status(503));
    let mut hw = MockPower::steady(PowerState::Off);
    let mut clock = MockClock::default();
    let mut sink = RecordingSink::new();
    let mut app = AppService::new(&config());

    app.prime(&mut channel, &mut sink);
    assert!(app.cursor().is_awaiting_prime());

    assert_eq!(app.poll(&mut channel, &mut hw, &mut clock, &mut sink), None);
    assert!(!app.cursor().is_awaiting_prime());
    assert!(sink.events.contains(&AppEvent::Primed { last_seen: None }));

    channel.post(op_msg("42", "!on"));
    assert_eq!(
        app.poll(&mut channel, &mut hw, &mut clock, &mut sink),
        Some(CommandOutcome::PoweringOn)
    );
    assert_eq!(hw.press_kinds(), [PressKind::Momentary]);
}

#[test]
fn fetch_errors_keep_a_deferred_prime_pending() {
    let mut channel = MockChannel::with_latest(op_msg("41", "!on"));
    channel.fail_next_fetch(TransportError::Status(503));
    channel.fail_next_fetch(TransportError::NotConnected);
    let mut hw = MockPower::steady(PowerState::Off);
    let mut clock = MockClock::default();
    let mut sink = RecordingSink::new();
    let mut app = AppService::new(&config());

    app.prime(&mut channel, &mut sink);
    assert_eq!(app.poll(&mut channel, &mut hw, &mut clock, &mut sink), None);
    assert!(app.cursor().is_awaiting_prime());

    assert_eq!(app.poll(&mut channel, &mut hw, &mut clock, &mut sink), None);
    assert!(!app.cursor().is_awaiting_prime());
    assert!(hw.presses.is_empty());
}

// ── Degraded collaborators ────────────────────────────────────

#[test]
fn lost_notifications_do_not_stop_the_press() {
    let mut rig = Rig::new(MockPower::steady(PowerState::Off));
    rig.channel.react_error = Some(TransportError::NotConnected);
    rig.channel.reply_error = Some(TransportError::Status(500));

    assert_eq!(rig.send("!on"), Some(CommandOutcome::PoweringOn));

    assert_eq!(rig.hw.presses.len(), 1);
    assert!(rig.sink.events.contains(&AppEvent::NotificationLost {
        kind: Notification::Reaction,
        error: TransportError::NotConnected,
    }));
    assert!(rig.sink.events.contains(&AppEvent::NotificationLost {
        kind: Notification::Reply,
        error: TransportError::Status(500),
    }));
}

#[test]
fn unreadable_status_pin_replies_and_never_presses() {
    let mut rig = Rig::new(MockPower::broken());

    for cmd in ["!on", "!off", "!restart", "!status"] {
        assert_eq!(rig.send(cmd), Some(CommandOutcome::SenseFailed), "{cmd}");
    }

    assert!(rig.hw.presses.is_empty());
    assert_eq!(rig.channel.reply_texts(), [replies::SENSE_FAILED; 4]);
}

#[test]
fn failed_press_is_reported_not_retried() {
    let mut rig = Rig::new(MockPower::steady(PowerState::Off));
    rig.hw.press_error = Some(ActuatorError::GpioWriteFailed);

    assert_eq!(rig.send("!on"), Some(CommandOutcome::PoweringOn));

    assert_eq!(rig.hw.presses.len(), 1);
    assert!(rig.sink.events.contains(&AppEvent::PressFailed {
        kind: PressKind::Momentary,
        error: ActuatorError::GpioWriteFailed,
    }));
}

#[test]
fn fetch_failure_is_treated_as_no_message() {
    let mut rig = Rig::new(MockPower::steady(PowerState::Off));
    rig.channel.fail_next_fetch(TransportError::Request(-1));

    assert_eq!(rig.poll(), None);
    assert!(rig.sink.events.contains(&AppEvent::FetchFailed(TransportError::Request(-1))));
}

#[test]
fn admitted_commands_are_announced_and_completed() {
    let mut rig = Rig::new(MockPower::steady(PowerState::Off));
    rig.send("!status");

    assert!(rig.sink.events.contains(&AppEvent::CommandAdmitted {
        message_id: "1001".into(),
        command: Command::Status,
    }));
    assert!(rig.sink.events.contains(&AppEvent::CommandCompleted {
        command: Command::Status,
        outcome: CommandOutcome::StatusReported(PowerState::Off),
    }));
}
