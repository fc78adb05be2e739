//! Poll loop.
//!
//! [`Agent`] owns the application service, every port, and the scheduler,
//! and runs them on one thread:
//!
//! ```text
//! boot:  clock sync ─▶ prime gate
//! loop:  Scheduler::tick ─▶ ClockSync    ─▶ ClockSyncPort::sync
//!                        └▶ MessageCheck ─▶ AppService::poll
//!        sleep until the next task is due
//! ```
//!
//! While a command runs (up to ~37 s for a restart that times out) the loop
//! does nothing else; a clock sync that came due meanwhile runs on the
//! next pass.

use log::{info, warn};

use crate::app::events::{AppEvent, CommandOutcome};
use crate::app::ports::{
    ChannelPort, ClockPort, ClockSyncPort, EventSink, PowerPort, SchedulerDelegate, TaskKind,
};
use crate::app::service::AppService;
use crate::config::AgentConfig;
use crate::scheduler::Scheduler;

/// Upper bound on one idle sleep, so a stalled clock cannot park the loop.
const MAX_IDLE_MS: u64 = 100;

/// The ports the agent drives.
pub struct Ports<Ch, Hw, Clk, Sync, Sink> {
    pub channel: Ch,
    pub hw: Hw,
    pub clock: Clk,
    pub clock_sync: Sync,
    pub sink: Sink,
}

/// Everything except the scheduler, so the scheduler can borrow it as its
/// delegate.
struct Runtime<Ch, Hw, Clk, Sync, Sink> {
    app: AppService,
    ports: Ports<Ch, Hw, Clk, Sync, Sink>,
    last_outcome: Option<CommandOutcome>,
}

/// The single-threaded power-switch agent.
pub struct Agent<Ch, Hw, Clk, Sync, Sink> {
    scheduler: Scheduler,
    runtime: Runtime<Ch, Hw, Clk, Sync, Sink>,
}

impl<Ch, Hw, Clk, Sync, Sink> Agent<Ch, Hw, Clk, Sync, Sink>
where
    Ch: ChannelPort,
    Hw: PowerPort,
    Clk: ClockPort,
    Sync: ClockSyncPort,
    Sink: EventSink,
{
    pub fn new(config: &AgentConfig, ports: Ports<Ch, Hw, Clk, Sync, Sink>) -> Self {
        Self {
            scheduler: Scheduler::new(&config.timing),
            runtime: Runtime {
                app: AppService::new(config),
                ports,
                last_outcome: None,
            },
        }
    }

    /// Sync the wall clock and prime the gate.  Call once before running.
    pub fn boot(&mut self) {
        self.runtime.sync_clock();
        let now = self.runtime.ports.clock.now_ms();
        self.scheduler.mark_ran(TaskKind::ClockSync, now);

        let Ports { channel, sink, .. } = &mut self.runtime.ports;
        self.runtime.app.prime(channel, sink);
        info!("Agent booted");
    }

    /// One pass of the loop: run whatever is due.
    ///
    /// Returns the outcome of the command executed in this pass, if any.
    pub fn run_once(&mut self) -> Option<CommandOutcome> {
        self.runtime.last_outcome = None;
        self.scheduler.tick(&mut self.runtime);
        self.runtime.last_outcome.take()
    }

    /// Run forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.run_once();
            let idle = self
                .scheduler
                .idle_ms(self.runtime.ports.clock.now_ms())
                .min(MAX_IDLE_MS);
            if idle > 0 {
                self.runtime.ports.clock.delay_ms(idle as u32);
            }
        }
    }

    pub fn app(&self) -> &AppService {
        &self.runtime.app
    }

    pub fn ports(&self) -> &Ports<Ch, Hw, Clk, Sync, Sink> {
        &self.runtime.ports
    }

    pub fn ports_mut(&mut self) -> &mut Ports<Ch, Hw, Clk, Sync, Sink> {
        &mut self.runtime.ports
    }
}

impl<Ch, Hw, Clk, Sync, Sink> Runtime<Ch, Hw, Clk, Sync, Sink>
where
    Ch: ChannelPort,
    Hw: PowerPort,
    Clk: ClockPort,
    Sync: ClockSyncPort,
    Sink: EventSink,
{
    fn sync_clock(&mut self) {
        match self.ports.clock_sync.sync() {
            Ok(()) => {
                info!("Wall clock synced");
                self.ports.sink.emit(&AppEvent::ClockSynced);
            }
            Err(e) => {
                warn!("Wall clock sync failed: {}", e);
                self.ports.sink.emit(&AppEvent::ClockSyncFailed(e));
            }
        }
    }
}

impl<Ch, Hw, Clk, Sync, Sink> SchedulerDelegate for Runtime<Ch, Hw, Clk, Sync, Sink>
where
    Ch: ChannelPort,
    Hw: PowerPort,
    Clk: ClockPort,
    Sync: ClockSyncPort,
    Sink: EventSink,
{
    fn now_ms(&self) -> u64 {
        self.ports.clock.now_ms()
    }

    fn on_task_due(&mut self, task: TaskKind) {
        match task {
            TaskKind::ClockSync => self.sync_clock(),
            TaskKind::MessageCheck => {
                let Ports {
                    channel,
                    hw,
                    clock,
                    sink,
                    ..
                } = &mut self.ports;
                self.last_outcome = self.app.poll(channel, hw, clock, sink);
            }
        }
    }
}
