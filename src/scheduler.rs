//! Poll-loop scheduler.
//!
//! Two periodic tasks share the single thread: the message check (every
//! second by default) and the wall-clock re-sync (daily).  The scheduler
//! only keeps the interval bookkeeping and notifies a
//! [`SchedulerDelegate`] when a task is due; the delegate does the work.
//!
//! ```text
//! loop ──▶ Scheduler::tick ──▶ ClockSync due?     ──▶ delegate.on_task_due
//!                         └──▶ MessageCheck due?  ──▶ delegate.on_task_due
//! ```
//!
//! A task's interval is measured from the moment its previous run
//! *finished*, so a long command (a 30 s restart) pushes the next message
//! check back instead of queueing a burst of catch-up polls.  Tasks are
//! checked in a fixed order, one pass per tick; nothing runs concurrently.

use log::debug;

use crate::app::ports::{SchedulerDelegate, TaskKind};
use crate::config::TimingConfig;

/// Interval bookkeeping for one periodic task.
#[derive(Debug, Clone, Copy)]
struct IntervalTask {
    kind: TaskKind,
    interval_ms: u64,
    last_run_ms: u64,
}

impl IntervalTask {
    fn new(kind: TaskKind, interval_ms: u32) -> Self {
        Self {
            kind,
            interval_ms: u64::from(interval_ms),
            last_run_ms: 0,
        }
    }

    /// Strictly more than one interval since the last run finished.
    fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_run_ms) > self.interval_ms
    }
}

/// The poll-loop scheduler.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Checked in order on every tick.
    tasks: [IntervalTask; 2],
}

impl Scheduler {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            tasks: [
                IntervalTask::new(TaskKind::ClockSync, timing.clock_sync_interval_ms),
                IntervalTask::new(TaskKind::MessageCheck, timing.poll_interval_ms),
            ],
        }
    }

    /// Record that `kind` just ran outside the scheduler (e.g. the boot-time
    /// clock sync).
    pub fn mark_ran(&mut self, kind: TaskKind, now_ms: u64) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.kind == kind) {
            task.last_run_ms = now_ms;
        }
    }

    /// Run every due task once.  Returns how many ran.
    pub fn tick(&mut self, delegate: &mut impl SchedulerDelegate) -> usize {
        let mut ran = 0;
        for task in &mut self.tasks {
            if !task.is_due(delegate.now_ms()) {
                continue;
            }
            debug!("Scheduler: {:?} due", task.kind);
            delegate.on_task_due(task.kind);
            task.last_run_ms = delegate.now_ms();
            ran += 1;
        }
        ran
    }

    /// Milliseconds until the next task is due (0 if one already is).
    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        self.tasks
            .iter()
            .map(|t| (t.last_run_ms + t.interval_ms + 1).saturating_sub(now_ms))
            .min()
            .unwrap_or(0)
    }
}
