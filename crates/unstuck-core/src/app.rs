//! The coordinator that owns every component and routes lifecycle events,
//! user commands and timer firings to them.
//!
//! Hosts create one `App`, call [`App::launch`] right away, and afterwards
//! forward foreground/background transitions and due timers. Signals for the
//! UI collect in the sink.

use chrono::Duration;
use tracing::{debug, info};

use crate::clock::SharedClock;
use crate::engagement::{Effects, EngagementMachine, EngagementState, Resolution};
use crate::error::{CoreError, Result};
use crate::events::{Signal, SignalSink};
use crate::limits::AppLimits;
use crate::rescue::{AwayOutcome, AwayTracker, DispatchOutcome, Notifier, RescueSettings};
use crate::storage::{Config, SharedStore};
use crate::summary::DailySummary;
use crate::timer::{ManualScheduler, Scheduler, TimerId};
use crate::vault::{Task, TaskStore};

/// What became of a lifecycle event or rescue timer.
#[derive(Debug, Clone, PartialEq)]
pub enum RescueOutcome {
    /// No rescue: nothing was pending, the user came back in time, or the
    /// absence is still below the threshold.
    NoRescue(AwayOutcome),
    /// The absence qualified but there was nothing to reveal.
    NothingQueued { away: Duration },
    /// The absence qualified and the user was pulled back to a task.
    Rescued {
        away: Duration,
        task: Task,
        dispatch: DispatchOutcome,
    },
}

impl RescueOutcome {
    pub fn rescued(&self) -> bool {
        matches!(self, RescueOutcome::Rescued { .. })
    }
}

/// Which component a due timer belonged to.
#[derive(Debug, Clone, PartialEq)]
pub enum Fired {
    Nudge,
    Rescue(RescueOutcome),
    /// Cancelled, superseded or unknown id.
    Stale,
}

pub struct App<S: Scheduler, K: SignalSink> {
    kv: SharedStore,
    clock: SharedClock,
    vault: TaskStore,
    machine: EngagementMachine,
    tracker: AwayTracker,
    notifier: Notifier,
    scheduler: S,
    sink: K,
}

impl<S: Scheduler, K: SignalSink> App<S, K> {
    /// Build with the default nudge period and a notifier that never alerts.
    pub fn new(kv: SharedStore, clock: SharedClock, scheduler: S, sink: K) -> Self {
        let nudge_after = Config::default().nudge_after();
        Self {
            vault: TaskStore::new(kv.clone(), clock.clone()),
            machine: EngagementMachine::new(clock.clone(), nudge_after),
            tracker: AwayTracker::new(kv.clone(), clock.clone()),
            notifier: Notifier::disabled(),
            kv,
            clock,
            scheduler,
            sink,
        }
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_nudge_after(mut self, nudge_after: Duration) -> Self {
        self.machine = EngagementMachine::new(self.clock.clone(), nudge_after);
        self
    }

    /// Deterministic defer positions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.vault = TaskStore::with_seed(self.kv.clone(), self.clock.clone(), seed);
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn state(&self) -> &EngagementState {
        self.machine.state()
    }

    pub fn engagement(&self) -> &EngagementMachine {
        &self.machine
    }

    pub fn vault(&self) -> &TaskStore {
        &self.vault
    }

    pub fn tracker(&self) -> &AwayTracker {
        &self.tracker
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn limits(&self) -> AppLimits {
        AppLimits::new(self.kv.clone())
    }

    pub fn summary(&self) -> Result<DailySummary> {
        DailySummary::build(&self.vault)
    }

    pub fn rescue_settings(&self) -> Result<RescueSettings> {
        self.tracker.settings()
    }

    // ── Vault ────────────────────────────────────────────────────────

    pub fn enqueue(&mut self, text: &str) -> Result<Task> {
        self.vault.enqueue(text)
    }

    /// Remove a pending task. Deleting the task on screen returns to idle.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let removed = self.vault.delete(id)?;
        if removed && self.machine.current_task().is_some_and(|t| t.id == id) {
            let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
            self.machine.leave(&mut fx);
        }
        Ok(removed)
    }

    // ── Engagement ───────────────────────────────────────────────────

    pub fn reveal(&mut self) -> Result<Option<Task>> {
        let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
        self.machine.request_reveal(&self.vault, &mut fx)
    }

    pub fn reveal_task(&mut self, id: &str) -> Result<bool> {
        let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
        self.machine.reveal_task(&self.vault, id, &mut fx)
    }

    pub fn start(&mut self) -> Result<Task> {
        let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
        self.machine.start(&mut fx)
    }

    pub fn release(&mut self) -> Result<Task> {
        let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
        self.machine.release(&mut fx)
    }

    pub fn complete(&mut self) -> Result<Resolution> {
        let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
        self.machine.complete(&mut self.vault, &mut fx)
    }

    pub fn defer(&mut self) -> Result<Resolution> {
        let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
        self.machine.defer(&mut self.vault, &mut fx)
    }

    pub fn interact(&mut self) -> bool {
        let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
        self.machine.interact(&mut fx)
    }

    pub fn dismiss_nudge(&mut self) -> bool {
        let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
        self.machine.dismiss_nudge(&mut fx)
    }

    pub fn leave(&mut self) {
        let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
        self.machine.leave(&mut fx);
    }

    // ── Rescue settings ──────────────────────────────────────────────

    pub fn set_rescue_enabled(&mut self, enabled: bool) -> Result<RescueSettings> {
        self.tracker.set_enabled(enabled, &mut self.scheduler)
    }

    pub fn set_rescue_delay(&mut self, minutes: f64) -> Result<RescueSettings> {
        self.tracker.set_delay(minutes)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Process start. Resolves any absence left behind by a previous run.
    pub fn launch(&mut self) -> Result<RescueOutcome> {
        debug!("launch");
        let outcome = self.tracker.reconcile(&mut self.scheduler)?;
        self.settle(outcome)
    }

    pub fn became_background(&mut self) -> Result<()> {
        self.tracker.became_background(&mut self.scheduler)
    }

    pub fn became_foreground(&mut self) -> Result<RescueOutcome> {
        let outcome = self.tracker.reconcile(&mut self.scheduler)?;
        self.settle(outcome)
    }

    /// Periodic check while the app may still be in the background.
    pub fn poll(&mut self) -> Result<RescueOutcome> {
        let outcome = self.tracker.poll(&mut self.scheduler)?;
        self.settle(outcome)
    }

    /// Hand a due timer back to whichever component armed it.
    pub fn on_timer_fired(&mut self, id: TimerId) -> Result<Fired> {
        let nudged = {
            let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
            self.machine.on_timer_fired(id, &mut fx)
        };
        if nudged {
            return Ok(Fired::Nudge);
        }
        match self.tracker.on_timer_fired(id)? {
            AwayOutcome::NotAway => Ok(Fired::Stale),
            outcome => Ok(Fired::Rescue(self.settle(outcome)?)),
        }
    }

    fn settle(&mut self, outcome: AwayOutcome) -> Result<RescueOutcome> {
        match outcome {
            AwayOutcome::Qualified { away } => self.trigger_rescue(away),
            other => Ok(RescueOutcome::NoRescue(other)),
        }
    }

    /// Pull the user back to a task. The absence is already resolved, so
    /// this runs at most once per absence.
    fn trigger_rescue(&mut self, away: Duration) -> Result<RescueOutcome> {
        if self.vault.is_empty()? {
            debug!("absence qualified but vault is empty");
            return Ok(RescueOutcome::NothingQueued { away });
        }

        self.sink.emit(Signal::RescueTriggered {
            away_ms: away.num_milliseconds(),
            at: self.clock.now(),
        });

        let engaged = match self.machine.state() {
            EngagementState::Engaged(task) => Some(task.clone()),
            _ => None,
        };
        let task = match engaged {
            // Already working on something; keep it.
            Some(task) => task,
            None => {
                let mut fx = Effects::new(&mut self.scheduler, &mut self.sink);
                self.machine
                    .request_reveal(&self.vault, &mut fx)?
                    .ok_or_else(|| CoreError::Custom("vault emptied during rescue".to_string()))?
            }
        };

        let dispatch = self.notifier.dispatch_rescue();
        info!(task = %task.id, away_ms = away.num_milliseconds(), ?dispatch, "rescue triggered");
        Ok(RescueOutcome::Rescued {
            away,
            task,
            dispatch,
        })
    }
}

impl<K: SignalSink> App<ManualScheduler, K> {
    /// Deliver every timer whose deadline has passed, earliest first.
    pub fn run_due_timers(&mut self) -> Result<Vec<Fired>> {
        let due = self.scheduler.take_due();
        let mut fired = Vec::with_capacity(due.len());
        for id in due {
            fired.push(self.on_timer_fired(id)?);
        }
        Ok(fired)
    }
}
