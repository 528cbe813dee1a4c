use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::SharedClock;
use crate::error::{Result, TransitionError};
use crate::events::{Signal, SignalSink};
use crate::timer::{Scheduler, TimerId, TimerKind, TimerSlot};
use crate::vault::{Task, TaskStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "task", rename_all = "lowercase")]
pub enum EngagementState {
    /// No task surfaced.
    Idle,
    /// A reveal was requested with nothing queued.
    Empty,
    /// One task shown; nudge timer armed.
    Revealing(Task),
    /// User is working the task; nudge timer disarmed.
    Engaged(Task),
}

impl EngagementState {
    pub fn name(&self) -> &'static str {
        match self {
            EngagementState::Idle => "idle",
            EngagementState::Empty => "empty",
            EngagementState::Revealing(_) => "revealing",
            EngagementState::Engaged(_) => "engaged",
        }
    }

    pub fn task(&self) -> Option<&Task> {
        match self {
            EngagementState::Revealing(task) | EngagementState::Engaged(task) => Some(task),
            EngagementState::Idle | EngagementState::Empty => None,
        }
    }
}

/// How a reveal cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// `completion_count` is `None` when the task was already gone.
    Completed { completion_count: Option<u64> },
    /// `next` is the task revealed by the chained reveal.
    Deferred {
        position: Option<usize>,
        next: Option<Task>,
    },
}

/// Collaborators a transition may touch besides the vault.
pub struct Effects<'a> {
    pub scheduler: &'a mut dyn Scheduler,
    pub sink: &'a mut dyn SignalSink,
}

impl<'a> Effects<'a> {
    pub fn new(scheduler: &'a mut dyn Scheduler, sink: &'a mut dyn SignalSink) -> Self {
        Self { scheduler, sink }
    }
}

pub struct EngagementMachine {
    state: EngagementState,
    nudge: TimerSlot,
    nudge_after: Duration,
    prompt_visible: bool,
    clock: SharedClock,
}

impl EngagementMachine {
    pub fn new(clock: SharedClock, nudge_after: Duration) -> Self {
        Self {
            state: EngagementState::Idle,
            nudge: TimerSlot::new(TimerKind::Nudge),
            nudge_after,
            prompt_visible: false,
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &EngagementState {
        &self.state
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.state.task()
    }

    pub fn nudge_armed(&self) -> bool {
        self.nudge.is_armed()
    }

    pub fn nudge_prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    pub fn nudge_after(&self) -> Duration {
        self.nudge_after
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Surface the head of the queue. Allowed from every state except
    /// `Engaged`; from `Revealing` it re-reveals the current head.
    pub fn request_reveal(&mut self, vault: &TaskStore, fx: &mut Effects<'_>) -> Result<Option<Task>> {
        self.refuse_if_engaged("reveal")?;
        self.show_head(vault, fx)
    }

    /// Surface a specific queued task. Returns `Ok(false)` if it is not queued.
    pub fn reveal_task(&mut self, vault: &TaskStore, id: &str, fx: &mut Effects<'_>) -> Result<bool> {
        self.refuse_if_engaged("reveal")?;
        match vault.get(id)? {
            Some(task) => {
                self.enter_revealing(task, fx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn start(&mut self, fx: &mut Effects<'_>) -> Result<Task> {
        let EngagementState::Revealing(task) = &self.state else {
            return Err(self.refuse("start"));
        };
        let task = task.clone();
        self.disarm_nudge(fx);
        self.state = EngagementState::Engaged(task.clone());
        debug!(task = %task.id, "engaged");
        fx.sink.emit(Signal::TaskEngaged {
            task: task.clone(),
            at: self.clock.now(),
        });
        Ok(task)
    }

    /// Stop working without finishing; the task is shown again.
    pub fn release(&mut self, fx: &mut Effects<'_>) -> Result<Task> {
        let EngagementState::Engaged(task) = &self.state else {
            return Err(self.refuse("release"));
        };
        let task = task.clone();
        self.enter_revealing(task.clone(), fx);
        Ok(task)
    }

    pub fn complete(&mut self, vault: &mut TaskStore, fx: &mut Effects<'_>) -> Result<Resolution> {
        let task = match &self.state {
            EngagementState::Revealing(task) | EngagementState::Engaged(task) => task.clone(),
            _ => return Err(self.refuse("complete")),
        };
        let completion_count = vault.complete(&task.id)?;

        self.disarm_nudge(fx);
        self.state = EngagementState::Idle;
        if let Some(count) = completion_count {
            fx.sink.emit(Signal::RewardFired {
                completion_count: count,
                at: self.clock.now(),
            });
        }
        Ok(Resolution::Completed { completion_count })
    }

    /// Push the revealed task back and immediately reveal the new head.
    pub fn defer(&mut self, vault: &mut TaskStore, fx: &mut Effects<'_>) -> Result<Resolution> {
        let EngagementState::Revealing(task) = &self.state else {
            return Err(self.refuse("defer"));
        };
        let id = task.id.clone();
        let position = vault.defer(&id)?;

        self.disarm_nudge(fx);
        self.state = EngagementState::Idle;
        let next = if vault.is_empty()? {
            None
        } else {
            self.show_head(vault, fx)?
        };
        Ok(Resolution::Deferred { position, next })
    }

    /// Any user interaction on the reveal screen restarts the quiet period,
    /// unless the nudge prompt is up and waiting to be dismissed.
    pub fn interact(&mut self, fx: &mut Effects<'_>) -> bool {
        if !matches!(self.state, EngagementState::Revealing(_)) || self.prompt_visible {
            return false;
        }
        self.nudge.arm(fx.scheduler, self.nudge_after);
        true
    }

    /// Hide the nudge prompt and start the quiet period again.
    pub fn dismiss_nudge(&mut self, fx: &mut Effects<'_>) -> bool {
        if !matches!(self.state, EngagementState::Revealing(_)) {
            return false;
        }
        self.prompt_visible = false;
        self.nudge.arm(fx.scheduler, self.nudge_after);
        true
    }

    /// Navigate away from whatever is shown.
    pub fn leave(&mut self, fx: &mut Effects<'_>) {
        self.disarm_nudge(fx);
        self.state = EngagementState::Idle;
    }

    /// Deliver a due timer. Returns true if it was this machine's live nudge.
    pub fn on_timer_fired(&mut self, id: TimerId, fx: &mut Effects<'_>) -> bool {
        if !self.nudge.fire(id) {
            return false;
        }
        if !matches!(self.state, EngagementState::Revealing(_)) {
            return false;
        }
        self.prompt_visible = true;
        debug!("nudge fired");
        fx.sink.emit(Signal::NudgeFired {
            at: self.clock.now(),
        });
        true
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn show_head(&mut self, vault: &TaskStore, fx: &mut Effects<'_>) -> Result<Option<Task>> {
        match vault.peek_next()? {
            Some(task) => {
                self.enter_revealing(task.clone(), fx);
                Ok(Some(task))
            }
            None => {
                self.disarm_nudge(fx);
                self.state = EngagementState::Empty;
                debug!("reveal requested with empty vault");
                fx.sink.emit(Signal::TaskEmpty {
                    at: self.clock.now(),
                });
                Ok(None)
            }
        }
    }

    fn enter_revealing(&mut self, task: Task, fx: &mut Effects<'_>) {
        self.prompt_visible = false;
        self.nudge.arm(fx.scheduler, self.nudge_after);
        debug!(task = %task.id, "revealing");
        self.state = EngagementState::Revealing(task.clone());
        fx.sink.emit(Signal::TaskRevealed {
            task,
            at: self.clock.now(),
        });
    }

    fn disarm_nudge(&mut self, fx: &mut Effects<'_>) {
        self.prompt_visible = false;
        self.nudge.disarm(fx.scheduler);
    }

    fn refuse(&self, action: &'static str) -> crate::error::CoreError {
        TransitionError {
            action,
            state: self.state.name(),
        }
        .into()
    }

    fn refuse_if_engaged(&self, action: &'static str) -> Result<()> {
        if matches!(self.state, EngagementState::Engaged(_)) {
            return Err(self.refuse(action));
        }
        Ok(())
    }
}
