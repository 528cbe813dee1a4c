//! Single-shot, cancellable timers.
//!
//! The core never sleeps. It asks a [`Scheduler`] to deliver a [`TimerId`]
//! after a delay, and the host hands the id back to
//! [`App::on_timer_fired`](crate::App::on_timer_fired) when it is due.
//! Each component keeps its handle in a [`TimerSlot`], which cancels the
//! previous handle before arming a new one, so at most one timer per slot is
//! ever live and a stale firing is recognised and ignored.

mod manual;
mod tokio_scheduler;

pub use manual::ManualScheduler;
pub use tokio_scheduler::TokioScheduler;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Opaque handle of one scheduled firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// What a timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    /// Inactivity while a task is revealed.
    Nudge,
    /// Absence long enough to rescue the user.
    Rescue,
}

pub trait Scheduler {
    /// Schedule one firing of `kind` after `after`. Never repeats.
    fn schedule(&mut self, kind: TimerKind, after: Duration) -> TimerId;

    /// Cancel a pending firing. Unknown or already fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Holder for the single live timer of one kind.
#[derive(Debug)]
pub struct TimerSlot {
    kind: TimerKind,
    armed: Option<TimerId>,
}

impl TimerSlot {
    pub fn new(kind: TimerKind) -> Self {
        Self { kind, armed: None }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn armed(&self) -> Option<TimerId> {
        self.armed
    }

    /// Cancel any pending timer, then schedule a new one.
    pub fn arm(&mut self, scheduler: &mut dyn Scheduler, after: Duration) -> TimerId {
        self.disarm(scheduler);
        let id = scheduler.schedule(self.kind, after.max(Duration::zero()));
        self.armed = Some(id);
        id
    }

    pub fn disarm(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(id) = self.armed.take() {
            scheduler.cancel(id);
        }
    }

    /// Consume a firing. Returns true only for the currently armed id, which
    /// is cleared so the same arm can never fire twice.
    pub fn fire(&mut self, id: TimerId) -> bool {
        if self.armed == Some(id) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}
