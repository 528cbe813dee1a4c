use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};

use super::{Scheduler, TimerId, TimerKind};
use crate::clock::{SharedClock, SystemClock};

#[derive(Debug, Clone, Copy)]
struct Pending {
    kind: TimerKind,
    deadline: DateTime<Utc>,
}

/// Scheduler driven by the caller: deadlines are computed from a clock and
/// nothing fires until [`ManualScheduler::take_due`] is called.
///
/// Used by tests with a `ManualClock`, and by one-shot CLI invocations where
/// no timer can outlive the process anyway.
pub struct ManualScheduler {
    clock: SharedClock,
    next_id: u64,
    pending: BTreeMap<TimerId, Pending>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::with_clock(Rc::new(SystemClock))
    }

    pub fn with_clock(clock: SharedClock) -> Self {
        Self {
            clock,
            next_id: 1,
            pending: BTreeMap::new(),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_kinds(&self) -> Vec<TimerKind> {
        self.pending.values().map(|p| p.kind).collect()
    }

    pub fn deadline(&self, id: TimerId) -> Option<DateTime<Utc>> {
        self.pending.get(&id).map(|p| p.deadline)
    }

    /// Remove and return every timer whose deadline has passed, earliest first.
    pub fn take_due(&mut self) -> Vec<TimerId> {
        let now = self.clock.now();
        let mut due: Vec<(DateTime<Utc>, TimerId)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(id, p)| (p.deadline, *id))
            .collect();
        due.sort();
        for (_, id) in &due {
            self.pending.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Drop every pending timer without firing, as a host OS does when it
    /// freezes or kills a backgrounded process.
    pub fn suspend(&mut self) {
        self.pending.clear();
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, kind: TimerKind, after: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self
            .clock
            .now()
            .checked_add_signed(after)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.pending.insert(id, Pending { kind, deadline });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn take_due_respects_deadlines() {
        let clock = Rc::new(ManualClock::new(Utc::now()));
        let mut scheduler = ManualScheduler::with_clock(clock.clone());
        let late = scheduler.schedule(TimerKind::Rescue, Duration::minutes(5));
        let early = scheduler.schedule(TimerKind::Nudge, Duration::minutes(2));

        assert!(scheduler.take_due().is_empty());
        clock.advance(Duration::minutes(2));
        assert_eq!(scheduler.take_due(), vec![early]);
        clock.advance(Duration::minutes(10));
        assert_eq!(scheduler.take_due(), vec![late]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn suspend_drops_everything() {
        let clock = Rc::new(ManualClock::new(Utc::now()));
        let mut scheduler = ManualScheduler::with_clock(clock.clone());
        scheduler.schedule(TimerKind::Rescue, Duration::minutes(5));
        scheduler.suspend();
        clock.advance(Duration::hours(1));
        assert!(scheduler.take_due().is_empty());
    }

    #[test]
    fn overflowing_deadline_saturates() {
        let clock = Rc::new(ManualClock::new(Utc::now()));
        let mut scheduler = ManualScheduler::with_clock(clock.clone());
        let id = scheduler.schedule(TimerKind::Rescue, Duration::MAX);
        assert_eq!(scheduler.deadline(id), Some(DateTime::<Utc>::MAX_UTC));
        clock.advance(Duration::days(365));
        assert!(scheduler.take_due().is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let clock = Rc::new(ManualClock::new(Utc::now()));
        let mut scheduler = ManualScheduler::with_clock(clock.clone());
        let id = scheduler.schedule(TimerKind::Nudge, Duration::seconds(30));
        scheduler.cancel(id);
        clock.advance(Duration::minutes(1));
        assert!(scheduler.take_due().is_empty());
    }
}
