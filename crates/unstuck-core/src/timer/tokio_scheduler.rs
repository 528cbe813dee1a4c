use std::collections::HashMap;

use chrono::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Scheduler, TimerId, TimerKind};

/// Scheduler backed by tokio tasks. Due ids arrive on the receiver returned
/// by [`TokioScheduler::new`]; the host forwards them to the app one at a
/// time, so firings never interleave with other transitions.
///
/// Must be used from within a tokio runtime.
pub struct TokioScheduler {
    next_id: u64,
    tasks: HashMap<TimerId, JoinHandle<()>>,
    tx: mpsc::UnboundedSender<TimerId>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 1,
            tasks: HashMap::new(),
            tx,
        };
        (scheduler, rx)
    }

    pub fn live_count(&self) -> usize {
        self.tasks.values().filter(|h| !h.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, kind: TimerKind, after: Duration) -> TimerId {
        self.tasks.retain(|_, handle| !handle.is_finished());

        let id = TimerId(self.next_id);
        self.next_id += 1;

        let delay = after.to_std().unwrap_or_default();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::trace!(?kind, timer = id.0, "timer due");
            let _ = tx.send(id);
        });
        self.tasks.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_due_timer() {
        let (mut scheduler, mut rx) = TokioScheduler::new();
        let id = scheduler.schedule(TimerKind::Nudge, Duration::milliseconds(5));
        assert_eq!(rx.recv().await, Some(id));
    }

    #[tokio::test]
    async fn cancelled_timer_is_not_delivered() {
        let (mut scheduler, mut rx) = TokioScheduler::new();
        let cancelled = scheduler.schedule(TimerKind::Nudge, Duration::milliseconds(20));
        scheduler.cancel(cancelled);
        let live = scheduler.schedule(TimerKind::Rescue, Duration::milliseconds(40));
        assert_eq!(rx.recv().await, Some(live));
        assert!(rx.try_recv().is_err());
    }
}
