//! Today's progress at a glance.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vault::{CompletionRecord, Task, TaskStore};

/// What got done today and what is still waiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Completions since local midnight, oldest first.
    pub completed_today: Vec<CompletionRecord>,
    /// Pending tasks in queue order.
    pub remaining: Vec<Task>,
    /// Lifetime completion counter.
    pub total_completed: u64,
}

impl DailySummary {
    pub fn build(vault: &TaskStore) -> Result<Self> {
        Ok(Self {
            completed_today: vault.completed_today()?,
            remaining: vault.snapshot_all()?,
            total_completed: vault.completion_count()?,
        })
    }

    pub fn nothing_done_yet(&self) -> bool {
        self.completed_today.is_empty()
    }

    pub fn all_caught_up(&self) -> bool {
        self.remaining.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};
    use std::rc::Rc;

    #[test]
    fn summary_splits_done_and_remaining() {
        let clock = Rc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap()));
        let mut vault = TaskStore::with_seed(Rc::new(MemoryStore::new()), clock.clone(), 1);

        let empty = DailySummary::build(&vault).unwrap();
        assert!(empty.nothing_done_yet());
        assert!(empty.all_caught_up());

        let a = vault.enqueue("write report").unwrap();
        vault.enqueue("call bank").unwrap();
        clock.advance(Duration::minutes(5));
        vault.complete(&a.id).unwrap();

        let summary = DailySummary::build(&vault).unwrap();
        assert_eq!(summary.completed_today.len(), 1);
        assert_eq!(summary.completed_today[0].text, "write report");
        assert_eq!(summary.remaining.len(), 1);
        assert_eq!(summary.remaining[0].text, "call bank");
        assert_eq!(summary.total_completed, 1);
    }

    #[test]
    fn yesterday_does_not_count_today() {
        let clock = Rc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap()));
        let mut vault = TaskStore::with_seed(Rc::new(MemoryStore::new()), clock.clone(), 1);
        let a = vault.enqueue("old").unwrap();
        vault.complete(&a.id).unwrap();
        clock.advance(Duration::days(2));

        let summary = DailySummary::build(&vault).unwrap();
        assert!(summary.nothing_done_yet());
        assert_eq!(summary.total_completed, 1);
    }
}
