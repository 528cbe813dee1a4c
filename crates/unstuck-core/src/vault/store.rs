//! Durable task queue, completion counter and completion history.
//!
//! Every read goes to the key-value store and every mutation is written back
//! before returning, so a restarted process sees the last committed state.
//! A malformed value for one key reads as that key's empty value without
//! touching the others.

use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use tracing::debug;

use super::policy;
use super::{CompletionRecord, Task};
use crate::clock::{start_of_local_day, SharedClock};
use crate::error::Result;
use crate::storage::{keys, load_json_or_default, SharedStore};

pub struct TaskStore {
    kv: SharedStore,
    clock: SharedClock,
    rng: Mcg128Xsl64,
}

impl TaskStore {
    pub fn new(kv: SharedStore, clock: SharedClock) -> Self {
        Self {
            kv,
            clock,
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Fixed seed for reproducible defer positions.
    pub fn with_seed(kv: SharedStore, clock: SharedClock, seed: u64) -> Self {
        Self {
            kv,
            clock,
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(load_json_or_default(self.kv.as_ref(), keys::VAULT)?)
    }

    fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.kv.set(keys::VAULT, &serde_json::to_string(tasks)?)?;
        Ok(())
    }

    fn load_history(&self) -> Result<Vec<CompletionRecord>> {
        Ok(load_json_or_default(self.kv.as_ref(), keys::HISTORY)?)
    }

    /// Validate, append to the tail and persist.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyText` for blank input; the queue is
    /// left unchanged.
    pub fn enqueue(&mut self, text: &str) -> Result<Task> {
        let task = Task::new(text, self.clock.now())?;
        let mut tasks = self.load_tasks()?;
        tasks.push(task.clone());
        self.save_tasks(&tasks)?;
        debug!(task = %task.id, queued = tasks.len(), "task enqueued");
        Ok(task)
    }

    pub fn peek_next(&self) -> Result<Option<Task>> {
        let tasks = self.load_tasks()?;
        Ok(policy::select_next(&tasks).cloned())
    }

    pub fn get(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.load_tasks()?.into_iter().find(|t| t.id == id))
    }

    /// Remove the task, log it and bump the counter in one write.
    ///
    /// Returns the new completion count, or `None` if the task is not queued
    /// (for example already completed by a racing action).
    pub fn complete(&mut self, id: &str) -> Result<Option<u64>> {
        let mut tasks = self.load_tasks()?;
        let Some(idx) = tasks.iter().position(|t| t.id == id) else {
            debug!(task = id, "complete ignored, task not queued");
            return Ok(None);
        };
        let task = tasks.remove(idx);

        let mut history = self.load_history()?;
        history.push(CompletionRecord {
            text: task.text,
            completed_at: self.clock.now(),
        });
        let count = self.completion_count()? + 1;

        self.kv.set_many(&[
            (keys::VAULT, serde_json::to_string(&tasks)?),
            (keys::HISTORY, serde_json::to_string(&history)?),
            (keys::COMPLETED_COUNT, count.to_string()),
        ])?;
        debug!(task = id, count, "task completed");
        Ok(Some(count))
    }

    /// Move the task back in the queue. Returns its new index, or `None` if
    /// it is not queued.
    pub fn defer(&mut self, id: &str) -> Result<Option<usize>> {
        let mut tasks = self.load_tasks()?;
        let Some(new_idx) = policy::defer_in_place(&mut tasks, id, &mut self.rng) else {
            debug!(task = id, "defer ignored, task not queued");
            return Ok(None);
        };
        self.save_tasks(&tasks)?;
        debug!(task = id, position = new_idx, "task deferred");
        Ok(Some(new_idx))
    }

    /// Remove without completing. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let mut tasks = self.load_tasks()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.save_tasks(&tasks)?;
        debug!(task = id, "task deleted");
        Ok(true)
    }

    pub fn snapshot_all(&self) -> Result<Vec<Task>> {
        self.load_tasks()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.load_tasks()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn completion_count(&self) -> Result<u64> {
        Ok(load_json_or_default(self.kv.as_ref(), keys::COMPLETED_COUNT)?)
    }

    pub fn history(&self) -> Result<Vec<CompletionRecord>> {
        self.load_history()
    }

    /// Completions since the start of the current local day.
    pub fn completed_today(&self) -> Result<Vec<CompletionRecord>> {
        let start = start_of_local_day(self.clock.now());
        Ok(self
            .load_history()?
            .into_iter()
            .filter(|r| r.completed_at >= start)
            .collect())
    }

    pub fn count_today(&self) -> Result<usize> {
        Ok(self.completed_today()?.len())
    }
}
