//! Queue policy: which task comes next, and where a deferred task goes.
//!
//! Pure functions over a task slice. The head of the queue is always "next";
//! a deferred task is moved back to a random position that is never the head
//! unless it is the only task left, so the same disliked task does not
//! resurface in a predictable place.

use rand::Rng;

use super::Task;

/// The task to reveal, if any.
pub fn select_next(tasks: &[Task]) -> Option<&Task> {
    tasks.first()
}

/// Reinsertion index for a deferred task, given the queue length after the
/// task was removed. Uniform over `1..=len`, or 0 when the queue is empty.
pub fn reinsertion_index<R: Rng + ?Sized>(len_after_removal: usize, rng: &mut R) -> usize {
    if len_after_removal == 0 {
        0
    } else {
        rng.gen_range(1..=len_after_removal)
    }
}

/// Move the task with `id` to a new position chosen by [`reinsertion_index`].
/// Returns the new index, or `None` if the id is not queued.
pub fn defer_in_place<R: Rng + ?Sized>(tasks: &mut Vec<Task>, id: &str, rng: &mut R) -> Option<usize> {
    let idx = tasks.iter().position(|t| t.id == id)?;
    let task = tasks.remove(idx);
    let new_idx = reinsertion_index(tasks.len(), rng);
    tasks.insert(new_idx, task);
    Some(new_idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn tasks(names: &[&str]) -> Vec<Task> {
        names
            .iter()
            .map(|n| Task::new(n, Utc::now()).unwrap())
            .collect()
    }

    fn texts(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn select_next_is_head() {
        let queue = tasks(&["a", "b"]);
        assert_eq!(select_next(&queue).unwrap().text, "a");
        assert!(select_next(&[]).is_none());
    }

    #[test]
    fn two_task_defer_moves_head_to_tail() {
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        let mut queue = tasks(&["A", "B"]);
        let id = queue[0].id.clone();
        assert_eq!(defer_in_place(&mut queue, &id, &mut rng), Some(1));
        assert_eq!(texts(&queue), vec!["B", "A"]);
    }

    #[test]
    fn lone_task_returns_to_head() {
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        let mut queue = tasks(&["only"]);
        let id = queue[0].id.clone();
        assert_eq!(defer_in_place(&mut queue, &id, &mut rng), Some(0));
    }

    #[test]
    fn unknown_id_leaves_queue_alone() {
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        let mut queue = tasks(&["a", "b", "c"]);
        assert_eq!(defer_in_place(&mut queue, "missing", &mut rng), None);
        assert_eq!(texts(&queue), vec!["a", "b", "c"]);
    }

    #[test]
    fn reinsertion_covers_every_non_head_slot() {
        let mut rng = Mcg128Xsl64::seed_from_u64(42);
        let mut seen = [false; 5];
        for _ in 0..500 {
            let idx = reinsertion_index(4, &mut rng);
            assert!((1..=4).contains(&idx));
            seen[idx] = true;
        }
        assert!(!seen[0]);
        assert!(seen[1..].iter().all(|s| *s));
    }
}
