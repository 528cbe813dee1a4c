//! The task vault: pending tasks, completion counter and completion history.

pub mod interpreter;
pub mod policy;
mod store;
mod task;

pub use store::TaskStore;
pub use task::{CompletionRecord, Task};
