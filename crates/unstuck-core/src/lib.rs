//! # Unstuck Core Library
//!
//! Core logic for Unstuck, a task-deferral tool that shows exactly one task
//! at a time, nudges the user when they linger, and pulls them back after a
//! long absence from the app. The `unstuck` CLI and any other front end are
//! thin layers over this library.
//!
//! ## Architecture
//!
//! - **Vault**: durable FIFO queue of tasks with random re-insertion on defer,
//!   a completion counter and completion history
//! - **Engagement**: state machine for reveal, engage, complete and defer,
//!   with a single-shot inactivity nudge
//! - **Rescue**: persisted away marker, live rescue timer, reconciliation on
//!   foreground or launch, and out-of-app alerts
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! The core never sleeps or spawns threads on its own. Time comes from a
//! [`Clock`], timers from a [`Scheduler`], and everything the user should see
//! is emitted as a [`Signal`].
//!
//! ## Key Components
//!
//! - [`App`]: coordinator owning every component
//! - [`TaskStore`]: the task vault
//! - [`EngagementMachine`]: reveal/engage state machine
//! - [`AwayTracker`]: distraction rescue bookkeeping
//! - [`Database`]: SQLite key-value store
//! - [`Config`]: application configuration

pub mod app;
pub mod clock;
pub mod engagement;
pub mod error;
pub mod events;
pub mod limits;
pub mod rescue;
pub mod storage;
pub mod summary;
pub mod timer;
pub mod vault;

pub use app::{App, Fired, RescueOutcome};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use engagement::{EngagementMachine, EngagementState, Resolution};
pub use error::{ConfigError, CoreError, StorageError, TransitionError, ValidationError};
pub use events::{NullSink, RecordingSink, Signal, SignalSink};
pub use limits::AppLimits;
pub use rescue::{
    AwayOutcome, AwayTracker, DispatchOutcome, Notification, NotificationChannel, Notifier,
    Permission, RescueSettings,
};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, SharedStore};
pub use summary::DailySummary;
pub use timer::{ManualScheduler, Scheduler, TimerId, TimerKind, TokioScheduler};
pub use vault::{CompletionRecord, Task, TaskStore};
