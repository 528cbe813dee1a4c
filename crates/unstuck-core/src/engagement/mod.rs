//! Engagement state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Idle|Empty --request_reveal--> Revealing(task) | Empty
//! Revealing  --start--> Engaged  --release--> Revealing
//! Revealing|Engaged --complete--> Idle          (reward)
//! Revealing  --defer--> Revealing(new head)
//! any        --leave--> Idle
//! ```
//!
//! The nudge timer is armed exactly while in `Revealing`.

mod machine;

pub use machine::{Effects, EngagementMachine, EngagementState, Resolution};
