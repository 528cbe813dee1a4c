//! Terminal rendering of notifications and signals.

use std::io::Write;

use unstuck_core::rescue::DispatchError;
use unstuck_core::{Notification, NotificationChannel, Signal, SignalSink, Task};

/// Direct notification channel: prints to stderr, optionally ringing the bell.
pub struct TerminalChannel {
    bell: bool,
}

impl TerminalChannel {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }
}

impl NotificationChannel for TerminalChannel {
    fn name(&self) -> &str {
        "terminal"
    }

    fn deliver(&mut self, notification: &Notification) -> Result<(), DispatchError> {
        let mut err = std::io::stderr().lock();
        let bell = if self.bell { "\x07" } else { "" };
        writeln!(err, "{bell}{}\n  {}", notification.title, notification.body)
            .map_err(|e| DispatchError::Failed(e.to_string()))
    }
}

/// Sink that narrates every signal on stdout. Used by the interactive session.
#[derive(Default)]
pub struct ConsoleSink;

impl SignalSink for ConsoleSink {
    fn emit(&mut self, signal: Signal) {
        println!("{}", describe(&signal));
    }
}

pub fn describe(signal: &Signal) -> String {
    match signal {
        Signal::TaskRevealed { task, .. } => format!("next up: {}", task.text),
        Signal::TaskEmpty { .. } => "the vault is empty. add something!".to_string(),
        Signal::TaskEngaged { task, .. } => format!("working on: {}", task.text),
        Signal::NudgeFired { .. } => {
            "still there? type `start`, `later`, or `dismiss`".to_string()
        }
        Signal::RewardFired {
            completion_count, ..
        } => format!("nice! {completion_count} done so far"),
        Signal::RescueTriggered { away_ms, .. } => {
            format!("you were away for {}. let's do one thing.", minutes(*away_ms))
        }
    }
}

pub fn task_line(index: usize, task: &Task) -> String {
    format!("{:>3}. {}  ({})", index + 1, task.text, task.id)
}

fn minutes(ms: i64) -> String {
    let mins = ms / 60_000;
    if mins == 1 {
        "1 minute".to_string()
    } else {
        format!("{mins} minutes")
    }
}
