use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vault::Task;

/// Every user-visible effect of the core produces a Signal.
/// Rendering, audio and haptic collaborators consume them; nothing flows back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Signal {
    /// One task is now on screen.
    TaskRevealed {
        task: Task,
        at: DateTime<Utc>,
    },
    /// A reveal was requested but the vault is empty.
    TaskEmpty {
        at: DateTime<Utc>,
    },
    /// The user committed to the revealed task.
    TaskEngaged {
        task: Task,
        at: DateTime<Utc>,
    },
    /// Inactivity while revealing; a dismissible prompt is showing.
    NudgeFired {
        at: DateTime<Utc>,
    },
    /// A task was completed; carries the all-time completion count.
    RewardFired {
        completion_count: u64,
        at: DateTime<Utc>,
    },
    /// A qualifying absence was resolved into a forced reveal.
    RescueTriggered {
        away_ms: i64,
        at: DateTime<Utc>,
    },
}

impl Signal {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Signal::TaskRevealed { at, .. }
            | Signal::TaskEmpty { at }
            | Signal::TaskEngaged { at, .. }
            | Signal::NudgeFired { at }
            | Signal::RewardFired { at, .. }
            | Signal::RescueTriggered { at, .. } => *at,
        }
    }
}

/// Consumer of signals. Implementations must not call back into the core.
pub trait SignalSink {
    fn emit(&mut self, signal: Signal);
}

/// Sink that keeps every signal in order; drained by the host after each step.
#[derive(Debug, Default)]
pub struct RecordingSink {
    signals: Vec<Signal>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn drain(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }
}

impl SignalSink for RecordingSink {
    fn emit(&mut self, signal: Signal) {
        self.signals.push(signal);
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SignalSink for NullSink {
    fn emit(&mut self, _signal: Signal) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_serialize_with_type_tag() {
        let at = Utc::now();
        let json = serde_json::to_value(Signal::RewardFired {
            completion_count: 3,
            at,
        })
        .unwrap();
        assert_eq!(json["type"], "RewardFired");
        assert_eq!(json["completion_count"], 3);
    }

    #[test]
    fn recording_sink_drains_in_order() {
        let mut sink = RecordingSink::new();
        let at = Utc::now();
        sink.emit(Signal::TaskEmpty { at });
        sink.emit(Signal::NudgeFired { at });
        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[1], Signal::NudgeFired { .. }));
        assert!(sink.signals().is_empty());
    }
}
