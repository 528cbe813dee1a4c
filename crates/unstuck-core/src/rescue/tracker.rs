//! Away-tracker: notices the user left and decides when an absence earns a
//! rescue.
//!
//! A backgrounded process cannot be trusted to run its timer, so the
//! absence start is persisted the moment the app is backgrounded and two
//! paths can resolve it:
//!
//! 1. the live rescue timer, if the process survives long enough, and
//! 2. reconciliation on foreground, launch or poll, which compares the
//!    persisted start with the clock regardless of what the timer did.
//!
//! Whichever path resolves the absence clears the persisted marker and
//! disarms the timer before reporting, so the other path finds nothing and
//! every qualifying absence is reported exactly once.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::RescueSettings;
use crate::clock::{epoch_ms, from_epoch_ms, SharedClock};
use crate::error::Result;
use crate::storage::{keys, load_json_or_default, SharedStore};
use crate::timer::{Scheduler, TimerId, TimerKind, TimerSlot};

/// Result of looking at the away marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwayOutcome {
    /// No absence was pending.
    NotAway,
    /// Still away and below the threshold; nothing changed.
    Pending { away: Duration },
    /// Back before the threshold; the absence was discarded.
    Returned { away: Duration },
    /// Absence long enough to rescue. The marker is already cleared.
    Qualified { away: Duration },
}

impl AwayOutcome {
    pub fn qualifies(&self) -> bool {
        matches!(self, AwayOutcome::Qualified { .. })
    }
}

pub struct AwayTracker {
    kv: SharedStore,
    clock: SharedClock,
    timer: TimerSlot,
}

impl AwayTracker {
    pub fn new(kv: SharedStore, clock: SharedClock) -> Self {
        Self {
            kv,
            clock,
            timer: TimerSlot::new(TimerKind::Rescue),
        }
    }

    pub fn settings(&self) -> Result<RescueSettings> {
        Ok(load_json_or_default(self.kv.as_ref(), keys::RESCUE_SETTINGS)?)
    }

    fn save_settings(&self, settings: &RescueSettings) -> Result<()> {
        self.kv
            .set(keys::RESCUE_SETTINGS, &serde_json::to_string(settings)?)?;
        Ok(())
    }

    /// When the pending absence began, if any.
    pub fn away_since(&self) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.kv.get(keys::AWAY_SINCE)? else {
            return Ok(None);
        };
        match raw.trim().parse::<i64>().ok().and_then(from_epoch_ms) {
            Some(at) => Ok(Some(at)),
            None => {
                warn!(value = %raw, "discarding malformed away marker");
                self.kv.remove(keys::AWAY_SINCE)?;
                Ok(None)
            }
        }
    }

    fn set_away_since(&self, at: Option<DateTime<Utc>>) -> Result<()> {
        match at {
            Some(at) => self.kv.set(keys::AWAY_SINCE, &epoch_ms(at).to_string())?,
            None => self.kv.remove(keys::AWAY_SINCE)?,
        }
        Ok(())
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Turn rescue on or off. Turning it off abandons any pending absence.
    pub fn set_enabled(&mut self, enabled: bool, scheduler: &mut dyn Scheduler) -> Result<RescueSettings> {
        let mut settings = self.settings()?;
        settings.enabled = enabled;
        self.save_settings(&settings)?;
        if !enabled {
            self.abandon(scheduler)?;
        }
        info!(enabled, "rescue toggled");
        Ok(settings)
    }

    /// Change the threshold. A pending absence is judged against the new
    /// value when it is reconciled; an already armed timer keeps its deadline.
    pub fn set_delay(&mut self, minutes: f64) -> Result<RescueSettings> {
        let minutes = RescueSettings::validate_delay(minutes)?;
        let mut settings = self.settings()?;
        settings.delay_minutes = minutes;
        self.save_settings(&settings)?;
        Ok(settings)
    }

    /// The app lost the foreground.
    ///
    /// A repeated background event keeps the original start time and re-arms
    /// for whatever is left of the threshold.
    pub fn became_background(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        let settings = self.settings()?;
        if !settings.enabled {
            return Ok(());
        }
        let now = self.clock.now();
        let since = match self.away_since()? {
            Some(existing) => existing,
            None => {
                self.set_away_since(Some(now))?;
                now
            }
        };
        let remaining = settings.delay() - elapsed(since, now);
        self.timer.arm(scheduler, remaining.max(Duration::zero()));
        debug!(since = %since, remaining_ms = remaining.num_milliseconds(), "away tracking armed");
        Ok(())
    }

    /// The app is in front of the user again, or the process (re)started.
    /// Any pending absence is resolved one way or the other.
    pub fn reconcile(&mut self, scheduler: &mut dyn Scheduler) -> Result<AwayOutcome> {
        let Some(since) = self.away_since()? else {
            self.timer.disarm(scheduler);
            return Ok(AwayOutcome::NotAway);
        };
        let settings = self.settings()?;
        if !settings.enabled {
            self.abandon(scheduler)?;
            return Ok(AwayOutcome::NotAway);
        }

        let away = elapsed(since, self.clock.now());
        self.resolve(scheduler)?;
        if away >= settings.delay() {
            info!(away_ms = away.num_milliseconds(), "absence qualifies for rescue");
            Ok(AwayOutcome::Qualified { away })
        } else {
            debug!(away_ms = away.num_milliseconds(), "returned before rescue threshold");
            Ok(AwayOutcome::Returned { away })
        }
    }

    /// Look at a pending absence without ending it unless it qualifies.
    pub fn poll(&mut self, scheduler: &mut dyn Scheduler) -> Result<AwayOutcome> {
        let Some(since) = self.away_since()? else {
            return Ok(AwayOutcome::NotAway);
        };
        let settings = self.settings()?;
        if !settings.enabled {
            self.abandon(scheduler)?;
            return Ok(AwayOutcome::NotAway);
        }

        let away = elapsed(since, self.clock.now());
        if away < settings.delay() {
            return Ok(AwayOutcome::Pending { away });
        }
        self.resolve(scheduler)?;
        info!(away_ms = away.num_milliseconds(), "absence qualifies for rescue");
        Ok(AwayOutcome::Qualified { away })
    }

    /// Deliver a due timer. Stale ids and timers outliving their absence
    /// report `NotAway`.
    pub fn on_timer_fired(&mut self, id: TimerId) -> Result<AwayOutcome> {
        if !self.timer.fire(id) {
            return Ok(AwayOutcome::NotAway);
        }
        let Some(since) = self.away_since()? else {
            return Ok(AwayOutcome::NotAway);
        };
        if !self.settings()?.enabled {
            self.set_away_since(None)?;
            return Ok(AwayOutcome::NotAway);
        }
        let away = elapsed(since, self.clock.now());
        self.set_away_since(None)?;
        info!(away_ms = away.num_milliseconds(), "rescue timer fired");
        Ok(AwayOutcome::Qualified { away })
    }

    fn resolve(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        self.set_away_since(None)?;
        self.timer.disarm(scheduler);
        Ok(())
    }

    fn abandon(&mut self, scheduler: &mut dyn Scheduler) -> Result<()> {
        if self.away_since()?.is_some() {
            debug!("pending absence abandoned");
        }
        self.resolve(scheduler)
    }
}

fn elapsed(since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - since).max(Duration::zero())
}
