//! Out-of-app alerts for distraction rescue.
//!
//! Delivery is fire-and-forget: the core guarantees it asked once. A channel
//! failure or missing permission is logged and never reaches the caller.

use std::cell::RefCell;
use std::rc::Rc;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const RESCUE_TAG: &str = "unstuck-rescue";

const RESCUE_MESSAGES: [(&str, &str); 5] = [
    ("Hey, you still there? 👋", "You've been away for a bit. Want to knock something out?"),
    ("Quick win waiting for you ⚡", "One small task could change your whole momentum."),
    ("Doomscroll break? 🌟", "Your future self will thank you. Just one task!"),
    ("Gentle nudge 💜", "The vault has something for you. Come check it out."),
    ("You've got this 💪", "Step away from the scroll. One task, that's all."),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Notifications with the same tag replace each other.
    pub tag: String,
}

/// Whether the user allowed out-of-app alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    Undetermined,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("channel unavailable: {0}")]
    Unavailable(String),
    #[error("delivery failed: {0}")]
    Failed(String),
}

pub trait NotificationChannel {
    fn name(&self) -> &str;

    /// Whether the channel can deliver right now.
    fn is_active(&self) -> bool {
        true
    }

    fn deliver(&mut self, notification: &Notification) -> Result<(), DispatchError>;
}

/// Which path an alert took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Handed to the background-capable channel.
    Background,
    /// Shown directly by this process.
    Direct,
    /// Not attempted: no permission or no usable channel.
    Declined,
    /// Every attempted channel failed.
    Failed,
}

/// Picks a channel for each alert: the background-capable one when active,
/// else the direct one, and nothing at all without permission.
pub struct Notifier {
    permission: Permission,
    background: Option<Box<dyn NotificationChannel>>,
    direct: Option<Box<dyn NotificationChannel>>,
    rng: Mcg128Xsl64,
}

impl Notifier {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission,
            background: None,
            direct: None,
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Notifier that never alerts.
    pub fn disabled() -> Self {
        Self::new(Permission::Denied)
    }

    pub fn with_background(mut self, channel: Box<dyn NotificationChannel>) -> Self {
        self.background = Some(channel);
        self
    }

    pub fn with_direct(mut self, channel: Box<dyn NotificationChannel>) -> Self {
        self.direct = Some(channel);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mcg128Xsl64::seed_from_u64(seed);
        self
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn set_permission(&mut self, permission: Permission) {
        self.permission = permission;
    }

    /// One of the rotating rescue messages.
    pub fn rescue_notification(&mut self) -> Notification {
        let (title, body) = RESCUE_MESSAGES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(RESCUE_MESSAGES[0]);
        Notification {
            title: title.to_string(),
            body: body.to_string(),
            tag: RESCUE_TAG.to_string(),
        }
    }

    pub fn dispatch_rescue(&mut self) -> DispatchOutcome {
        let notification = self.rescue_notification();
        self.dispatch(&notification)
    }

    pub fn dispatch(&mut self, notification: &Notification) -> DispatchOutcome {
        if self.permission != Permission::Granted {
            debug!(permission = ?self.permission, "notification declined");
            return DispatchOutcome::Declined;
        }

        let mut attempted = false;

        if let Some(channel) = self.background.as_mut().filter(|c| c.is_active()) {
            attempted = true;
            match channel.deliver(notification) {
                Ok(()) => return DispatchOutcome::Background,
                Err(e) => warn!(channel = channel.name(), error = %e, "background notification failed"),
            }
        }

        if let Some(channel) = self.direct.as_mut().filter(|c| c.is_active()) {
            attempted = true;
            match channel.deliver(notification) {
                Ok(()) => return DispatchOutcome::Direct,
                Err(e) => warn!(channel = channel.name(), error = %e, "direct notification failed"),
            }
        }

        if attempted {
            DispatchOutcome::Failed
        } else {
            debug!("no active notification channel");
            DispatchOutcome::Declined
        }
    }
}

/// Channel that records what it was asked to deliver. Clones share the log.
#[derive(Debug, Clone)]
pub struct RecordingChannel {
    name: String,
    active: bool,
    fail: bool,
    delivered: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingChannel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active: true,
            fail: false,
            delivered: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.borrow().clone()
    }
}

impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deliver(&mut self, notification: &Notification) -> Result<(), DispatchError> {
        if self.fail {
            return Err(DispatchError::Failed(format!("{} refused", self.name)));
        }
        self.delivered.borrow_mut().push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_active_background_channel() {
        let background = RecordingChannel::new("worker");
        let direct = RecordingChannel::new("direct");
        let mut notifier = Notifier::new(Permission::Granted)
            .with_background(Box::new(background.clone()))
            .with_direct(Box::new(direct.clone()));

        assert_eq!(notifier.dispatch_rescue(), DispatchOutcome::Background);
        assert_eq!(background.delivered().len(), 1);
        assert!(direct.delivered().is_empty());
    }

    #[test]
    fn falls_back_to_direct_when_background_inactive() {
        let background = RecordingChannel::new("worker").inactive();
        let direct = RecordingChannel::new("direct");
        let mut notifier = Notifier::new(Permission::Granted)
            .with_background(Box::new(background.clone()))
            .with_direct(Box::new(direct.clone()));

        assert_eq!(notifier.dispatch_rescue(), DispatchOutcome::Direct);
        assert_eq!(direct.delivered()[0].tag, RESCUE_TAG);
    }

    #[test]
    fn falls_back_to_direct_when_background_fails() {
        let direct = RecordingChannel::new("direct");
        let mut notifier = Notifier::new(Permission::Granted)
            .with_background(Box::new(RecordingChannel::new("worker").failing()))
            .with_direct(Box::new(direct.clone()));

        assert_eq!(notifier.dispatch_rescue(), DispatchOutcome::Direct);
        assert_eq!(direct.delivered().len(), 1);
    }

    #[test]
    fn declines_without_permission() {
        let direct = RecordingChannel::new("direct");
        let mut notifier =
            Notifier::new(Permission::Undetermined).with_direct(Box::new(direct.clone()));
        assert_eq!(notifier.dispatch_rescue(), DispatchOutcome::Declined);
        assert!(direct.delivered().is_empty());
    }

    #[test]
    fn declines_without_channels_and_reports_failures() {
        let mut bare = Notifier::new(Permission::Granted);
        assert_eq!(bare.dispatch_rescue(), DispatchOutcome::Declined);

        let mut broken = Notifier::new(Permission::Granted)
            .with_direct(Box::new(RecordingChannel::new("direct").failing()));
        assert_eq!(broken.dispatch_rescue(), DispatchOutcome::Failed);
    }

    #[test]
    fn rescue_messages_come_from_the_rotation() {
        let mut notifier = Notifier::disabled().with_seed(9);
        for _ in 0..20 {
            let n = notifier.rescue_notification();
            assert!(RESCUE_MESSAGES.iter().any(|(t, b)| *t == n.title && *b == n.body));
        }
    }
}
