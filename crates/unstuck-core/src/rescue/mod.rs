//! Distraction rescue: away tracking, settings and out-of-app alerts.

mod notify;
mod settings;
mod tracker;

pub use notify::{
    DispatchError, DispatchOutcome, Notification, NotificationChannel, Notifier, Permission,
    RecordingChannel, RESCUE_TAG,
};
pub use settings::{RescueSettings, DEFAULT_DELAY_MINUTES, MAX_DELAY_MINUTES};
pub use tracker::{AwayOutcome, AwayTracker};
