//! Per-app daily time limits, in minutes.
//!
//! Limits are stored as a JSON object under `unstuck_app_limits`. A missing
//! entry and an explicit zero both mean "no limit".

use std::collections::BTreeMap;

use crate::error::{Result, ValidationError};
use crate::storage::{keys, load_json_or_default, SharedStore};

pub struct AppLimits {
    kv: SharedStore,
}

impl AppLimits {
    pub fn new(kv: SharedStore) -> Self {
        Self { kv }
    }

    fn load(&self) -> Result<BTreeMap<String, f64>> {
        Ok(load_json_or_default(self.kv.as_ref(), keys::APP_LIMITS)?)
    }

    fn save(&self, limits: &BTreeMap<String, f64>) -> Result<()> {
        self.kv.set(keys::APP_LIMITS, &serde_json::to_string(limits)?)?;
        Ok(())
    }

    /// Minutes allowed for `app`, 0 when unlimited.
    pub fn get(&self, app: &str) -> Result<f64> {
        Ok(self.load()?.get(app).copied().unwrap_or(0.0))
    }

    /// Set the limit for `app`. Zero removes it.
    ///
    /// # Errors
    /// Negative or non-finite minutes are rejected and nothing is written.
    pub fn set(&self, app: &str, minutes: f64) -> Result<()> {
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "minutes".into(),
                message: format!("must be zero or a positive number, got {minutes}"),
            }
            .into());
        }
        let app = app.trim();
        if app.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "app".into(),
                message: "app name cannot be empty".into(),
            }
            .into());
        }

        let mut limits = self.load()?;
        if minutes == 0.0 {
            limits.remove(app);
        } else {
            limits.insert(app.to_string(), minutes);
        }
        self.save(&limits)
    }

    pub fn all(&self) -> Result<BTreeMap<String, f64>> {
        self.load()
    }
}
