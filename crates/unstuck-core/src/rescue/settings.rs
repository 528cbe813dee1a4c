use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_DELAY_MINUTES: f64 = 15.0;

/// One year. Longer delays would never fire in practice and can overflow
/// deadline arithmetic.
pub const MAX_DELAY_MINUTES: f64 = 525_600.0;

/// User-controlled distraction rescue settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RescueSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Minutes away before a rescue. Fractions are allowed.
    #[serde(default = "default_delay", alias = "delay")]
    pub delay_minutes: f64,
}

fn default_delay() -> f64 {
    DEFAULT_DELAY_MINUTES
}

impl Default for RescueSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_minutes: DEFAULT_DELAY_MINUTES,
        }
    }
}

impl RescueSettings {
    /// Reject anything that is not a positive number of minutes up to
    /// [`MAX_DELAY_MINUTES`].
    pub fn validate_delay(minutes: f64) -> Result<f64, ValidationError> {
        if minutes > 0.0 && minutes <= MAX_DELAY_MINUTES {
            Ok(minutes)
        } else {
            Err(ValidationError::InvalidValue {
                field: "delay_minutes".into(),
                message: format!(
                    "must be between 0 and {MAX_DELAY_MINUTES} minutes, got {minutes}"
                ),
            })
        }
    }

    /// Threshold as a duration. Values that slipped past validation (for
    /// example hand-edited storage) fall back to the default.
    pub fn delay(&self) -> Duration {
        let minutes = Self::validate_delay(self.delay_minutes).unwrap_or(DEFAULT_DELAY_MINUTES);
        Duration::milliseconds((minutes * 60_000.0).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_off_with_fifteen_minutes() {
        let s = RescueSettings::default();
        assert!(!s.enabled);
        assert_eq!(s.delay(), Duration::minutes(15));
    }

    #[test]
    fn legacy_delay_field_is_accepted() {
        let s: RescueSettings = serde_json::from_str(r#"{"enabled":true,"delay":5}"#).unwrap();
        assert!(s.enabled);
        assert_eq!(s.delay(), Duration::minutes(5));
    }

    #[test]
    fn fractional_minutes_work() {
        let s = RescueSettings {
            enabled: true,
            delay_minutes: 0.0833,
        };
        assert_eq!(s.delay(), Duration::milliseconds(4998));
    }

    #[test]
    fn invalid_delay_is_rejected() {
        assert!(RescueSettings::validate_delay(0.0).is_err());
        assert!(RescueSettings::validate_delay(-3.0).is_err());
        assert!(RescueSettings::validate_delay(f64::NAN).is_err());
        assert_eq!(RescueSettings::validate_delay(2.5), Ok(2.5));
    }

    #[test]
    fn oversized_delay_is_rejected() {
        assert!(RescueSettings::validate_delay(1e12).is_err());
        assert!(RescueSettings::validate_delay(f64::INFINITY).is_err());
        assert!(RescueSettings::validate_delay(MAX_DELAY_MINUTES).is_ok());
    }

    #[test]
    fn stored_oversized_delay_falls_back() {
        let s = RescueSettings {
            enabled: true,
            delay_minutes: 1e12,
        };
        assert_eq!(s.delay(), Duration::minutes(15));
    }

    #[test]
    fn stored_garbage_delay_falls_back() {
        let s = RescueSettings {
            enabled: true,
            delay_minutes: -1.0,
        };
        assert_eq!(s.delay(), Duration::minutes(15));
    }
}
