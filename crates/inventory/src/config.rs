//! Expiry classification thresholds.

use stockledger_core::{Field, ValidationError};

/// Environment variable overriding [`ExpiryThresholds::critical_days`].
pub const CRITICAL_DAYS_ENV: &str = "STOCKLEDGER_EXPIRY_CRITICAL_DAYS";
/// Environment variable overriding [`ExpiryThresholds::warning_days`].
pub const WARNING_DAYS_ENV: &str = "STOCKLEDGER_EXPIRY_WARNING_DAYS";

/// Day boundaries for expiry severity buckets (both inclusive).
///
/// - `days < 0` is expired
/// - `0..=critical_days` is critical
/// - `critical_days+1..=warning_days` is warning
/// - anything later is good
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExpiryThresholds {
    critical_days: i64,
    warning_days: i64,
}

impl Default for ExpiryThresholds {
    fn default() -> Self {
        Self {
            critical_days: 7,
            warning_days: 30,
        }
    }
}

impl ExpiryThresholds {
    pub fn new(critical_days: i64, warning_days: i64) -> Result<Self, ValidationError> {
        if critical_days < 0 {
            return Err(ValidationError::invalid(
                Field::ExpiryThreshold,
                "critical threshold cannot be negative",
            ));
        }
        if warning_days <= critical_days {
            return Err(ValidationError::invalid(
                Field::ExpiryThreshold,
                format!("warning threshold ({warning_days}) must be greater than critical threshold ({critical_days})"),
            ));
        }
        Ok(Self {
            critical_days,
            warning_days,
        })
    }

    /// Load thresholds from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ExpiryThresholds::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let read = |key: &str, default: i64| -> Option<i64> {
            match lookup(key) {
                None => Some(default),
                Some(raw) => match raw.trim().parse::<i64>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(key, value = %raw, "ignoring unparseable expiry threshold");
                        None
                    }
                },
            }
        };

        let (Some(critical), Some(warning)) = (
            read(CRITICAL_DAYS_ENV, defaults.critical_days),
            read(WARNING_DAYS_ENV, defaults.warning_days),
        ) else {
            return defaults;
        };

        Self::new(critical, warning).unwrap_or_else(|err| {
            tracing::warn!(%err, "invalid expiry thresholds in environment; using defaults");
            defaults
        })
    }

    pub fn critical_days(&self) -> i64 {
        self.critical_days
    }

    pub fn warning_days(&self) -> i64 {
        self.warning_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_seven_and_thirty_days() {
        let t = ExpiryThresholds::default();
        assert_eq!(t.critical_days(), 7);
        assert_eq!(t.warning_days(), 30);
    }

    #[test]
    fn missing_variables_use_defaults() {
        assert_eq!(ExpiryThresholds::from_lookup(lookup(&[])), ExpiryThresholds::default());
    }

    #[test]
    fn variables_override_defaults() {
        let t = ExpiryThresholds::from_lookup(lookup(&[(CRITICAL_DAYS_ENV, "3"), (WARNING_DAYS_ENV, " 14 ")]));
        assert_eq!(t, ExpiryThresholds::new(3, 14).unwrap());
    }

    #[test]
    fn garbage_or_inverted_values_fall_back() {
        let garbage = ExpiryThresholds::from_lookup(lookup(&[(CRITICAL_DAYS_ENV, "soon")]));
        assert_eq!(garbage, ExpiryThresholds::default());

        let inverted = ExpiryThresholds::from_lookup(lookup(&[(CRITICAL_DAYS_ENV, "40"), (WARNING_DAYS_ENV, "10")]));
        assert_eq!(inverted, ExpiryThresholds::default());
    }

    #[test]
    fn new_rejects_negative_and_non_increasing() {
        assert_eq!(ExpiryThresholds::new(-1, 30).unwrap_err().field(), Field::ExpiryThreshold);
        assert_eq!(ExpiryThresholds::new(7, 7).unwrap_err().field(), Field::ExpiryThreshold);
    }
}
