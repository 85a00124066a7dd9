//! Batch/lot records and expiry classification.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{Entity, ValueObject};

use crate::config::ExpiryThresholds;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Batch status lifecycle.
///
/// Transitions other than `active -> expired` are driven by reservation and
/// consumption outside this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Active,
    Expired,
    Quarantine,
    Reserved,
    Consumed,
}

/// A traceable sub-quantity of a product received together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub batch_number: String,
    pub quantity: f64,
    pub unit: String,
    pub manufacturing_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub status: BatchStatus,
    pub location: String,
}

impl Entity for Batch {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.batch_number
    }
}

impl Batch {
    pub fn classify(&self, today: NaiveDate) -> ExpiryClassification {
        classify(self.expiration_date, today)
    }

    pub fn classify_with(&self, thresholds: &ExpiryThresholds, today: NaiveDate) -> ExpiryClassification {
        classify_with(thresholds, self.expiration_date, today)
    }

    /// Move an `active` batch past its expiration date to `expired`.
    ///
    /// Returns `true` when the status changed. Other statuses are left alone.
    pub fn reclassify(&mut self, today: NaiveDate) -> bool {
        if self.status != BatchStatus::Active {
            return false;
        }
        if self.classify(today).severity != Severity::Expired {
            return false;
        }
        self.status = BatchStatus::Expired;
        true
    }
}

/// Time-to-expiration bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Expired,
    Critical,
    Warning,
    Good,
    /// No expiration date recorded.
    #[serde(rename = "none")]
    NoExpiry,
}

impl Severity {
    /// Bucket for a day count. Total over all integers.
    pub fn from_days(days: i64, thresholds: &ExpiryThresholds) -> Self {
        if days < 0 {
            Severity::Expired
        } else if days <= thresholds.critical_days() {
            Severity::Critical
        } else if days <= thresholds.warning_days() {
            Severity::Warning
        } else {
            Severity::Good
        }
    }
}

/// Derived expiry state of a batch (never stored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryClassification {
    pub days: Option<i64>,
    pub severity: Severity,
}

impl ValueObject for ExpiryClassification {}

impl ExpiryClassification {
    fn from_days(days: Option<i64>, thresholds: &ExpiryThresholds) -> Self {
        let severity = match days {
            Some(d) => Severity::from_days(d, thresholds),
            None => Severity::NoExpiry,
        };
        Self { days, severity }
    }
}

/// Classify an expiration date against `today` with the default thresholds.
pub fn classify(expiration_date: Option<NaiveDate>, today: NaiveDate) -> ExpiryClassification {
    classify_with(&ExpiryThresholds::default(), expiration_date, today)
}

pub fn classify_with(
    thresholds: &ExpiryThresholds,
    expiration_date: Option<NaiveDate>,
    today: NaiveDate,
) -> ExpiryClassification {
    let days = expiration_date.map(|exp| (exp - today).num_days());
    ExpiryClassification::from_days(days, thresholds)
}

/// Classify a timestamped expiration. Partial days round up, so anything that
/// expires later today still counts as day 0 or later.
pub fn classify_instant(
    thresholds: &ExpiryThresholds,
    expiration: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ExpiryClassification {
    let days = expiration.map(|exp| ceil_days((exp - now).num_milliseconds()));
    ExpiryClassification::from_days(days, thresholds)
}

fn ceil_days(millis: i64) -> i64 {
    // Integer division truncates toward zero, which is already the ceiling for negatives.
    let whole = millis / MILLIS_PER_DAY;
    if millis % MILLIS_PER_DAY > 0 { whole + 1 } else { whole }
}

/// Batches whose classification on `today` matches `severity`.
pub fn filter_by_severity<'a>(
    batches: &'a [Batch],
    severity: Severity,
    today: NaiveDate,
) -> impl Iterator<Item = &'a Batch> + 'a {
    batches
        .iter()
        .filter(move |batch| batch.classify(today).severity == severity)
}
