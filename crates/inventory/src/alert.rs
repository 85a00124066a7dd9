//! Stock alerts derived from a record snapshot.
//!
//! Alerts are computed on demand and never stored; delivering them is left to
//! the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockledger_core::ProductId;

use crate::batch::{BatchStatus, Severity};
use crate::config::ExpiryThresholds;
use crate::stock::StockRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    LowStock,
    ExpiryWarning,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAlert {
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub product_id: ProductId,
    pub location: String,
    pub batch_number: Option<String>,
    pub message: String,
}

/// Alerts for one stock record as of `today`.
///
/// - `LOW_STOCK` when a minimum is configured and available stock is at or below it
///   (critical once nothing is available).
/// - `EXPIRED` for any unconsumed batch past its expiration date.
/// - `EXPIRY_WARNING` for active batches in the critical or warning bucket.
pub fn stock_alerts(record: &StockRecord, today: NaiveDate, thresholds: &ExpiryThresholds) -> Vec<StockAlert> {
    let mut alerts = Vec::new();

    let alert = |kind, priority, batch_number: Option<&str>, message: String| StockAlert {
        kind,
        priority,
        product_id: record.product_id(),
        location: record.location().to_string(),
        batch_number: batch_number.map(str::to_string),
        message,
    };

    if let Some(min_stock) = record.min_stock() {
        let available = record.available_quantity();
        if available <= min_stock {
            let priority = if available <= 0.0 {
                AlertPriority::Critical
            } else {
                AlertPriority::Warning
            };
            alerts.push(alert(
                AlertKind::LowStock,
                priority,
                None,
                format!(
                    "available stock {available} {unit} is at or below the minimum of {min_stock} {unit}",
                    unit = record.unit()
                ),
            ));
        }
    }

    for batch in record.batches() {
        if batch.status == BatchStatus::Consumed {
            continue;
        }
        let classification = batch.classify_with(thresholds, today);
        let days = classification.days.unwrap_or_default();
        let number = Some(batch.batch_number.as_str());

        match classification.severity {
            Severity::Expired => alerts.push(alert(
                AlertKind::Expired,
                AlertPriority::Critical,
                number,
                format!("batch {} expired {} day(s) ago", batch.batch_number, -days),
            )),
            Severity::Critical | Severity::Warning if batch.status == BatchStatus::Active => {
                let priority = if classification.severity == Severity::Critical {
                    AlertPriority::Critical
                } else {
                    AlertPriority::Warning
                };
                alerts.push(alert(
                    AlertKind::ExpiryWarning,
                    priority,
                    number,
                    format!("batch {} expires in {} day(s)", batch.batch_number, days),
                ));
            }
            _ => {}
        }
    }

    if !alerts.is_empty() {
        tracing::debug!(
            product_id = %record.product_id(),
            location = record.location(),
            count = alerts.len(),
            "stock alerts raised"
        );
    }

    alerts
}
