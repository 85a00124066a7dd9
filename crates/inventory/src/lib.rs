//! Inventory stock ledger.
//!
//! This crate contains the rules that keep per-location stock consistent:
//! movement validation, batch expiry classification and stock alerts. Everything
//! here is deterministic domain logic (no IO, no HTTP, no storage, no clock).

pub mod alert;
pub mod batch;
pub mod config;
pub mod movement;
pub mod stock;
pub mod validator;

pub use alert::{AlertKind, AlertPriority, StockAlert, stock_alerts};
pub use batch::{
    Batch, BatchStatus, ExpiryClassification, Severity, classify, classify_instant, classify_with,
    filter_by_severity,
};
pub use config::ExpiryThresholds;
pub use movement::{Movement, MovementInput, MovementKind, parse_date};
pub use stock::{StockRecord, StockRecordInput};
pub use validator::{MovementOutcome, validate, validate_input};
