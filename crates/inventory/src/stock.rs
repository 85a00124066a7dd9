use serde::{Deserialize, Serialize};

use stockledger_core::{Field, ProductId, Rejection, ValidationError, ValidationResult};

use crate::batch::Batch;
use crate::movement::Movement;
use crate::validator::{self, MovementOutcome};

/// Authoritative quantity state for one product at one location.
///
/// `reserved` and `quarantine` quantities are owned by other processes and are
/// never changed here. Only [`StockRecord::apply`] mutates the record, and only
/// after the movement has been fully validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    product_id: ProductId,
    location: String,
    available_quantity: f64,
    reserved_quantity: f64,
    quarantine_quantity: f64,
    unit: String,
    min_stock: Option<f64>,
    batches: Vec<Batch>,
}

impl StockRecord {
    /// Empty record (zero stock, no batches).
    pub fn new(product_id: ProductId, location: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            product_id,
            location: location.into(),
            available_quantity: 0.0,
            reserved_quantity: 0.0,
            quarantine_quantity: 0.0,
            unit: unit.into(),
            min_stock: None,
            batches: Vec::new(),
        }
    }

    pub fn with_available(mut self, quantity: f64) -> Self {
        self.available_quantity = quantity;
        self
    }

    pub fn with_reserved(mut self, quantity: f64) -> Self {
        self.reserved_quantity = quantity;
        self
    }

    pub fn with_quarantine(mut self, quantity: f64) -> Self {
        self.quarantine_quantity = quantity;
        self
    }

    pub fn with_min_stock(mut self, min_stock: f64) -> Self {
        self.min_stock = Some(min_stock);
        self
    }

    pub fn with_batches(mut self, batches: Vec<Batch>) -> Self {
        self.batches = batches;
        self
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn available_quantity(&self) -> f64 {
        self.available_quantity
    }

    pub fn reserved_quantity(&self) -> f64 {
        self.reserved_quantity
    }

    pub fn quarantine_quantity(&self) -> f64 {
        self.quarantine_quantity
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn min_stock(&self) -> Option<f64> {
        self.min_stock
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batches_mut(&mut self) -> &mut [Batch] {
        &mut self.batches
    }

    /// Everything physically on hand: available + reserved + quarantine.
    pub fn total_on_hand(&self) -> f64 {
        self.available_quantity + self.reserved_quantity + self.quarantine_quantity
    }

    pub fn has_batch(&self, batch_number: &str) -> bool {
        let batch_number = batch_number.trim();
        self.batches.iter().any(|b| b.batch_number.trim() == batch_number)
    }

    /// Whether `unit` names the same unit of measure as this record.
    ///
    /// Comparison ignores surrounding whitespace and ASCII case; there is no
    /// conversion between different units.
    pub fn unit_matches(&self, unit: &str) -> bool {
        self.unit.trim().eq_ignore_ascii_case(unit.trim())
    }

    /// Validate `movement` and, only if accepted, commit the resulting state.
    pub fn apply(&mut self, movement: &Movement) -> ValidationResult<MovementOutcome> {
        let outcome = validator::validate(self, movement)?;
        self.commit(&outcome);
        Ok(outcome)
    }

    fn commit(&mut self, outcome: &MovementOutcome) {
        self.available_quantity = outcome.new_available;
        if let Some(batch) = &outcome.new_batch {
            self.batches.push(batch.clone());
        }
    }
}

/// Stock record snapshot as returned by a backend.
///
/// Backends disagree on field casing; both spellings are accepted and
/// normalised into a [`StockRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecordInput {
    #[serde(alias = "productId")]
    pub product_id: ProductId,
    #[serde(default, alias = "locationId", alias = "location_id")]
    pub location: String,
    #[serde(default, alias = "availableQuantity")]
    pub available_quantity: f64,
    #[serde(default, alias = "reservedQuantity")]
    pub reserved_quantity: f64,
    #[serde(default, alias = "quarantineQuantity")]
    pub quarantine_quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default, alias = "minStock")]
    pub min_stock: Option<f64>,
    #[serde(default)]
    pub batches: Vec<Batch>,
}

impl TryFrom<StockRecordInput> for StockRecord {
    type Error = Rejection;

    fn try_from(input: StockRecordInput) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("available", input.available_quantity),
            ("reserved", input.reserved_quantity),
            ("quarantine", input.quarantine_quantity),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ValidationError::invalid(
                    Field::Quantity,
                    format!("{name} quantity must be a non-negative number, got {value}"),
                ));
            }
        }
        if input.unit.trim().is_empty() {
            errors.push(ValidationError::invalid(Field::Unit, "unit is required"));
        }
        Rejection::check(errors)?;

        Ok(Self {
            product_id: input.product_id,
            location: input.location,
            available_quantity: input.available_quantity,
            reserved_quantity: input.reserved_quantity,
            quarantine_quantity: input.quarantine_quantity,
            unit: input.unit.trim().to_string(),
            min_stock: input.min_stock,
            batches: input.batches,
        })
    }
}
