//! Movement validation.
//!
//! Validation never stops at the first problem: every applicable error is
//! collected so the caller can show them all at once. Checks run in a fixed
//! order (type, quantity, reason, unit, resulting stock, destination, batch data).

use serde::{Deserialize, Serialize};

use stockledger_core::{Field, Rejection, ValidationError, ValidationResult, ValueObject};

use crate::batch::{Batch, BatchStatus};
use crate::movement::{Movement, MovementInput, MovementKind};
use crate::stock::StockRecord;

/// State produced by an accepted movement. Commit it as a whole or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementOutcome {
    pub kind: MovementKind,
    pub previous_available: f64,
    pub new_available: f64,
    /// Lot created by a receipt that carried batch or expiry data.
    pub new_batch: Option<Batch>,
}

impl ValueObject for MovementOutcome {}

/// Decide whether `movement` may be applied to `record`.
///
/// Pure: the record is not modified. Use [`StockRecord::apply`] to validate and
/// commit in one step.
pub fn validate(record: &StockRecord, movement: &Movement) -> ValidationResult<MovementOutcome> {
    let mut errors = field_errors(movement.quantity, &movement.reason);
    let quantity_ok = errors.iter().all(|e| e.field() != Field::Quantity);

    let unit_ok = record.unit_matches(&movement.unit);
    if !unit_ok {
        errors.push(unit_mismatch(record, &movement.unit));
    }

    let current = record.available_quantity();
    let new_available = movement.kind.resulting_available(current, movement.quantity);
    if quantity_ok && unit_ok {
        if new_available < 0.0 {
            errors.push(ValidationError::insufficient_stock(
                current,
                movement.quantity,
                new_available,
                record.unit(),
            ));
        } else if !new_available.is_finite() {
            errors.push(ValidationError::invalid(
                Field::Quantity,
                format!(
                    "resulting stock of {current} {unit} plus {quantity} {unit} is out of range",
                    quantity = movement.quantity,
                    unit = record.unit()
                ),
            ));
        }
    }

    if movement.kind == MovementKind::Transfer {
        match movement.destination() {
            None => errors.push(ValidationError::invalid(
                Field::Notes,
                "transfers must name the destination location in notes",
            )),
            Some(destination) if destination.eq_ignore_ascii_case(record.location().trim()) => {
                errors.push(ValidationError::invalid(
                    Field::Notes,
                    format!("destination '{destination}' is the same as the source location"),
                ))
            }
            Some(_) => {}
        }
    }

    errors.extend(lot_errors(record, movement));

    if let Err(rejection) = Rejection::check(errors) {
        tracing::debug!(
            kind = %movement.kind,
            fields = ?rejection.fields(),
            "movement rejected"
        );
        return Err(rejection);
    }

    let new_batch = match movement.kind {
        MovementKind::Receipt => receipt_batch(record, movement),
        _ => None,
    };

    tracing::debug!(
        kind = %movement.kind,
        previous = current,
        new = new_available,
        batch = new_batch.as_ref().map(|b| b.batch_number.as_str()),
        "movement accepted"
    );

    Ok(MovementOutcome {
        kind: movement.kind,
        previous_available: current,
        new_available,
        new_batch,
    })
}

/// Validate a raw, string-typed movement against `record`.
///
/// A movement type or date that cannot be parsed does not stop the other
/// checks: unparseable dates are treated as absent while validating, and an
/// unknown type still gets the quantity, reason and unit checks. Every error is
/// returned in one pass.
pub fn validate_input(record: &StockRecord, input: &MovementInput) -> ValidationResult<MovementOutcome> {
    let (kind, dates) = input.parse();
    let date_errors: Vec<ValidationError> = [dates.manufacturing.as_ref().err(), dates.expiry.as_ref().err()]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    let mut rejection = match kind {
        Ok(kind) => {
            let movement = Movement {
                kind,
                quantity: input.quantity,
                unit: input.unit.clone(),
                reason: input.reason.clone(),
                notes: input.notes.clone(),
                batch_id: input.batch_id.clone(),
                cost_per_unit: input.cost_per_unit,
                manufacturing_date: dates.manufacturing.unwrap_or(None),
                expiry_date: dates.expiry.unwrap_or(None),
            };
            match validate(record, &movement) {
                Ok(outcome) => {
                    Rejection::check(date_errors)?;
                    return Ok(outcome);
                }
                Err(rejection) => rejection,
            }
        }
        Err(type_error) => {
            let mut rejection = Rejection::from(type_error);
            rejection.splice(1, field_errors(input.quantity, &input.reason));
            if !record.unit_matches(&input.unit) {
                rejection.splice(usize::MAX, [unit_mismatch(record, &input.unit)]);
            }
            rejection
        }
    };

    // Date errors belong with the lot data checks, which always come last.
    let at = rejection
        .errors()
        .iter()
        .position(|e| LOT_FIELDS.contains(&e.field()))
        .unwrap_or(rejection.errors().len());
    rejection.splice(at, date_errors);
    Err(rejection)
}

const LOT_FIELDS: [Field; 4] = [Field::CostPerUnit, Field::ManufacturingDate, Field::ExpiryDate, Field::BatchNumber];

fn field_errors(quantity: f64, reason: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !quantity.is_finite() || quantity <= 0.0 {
        errors.push(ValidationError::invalid(
            Field::Quantity,
            "quantity must be greater than zero",
        ));
    }
    if reason.trim().is_empty() {
        errors.push(ValidationError::invalid(Field::Reason, "reason is required"));
    }
    errors
}

fn unit_mismatch(record: &StockRecord, unit: &str) -> ValidationError {
    if unit.trim().is_empty() {
        return ValidationError::invalid(Field::Unit, "unit is required");
    }
    ValidationError::invalid(
        Field::Unit,
        format!("movement unit '{}' does not match stock unit '{}'", unit.trim(), record.unit()),
    )
}

fn lot_errors(record: &StockRecord, movement: &Movement) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(cost) = movement.cost_per_unit {
        if !cost.is_finite() || cost < 0.0 {
            errors.push(ValidationError::invalid(
                Field::CostPerUnit,
                "cost per unit cannot be negative",
            ));
        }
    }

    if let (Some(made), Some(expires)) = (movement.manufacturing_date, movement.expiry_date) {
        if expires < made {
            errors.push(ValidationError::invalid(
                Field::ExpiryDate,
                format!("expiry date {expires} is before manufacturing date {made}"),
            ));
        }
    }

    if movement.kind == MovementKind::Receipt {
        if let Some(number) = movement.batch_number() {
            if record.has_batch(number) {
                errors.push(ValidationError::invalid(
                    Field::BatchNumber,
                    format!("batch '{number}' already exists for this product"),
                ));
            }
        }
    }

    errors
}

fn receipt_batch(record: &StockRecord, movement: &Movement) -> Option<Batch> {
    let batch_number = match movement.batch_number() {
        Some(number) => number.to_string(),
        None if movement.expiry_date.is_some() => next_batch_number(record),
        None => return None,
    };

    Some(Batch {
        batch_number,
        quantity: movement.quantity,
        unit: record.unit().to_string(),
        manufacturing_date: movement.manufacturing_date,
        expiration_date: movement.expiry_date,
        status: BatchStatus::Active,
        location: record.location().to_string(),
    })
}

/// First free `LOT-NNNN` number, starting after the existing batch count.
fn next_batch_number(record: &StockRecord) -> String {
    (record.batches().len() + 1..)
        .map(|n| format!("LOT-{n:04}"))
        .find(|candidate| !record.has_batch(candidate))
        .unwrap_or_default()
}
