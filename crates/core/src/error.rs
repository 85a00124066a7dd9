//! Validation error model.
//!
//! Every rejection produced by the engine is a plain return value carrying a
//! machine-readable [`Field`] and a human message. Nothing here is fatal: the
//! caller surfaces the errors and the user corrects the input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used by validating operations.
pub type ValidationResult<T> = Result<T, Rejection>;

/// Input field a validation error is attached to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    MovementType,
    Quantity,
    Reason,
    Notes,
    Unit,
    ExpiryDate,
    ExpiryThreshold,
    ManufacturingDate,
    CostPerUnit,
    BatchNumber,
    Name,
    MinQuantity,
    MaxQuantity,
    DiscountValue,
    Range,
}

impl Field {
    /// Wire name of the field (matches the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::MovementType => "movementType",
            Field::Quantity => "quantity",
            Field::Reason => "reason",
            Field::Notes => "notes",
            Field::Unit => "unit",
            Field::ExpiryDate => "expiryDate",
            Field::ExpiryThreshold => "expiryThreshold",
            Field::ManufacturingDate => "manufacturingDate",
            Field::CostPerUnit => "costPerUnit",
            Field::BatchNumber => "batchNumber",
            Field::Name => "name",
            Field::MinQuantity => "minQuantity",
            Field::MaxQuantity => "maxQuantity",
            Field::DiscountValue => "discountValue",
            Field::Range => "range",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details of a movement that would drive available stock below zero.
///
/// `deficit` is the computed resulting quantity (negative), not its magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsufficientStock {
    pub current: f64,
    pub requested: f64,
    pub deficit: f64,
    pub unit: String,
}

impl core::fmt::Display for InsufficientStock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "insufficient stock: available {current} {unit}, requested {requested} {unit}, resulting stock would be {deficit} {unit}",
            current = self.current,
            requested = self.requested,
            deficit = self.deficit,
            unit = self.unit,
        )
    }
}

/// A single validation failure.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// Malformed or semantically invalid input.
    #[error("{message}")]
    Invalid { field: Field, message: String },

    /// The movement would leave negative available stock.
    #[error("{0}")]
    InsufficientStock(InsufficientStock),
}

impl ValidationError {
    pub fn invalid(field: Field, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }

    pub fn insufficient_stock(current: f64, requested: f64, deficit: f64, unit: impl Into<String>) -> Self {
        Self::InsufficientStock(InsufficientStock {
            current,
            requested,
            deficit,
            unit: unit.into(),
        })
    }

    /// Field the error is reported against.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Invalid { field, .. } => *field,
            ValidationError::InsufficientStock(_) => Field::Quantity,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Every problem found with a candidate input, in evaluation order.
///
/// Never empty: use [`Rejection::check`] to turn a collected list into a result.
/// Serialized as the bare error list; an empty list does not deserialize.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ValidationError>", into = "Vec<ValidationError>")]
pub struct Rejection {
    errors: Vec<ValidationError>,
}

impl Rejection {
    /// `Ok(())` when nothing was collected, otherwise a rejection with all errors.
    pub fn check(errors: Vec<ValidationError>) -> ValidationResult<()> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self { errors })
        }
    }

    /// Insert `errors` before position `index` (clamped), keeping the rest in order.
    pub fn splice(&mut self, index: usize, errors: impl IntoIterator<Item = ValidationError>) {
        let index = index.min(self.errors.len());
        self.errors.splice(index..index, errors);
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn fields(&self) -> Vec<Field> {
        self.errors.iter().map(ValidationError::field).collect()
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    /// The insufficient-stock detail, if the rejection carries one.
    pub fn insufficient_stock(&self) -> Option<&InsufficientStock> {
        self.errors.iter().find_map(|e| match e {
            ValidationError::InsufficientStock(detail) => Some(detail),
            ValidationError::Invalid { .. } => None,
        })
    }
}

/// A rejection was built from an empty error list.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("a rejection needs at least one validation error")]
pub struct EmptyRejection;

impl TryFrom<Vec<ValidationError>> for Rejection {
    type Error = EmptyRejection;

    fn try_from(errors: Vec<ValidationError>) -> Result<Self, Self::Error> {
        Rejection::check(errors).err().ok_or(EmptyRejection)
    }
}

impl From<Rejection> for Vec<ValidationError> {
    fn from(rejection: Rejection) -> Self {
        rejection.errors
    }
}

impl From<ValidationError> for Rejection {
    fn from(error: ValidationError) -> Self {
        Self { errors: vec![error] }
    }
}

impl core::fmt::Display for Rejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("validation failed: ")?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field(), error)?;
        }
        Ok(())
    }
}
