//! Stock movements and the raw-input adapter.

use core::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use stockledger_core::{Field, Rejection, ValidationError};

/// Movement type.
///
/// Wire names are the ones the back office uses: `ENTRADA`, `SALIDA`,
/// `TRANSFERENCIA`, `AJUSTE`, `MERMA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    /// Inbound receipt.
    #[serde(rename = "ENTRADA")]
    Receipt,
    /// Outbound consumption or sale.
    #[serde(rename = "SALIDA")]
    Issue,
    /// Move to another location (destination named in `notes`).
    #[serde(rename = "TRANSFERENCIA")]
    Transfer,
    /// Absolute correction: the quantity becomes the new available stock.
    #[serde(rename = "AJUSTE")]
    Adjustment,
    /// Loss or spoilage.
    #[serde(rename = "MERMA")]
    Shrinkage,
}

impl MovementKind {
    pub const ALL: [MovementKind; 5] = [
        MovementKind::Receipt,
        MovementKind::Issue,
        MovementKind::Transfer,
        MovementKind::Adjustment,
        MovementKind::Shrinkage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Receipt => "ENTRADA",
            MovementKind::Issue => "SALIDA",
            MovementKind::Transfer => "TRANSFERENCIA",
            MovementKind::Adjustment => "AJUSTE",
            MovementKind::Shrinkage => "MERMA",
        }
    }

    /// Available quantity after applying `quantity` to `available`.
    ///
    /// May be negative; callers decide whether that is acceptable.
    pub fn resulting_available(&self, available: f64, quantity: f64) -> f64 {
        match self {
            MovementKind::Receipt => available + quantity,
            MovementKind::Issue | MovementKind::Transfer | MovementKind::Shrinkage => available - quantity,
            MovementKind::Adjustment => quantity,
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MovementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ValidationError::invalid(
                    Field::MovementType,
                    format!(
                        "unknown movement type '{wanted}'; expected one of ENTRADA, SALIDA, TRANSFERENCIA, AJUSTE, MERMA"
                    ),
                )
            })
    }
}

/// A candidate movement against one stock record. Never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub kind: MovementKind,
    pub quantity: f64,
    pub unit: String,
    pub reason: String,
    pub notes: Option<String>,
    pub batch_id: Option<String>,
    pub cost_per_unit: Option<f64>,
    pub manufacturing_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

impl Movement {
    pub fn new(kind: MovementKind, quantity: f64, unit: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            quantity,
            unit: unit.into(),
            reason: reason.into(),
            notes: None,
            batch_id: None,
            cost_per_unit: None,
            manufacturing_date: None,
            expiry_date: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_batch(mut self, batch_id: impl Into<String>, expiry_date: Option<NaiveDate>) -> Self {
        self.batch_id = Some(batch_id.into());
        self.expiry_date = expiry_date;
        self
    }

    pub fn with_expiry(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    pub fn with_manufacturing_date(mut self, date: NaiveDate) -> Self {
        self.manufacturing_date = Some(date);
        self
    }

    pub fn with_cost_per_unit(mut self, cost: f64) -> Self {
        self.cost_per_unit = Some(cost);
        self
    }

    /// Trimmed destination named in `notes`, if any.
    pub fn destination(&self) -> Option<&str> {
        non_blank(self.notes.as_deref())
    }

    /// Trimmed batch identifier, if any.
    pub fn batch_number(&self) -> Option<&str> {
        non_blank(self.batch_id.as_deref())
    }
}

/// Raw movement as submitted by a form or API client.
///
/// Field names are accepted in both `snake_case` and `camelCase`; dates and the
/// movement type are still strings. Convert with [`Movement::try_from`] or
/// validate directly with [`crate::validate_input`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementInput {
    #[serde(default, alias = "movementType", alias = "type")]
    pub movement_type: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "batchId", alias = "batch_number", alias = "batchNumber")]
    pub batch_id: Option<String>,
    #[serde(default, alias = "costPerUnit")]
    pub cost_per_unit: Option<f64>,
    #[serde(default, alias = "manufacturingDate")]
    pub manufacturing_date: Option<String>,
    #[serde(default, alias = "expiryDate", alias = "expiration_date", alias = "expirationDate")]
    pub expiry_date: Option<String>,
}

impl MovementInput {
    /// Parse the string-typed fields, collecting every failure.
    pub(crate) fn parse(&self) -> (Result<MovementKind, ValidationError>, ParsedDates) {
        let kind = self.movement_type.parse::<MovementKind>();
        let dates = ParsedDates {
            manufacturing: parse_optional_date(Field::ManufacturingDate, self.manufacturing_date.as_deref()),
            expiry: parse_optional_date(Field::ExpiryDate, self.expiry_date.as_deref()),
        };
        (kind, dates)
    }
}

pub(crate) struct ParsedDates {
    pub manufacturing: Result<Option<NaiveDate>, ValidationError>,
    pub expiry: Result<Option<NaiveDate>, ValidationError>,
}

impl TryFrom<MovementInput> for Movement {
    type Error = Rejection;

    fn try_from(input: MovementInput) -> Result<Self, Self::Error> {
        let (kind, dates) = input.parse();
        let errors = [kind.as_ref().err(), dates.manufacturing.as_ref().err(), dates.expiry.as_ref().err()]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        Rejection::check(errors)?;

        Ok(Movement {
            kind: kind?,
            quantity: input.quantity,
            unit: input.unit,
            reason: input.reason,
            notes: input.notes,
            batch_id: input.batch_id,
            cost_per_unit: input.cost_per_unit,
            manufacturing_date: dates.manufacturing?,
            expiry_date: dates.expiry?,
        })
    }
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp (date part kept).
pub fn parse_date(field: Field, raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| ValidationError::invalid(field, format!("invalid date '{raw}'; expected YYYY-MM-DD")))
}

fn parse_optional_date(field: Field, raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match non_blank(raw) {
        Some(raw) => parse_date(field, raw).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
