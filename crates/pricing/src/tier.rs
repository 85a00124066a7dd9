use serde::{Deserialize, Serialize};

use stockledger_core::{Entity, Field, ProductId, Rejection, TierId, ValidationError, ValidationResult, ValueObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` percent off the base price.
    Percentage,
    /// `discount_value` currency units off the base price.
    FixedAmount,
}

/// Inclusive quantity range; `max = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantityRange {
    pub min: i64,
    pub max: Option<i64>,
}

impl ValueObject for QuantityRange {}

impl QuantityRange {
    pub fn new(min: i64, max: Option<i64>) -> Self {
        Self { min, max }
    }

    fn upper(&self) -> i64 {
        self.max.unwrap_or(i64::MAX)
    }

    pub fn contains(&self, quantity: i64) -> bool {
        self.min <= quantity && quantity <= self.upper()
    }

    /// `[a_min, a_max]` and `[b_min, b_max]` overlap iff `a_min <= b_max && b_min <= a_max`.
    pub fn overlaps(&self, other: &QuantityRange) -> bool {
        self.min <= other.upper() && other.min <= self.upper()
    }
}

impl core::fmt::Display for QuantityRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

/// Quantity-range discount rule for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    pub id: TierId,
    pub product_id: ProductId,
    pub name: String,
    pub min_quantity: i64,
    pub max_quantity: Option<i64>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    /// Lower applies first.
    pub priority: i32,
    pub is_active: bool,
}

impl Entity for PricingTier {
    type Id = TierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl PricingTier {
    pub fn range(&self) -> QuantityRange {
        QuantityRange::new(self.min_quantity, self.max_quantity)
    }

    pub fn applies_to(&self, quantity: i64) -> bool {
        self.is_active && self.range().contains(quantity)
    }
}

/// Field-level checks for a tier being created or edited. Overlap is checked separately.
pub fn validate_tier(tier: &PricingTier) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if tier.name.trim().is_empty() {
        errors.push(ValidationError::invalid(Field::Name, "tier name is required"));
    }
    if tier.min_quantity <= 0 {
        errors.push(ValidationError::invalid(
            Field::MinQuantity,
            "minimum quantity must be greater than zero",
        ));
    }
    if let Some(max) = tier.max_quantity {
        if max <= tier.min_quantity {
            errors.push(ValidationError::invalid(
                Field::MaxQuantity,
                format!(
                    "maximum quantity ({max}) must be greater than minimum quantity ({})",
                    tier.min_quantity
                ),
            ));
        }
    }
    if !tier.discount_value.is_finite() || tier.discount_value <= 0.0 {
        errors.push(ValidationError::invalid(
            Field::DiscountValue,
            "discount value must be greater than zero",
        ));
    } else if tier.discount_type == DiscountType::Percentage && tier.discount_value >= 100.0 {
        errors.push(ValidationError::invalid(
            Field::DiscountValue,
            "percentage discount must be less than 100",
        ));
    }

    Rejection::check(errors)
}
