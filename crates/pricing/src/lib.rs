//! Quantity-tiered pricing.
//!
//! Tier validation, range-overlap checks and discount arithmetic for a product's
//! tier schedule. Pure domain logic; persistence belongs to the caller.

pub mod resolver;
pub mod schedule;
pub mod tier;

pub use resolver::{PriceBreakdown, apply_tier, check_overlap, overlapping_tiers};
pub use schedule::{Quote, TierSchedule};
pub use tier::{DiscountType, PricingTier, QuantityRange, validate_tier};
