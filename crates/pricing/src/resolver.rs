//! Overlap detection and discount arithmetic.

use serde::{Deserialize, Serialize};

use stockledger_core::{TierId, ValueObject};

use crate::tier::{DiscountType, PricingTier};

/// Other active tiers of the same product whose range overlaps `candidate`.
///
/// `excluding` removes the tier being edited so it does not collide with its own
/// previous range.
pub fn overlapping_tiers<'a>(
    candidate: &PricingTier,
    existing: &'a [PricingTier],
    excluding: Option<&TierId>,
) -> Vec<&'a PricingTier> {
    let range = candidate.range();
    existing
        .iter()
        .filter(|other| Some(&other.id) != excluding)
        .filter(|other| other.is_active && other.product_id == candidate.product_id)
        .filter(|other| range.overlaps(&other.range()))
        .collect()
}

pub fn check_overlap(candidate: &PricingTier, existing: &[PricingTier], excluding: Option<&TierId>) -> bool {
    !overlapping_tiers(candidate, existing, excluding).is_empty()
}

/// Price after a tier's discount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub final_price: f64,
    pub savings: f64,
    pub savings_percent: f64,
}

impl ValueObject for PriceBreakdown {}

impl PriceBreakdown {
    /// No discount applied.
    pub fn undiscounted(base_price: f64) -> Self {
        Self::from_final(base_price, base_price)
    }

    fn from_final(base_price: f64, final_price: f64) -> Self {
        let savings = base_price - final_price;
        let savings_percent = if base_price == 0.0 {
            0.0
        } else {
            savings * 100.0 / base_price
        };
        Self {
            base_price,
            final_price,
            savings,
            savings_percent,
        }
    }
}

/// Apply `tier`'s discount to `base_price`. The final price is never negative.
pub fn apply_tier(base_price: f64, tier: &PricingTier) -> PriceBreakdown {
    let final_price = match tier.discount_type {
        DiscountType::Percentage => base_price - base_price * tier.discount_value / 100.0,
        DiscountType::FixedAmount => base_price - tier.discount_value,
    };
    PriceBreakdown::from_final(base_price, final_price.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockledger_core::ProductId;

    fn tier(product_id: ProductId, min: i64, max: Option<i64>) -> PricingTier {
        PricingTier {
            id: TierId::new(),
            product_id,
            name: format!("{min}+"),
            min_quantity: min,
            max_quantity: max,
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
            priority: 1,
            is_active: true,
        }
    }

    fn discount(kind: DiscountType, value: f64) -> PricingTier {
        PricingTier {
            discount_type: kind,
            discount_value: value,
            ..tier(ProductId::new(), 1, None)
        }
    }

    #[test]
    fn new_range_spanning_two_tiers_overlaps_both() {
        let product = ProductId::new();
        let existing = vec![tier(product, 1, Some(9)), tier(product, 10, None)];
        let candidate = tier(product, 5, Some(12));

        assert!(check_overlap(&candidate, &existing, None));
        assert_eq!(overlapping_tiers(&candidate, &existing, None).len(), 2);
    }

    #[test]
    fn editing_excludes_own_previous_range() {
        let product = ProductId::new();
        let existing = vec![tier(product, 1, Some(9)), tier(product, 10, None)];

        let mut edited = existing[0].clone();
        edited.max_quantity = Some(8);
        assert!(!check_overlap(&edited, &existing, Some(&edited.id)));
        assert!(check_overlap(&edited, &existing, None));
    }

    #[test]
    fn inactive_and_foreign_tiers_are_ignored() {
        let product = ProductId::new();
        let mut inactive = tier(product, 1, None);
        inactive.is_active = false;
        let foreign = tier(ProductId::new(), 1, None);

        let candidate = tier(product, 5, Some(50));
        assert!(!check_overlap(&candidate, &[inactive, foreign], None));
    }

    #[test]
    fn twenty_percent_off_hundred() {
        let b = apply_tier(100.0, &discount(DiscountType::Percentage, 20.0));
        assert_eq!(b.final_price, 80.0);
        assert_eq!(b.savings, 20.0);
        assert_eq!(b.savings_percent, 20.0);
    }

    #[test]
    fn fixed_amount_is_clamped_at_zero() {
        let b = apply_tier(30.0, &discount(DiscountType::FixedAmount, 45.0));
        assert_eq!(b.final_price, 0.0);
        assert_eq!(b.savings, 30.0);
        assert_eq!(b.savings_percent, 100.0);

        let b = apply_tier(30.0, &discount(DiscountType::FixedAmount, 5.0));
        assert_eq!(b.final_price, 25.0);
    }

    #[test]
    fn zero_base_price_has_zero_savings_percent() {
        let b = apply_tier(0.0, &discount(DiscountType::FixedAmount, 5.0));
        assert_eq!(b.final_price, 0.0);
        assert_eq!(b.savings_percent, 0.0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn range() -> impl Strategy<Value = (i64, Option<i64>)> {
            (1i64..500, prop::option::of(0i64..500)).prop_map(|(min, span)| (min, span.map(|s| min + s)))
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: overlap(A, B) == overlap(B, A).
            #[test]
            fn overlap_is_symmetric((a_min, a_max) in range(), (b_min, b_max) in range()) {
                let product = ProductId::new();
                let a = tier(product, a_min, a_max);
                let b = tier(product, b_min, b_max);
                prop_assert_eq!(
                    check_overlap(&a, std::slice::from_ref(&b), None),
                    check_overlap(&b, std::slice::from_ref(&a), None)
                );
            }

            /// Property: fixed discounts never produce a negative price.
            #[test]
            fn fixed_amount_never_negative(base in 0.0f64..10_000.0, value in 0.01f64..1_000_000.0) {
                let b = apply_tier(base, &discount(DiscountType::FixedAmount, value));
                prop_assert!(b.final_price >= 0.0);
                prop_assert!(b.savings <= base + f64::EPSILON);
            }

            /// Property: valid percentage discounts keep the price within [0, base].
            #[test]
            fn percentage_stays_within_base(base in 0.0f64..10_000.0, value in 0.01f64..99.99) {
                let b = apply_tier(base, &discount(DiscountType::Percentage, value));
                prop_assert!(b.final_price >= 0.0);
                prop_assert!(b.final_price <= base);
                if base > 0.0 {
                    prop_assert!((b.savings_percent - value).abs() < 1e-6);
                }
            }
        }
    }
}
