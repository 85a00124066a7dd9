//! A product's tier list, kept in priority order.

use serde::{Deserialize, Serialize};

use stockledger_core::{Field, ProductId, Rejection, TierId, ValidationError, ValidationResult};

use crate::resolver::{PriceBreakdown, apply_tier, overlapping_tiers};
use crate::tier::{PricingTier, validate_tier};

/// Result of pricing an order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub quantity: i64,
    pub tier_id: Option<TierId>,
    pub breakdown: PriceBreakdown,
}

/// Pricing tiers of one product.
///
/// Tiers are always sorted ascending by `(priority, min_quantity)`. Every
/// mutation validates first and leaves the schedule untouched on rejection.
/// No two active tiers have overlapping ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSchedule {
    product_id: ProductId,
    tiers: Vec<PricingTier>,
}

impl TierSchedule {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            tiers: Vec::new(),
        }
    }

    /// Build a schedule by inserting `tiers` one by one.
    pub fn from_tiers(product_id: ProductId, tiers: impl IntoIterator<Item = PricingTier>) -> ValidationResult<Self> {
        let mut schedule = Self::new(product_id);
        for tier in tiers {
            schedule.insert(tier)?;
        }
        Ok(schedule)
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn tiers(&self) -> &[PricingTier] {
        &self.tiers
    }

    pub fn get(&self, id: &TierId) -> Option<&PricingTier> {
        self.tiers.iter().find(|t| &t.id == id)
    }

    pub fn active(&self) -> impl Iterator<Item = &PricingTier> {
        self.tiers.iter().filter(|t| t.is_active)
    }

    pub fn insert(&mut self, tier: PricingTier) -> ValidationResult<()> {
        let mut errors = self.check(&tier, None);
        if self.get(&tier.id).is_some() {
            errors.insert(0, ValidationError::invalid(Field::Id, format!("tier {} already exists", tier.id)));
        }
        self.reject_or(errors, "insert", |tiers| tiers.push(tier))
    }

    pub fn update(&mut self, tier: PricingTier) -> ValidationResult<()> {
        let Some(index) = self.tiers.iter().position(|t| t.id == tier.id) else {
            return Err(ValidationError::invalid(Field::Id, format!("unknown tier {}", tier.id)).into());
        };
        let errors = self.check(&tier, Some(&tier.id));
        self.reject_or(errors, "update", |tiers| tiers[index] = tier)
    }

    /// Activate or deactivate a tier. Activation is subject to the overlap check.
    pub fn set_active(&mut self, id: &TierId, is_active: bool) -> ValidationResult<()> {
        let Some(tier) = self.get(id) else {
            return Err(ValidationError::invalid(Field::Id, format!("unknown tier {id}")).into());
        };
        let updated = PricingTier {
            is_active,
            ..tier.clone()
        };
        self.update(updated)
    }

    pub fn remove(&mut self, id: &TierId) -> Option<PricingTier> {
        let index = self.tiers.iter().position(|t| &t.id == id)?;
        Some(self.tiers.remove(index))
    }

    /// Active tier with the lowest priority whose range contains `quantity`.
    pub fn select(&self, quantity: i64) -> Option<&PricingTier> {
        self.tiers.iter().find(|t| t.applies_to(quantity))
    }

    pub fn quote(&self, base_price: f64, quantity: i64) -> Quote {
        let tier = self.select(quantity);
        Quote {
            quantity,
            tier_id: tier.map(|t| t.id),
            breakdown: match tier {
                Some(tier) => apply_tier(base_price, tier),
                None => PriceBreakdown::undiscounted(base_price),
            },
        }
    }

    fn check(&self, tier: &PricingTier, excluding: Option<&TierId>) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if tier.product_id != self.product_id {
            errors.push(ValidationError::invalid(
                Field::Id,
                format!("tier belongs to product {}, not {}", tier.product_id, self.product_id),
            ));
        }
        if let Err(rejection) = validate_tier(tier) {
            errors.extend(rejection.into_errors());
        }
        if tier.is_active {
            let conflicts = overlapping_tiers(tier, &self.tiers, excluding);
            if !conflicts.is_empty() {
                let names: Vec<String> = conflicts
                    .iter()
                    .map(|t| format!("'{}' ({})", t.name, t.range()))
                    .collect();
                errors.push(ValidationError::invalid(
                    Field::Range,
                    format!("range {} overlaps {}", tier.range(), names.join(", ")),
                ));
            }
        }

        errors
    }

    fn reject_or(
        &mut self,
        errors: Vec<ValidationError>,
        action: &'static str,
        mutate: impl FnOnce(&mut Vec<PricingTier>),
    ) -> ValidationResult<()> {
        if let Err(rejection) = Rejection::check(errors) {
            tracing::debug!(
                product_id = %self.product_id,
                action,
                fields = ?rejection.fields(),
                "tier change rejected"
            );
            return Err(rejection);
        }
        mutate(&mut self.tiers);
        self.sort();
        Ok(())
    }

    fn sort(&mut self) {
        self.tiers.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.min_quantity.cmp(&b.min_quantity))
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::DiscountType;

    fn tier(product_id: ProductId, name: &str, min: i64, max: Option<i64>, priority: i32) -> PricingTier {
        PricingTier {
            id: TierId::new(),
            product_id,
            name: name.to_string(),
            min_quantity: min,
            max_quantity: max,
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
            priority,
            is_active: true,
        }
    }

    fn schedule() -> (TierSchedule, TierId, TierId) {
        let product = ProductId::new();
        let small = tier(product, "Small", 1, Some(9), 2);
        let bulk = PricingTier {
            discount_type: DiscountType::FixedAmount,
            discount_value: 15.0,
            ..tier(product, "Bulk", 10, None, 1)
        };
        let ids = (small.id, bulk.id);
        let schedule = TierSchedule::from_tiers(product, [small, bulk]).unwrap();
        (schedule, ids.0, ids.1)
    }

    #[test]
    fn tiers_are_kept_in_priority_order() {
        let (schedule, small, bulk) = schedule();
        let ids: Vec<TierId> = schedule.tiers().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![bulk, small]);
    }

    #[test]
    fn overlapping_insert_is_rejected_naming_both_tiers() {
        let (mut schedule, _, _) = schedule();
        let before = schedule.clone();
        let err = schedule
            .insert(tier(schedule.product_id(), "Mid", 5, Some(12), 3))
            .unwrap_err();

        assert_eq!(err.fields(), vec![Field::Range]);
        let msg = err.to_string();
        assert!(msg.contains("'Small' (1-9)"), "{msg}");
        assert!(msg.contains("'Bulk' (10+)"), "{msg}");
        assert_eq!(schedule, before);
    }

    #[test]
    fn inactive_tier_may_overlap_until_activated() {
        let (mut schedule, _, _) = schedule();
        let mut draft = tier(schedule.product_id(), "Promo", 5, Some(12), 0);
        draft.is_active = false;
        let draft_id = draft.id;
        schedule.insert(draft).unwrap();

        let err = schedule.set_active(&draft_id, true).unwrap_err();
        assert_eq!(err.fields(), vec![Field::Range]);
        assert!(!schedule.get(&draft_id).unwrap().is_active);
    }

    #[test]
    fn update_does_not_collide_with_itself() {
        let (mut schedule, small, _) = schedule();
        let mut edited = schedule.get(&small).unwrap().clone();
        edited.max_quantity = Some(8);
        edited.priority = 0;
        schedule.update(edited).unwrap();

        assert_eq!(schedule.tiers()[0].id, small);
        assert_eq!(schedule.get(&small).unwrap().max_quantity, Some(8));
    }

    #[test]
    fn update_of_unknown_tier_is_rejected() {
        let (mut schedule, _, _) = schedule();
        let stranger = tier(schedule.product_id(), "Ghost", 100, None, 9);
        let err = schedule.update(stranger).unwrap_err();
        assert_eq!(err.fields(), vec![Field::Id]);
    }

    #[test]
    fn duplicate_id_and_foreign_product_are_rejected() {
        let (mut schedule, small, _) = schedule();
        let copy = schedule.get(&small).unwrap().clone();
        let err = schedule.insert(copy).unwrap_err();
        assert_eq!(err.fields()[0], Field::Id);

        let foreign = tier(ProductId::new(), "Other", 500, None, 9);
        let err = schedule.insert(foreign).unwrap_err();
        assert_eq!(err.fields(), vec![Field::Id]);
    }

    #[test]
    fn field_errors_and_overlap_are_reported_together() {
        let (mut schedule, _, _) = schedule();
        let mut bad = tier(schedule.product_id(), "", 3, Some(2), 5);
        bad.discount_value = 120.0;
        let err = schedule.insert(bad).unwrap_err();
        assert_eq!(
            err.fields(),
            vec![Field::Name, Field::MaxQuantity, Field::DiscountValue, Field::Range]
        );
    }

    #[test]
    fn select_picks_lowest_priority_containing_tier() {
        let (mut schedule, small, bulk) = schedule();
        assert_eq!(schedule.select(3).map(|t| t.id), Some(small));
        assert_eq!(schedule.select(9).map(|t| t.id), Some(small));
        assert_eq!(schedule.select(10).map(|t| t.id), Some(bulk));
        assert_eq!(schedule.select(0), None);

        schedule.set_active(&bulk, false).unwrap();
        assert_eq!(schedule.select(25), None);
    }

    #[test]
    fn quote_applies_selected_tier_or_none() {
        let (schedule, _, bulk) = schedule();

        let q = schedule.quote(100.0, 20);
        assert_eq!(q.tier_id, Some(bulk));
        assert_eq!(q.breakdown.final_price, 85.0);

        let q = schedule.quote(100.0, 0);
        assert_eq!(q.tier_id, None);
        assert_eq!(q.breakdown.final_price, 100.0);
        assert_eq!(q.breakdown.savings, 0.0);
    }

    #[test]
    fn remove_drops_tier() {
        let (mut schedule, small, _) = schedule();
        assert_eq!(schedule.remove(&small).map(|t| t.name), Some("Small".to_string()));
        assert!(schedule.remove(&small).is_none());
        assert_eq!(schedule.tiers().len(), 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: whatever gets inserted, accepted active tiers never overlap
            /// and the list stays sorted by priority.
            #[test]
            fn accepted_tiers_never_overlap(
                candidates in prop::collection::vec((1i64..200, prop::option::of(1i64..50), -5i32..5), 1..20)
            ) {
                let product = ProductId::new();
                let mut schedule = TierSchedule::new(product);
                for (i, (min, span, priority)) in candidates.into_iter().enumerate() {
                    let _ = schedule.insert(tier(product, &format!("T{i}"), min, span.map(|s| min + s), priority));
                }

                let active: Vec<&PricingTier> = schedule.active().collect();
                for (i, a) in active.iter().enumerate() {
                    for b in &active[i + 1..] {
                        prop_assert!(!a.range().overlaps(&b.range()));
                    }
                }
                prop_assert!(schedule.tiers().windows(2).all(|w| w[0].priority <= w[1].priority));
            }
        }
    }
}
