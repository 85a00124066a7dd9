//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Batches and pricing tiers are entities: two tiers with identical ranges are
/// still different tiers, and edits are matched by id.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
