//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. A unit of
/// measure, a quantity range or a computed price breakdown are value objects; a
/// batch or a pricing tier is not (see [`crate::Entity`]).
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct PriceBreakdown {
///     final_price: f64,
///     savings: f64,
/// }
///
/// impl ValueObject for PriceBreakdown {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
