//! `stockledger-core` — shared building blocks for the stock ledger engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{EmptyRejection, Field, InsufficientStock, Rejection, ValidationError, ValidationResult};
pub use id::{ProductId, TierId};
pub use value_object::ValueObject;
