//! Domain layer types and invariants.

pub mod catalog;
pub mod collections;
pub mod entities;
pub mod error;
pub mod legal;
pub mod normalize;
pub mod record;
pub mod wire;
