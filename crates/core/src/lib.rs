//! Financial planning core - domain entities, services, and traits.
//!
//! This crate contains the value objects, entities and the plan aggregate.
//! It is database-agnostic and defines repository traits that are
//! implemented by the `storage-sqlite` crate.

pub mod calculations;
pub mod constants;
pub mod errors;
pub mod goals;
pub mod plans;
pub mod profile;
pub mod retirement;
pub mod utils;
pub mod values;

pub use values::{Currency, Money, Rate};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
