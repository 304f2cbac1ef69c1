//! Value objects shared by the planning entities.

mod money;
mod rate;

pub use money::{Currency, Money};
pub use rate::Rate;
