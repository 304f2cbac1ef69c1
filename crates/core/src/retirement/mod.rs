//! Retirement module - retirement inputs and sufficiency calculations.

mod retirement_model;

#[cfg(test)]
mod retirement_model_tests;

pub use retirement_model::{RetirementCalculation, RetirementData, RetirementDataParts};
