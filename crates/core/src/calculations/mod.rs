//! Calculations module - compound growth, inflation, retirement needs and debt formulas.

mod financial_calculator;

#[cfg(test)]
mod financial_calculator_tests;

pub use financial_calculator::{
    compound_interest, compound_interest_with_monthly_payments, debt_payoff_months,
    emergency_fund_target, future_value, inflation_adjusted_value, present_value,
    required_savings_rate, retirement_needs, CompoundInterestResult, InflationAdjustment,
    RetirementNeeds,
};
