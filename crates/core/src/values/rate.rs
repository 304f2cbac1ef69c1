//! Percentage rate value object (investment return, inflation, progress).

use std::fmt;
use std::str::FromStr;

use num_traits::FromPrimitive;
use rust_decimal::prelude::MathematicalOps;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DERIVED_RATE_DECIMAL_PRECISION, MAX_INFLATION_RATE_PERCENTAGE,
    MAX_INVESTMENT_RETURN_PERCENTAGE, MAX_RATE_PERCENTAGE, MONTHS_PER_YEAR,
    RATE_DECIMAL_PRECISION,
};
use crate::errors::{Error, Result};

const ONE_HUNDRED: Decimal = dec!(100);

/// A percentage in `[0, 100]`, stored as a percent (5% is `5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rate {
    percentage: Decimal,
}

impl TryFrom<Decimal> for Rate {
    type Error = Error;

    fn try_from(percentage: Decimal) -> Result<Self> {
        Rate::new(percentage)
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Self {
        rate.percentage
    }
}

impl Rate {
    /// Creates a rate from a percentage, rounded to four decimal places.
    pub fn new(percentage: Decimal) -> Result<Self> {
        Self::with_precision(percentage, RATE_DECIMAL_PRECISION)
    }

    fn with_precision(percentage: Decimal, precision: u32) -> Result<Self> {
        if percentage < Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "Rate cannot be negative: {}%",
                percentage
            )));
        }
        if percentage > MAX_RATE_PERCENTAGE {
            return Err(Error::invalid_input(format!(
                "Rate cannot exceed {}%: {}%",
                MAX_RATE_PERCENTAGE, percentage
            )));
        }
        Ok(Rate {
            percentage: percentage
                .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero),
        })
    }

    pub fn zero() -> Self {
        Rate {
            percentage: Decimal::ZERO,
        }
    }

    pub fn from_f64(percentage: f64) -> Result<Self> {
        if !percentage.is_finite() {
            return Err(Error::invalid_input("Rate cannot be NaN or infinite"));
        }
        let decimal = Decimal::from_f64(percentage).ok_or_else(|| {
            Error::invalid_input(format!("Rate {} is out of range", percentage))
        })?;
        Rate::new(decimal)
    }

    /// Creates a rate from a fraction (0.05 becomes 5%).
    pub fn from_fraction(fraction: Decimal) -> Result<Self> {
        let percentage = fraction
            .checked_mul(ONE_HUNDRED)
            .ok_or_else(|| Error::invalid_input("Rate is out of range"))?;
        Rate::new(percentage)
    }

    pub fn parse(percentage: &str) -> Result<Self> {
        Rate::new(Decimal::from_str(percentage.trim())?)
    }

    /// Validated constructor for an expected annual investment return.
    pub fn investment_return(percentage: Decimal) -> Result<Self> {
        if percentage > MAX_INVESTMENT_RETURN_PERCENTAGE {
            return Err(Error::invalid_input(format!(
                "Investment return cannot exceed {}%",
                MAX_INVESTMENT_RETURN_PERCENTAGE
            )));
        }
        Rate::new(percentage)
    }

    /// Validated constructor for an expected annual inflation rate.
    pub fn inflation(percentage: Decimal) -> Result<Self> {
        if percentage > MAX_INFLATION_RATE_PERCENTAGE {
            return Err(Error::invalid_input(format!(
                "Inflation rate cannot exceed {}%",
                MAX_INFLATION_RATE_PERCENTAGE
            )));
        }
        Rate::new(percentage)
    }

    pub fn as_percentage(&self) -> Decimal {
        self.percentage
    }

    /// The rate as a fraction (5% is `0.05`).
    pub fn as_decimal(&self) -> Decimal {
        self.percentage / ONE_HUNDRED
    }

    pub fn is_zero(&self) -> bool {
        self.percentage.is_zero()
    }

    pub fn add(&self, other: &Rate) -> Result<Rate> {
        Rate::new(self.percentage + other.percentage)
    }

    pub fn subtract(&self, other: &Rate) -> Result<Rate> {
        Rate::new(self.percentage - other.percentage)
    }

    pub fn multiply(&self, factor: Decimal) -> Result<Rate> {
        if factor < Decimal::ZERO {
            return Err(Error::invalid_input("Rate factor cannot be negative"));
        }
        let product = self
            .percentage
            .checked_mul(factor)
            .ok_or_else(|| Error::invalid_input("Rate is out of range"))?;
        Rate::new(product)
    }

    pub fn greater_than(&self, other: &Rate) -> bool {
        self.percentage > other.percentage
    }

    pub fn less_than(&self, other: &Rate) -> bool {
        self.percentage < other.percentage
    }

    /// `(1 + rate)^periods`; 1 for zero periods and 0 for negative periods.
    pub fn compound_factor(&self, periods: i32) -> Result<Decimal> {
        if periods < 0 {
            return Ok(Decimal::ZERO);
        }
        if periods == 0 {
            return Ok(Decimal::ONE);
        }
        (Decimal::ONE + self.as_decimal())
            .checked_powi(i64::from(periods))
            .ok_or_else(|| {
                Error::Calculation(format!(
                    "Compound factor overflow for {} over {} periods",
                    self, periods
                ))
            })
    }

    /// Converts an annual rate to the equivalent monthly compounding rate:
    /// `(1 + annual)^(1/12) - 1`.
    pub fn monthly_rate(&self) -> Result<Rate> {
        if self.is_zero() {
            return Ok(Rate::zero());
        }
        let failed = || Error::Calculation(format!("Cannot derive monthly rate from {}", self));
        let exponent = Decimal::ONE / Decimal::from(MONTHS_PER_YEAR);
        let factor = (Decimal::ONE + self.as_decimal())
            .checked_powd(exponent)
            .ok_or_else(failed)?;
        let percentage = (factor - Decimal::ONE)
            .checked_mul(ONE_HUNDRED)
            .ok_or_else(failed)?;
        Rate::with_precision(percentage, DERIVED_RATE_DECIMAL_PRECISION)
    }

    /// Converts a monthly rate to the equivalent annual rate: `(1 + monthly)^12 - 1`.
    pub fn annual_rate(&self) -> Result<Rate> {
        let factor = self.compound_factor(MONTHS_PER_YEAR as i32)?;
        let percentage = (factor - Decimal::ONE)
            .checked_mul(ONE_HUNDRED)
            .ok_or_else(|| Error::Calculation(format!("Cannot annualize {}", self)))?;
        Rate::with_precision(percentage, DERIVED_RATE_DECIMAL_PRECISION)
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}%", self.percentage)
    }
}
