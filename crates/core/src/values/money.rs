//! Money value object: an exact decimal amount tagged with a currency.

use std::fmt;
use std::str::FromStr;

use num_traits::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::rate::Rate;
use crate::constants::{DEFAULT_CURRENCY, MONEY_DECIMAL_PRECISION};
use crate::errors::{Error, Result, ValidationError};

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Jpy,
    Usd,
    Eur,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Jpy => "JPY",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JPY" => Ok(Currency::Jpy),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "" => Err(Error::invalid_input("Currency cannot be empty")),
            other => Err(Error::invalid_input(format!(
                "Unsupported currency: {}",
                other
            ))),
        }
    }
}

/// Immutable monetary amount.
///
/// Amounts are rounded half away from zero to cents when a value is built, and
/// every operation returns a new value. Arithmetic across currencies is
/// rejected. Negative amounts are representable (a subtraction may go below
/// zero); call sites that forbid them use [`Money::non_negative`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMoney")]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

#[derive(Deserialize)]
struct RawMoney {
    amount: Decimal,
    #[serde(default)]
    currency: Currency,
}

impl TryFrom<RawMoney> for Money {
    type Error = Error;

    fn try_from(raw: RawMoney) -> Result<Self> {
        Ok(Money::new(raw.amount, raw.currency))
    }
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Money {
            amount: amount.round_dp_with_strategy(
                MONEY_DECIMAL_PRECISION,
                RoundingStrategy::MidpointAwayFromZero,
            ),
            currency,
        }
    }

    /// Builds an amount in the default currency.
    pub fn jpy(amount: Decimal) -> Self {
        Money::new(amount, Currency::Jpy)
    }

    pub fn zero(currency: Currency) -> Self {
        Money::new(Decimal::ZERO, currency)
    }

    /// Builds a value from a plain float crossing the boundary, rejecting NaN and infinities.
    pub fn from_f64(amount: f64, currency: Currency) -> Result<Self> {
        if !amount.is_finite() {
            return Err(Error::invalid_input("Amount cannot be NaN or infinite"));
        }
        let decimal = Decimal::from_f64(amount).ok_or_else(|| {
            Error::invalid_input(format!("Amount {} is out of range", amount))
        })?;
        Ok(Money::new(decimal, currency))
    }

    /// Parses a stored decimal string.
    pub fn parse(amount: &str, currency: Currency) -> Result<Self> {
        let decimal = Decimal::from_str(amount.trim())?;
        Ok(Money::new(decimal, currency))
    }

    /// Builds a value that must not be negative.
    pub fn non_negative(amount: Decimal, currency: Currency) -> Result<Self> {
        let money = Money::new(amount, currency);
        if money.is_negative() {
            return Err(Error::invalid_input(format!(
                "Amount cannot be negative: {}",
                money
            )));
        }
        Ok(money)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<()> {
        if self.currency != other.currency {
            return Err(Error::Validation(ValidationError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            )));
        }
        Ok(())
    }

    pub fn add(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        let sum = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| overflow("addition"))?;
        Ok(Money::new(sum, self.currency))
    }

    /// Subtracts `other`; the result may be negative.
    pub fn subtract(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        let difference = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| overflow("subtraction"))?;
        Ok(Money::new(difference, self.currency))
    }

    /// Multiplies by a rate expressed as a fraction (5% multiplies by 0.05).
    pub fn multiply(&self, rate: &Rate) -> Result<Money> {
        self.multiply_by_decimal(rate.as_decimal())
    }

    pub fn multiply_by_decimal(&self, factor: Decimal) -> Result<Money> {
        let product = self
            .amount
            .checked_mul(factor)
            .ok_or_else(|| overflow("multiplication"))?;
        Ok(Money::new(product, self.currency))
    }

    pub fn multiply_by_float(&self, multiplier: f64) -> Result<Money> {
        if !multiplier.is_finite() {
            return Err(Error::invalid_input("Multiplier cannot be NaN or infinite"));
        }
        let factor = Decimal::from_f64(multiplier).ok_or_else(|| {
            Error::invalid_input(format!("Multiplier {} is out of range", multiplier))
        })?;
        self.multiply_by_decimal(factor)
    }

    pub fn divide_by_decimal(&self, divisor: Decimal) -> Result<Money> {
        if divisor.is_zero() {
            return Err(Error::Calculation("Division of money by zero".to_string()));
        }
        let quotient = self
            .amount
            .checked_div(divisor)
            .ok_or_else(|| overflow("division"))?;
        Ok(Money::new(quotient, self.currency))
    }

    /// Ratio `self / other` as an unrounded decimal.
    pub fn ratio_to(&self, other: &Money) -> Result<Decimal> {
        self.ensure_same_currency(other)?;
        if other.amount.is_zero() {
            return Err(Error::Calculation(
                "Cannot take a ratio against a zero amount".to_string(),
            ));
        }
        self.amount
            .checked_div(other.amount)
            .ok_or_else(|| overflow("division"))
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn greater_than(&self, other: &Money) -> Result<bool> {
        self.ensure_same_currency(other)?;
        Ok(self.amount > other.amount)
    }

    pub fn less_than(&self, other: &Money) -> Result<bool> {
        self.ensure_same_currency(other)?;
        Ok(self.amount < other.amount)
    }

    pub fn equals(&self, other: &Money) -> Result<bool> {
        self.ensure_same_currency(other)?;
        Ok(self.amount == other.amount)
    }

    pub fn abs(&self) -> Money {
        Money::new(self.amount.abs(), self.currency)
    }

    /// Returns zero in place of a negative amount.
    pub fn floor_at_zero(&self) -> Money {
        if self.is_negative() {
            Money::zero(self.currency)
        } else {
            *self
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero(DEFAULT_CURRENCY)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

fn overflow(operation: &str) -> Error {
    Error::Calculation(format!("Decimal overflow during money {}", operation))
}
