//! Column codecs shared by the repositories.
//!
//! Amounts and rates are stored as decimal TEXT. Reading them back goes
//! through the value-object constructors so a hand-edited row cannot produce
//! an out-of-range `Rate` or a mis-rounded `Money`.

use std::str::FromStr;

use finplan_core::{Currency, Money, Rate};

use crate::errors::StorageError;

fn corrupt(column: &str, value: &str, reason: impl std::fmt::Display) -> StorageError {
    StorageError::CorruptRow(format!("{} = '{}': {}", column, value, reason))
}

pub fn parse_currency(column: &str, value: &str) -> Result<Currency, StorageError> {
    Currency::from_str(value).map_err(|e| corrupt(column, value, e))
}

pub fn parse_money(column: &str, value: &str, currency: Currency) -> Result<Money, StorageError> {
    Money::parse(value, currency).map_err(|e| corrupt(column, value, e))
}

pub fn parse_rate(column: &str, value: &str) -> Result<Rate, StorageError> {
    Rate::parse(value).map_err(|e| corrupt(column, value, e))
}

/// Stored form of an amount; the currency lives in its own column.
pub fn money_text(money: &Money) -> String {
    money.amount().to_string()
}

/// Stored form of a rate, as a percentage.
pub fn rate_text(rate: &Rate) -> String {
    rate.as_percentage().to_string()
}
