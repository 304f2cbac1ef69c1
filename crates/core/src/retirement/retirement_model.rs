//! Retirement domain models.

use chrono::NaiveDateTime;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_CURRENT_AGE, MAX_LIFE_EXPECTANCY, MAX_RETIREMENT_AGE, MONTHS_PER_YEAR};
use crate::errors::{Error, Result};
use crate::utils::time_utils::now_naive;
use crate::values::{Money, Rate};

/// Result of comparing projected retirement assets against the required fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementCalculation {
    pub required_amount: Money,
    pub projected_amount: Money,
    /// Zero when projected assets cover the requirement.
    pub shortfall: Money,
    /// Projected / required, capped at 100%.
    pub sufficiency_rate: Rate,
    pub recommended_monthly_savings: Money,
}

/// All persisted fields of a retirement record, used to rebuild one from storage.
#[derive(Debug, Clone)]
pub struct RetirementDataParts {
    pub id: String,
    pub user_id: String,
    pub current_age: i32,
    pub retirement_age: i32,
    pub life_expectancy: i32,
    pub monthly_retirement_expenses: Money,
    pub pension_amount: Money,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Ages and monthly amounts describing a user's retirement.
///
/// Ages always satisfy `current_age <= retirement_age <= life_expectancy`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementData {
    id: String,
    user_id: String,
    current_age: i32,
    retirement_age: i32,
    life_expectancy: i32,
    monthly_retirement_expenses: Money,
    pension_amount: Money,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl RetirementData {
    pub fn new(
        user_id: impl Into<String>,
        current_age: i32,
        retirement_age: i32,
        life_expectancy: i32,
        monthly_retirement_expenses: Money,
        pension_amount: Money,
    ) -> Result<Self> {
        let now = now_naive();
        Self::restore(RetirementDataParts {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            current_age,
            retirement_age,
            life_expectancy,
            monthly_retirement_expenses,
            pension_amount,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn restore(parts: RetirementDataParts) -> Result<Self> {
        if parts.id.trim().is_empty() {
            return Err(Error::invalid_input("Retirement data id is required"));
        }
        if parts.user_id.trim().is_empty() {
            return Err(Error::invalid_input("User id is required"));
        }
        validate_ages(parts.current_age, parts.retirement_age, parts.life_expectancy)?;
        validate_non_negative(&parts.monthly_retirement_expenses, "Monthly retirement expenses")?;
        validate_non_negative(&parts.pension_amount, "Pension amount")?;
        parts
            .monthly_retirement_expenses
            .subtract(&parts.pension_amount)?;

        Ok(RetirementData {
            id: parts.id,
            user_id: parts.user_id,
            current_age: parts.current_age,
            retirement_age: parts.retirement_age,
            life_expectancy: parts.life_expectancy,
            monthly_retirement_expenses: parts.monthly_retirement_expenses,
            pension_amount: parts.pension_amount,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn current_age(&self) -> i32 {
        self.current_age
    }

    pub fn retirement_age(&self) -> i32 {
        self.retirement_age
    }

    pub fn life_expectancy(&self) -> i32 {
        self.life_expectancy
    }

    pub fn monthly_retirement_expenses(&self) -> Money {
        self.monthly_retirement_expenses
    }

    pub fn pension_amount(&self) -> Money {
        self.pension_amount
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    pub fn calculate_years_until_retirement(&self) -> i32 {
        (self.retirement_age - self.current_age).max(0)
    }

    pub fn calculate_retirement_years(&self) -> i32 {
        (self.life_expectancy - self.retirement_age).max(0)
    }

    pub fn is_retired(&self) -> bool {
        self.current_age >= self.retirement_age
    }

    /// Monthly expenses not covered by the pension; never negative.
    pub fn pension_shortfall(&self) -> Result<Money> {
        Ok(self
            .monthly_retirement_expenses
            .subtract(&self.pension_amount)?
            .floor_at_zero())
    }

    pub fn is_pension_sufficient(&self) -> Result<bool> {
        Ok(self.pension_shortfall()?.is_zero())
    }

    /// Total fund needed to cover the monthly pension shortfall for every
    /// retirement month, with the shortfall inflated up to the retirement date.
    pub fn calculate_required_retirement_fund(&self, inflation_rate: &Rate) -> Result<Money> {
        let currency = self.monthly_retirement_expenses.currency();
        let retirement_years = self.calculate_retirement_years();
        if retirement_years <= 0 {
            return Ok(Money::zero(currency));
        }

        let monthly_shortfall = self.pension_shortfall()?;
        if monthly_shortfall.is_zero() {
            return Ok(Money::zero(currency));
        }

        let inflation_factor =
            inflation_rate.compound_factor(self.calculate_years_until_retirement())?;
        let adjusted_shortfall = monthly_shortfall.multiply_by_decimal(inflation_factor)?;

        let total_months = Decimal::from(retirement_years) * Decimal::from(MONTHS_PER_YEAR);
        adjusted_shortfall.multiply_by_decimal(total_months)
    }

    /// Compares the required fund with assets projected to the retirement date.
    pub fn calculate_retirement_sufficiency(
        &self,
        current_savings: &Money,
        monthly_savings: &Money,
        investment_return: &Rate,
        inflation_rate: &Rate,
    ) -> Result<RetirementCalculation> {
        let required_amount = self.calculate_required_retirement_fund(inflation_rate)?;
        let years = self.calculate_years_until_retirement();
        let projected_amount =
            project_assets(current_savings, monthly_savings, investment_return, years)?;

        let shortfall = required_amount.subtract(&projected_amount)?.floor_at_zero();

        let sufficiency_rate = if required_amount.is_zero() {
            Rate::new(dec!(100))?
        } else {
            let percentage = projected_amount
                .ratio_to(&required_amount)?
                .checked_mul(dec!(100))
                .unwrap_or(dec!(100));
            Rate::new(percentage.clamp(Decimal::ZERO, dec!(100)))?
        };

        let recommended_monthly_savings = recommended_monthly_savings(
            current_savings,
            &required_amount,
            investment_return,
            years,
        )?;

        debug!(
            "Retirement sufficiency for user {}: required {}, projected {}, rate {}",
            self.user_id, required_amount, projected_amount, sufficiency_rate
        );

        Ok(RetirementCalculation {
            required_amount,
            projected_amount,
            shortfall,
            sufficiency_rate,
            recommended_monthly_savings,
        })
    }

    pub fn update_current_age(&mut self, new_age: i32) -> Result<()> {
        validate_ages(new_age, self.retirement_age, self.life_expectancy)?;
        self.current_age = new_age;
        self.touch();
        Ok(())
    }

    pub fn update_retirement_age(&mut self, new_age: i32) -> Result<()> {
        validate_ages(self.current_age, new_age, self.life_expectancy)?;
        self.retirement_age = new_age;
        self.touch();
        Ok(())
    }

    pub fn update_life_expectancy(&mut self, new_age: i32) -> Result<()> {
        validate_ages(self.current_age, self.retirement_age, new_age)?;
        self.life_expectancy = new_age;
        self.touch();
        Ok(())
    }

    pub fn update_monthly_retirement_expenses(&mut self, new_expenses: Money) -> Result<()> {
        validate_non_negative(&new_expenses, "Monthly retirement expenses")?;
        new_expenses.subtract(&self.pension_amount)?;
        self.monthly_retirement_expenses = new_expenses;
        self.touch();
        Ok(())
    }

    pub fn update_pension_amount(&mut self, new_amount: Money) -> Result<()> {
        validate_non_negative(&new_amount, "Pension amount")?;
        self.monthly_retirement_expenses.subtract(&new_amount)?;
        self.pension_amount = new_amount;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = now_naive();
    }
}

/// Grows `current_savings` month by month: investment gain first, then the
/// monthly contribution.
fn project_assets(
    current_savings: &Money,
    monthly_savings: &Money,
    investment_return: &Rate,
    years: i32,
) -> Result<Money> {
    if years <= 0 {
        return Ok(*current_savings);
    }

    let monthly_rate = investment_return.monthly_rate()?;
    let mut assets = *current_savings;
    for _ in 0..(years as u32 * MONTHS_PER_YEAR) {
        let gain = assets.multiply(&monthly_rate)?;
        assets = assets.add(&gain)?.add(monthly_savings)?;
    }
    Ok(assets)
}

// Linear approximation: the gap left after current savings compound is spread
// evenly over the remaining months.
fn recommended_monthly_savings(
    current_savings: &Money,
    required_amount: &Money,
    investment_return: &Rate,
    years: i32,
) -> Result<Money> {
    if years <= 0 {
        return Ok(required_amount.subtract(current_savings)?.floor_at_zero());
    }

    let factor = investment_return.compound_factor(years)?;
    let future_value = current_savings.multiply_by_decimal(factor)?;
    let additional_required = required_amount.subtract(&future_value)?;
    if !additional_required.is_positive() {
        return Ok(Money::zero(required_amount.currency()));
    }

    let total_months = Decimal::from(years) * Decimal::from(MONTHS_PER_YEAR);
    additional_required.divide_by_decimal(total_months)
}

fn validate_ages(current_age: i32, retirement_age: i32, life_expectancy: i32) -> Result<()> {
    if !(0..=MAX_CURRENT_AGE).contains(&current_age) {
        return Err(Error::invalid_input(format!(
            "Current age must be between 0 and {}",
            MAX_CURRENT_AGE
        )));
    }
    if retirement_age < current_age {
        return Err(Error::invalid_input(
            "Retirement age must not be below the current age",
        ));
    }
    if retirement_age > MAX_RETIREMENT_AGE {
        return Err(Error::invalid_input(format!(
            "Retirement age must be at most {}",
            MAX_RETIREMENT_AGE
        )));
    }
    if life_expectancy < retirement_age {
        return Err(Error::invalid_input(
            "Life expectancy must not be below the retirement age",
        ));
    }
    if life_expectancy > MAX_LIFE_EXPECTANCY {
        return Err(Error::invalid_input(format!(
            "Life expectancy must be at most {}",
            MAX_LIFE_EXPECTANCY
        )));
    }
    Ok(())
}

fn validate_non_negative(amount: &Money, field: &str) -> Result<()> {
    if amount.is_negative() {
        return Err(Error::invalid_input(format!(
            "{} cannot be negative, got {}",
            field, amount
        )));
    }
    Ok(())
}
