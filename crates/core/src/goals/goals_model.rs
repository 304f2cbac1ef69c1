//! Goals domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DAYS_PER_MONTH;
use crate::errors::{Error, Result};
use crate::profile::FinancialProfile;
use crate::utils::time_utils::{add_months, approx_months_between, days_between, now_naive, today};
use crate::values::{Money, Rate};

/// Kind of financial goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Savings,
    Retirement,
    Emergency,
    Custom,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Savings => "savings",
            GoalType::Retirement => "retirement",
            GoalType::Emergency => "emergency",
            GoalType::Custom => "custom",
        }
    }

    /// Retirement and emergency goals may only have one active instance per user.
    pub fn is_singular(&self) -> bool {
        matches!(self, GoalType::Retirement | GoalType::Emergency)
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "savings" => Ok(GoalType::Savings),
            "retirement" => Ok(GoalType::Retirement),
            "emergency" => Ok(GoalType::Emergency),
            "custom" => Ok(GoalType::Custom),
            other => Err(Error::invalid_input(format!("Invalid goal type: {}", other))),
        }
    }
}

/// Goal progress, always within `[0, 100]` percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRate(Rate);

impl ProgressRate {
    /// Clamps `percentage` into `[0, 100]`.
    pub fn new(percentage: Decimal) -> Result<Self> {
        let clamped = percentage.clamp(Decimal::ZERO, dec!(100));
        Ok(ProgressRate(Rate::new(clamped)?))
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0.as_percentage()
    }

    pub fn as_rate(&self) -> Rate {
        self.0
    }

    pub fn is_complete(&self) -> bool {
        self.0.as_percentage() >= dec!(100)
    }
}

impl fmt::Display for ProgressRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0.as_percentage())
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub user_id: String,
    pub goal_type: GoalType,
    pub title: String,
    pub target_amount: Money,
    pub target_date: NaiveDate,
    pub monthly_contribution: Money,
}

/// All persisted fields of a goal, used to rebuild one from storage.
#[derive(Debug, Clone)]
pub struct GoalParts {
    pub id: String,
    pub user_id: String,
    pub goal_type: GoalType,
    pub title: String,
    pub target_amount: Money,
    pub target_date: NaiveDate,
    pub current_amount: Money,
    pub monthly_contribution: Money,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    id: String,
    user_id: String,
    goal_type: GoalType,
    title: String,
    target_amount: Money,
    target_date: NaiveDate,
    current_amount: Money,
    monthly_contribution: Money,
    is_active: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Goal {
    pub fn new(new_goal: NewGoal) -> Result<Self> {
        Self::new_on(new_goal, today())
    }

    /// Creates an active goal with nothing saved yet. The target date must be
    /// strictly after `today`.
    pub fn new_on(new_goal: NewGoal, today: NaiveDate) -> Result<Self> {
        if new_goal.target_date <= today {
            return Err(Error::invalid_input("Target date must be in the future"));
        }

        let now = now_naive();
        Self::restore(GoalParts {
            id: Uuid::new_v4().to_string(),
            user_id: new_goal.user_id,
            goal_type: new_goal.goal_type,
            title: new_goal.title,
            current_amount: Money::zero(new_goal.target_amount.currency()),
            target_amount: new_goal.target_amount,
            target_date: new_goal.target_date,
            monthly_contribution: new_goal.monthly_contribution,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a stored goal. Overdue target dates are accepted here.
    pub fn restore(parts: GoalParts) -> Result<Self> {
        if parts.id.trim().is_empty() {
            return Err(Error::invalid_input("Goal id is required"));
        }
        if parts.user_id.trim().is_empty() {
            return Err(Error::invalid_input("User id is required"));
        }
        let title = validate_title(&parts.title)?;
        validate_target_amount(&parts.target_amount)?;
        validate_non_negative(&parts.current_amount, "Current amount")?;
        validate_non_negative(&parts.monthly_contribution, "Monthly contribution")?;
        // Currency mismatches surface here rather than in later arithmetic.
        parts.target_amount.subtract(&parts.current_amount)?;
        parts.target_amount.add(&parts.monthly_contribution)?;

        Ok(Goal {
            id: parts.id,
            user_id: parts.user_id,
            goal_type: parts.goal_type,
            title,
            target_amount: parts.target_amount,
            target_date: parts.target_date,
            current_amount: parts.current_amount,
            monthly_contribution: parts.monthly_contribution,
            is_active: parts.is_active,
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

    pub fn goal_type(&self) -> GoalType {
        self.goal_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn target_amount(&self) -> Money {
        self.target_amount
    }

    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    pub fn current_amount(&self) -> Money {
        self.current_amount
    }

    pub fn monthly_contribution(&self) -> Money {
        self.monthly_contribution
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    /// Progress of `current_amount` toward the target, clamped to `[0, 100]`.
    pub fn calculate_progress(&self, current_amount: &Money) -> Result<ProgressRate> {
        if self.target_amount.is_zero() {
            return ProgressRate::new(dec!(100));
        }
        let ratio = current_amount.ratio_to(&self.target_amount)?;
        let percentage = ratio
            .checked_mul(dec!(100))
            .ok_or_else(|| Error::Calculation("Progress percentage overflow".to_string()))?;
        ProgressRate::new(percentage)
    }

    /// Progress of the goal's own saved amount.
    pub fn progress(&self) -> Result<ProgressRate> {
        self.calculate_progress(&self.current_amount)
    }

    pub fn is_completed(&self) -> bool {
        self.current_amount.amount() >= self.target_amount.amount()
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(today())
    }

    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        today > self.target_date && !self.is_completed()
    }

    /// Amount still to save; zero once the goal is met.
    pub fn remaining_amount(&self) -> Result<Money> {
        if self.is_completed() {
            return Ok(Money::zero(self.target_amount.currency()));
        }
        self.target_amount.subtract(&self.current_amount)
    }

    pub fn remaining_days(&self) -> i64 {
        self.remaining_days_on(today())
    }

    /// Days until the target date; zero once it has passed.
    pub fn remaining_days_on(&self, today: NaiveDate) -> i64 {
        days_between(today, self.target_date).max(0)
    }

    pub fn estimate_completion_date(&self, monthly_savings: &Money) -> Result<NaiveDate> {
        self.estimate_completion_date_on(monthly_savings, today())
    }

    /// Date the goal would be met saving `monthly_savings` every month, counting
    /// whole months only.
    pub fn estimate_completion_date_on(
        &self,
        monthly_savings: &Money,
        today: NaiveDate,
    ) -> Result<NaiveDate> {
        if !monthly_savings.is_positive() {
            return Err(Error::invalid_input("Monthly savings must be positive"));
        }

        let remaining = self.remaining_amount()?;
        if remaining.is_zero() {
            return Ok(today);
        }

        let months = remaining
            .ratio_to(monthly_savings)?
            .trunc()
            .to_u32()
            .ok_or_else(|| Error::Calculation("Completion date is too far away".to_string()))?;
        add_months(today, months)
            .ok_or_else(|| Error::Calculation("Completion date is out of range".to_string()))
    }

    pub fn is_achievable(&self, profile: &FinancialProfile) -> Result<bool> {
        self.is_achievable_on(profile, today())
    }

    /// Whether the profile's monthly net savings cover the monthly amount needed
    /// to reach the target by its date.
    pub fn is_achievable_on(&self, profile: &FinancialProfile, today: NaiveDate) -> Result<bool> {
        let net_savings = profile.calculate_net_savings()?;
        if !net_savings.is_positive() {
            return Ok(false);
        }
        if self.target_date < today {
            return Ok(false);
        }

        let months = approx_months_between(today, self.target_date);
        if months <= 0 {
            return Ok(false);
        }

        let remaining = self.target_amount.subtract(&self.current_amount)?;
        if !remaining.is_positive() {
            return Ok(true);
        }

        let required = remaining.divide_by_decimal(Decimal::from(months))?;
        Ok(!net_savings.less_than(&required)?)
    }

    pub fn calculate_required_monthly_savings(&self) -> Result<Money> {
        self.calculate_required_monthly_savings_on(today())
    }

    /// Monthly saving needed to hit the target on time. Past due goals need the
    /// whole remainder; less than a month out counts as one month.
    pub fn calculate_required_monthly_savings_on(&self, today: NaiveDate) -> Result<Money> {
        let remaining = self.remaining_amount()?;
        if remaining.is_zero() {
            return Ok(remaining);
        }

        let remaining_days = self.remaining_days_on(today);
        if remaining_days <= 0 {
            return Ok(remaining);
        }

        let months =
            (Decimal::from(remaining_days) / Decimal::from(DAYS_PER_MONTH)).max(Decimal::ONE);
        remaining.divide_by_decimal(months)
    }

    pub fn update_current_amount(&mut self, new_amount: Money) -> Result<()> {
        validate_non_negative(&new_amount, "Current amount")?;
        self.target_amount.subtract(&new_amount)?;
        self.current_amount = new_amount;
        self.touch();
        Ok(())
    }

    pub fn update_monthly_contribution(&mut self, new_contribution: Money) -> Result<()> {
        validate_non_negative(&new_contribution, "Monthly contribution")?;
        self.target_amount.add(&new_contribution)?;
        self.monthly_contribution = new_contribution;
        self.touch();
        Ok(())
    }

    pub fn update_target_amount(&mut self, new_amount: Money) -> Result<()> {
        validate_target_amount(&new_amount)?;
        new_amount.subtract(&self.current_amount)?;
        self.target_amount = new_amount;
        self.touch();
        Ok(())
    }

    pub fn update_target_date(&mut self, new_date: NaiveDate) -> Result<()> {
        self.update_target_date_on(new_date, today())
    }

    pub fn update_target_date_on(&mut self, new_date: NaiveDate, today: NaiveDate) -> Result<()> {
        if new_date < today {
            return Err(Error::invalid_input("Target date must be in the future"));
        }
        self.target_date = new_date;
        self.touch();
        Ok(())
    }

    pub fn update_title(&mut self, new_title: &str) -> Result<()> {
        self.title = validate_title(new_title)?;
        self.touch();
        Ok(())
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = now_naive();
    }
}

fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input("Goal title is required"));
    }
    Ok(trimmed.to_string())
}

fn validate_target_amount(amount: &Money) -> Result<()> {
    if !amount.is_positive() {
        return Err(Error::invalid_input(format!(
            "Target amount must be positive, got {}",
            amount
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
