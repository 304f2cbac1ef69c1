//! Financial profile domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MIN_HEALTHY_SAVINGS_RATIO, MONTHS_PER_YEAR};
use crate::errors::{Error, Result};
use crate::utils::time_utils::now_naive;
use crate::values::{Currency, Money, Rate};

/// A single monthly expense line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItem {
    pub category: String,
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExpenseItem {
    pub fn new(category: impl Into<String>, amount: Money, description: Option<String>) -> Self {
        ExpenseItem {
            category: category.into(),
            amount,
            description,
        }
    }
}

/// A single savings balance (deposit, investment, other).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsItem {
    #[serde(rename = "type")]
    pub savings_type: String,
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SavingsItem {
    pub fn new(savings_type: impl Into<String>, amount: Money, description: Option<String>) -> Self {
        SavingsItem {
            savings_type: savings_type.into(),
            amount,
            description,
        }
    }
}

/// Ordered list of monthly expenses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseCollection(Vec<ExpenseItem>);

impl ExpenseCollection {
    pub fn new(items: Vec<ExpenseItem>) -> Self {
        ExpenseCollection(items)
    }

    pub fn items(&self) -> &[ExpenseItem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExpenseItem> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all expense amounts; zero in `currency` when empty.
    pub fn total(&self, currency: Currency) -> Result<Money> {
        self.0
            .iter()
            .try_fold(Money::zero(currency), |acc, item| acc.add(&item.amount))
    }

    pub fn by_category(&self, category: &str) -> Vec<&ExpenseItem> {
        self.0.iter().filter(|e| e.category == category).collect()
    }
}

impl From<Vec<ExpenseItem>> for ExpenseCollection {
    fn from(items: Vec<ExpenseItem>) -> Self {
        ExpenseCollection(items)
    }
}

impl<'a> IntoIterator for &'a ExpenseCollection {
    type Item = &'a ExpenseItem;
    type IntoIter = std::slice::Iter<'a, ExpenseItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Ordered list of current savings balances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavingsCollection(Vec<SavingsItem>);

impl SavingsCollection {
    pub fn new(items: Vec<SavingsItem>) -> Self {
        SavingsCollection(items)
    }

    pub fn items(&self) -> &[SavingsItem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SavingsItem> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances; zero in `currency` when empty.
    pub fn total(&self, currency: Currency) -> Result<Money> {
        self.0
            .iter()
            .try_fold(Money::zero(currency), |acc, item| acc.add(&item.amount))
    }

    pub fn by_type(&self, savings_type: &str) -> Vec<&SavingsItem> {
        self.0
            .iter()
            .filter(|s| s.savings_type == savings_type)
            .collect()
    }
}

impl From<Vec<SavingsItem>> for SavingsCollection {
    fn from(items: Vec<SavingsItem>) -> Self {
        SavingsCollection(items)
    }
}

impl<'a> IntoIterator for &'a SavingsCollection {
    type Item = &'a SavingsItem;
    type IntoIter = std::slice::Iter<'a, SavingsItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One year of an asset projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProjection {
    pub year: u32,
    pub total_assets: Money,
    /// Nominal total deflated by cumulative inflation up to this year.
    pub real_value: Money,
    pub contributed_amount: Money,
    pub investment_gains: Money,
}

/// Non-fatal outcome of a financial health check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum FinancialHealth {
    Healthy,
    /// Net savings are below 10% of income. Callers decide whether this blocks submission.
    LowSavingsRate { savings_rate_percentage: Decimal },
}

impl FinancialHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, FinancialHealth::Healthy)
    }
}

/// All persisted fields of a profile, used to rebuild one from storage.
#[derive(Debug, Clone)]
pub struct FinancialProfileParts {
    pub id: String,
    pub user_id: String,
    pub monthly_income: Money,
    pub monthly_expenses: ExpenseCollection,
    pub current_savings: SavingsCollection,
    pub investment_return: Rate,
    pub inflation_rate: Rate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A user's income, expenses, savings and growth assumptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    id: String,
    user_id: String,
    monthly_income: Money,
    monthly_expenses: ExpenseCollection,
    current_savings: SavingsCollection,
    investment_return: Rate,
    inflation_rate: Rate,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl FinancialProfile {
    pub fn new(
        user_id: impl Into<String>,
        monthly_income: Money,
        monthly_expenses: ExpenseCollection,
        current_savings: SavingsCollection,
        investment_return: Rate,
        inflation_rate: Rate,
    ) -> Result<Self> {
        let now = now_naive();
        Self::restore(FinancialProfileParts {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            monthly_income,
            monthly_expenses,
            current_savings,
            investment_return,
            inflation_rate,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a profile from stored fields, re-checking its invariants.
    pub fn restore(parts: FinancialProfileParts) -> Result<Self> {
        if parts.id.trim().is_empty() {
            return Err(Error::invalid_input("Profile id is required"));
        }
        if parts.user_id.trim().is_empty() {
            return Err(Error::invalid_input("User id is required"));
        }
        validate_income(&parts.monthly_income)?;
        validate_expenses(&parts.monthly_expenses, parts.monthly_income.currency())?;
        validate_savings(&parts.current_savings, parts.monthly_income.currency())?;

        Ok(FinancialProfile {
            id: parts.id,
            user_id: parts.user_id,
            monthly_income: parts.monthly_income,
            monthly_expenses: parts.monthly_expenses,
            current_savings: parts.current_savings,
            investment_return: parts.investment_return,
            inflation_rate: parts.inflation_rate,
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

    pub fn monthly_income(&self) -> Money {
        self.monthly_income
    }

    pub fn monthly_expenses(&self) -> &ExpenseCollection {
        &self.monthly_expenses
    }

    pub fn current_savings(&self) -> &SavingsCollection {
        &self.current_savings
    }

    pub fn investment_return(&self) -> Rate {
        self.investment_return
    }

    pub fn inflation_rate(&self) -> Rate {
        self.inflation_rate
    }

    pub fn currency(&self) -> Currency {
        self.monthly_income.currency()
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    pub fn total_expenses(&self) -> Result<Money> {
        self.monthly_expenses.total(self.currency())
    }

    pub fn total_savings(&self) -> Result<Money> {
        self.current_savings.total(self.currency())
    }

    /// Monthly income minus total expenses. A negative result is meaningful and
    /// is returned as-is.
    pub fn calculate_net_savings(&self) -> Result<Money> {
        self.monthly_income.subtract(&self.total_expenses()?)
    }

    /// Net savings as a percentage of income (may be negative).
    pub fn savings_rate(&self) -> Result<Decimal> {
        let ratio = self.calculate_net_savings()?.ratio_to(&self.monthly_income)?;
        Ok(ratio * dec!(100))
    }

    /// Errors when expenses exceed income; warns when net savings are below
    /// 10% of income.
    pub fn validate_financial_health(&self) -> Result<FinancialHealth> {
        let net_savings = self.calculate_net_savings()?;
        if net_savings.is_negative() {
            return Err(Error::BusinessRule(
                "Monthly expenses exceed income; expenses need to be reviewed".to_string(),
            ));
        }

        let minimum = self
            .monthly_income
            .multiply_by_decimal(MIN_HEALTHY_SAVINGS_RATIO)?;
        if net_savings.less_than(&minimum)? {
            return Ok(FinancialHealth::LowSavingsRate {
                savings_rate_percentage: self.savings_rate()?,
            });
        }
        Ok(FinancialHealth::Healthy)
    }

    /// Projects total assets year by year, contributing the monthly net savings.
    pub fn project_assets(&self, years: i32) -> Result<Vec<AssetProjection>> {
        let contribution = self.calculate_net_savings()?;
        self.project_assets_with_contribution(years, contribution)
    }

    /// Projects total assets year by year with a caller-supplied monthly
    /// contribution.
    ///
    /// Starting from the current savings, each month adds the investment gain
    /// at the monthly-equivalent rate and then the contribution. Each yearly
    /// point also carries the value deflated by cumulative inflation.
    pub fn project_assets_with_contribution(
        &self,
        years: i32,
        monthly_contribution: Money,
    ) -> Result<Vec<AssetProjection>> {
        if years <= 0 {
            return Err(Error::invalid_input(format!(
                "Projection years must be positive, got {}",
                years
            )));
        }

        let monthly_rate = self.investment_return.monthly_rate()?;
        let starting = self.total_savings()?;

        let mut current_assets = starting;
        let mut total_contributed = starting;
        let mut projections = Vec::with_capacity(years as usize);

        for year in 1..=years {
            for _ in 0..MONTHS_PER_YEAR {
                let gain = current_assets.multiply(&monthly_rate)?;
                current_assets = current_assets.add(&gain)?.add(&monthly_contribution)?;
                total_contributed = total_contributed.add(&monthly_contribution)?;
            }

            let investment_gains = current_assets.subtract(&total_contributed)?;
            let inflation_factor = self.inflation_rate.compound_factor(year)?;
            let real_value = current_assets.divide_by_decimal(inflation_factor)?;

            projections.push(AssetProjection {
                year: year as u32,
                total_assets: current_assets,
                real_value,
                contributed_amount: total_contributed,
                investment_gains,
            });
        }

        Ok(projections)
    }

    pub fn update_monthly_income(&mut self, new_income: Money) -> Result<()> {
        validate_income(&new_income)?;
        validate_expenses(&self.monthly_expenses, new_income.currency())?;
        validate_savings(&self.current_savings, new_income.currency())?;
        self.monthly_income = new_income;
        self.touch();
        Ok(())
    }

    pub fn update_monthly_expenses(&mut self, new_expenses: ExpenseCollection) -> Result<()> {
        validate_expenses(&new_expenses, self.currency())?;
        self.monthly_expenses = new_expenses;
        self.touch();
        Ok(())
    }

    pub fn update_current_savings(&mut self, new_savings: SavingsCollection) -> Result<()> {
        validate_savings(&new_savings, self.currency())?;
        self.current_savings = new_savings;
        self.touch();
        Ok(())
    }

    pub fn update_investment_return(&mut self, new_rate: Rate) -> Result<()> {
        self.investment_return = new_rate;
        self.touch();
        Ok(())
    }

    pub fn update_inflation_rate(&mut self, new_rate: Rate) -> Result<()> {
        self.inflation_rate = new_rate;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = now_naive();
    }
}

fn validate_income(income: &Money) -> Result<()> {
    if !income.is_positive() {
        return Err(Error::invalid_input(format!(
            "Monthly income must be positive, got {}",
            income
        )));
    }
    Ok(())
}

fn validate_expenses(expenses: &ExpenseCollection, currency: Currency) -> Result<()> {
    if let Some(item) = expenses.iter().find(|e| e.amount.is_negative()) {
        return Err(Error::invalid_input(format!(
            "Expense '{}' cannot be negative",
            item.category
        )));
    }
    expenses.total(currency)?;
    Ok(())
}

fn validate_savings(savings: &SavingsCollection, currency: Currency) -> Result<()> {
    if let Some(item) = savings.iter().find(|s| s.amount.is_negative()) {
        return Err(Error::invalid_input(format!(
            "Savings '{}' cannot be negative",
            item.savings_type
        )));
    }
    savings.total(currency)?;
    Ok(())
}
