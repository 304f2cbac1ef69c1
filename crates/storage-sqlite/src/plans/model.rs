//! Database models for the tables a financial plan is stored across.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use finplan_core::profile::{
    ExpenseItem, FinancialProfile, FinancialProfileParts, SavingsItem,
};
use finplan_core::retirement::{RetirementData, RetirementDataParts};
use finplan_core::Currency;

use crate::errors::StorageError;
use crate::utils::{money_text, parse_currency, parse_money, parse_rate, rate_text};

/// Database model for the profile row (`financial_data`).
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::financial_data)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct FinancialDataDB {
    pub id: String,
    pub user_id: String,
    pub monthly_income: String,
    pub investment_return: String,
    pub inflation_rate: String,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&FinancialProfile> for FinancialDataDB {
    fn from(profile: &FinancialProfile) -> Self {
        Self {
            id: profile.id().to_string(),
            user_id: profile.user_id().to_string(),
            monthly_income: money_text(&profile.monthly_income()),
            investment_return: rate_text(&profile.investment_return()),
            inflation_rate: rate_text(&profile.inflation_rate()),
            currency: profile.currency().as_str().to_string(),
            created_at: profile.created_at(),
            updated_at: profile.updated_at(),
        }
    }
}

/// Database model for an expense line
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::expense_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExpenseItemDB {
    pub id: i32,
    pub financial_data_id: String,
    pub category: String,
    pub amount: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for inserting an expense line; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::expense_items)]
pub struct NewExpenseItemDB {
    pub financial_data_id: String,
    pub category: String,
    pub amount: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewExpenseItemDB {
    pub fn from_item(item: &ExpenseItem, financial_data_id: &str, now: NaiveDateTime) -> Self {
        Self {
            financial_data_id: financial_data_id.to_string(),
            category: item.category.clone(),
            amount: money_text(&item.amount),
            description: item.description.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl ExpenseItemDB {
    pub fn into_domain(self, currency: Currency) -> Result<ExpenseItem, StorageError> {
        let amount = parse_money("expense_items.amount", &self.amount, currency)?;
        Ok(ExpenseItem::new(self.category, amount, self.description))
    }
}

/// Database model for a savings line
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SavingsItemDB {
    pub id: i32,
    pub financial_data_id: String,
    pub savings_type: String,
    pub amount: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::savings_items)]
pub struct NewSavingsItemDB {
    pub financial_data_id: String,
    pub savings_type: String,
    pub amount: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewSavingsItemDB {
    pub fn from_item(item: &SavingsItem, financial_data_id: &str, now: NaiveDateTime) -> Self {
        Self {
            financial_data_id: financial_data_id.to_string(),
            savings_type: item.savings_type.clone(),
            amount: money_text(&item.amount),
            description: item.description.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl SavingsItemDB {
    pub fn into_domain(self, currency: Currency) -> Result<SavingsItem, StorageError> {
        let amount = parse_money("savings_items.amount", &self.amount, currency)?;
        Ok(SavingsItem::new(self.savings_type, amount, self.description))
    }
}

/// Database model for retirement data
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::retirement_data)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct RetirementDataDB {
    pub id: String,
    pub user_id: String,
    pub current_age: i32,
    pub retirement_age: i32,
    pub life_expectancy: i32,
    pub monthly_retirement_expenses: String,
    pub pension_amount: String,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&RetirementData> for RetirementDataDB {
    fn from(data: &RetirementData) -> Self {
        Self {
            id: data.id().to_string(),
            user_id: data.user_id().to_string(),
            current_age: data.current_age(),
            retirement_age: data.retirement_age(),
            life_expectancy: data.life_expectancy(),
            monthly_retirement_expenses: money_text(&data.monthly_retirement_expenses()),
            pension_amount: money_text(&data.pension_amount()),
            currency: data.monthly_retirement_expenses().currency().as_str().to_string(),
            created_at: data.created_at(),
            updated_at: data.updated_at(),
        }
    }
}

impl TryFrom<RetirementDataDB> for RetirementData {
    type Error = StorageError;

    fn try_from(db: RetirementDataDB) -> Result<Self, StorageError> {
        let currency = parse_currency("retirement_data.currency", &db.currency)?;
        let parts = RetirementDataParts {
            monthly_retirement_expenses: parse_money(
                "retirement_data.monthly_retirement_expenses",
                &db.monthly_retirement_expenses,
                currency,
            )?,
            pension_amount: parse_money("retirement_data.pension_amount", &db.pension_amount, currency)?,
            id: db.id,
            user_id: db.user_id,
            current_age: db.current_age,
            retirement_age: db.retirement_age,
            life_expectancy: db.life_expectancy,
            created_at: db.created_at,
            updated_at: db.updated_at,
        };
        Ok(RetirementData::restore(parts)?)
    }
}

/// Rebuilds a profile from its row and its line items.
pub fn profile_from_rows(
    row: FinancialDataDB,
    expenses: Vec<ExpenseItemDB>,
    savings: Vec<SavingsItemDB>,
) -> Result<FinancialProfile, StorageError> {
    let currency = parse_currency("financial_data.currency", &row.currency)?;
    let monthly_expenses = expenses
        .into_iter()
        .map(|item| item.into_domain(currency))
        .collect::<Result<Vec<_>, _>>()?;
    let current_savings = savings
        .into_iter()
        .map(|item| item.into_domain(currency))
        .collect::<Result<Vec<_>, _>>()?;

    let parts = FinancialProfileParts {
        monthly_income: parse_money("financial_data.monthly_income", &row.monthly_income, currency)?,
        investment_return: parse_rate("financial_data.investment_return", &row.investment_return)?,
        inflation_rate: parse_rate("financial_data.inflation_rate", &row.inflation_rate)?,
        monthly_expenses: monthly_expenses.into(),
        current_savings: current_savings.into(),
        id: row.id,
        user_id: row.user_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(FinancialProfile::restore(parts)?)
}
