//! Database models for goals.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use finplan_core::goals::{Goal, GoalParts, GoalType};

use crate::errors::StorageError;
use crate::utils::{money_text, parse_currency, parse_money};

/// Database model for goals
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub goal_type: String,
    pub title: String,
    pub target_amount: String,
    pub target_date: NaiveDate,
    pub current_amount: String,
    pub monthly_contribution: String,
    pub currency: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&Goal> for GoalDB {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id().to_string(),
            user_id: goal.user_id().to_string(),
            goal_type: goal.goal_type().as_str().to_string(),
            title: goal.title().to_string(),
            target_amount: money_text(&goal.target_amount()),
            target_date: goal.target_date(),
            current_amount: money_text(&goal.current_amount()),
            monthly_contribution: money_text(&goal.monthly_contribution()),
            currency: goal.target_amount().currency().as_str().to_string(),
            is_active: goal.is_active(),
            created_at: goal.created_at(),
            updated_at: goal.updated_at(),
        }
    }
}

/// Columns a stored goal may change. The owner and creation time are fixed
/// once the row exists.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
pub struct GoalChangesDB {
    pub goal_type: String,
    pub title: String,
    pub target_amount: String,
    pub target_date: NaiveDate,
    pub current_amount: String,
    pub monthly_contribution: String,
    pub currency: String,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<&GoalDB> for GoalChangesDB {
    fn from(db: &GoalDB) -> Self {
        Self {
            goal_type: db.goal_type.clone(),
            title: db.title.clone(),
            target_amount: db.target_amount.clone(),
            target_date: db.target_date,
            current_amount: db.current_amount.clone(),
            monthly_contribution: db.monthly_contribution.clone(),
            currency: db.currency.clone(),
            is_active: db.is_active,
            updated_at: db.updated_at,
        }
    }
}

impl TryFrom<GoalDB> for Goal {
    type Error = StorageError;

    fn try_from(db: GoalDB) -> Result<Self, StorageError> {
        let currency = parse_currency("goals.currency", &db.currency)?;
        let goal_type = GoalType::from_str(&db.goal_type).map_err(|e| {
            StorageError::CorruptRow(format!("goals.goal_type = '{}': {}", db.goal_type, e))
        })?;
        let parts = GoalParts {
            target_amount: parse_money("goals.target_amount", &db.target_amount, currency)?,
            current_amount: parse_money("goals.current_amount", &db.current_amount, currency)?,
            monthly_contribution: parse_money(
                "goals.monthly_contribution",
                &db.monthly_contribution,
                currency,
            )?,
            id: db.id,
            user_id: db.user_id,
            goal_type,
            title: db.title,
            target_date: db.target_date,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        };
        Ok(Goal::restore(parts)?)
    }
}

/// Converts loaded rows, failing on the first row that no longer decodes.
pub fn goals_from_rows(rows: Vec<GoalDB>) -> Result<Vec<Goal>, StorageError> {
    rows.into_iter().map(Goal::try_from).collect()
}
