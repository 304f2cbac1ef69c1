use finplan_core::errors::Error;
use finplan_core::goals::Goal;
use finplan_core::plans::{FinancialPlan, FinancialPlanRepositoryTrait};
use finplan_core::retirement::RetirementData;
use finplan_core::utils::time_utils::now_naive;
use finplan_core::Result;

use super::model::{
    profile_from_rows, ExpenseItemDB, FinancialDataDB, NewExpenseItemDB, NewSavingsItemDB,
    RetirementDataDB, SavingsItemDB,
};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::goals::{goals_from_rows, owner_of, GoalChangesDB, GoalDB};
use crate::schema::{expense_items, financial_data, goals, retirement_data, savings_items};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::upsert::excluded;
use diesel::SqliteConnection;
use log::{debug, info};

use std::sync::Arc;

pub struct FinancialPlanRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

/// How to locate the profile row a plan is built from.
enum PlanKey<'a> {
    Id(&'a str),
    UserId(&'a str),
}

impl FinancialPlanRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        FinancialPlanRepository { pool, writer }
    }

    fn load_plan(&self, key: PlanKey<'_>) -> Result<FinancialPlan> {
        let mut pooled = get_connection(&self.pool)?;
        let conn: &mut SqliteConnection = &mut pooled;
        // One read transaction so a concurrent save cannot be observed half applied.
        conn.transaction::<_, StorageError, _>(|conn| load_plan_with(conn, &key))
            .map_err(Error::from)
    }

    fn profile_exists(&self, key: PlanKey<'_>) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let found = match key {
            PlanKey::Id(plan_id) => {
                diesel::select(diesel::dsl::exists(financial_data::table.find(plan_id)))
                    .get_result::<bool>(&mut conn)
            }
            PlanKey::UserId(owner) => diesel::select(diesel::dsl::exists(
                financial_data::table.filter(financial_data::user_id.eq(owner)),
            ))
            .get_result::<bool>(&mut conn),
        }
        .map_err(StorageError::from)?;
        Ok(found)
    }
}

fn load_plan_with(
    conn: &mut SqliteConnection,
    key: &PlanKey<'_>,
) -> std::result::Result<FinancialPlan, StorageError> {
    let query = financial_data::table.into_boxed();
    let query = match key {
        PlanKey::Id(plan_id) => query.filter(financial_data::id.eq(*plan_id)),
        PlanKey::UserId(owner) => query.filter(financial_data::user_id.eq(*owner)),
    };
    let row = query
        .select(FinancialDataDB::as_select())
        .first::<FinancialDataDB>(conn)
        .optional()?
        .ok_or_else(|| {
            Error::not_found(match key {
                PlanKey::Id(plan_id) => format!("Financial plan {} not found", plan_id),
                PlanKey::UserId(owner) => format!("No financial plan for user {}", owner),
            })
        })?;

    let expenses = expense_items::table
        .filter(expense_items::financial_data_id.eq(&row.id))
        .order(expense_items::id.asc())
        .select(ExpenseItemDB::as_select())
        .load::<ExpenseItemDB>(conn)?;
    let savings = savings_items::table
        .filter(savings_items::financial_data_id.eq(&row.id))
        .order(savings_items::id.asc())
        .select(SavingsItemDB::as_select())
        .load::<SavingsItemDB>(conn)?;
    let retirement = retirement_data::table
        .filter(retirement_data::user_id.eq(&row.user_id))
        .select(RetirementDataDB::as_select())
        .first::<RetirementDataDB>(conn)
        .optional()?
        .map(RetirementData::try_from)
        .transpose()?;
    let goal_rows = goals::table
        .filter(goals::user_id.eq(&row.user_id))
        .order((goals::created_at.desc(), goals::id.asc()))
        .select(GoalDB::as_select())
        .load::<GoalDB>(conn)?;

    let profile = profile_from_rows(row, expenses, savings)?;
    let plan_goals: Vec<Goal> = goals_from_rows(goal_rows)?;
    Ok(FinancialPlan::from_parts(profile, retirement, plan_goals)?)
}

/// Writes every table of the plan. Runs inside the writer's transaction.
fn save_plan_with(
    conn: &mut SqliteConnection,
    profile_row: FinancialDataDB,
    mut expenses: Vec<NewExpenseItemDB>,
    mut savings: Vec<NewSavingsItemDB>,
    retirement: Option<RetirementDataDB>,
    goal_rows: Vec<GoalDB>,
) -> std::result::Result<(), StorageError> {
    // The profile is keyed by user: a second save for the same user keeps the
    // existing row and its id.
    diesel::insert_into(financial_data::table)
        .values(&profile_row)
        .on_conflict(financial_data::user_id)
        .do_update()
        .set((
            financial_data::monthly_income.eq(excluded(financial_data::monthly_income)),
            financial_data::investment_return.eq(excluded(financial_data::investment_return)),
            financial_data::inflation_rate.eq(excluded(financial_data::inflation_rate)),
            financial_data::currency.eq(excluded(financial_data::currency)),
            financial_data::updated_at.eq(excluded(financial_data::updated_at)),
        ))
        .execute(conn)?;
    let row_id = financial_data::table
        .filter(financial_data::user_id.eq(&profile_row.user_id))
        .select(financial_data::id)
        .first::<String>(conn)?;

    diesel::delete(expense_items::table.filter(expense_items::financial_data_id.eq(&row_id)))
        .execute(conn)?;
    diesel::delete(savings_items::table.filter(savings_items::financial_data_id.eq(&row_id)))
        .execute(conn)?;

    for item in expenses.iter_mut() {
        item.financial_data_id = row_id.clone();
    }
    for item in savings.iter_mut() {
        item.financial_data_id = row_id.clone();
    }
    if !expenses.is_empty() {
        diesel::insert_into(expense_items::table)
            .values(&expenses)
            .execute(conn)?;
    }
    if !savings.is_empty() {
        diesel::insert_into(savings_items::table)
            .values(&savings)
            .execute(conn)?;
    }

    if let Some(retirement) = retirement {
        diesel::insert_into(retirement_data::table)
            .values(&retirement)
            .on_conflict(retirement_data::user_id)
            .do_update()
            .set((
                retirement_data::current_age.eq(excluded(retirement_data::current_age)),
                retirement_data::retirement_age.eq(excluded(retirement_data::retirement_age)),
                retirement_data::life_expectancy.eq(excluded(retirement_data::life_expectancy)),
                retirement_data::monthly_retirement_expenses
                    .eq(excluded(retirement_data::monthly_retirement_expenses)),
                retirement_data::pension_amount.eq(excluded(retirement_data::pension_amount)),
                retirement_data::currency.eq(excluded(retirement_data::currency)),
                retirement_data::updated_at.eq(excluded(retirement_data::updated_at)),
            ))
            .execute(conn)?;
    }

    // A goal id already stored for another user is never taken over.
    for goal_row in &goal_rows {
        if let Some(owner) = owner_of(conn, &goal_row.id)? {
            if owner != goal_row.user_id {
                return Err(Error::PermissionDenied(format!(
                    "Goal {} belongs to user {}, not {}",
                    goal_row.id, owner, goal_row.user_id
                ))
                .into());
            }
        }
        diesel::insert_into(goals::table)
            .values(goal_row)
            .on_conflict(goals::id)
            .do_update()
            .set(GoalChangesDB::from(goal_row))
            .execute(conn)?;
    }

    Ok(())
}

#[async_trait]
impl FinancialPlanRepositoryTrait for FinancialPlanRepository {
    async fn save(&self, plan: &FinancialPlan) -> Result<()> {
        let profile = plan.profile();
        let profile_row = FinancialDataDB::from(profile);
        // Line items are re-parented onto the stored profile row inside the transaction.
        let now = now_naive();
        let expenses: Vec<NewExpenseItemDB> = profile
            .monthly_expenses()
            .iter()
            .map(|item| NewExpenseItemDB::from_item(item, profile.id(), now))
            .collect();
        let savings: Vec<NewSavingsItemDB> = profile
            .current_savings()
            .iter()
            .map(|item| NewSavingsItemDB::from_item(item, profile.id(), now))
            .collect();
        let retirement = plan.retirement_data().map(RetirementDataDB::from);
        let goal_rows: Vec<GoalDB> = plan.goals().iter().map(GoalDB::from).collect();
        let user = plan.user_id().to_string();
        let goal_count = goal_rows.len();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                save_plan_with(conn, profile_row, expenses, savings, retirement, goal_rows)?;
                Ok(())
            })
            .await?;
        debug!("Saved financial plan for user {} with {} goals", user, goal_count);
        Ok(())
    }

    fn find_by_id(&self, plan_id: &str) -> Result<FinancialPlan> {
        self.load_plan(PlanKey::Id(plan_id))
    }

    fn find_by_user_id(&self, user_id: &str) -> Result<FinancialPlan> {
        self.load_plan(PlanKey::UserId(user_id))
    }

    async fn update(&self, plan: &FinancialPlan) -> Result<()> {
        self.save(plan).await
    }

    async fn delete(&self, plan_id: &str) -> Result<()> {
        let plan_id = plan_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let owner = financial_data::table
                    .find(plan_id.as_str())
                    .select(financial_data::user_id)
                    .first::<String>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| {
                        Error::not_found(format!("Financial plan {} not found", plan_id))
                    })?;

                diesel::delete(goals::table.filter(goals::user_id.eq(&owner)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(retirement_data::table.filter(retirement_data::user_id.eq(&owner)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(
                    expense_items::table.filter(expense_items::financial_data_id.eq(&plan_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                diesel::delete(
                    savings_items::table.filter(savings_items::financial_data_id.eq(&plan_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                diesel::delete(financial_data::table.find(plan_id.as_str()))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                info!("Deleted financial plan {} for user {}", plan_id, owner);
                Ok(())
            })
            .await
    }

    fn exists(&self, plan_id: &str) -> Result<bool> {
        self.profile_exists(PlanKey::Id(plan_id))
    }

    fn exists_by_user_id(&self, user_id: &str) -> Result<bool> {
        self.profile_exists(PlanKey::UserId(user_id))
    }
}
