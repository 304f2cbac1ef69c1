use finplan_core::errors::Error;
use finplan_core::goals::{Goal, GoalRepositoryTrait, GoalType};
use finplan_core::Result;

use super::model::{goals_from_rows, GoalChangesDB, GoalDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::goals;
use crate::schema::goals::dsl::*;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use log::debug;

use std::sync::Arc;

pub struct GoalRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        GoalRepository { pool, writer }
    }

    fn load(&self, query: goals::BoxedQuery<'_, Sqlite>) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = query
            .order((created_at.desc(), id.asc()))
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(goals_from_rows(rows)?)
    }
}

/// Current owner of a stored goal, if the goal exists.
pub(crate) fn owner_of(
    conn: &mut SqliteConnection,
    goal_id: &str,
) -> std::result::Result<Option<String>, StorageError> {
    Ok(goals::table
        .find(goal_id)
        .select(goals::user_id)
        .first::<String>(conn)
        .optional()?)
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    async fn save(&self, goal: &Goal) -> Result<()> {
        let goal_db = GoalDB::from(goal);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(goals::table)
                    .values(&goal_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                debug!("Inserted goal {}", goal_db.id);
                Ok(())
            })
            .await
    }

    fn find_by_id(&self, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        let row = goals
            .find(goal_id)
            .select(GoalDB::as_select())
            .first::<GoalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| Error::not_found(format!("Goal {} not found", goal_id)))?;
        Ok(Goal::try_from(row)?)
    }

    fn find_by_user_id(&self, owner: &str) -> Result<Vec<Goal>> {
        self.load(goals.filter(user_id.eq(owner)).into_boxed())
    }

    fn find_active_goals_by_user_id(&self, owner: &str) -> Result<Vec<Goal>> {
        self.load(
            goals
                .filter(user_id.eq(owner))
                .filter(is_active.eq(true))
                .into_boxed(),
        )
    }

    fn find_by_user_id_and_type(&self, owner: &str, kind: GoalType) -> Result<Vec<Goal>> {
        self.load(
            goals
                .filter(user_id.eq(owner))
                .filter(goal_type.eq(kind.as_str()))
                .into_boxed(),
        )
    }

    async fn update(&self, goal: &Goal) -> Result<()> {
        let goal_db = GoalDB::from(goal);
        let changes = GoalChangesDB::from(&goal_db);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::update(
                    goals
                        .find(goal_db.id.as_str())
                        .filter(user_id.eq(goal_db.user_id.as_str())),
                )
                .set(&changes)
                .execute(conn)
                .map_err(StorageError::from)?;
                if affected == 0 {
                    let owner = owner_of(conn, &goal_db.id)?;
                    return Err(match owner {
                        Some(owner) => Error::PermissionDenied(format!(
                            "Goal {} belongs to user {}, not {}",
                            goal_db.id, owner, goal_db.user_id
                        )),
                        None => Error::not_found(format!("Goal {} not found", goal_db.id)),
                    });
                }
                Ok(())
            })
            .await
    }

    async fn delete(&self, goal_id: &str) -> Result<()> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::delete(goals.find(goal_id.as_str()))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::not_found(format!("Goal {} not found", goal_id)));
                }
                debug!("Deleted goal {}", goal_id);
                Ok(())
            })
            .await
    }

    fn exists(&self, goal_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let found = diesel::select(diesel::dsl::exists(goals.find(goal_id)))
            .get_result::<bool>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(found)
    }

    fn count_active_goals_by_type(&self, owner: &str, kind: GoalType) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = goals
            .filter(user_id.eq(owner))
            .filter(goal_type.eq(kind.as_str()))
            .filter(is_active.eq(true))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count)
    }
}
