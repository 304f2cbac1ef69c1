use log::{debug, info};
use std::sync::Arc;

use super::goals_model::{Goal, NewGoal};
use super::goals_recommendation::{
    analyze_goal_feasibility, recommend_monthly_savings, suggest_goal_adjustments,
    GoalFeasibility, GoalRecommendation, SavingsRecommendation,
};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::errors::{Error, Result};
use crate::plans::FinancialPlanRepositoryTrait;
use crate::profile::FinancialProfile;
use crate::values::Money;

/// Service for managing a user's goals outside of a full plan save.
pub struct GoalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    plan_repository: Arc<dyn FinancialPlanRepositoryTrait>,
}

impl GoalService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        plan_repository: Arc<dyn FinancialPlanRepositoryTrait>,
    ) -> Self {
        GoalService {
            goal_repository,
            plan_repository,
        }
    }

    /// Loads a goal and checks that `user_id` owns it.
    fn load_owned(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        let goal = self.goal_repository.find_by_id(goal_id)?;
        if goal.user_id() != user_id {
            return Err(Error::PermissionDenied(format!(
                "Goal {} does not belong to user {}",
                goal_id, user_id
            )));
        }
        Ok(goal)
    }

    fn plan_profile(&self, user_id: &str) -> Result<FinancialProfile> {
        let plan = self.plan_repository.find_by_user_id(user_id).map_err(|e| {
            if e.is_not_found() {
                Error::not_found(format!(
                    "No financial plan for user {}; create one first",
                    user_id
                ))
            } else {
                e
            }
        })?;
        Ok(plan.profile().clone())
    }

    fn ensure_no_active_duplicate(&self, goal: &Goal) -> Result<()> {
        if !goal.goal_type().is_singular() {
            return Ok(());
        }
        let active = self
            .goal_repository
            .find_by_user_id_and_type(goal.user_id(), goal.goal_type())?
            .into_iter()
            .filter(|g| g.is_active() && g.id() != goal.id())
            .count();
        if active > 0 {
            return Err(Error::BusinessRule(format!(
                "An active {} goal already exists",
                goal.goal_type()
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl GoalServiceTrait for GoalService {
    /// Creates a goal for a user who already has a plan.
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        debug!(
            "Creating {} goal '{}' for user {}",
            new_goal.goal_type, new_goal.title, new_goal.user_id
        );

        let profile = self.plan_profile(&new_goal.user_id)?;

        let goal = Goal::new(new_goal)?;
        self.ensure_no_active_duplicate(&goal)?;

        if !goal.is_achievable(&profile)? {
            return Err(Error::BusinessRule(format!(
                "Goal '{}' is not reachable with the current finances; adjust the amount or date",
                goal.title()
            )));
        }

        self.goal_repository.save(&goal).await?;
        info!("Created goal {} for user {}", goal.id(), goal.user_id());
        Ok(goal)
    }

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        self.load_owned(user_id, goal_id)
    }

    fn get_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.goal_repository.find_by_user_id(user_id)
    }

    async fn update_goal_progress(
        &self,
        user_id: &str,
        goal_id: &str,
        current_amount: Money,
    ) -> Result<Goal> {
        let mut goal = self.load_owned(user_id, goal_id)?;
        goal.update_current_amount(current_amount)?;
        self.goal_repository.update(&goal).await?;
        debug!("Updated progress of goal {} to {}", goal_id, current_amount);
        Ok(goal)
    }

    async fn set_goal_active(&self, user_id: &str, goal_id: &str, active: bool) -> Result<Goal> {
        let mut goal = self.load_owned(user_id, goal_id)?;
        if active {
            goal.activate();
            self.ensure_no_active_duplicate(&goal)?;
        } else {
            goal.deactivate();
        }
        self.goal_repository.update(&goal).await?;
        Ok(goal)
    }

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()> {
        self.load_owned(user_id, goal_id)?;
        self.goal_repository.delete(goal_id).await?;
        info!("Deleted goal {} for user {}", goal_id, user_id);
        Ok(())
    }

    fn analyze_goal(&self, user_id: &str, goal_id: &str) -> Result<GoalFeasibility> {
        let goal = self.load_owned(user_id, goal_id)?;
        let profile = self.plan_profile(user_id)?;
        analyze_goal_feasibility(&goal, &profile)
    }

    fn suggest_goal_adjustments(
        &self,
        user_id: &str,
        goal_id: &str,
    ) -> Result<Vec<GoalRecommendation>> {
        let goal = self.load_owned(user_id, goal_id)?;
        let profile = self.plan_profile(user_id)?;
        suggest_goal_adjustments(&goal, &profile)
    }

    fn recommend_monthly_savings(
        &self,
        user_id: &str,
        goal_id: &str,
    ) -> Result<SavingsRecommendation> {
        let goal = self.load_owned(user_id, goal_id)?;
        recommend_monthly_savings(&goal)
    }
}
