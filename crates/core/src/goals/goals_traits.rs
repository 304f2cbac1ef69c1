use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalType, NewGoal};
use crate::goals::goals_recommendation::{
    GoalFeasibility, GoalRecommendation, SavingsRecommendation,
};
use crate::values::Money;
use async_trait::async_trait;

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    async fn save(&self, goal: &Goal) -> Result<()>;
    fn find_by_id(&self, goal_id: &str) -> Result<Goal>;
    /// Goals for a user, newest first.
    fn find_by_user_id(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn find_active_goals_by_user_id(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn find_by_user_id_and_type(&self, user_id: &str, goal_type: GoalType) -> Result<Vec<Goal>>;
    async fn update(&self, goal: &Goal) -> Result<()>;
    async fn delete(&self, goal_id: &str) -> Result<()>;
    fn exists(&self, goal_id: &str) -> Result<bool>;
    fn count_active_goals_by_type(&self, user_id: &str, goal_type: GoalType) -> Result<i64>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal>;
    fn get_goals(&self, user_id: &str) -> Result<Vec<Goal>>;
    async fn update_goal_progress(
        &self,
        user_id: &str,
        goal_id: &str,
        current_amount: Money,
    ) -> Result<Goal>;
    async fn set_goal_active(&self, user_id: &str, goal_id: &str, active: bool) -> Result<Goal>;
    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()>;
    /// Weighs a goal against the owner's plan profile.
    fn analyze_goal(&self, user_id: &str, goal_id: &str) -> Result<GoalFeasibility>;
    fn suggest_goal_adjustments(
        &self,
        user_id: &str,
        goal_id: &str,
    ) -> Result<Vec<GoalRecommendation>>;
    fn recommend_monthly_savings(
        &self,
        user_id: &str,
        goal_id: &str,
    ) -> Result<SavingsRecommendation>;
}
