//! Goals module - domain models, services, and traits.

mod goals_model;
mod goals_recommendation;
mod goals_service;
mod goals_traits;

#[cfg(test)]
mod goals_service_tests;

pub use goals_model::{Goal, GoalParts, GoalType, NewGoal, ProgressRate};
pub use goals_recommendation::{
    analyze_goal_feasibility, analyze_goal_feasibility_on, recommend_monthly_savings,
    recommend_monthly_savings_on, suggest_goal_adjustments, suggest_goal_adjustments_on,
    Achievability, GoalFeasibility, GoalRecommendation, RecommendationKind,
    RecommendationPriority, RecommendedValue, RiskLevel, SavingsRecommendation,
};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
