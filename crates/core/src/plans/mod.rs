//! Plans module - the financial plan aggregate, projections and repository trait.

mod plan_model;
mod plan_traits;

#[cfg(test)]
mod plan_model_tests;

pub use plan_model::{
    EmergencyFundConfig, EmergencyFundStatus, FinancialPlan, GoalProgress, GoalTrackStatus,
    IssueSeverity, PlanIssue, PlanProjection,
};
pub use plan_traits::FinancialPlanRepositoryTrait;
