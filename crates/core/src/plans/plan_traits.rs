use crate::errors::Result;
use crate::plans::plan_model::FinancialPlan;
use async_trait::async_trait;

/// Trait for financial plan repository operations.
///
/// A plan is stored across the profile, line item, retirement and goal tables.
/// Writes touch all of them in one transaction.
#[async_trait]
pub trait FinancialPlanRepositoryTrait: Send + Sync {
    /// Inserts or replaces the whole plan, keyed by the profile's user id.
    async fn save(&self, plan: &FinancialPlan) -> Result<()>;
    /// Loads a plan by its id (the profile id). Missing plans are `NotFound`.
    fn find_by_id(&self, plan_id: &str) -> Result<FinancialPlan>;
    fn find_by_user_id(&self, user_id: &str) -> Result<FinancialPlan>;
    async fn update(&self, plan: &FinancialPlan) -> Result<()>;
    /// Removes the plan together with the user's goals and retirement data.
    async fn delete(&self, plan_id: &str) -> Result<()>;
    fn exists(&self, plan_id: &str) -> Result<bool>;
    fn exists_by_user_id(&self, user_id: &str) -> Result<bool>;
}
