//! Tests for GoalService ownership, duplicate and achievability rules.

#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::goals::{
        Achievability, Goal, GoalRepositoryTrait, GoalService, GoalServiceTrait, GoalType, NewGoal,
        RecommendationPriority, RiskLevel,
    };
    use crate::plans::{FinancialPlan, FinancialPlanRepositoryTrait};
    use crate::profile::{ExpenseItem, FinancialProfile, SavingsCollection};
    use crate::utils::time_utils::today;
    use crate::values::{Money, Rate};
    use async_trait::async_trait;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // --- Mock GoalRepository ---
    #[derive(Clone, Default)]
    struct MockGoalRepository {
        goals: Arc<Mutex<Vec<Goal>>>,
    }

    #[async_trait]
    impl GoalRepositoryTrait for MockGoalRepository {
        async fn save(&self, goal: &Goal) -> Result<()> {
            self.goals.lock().unwrap().push(goal.clone());
            Ok(())
        }

        fn find_by_id(&self, goal_id: &str) -> Result<Goal> {
            self.goals
                .lock()
                .unwrap()
                .iter()
                .find(|g| g.id() == goal_id)
                .cloned()
                .ok_or_else(|| Error::not_found(format!("Goal {}", goal_id)))
        }

        fn find_by_user_id(&self, user_id: &str) -> Result<Vec<Goal>> {
            Ok(self
                .goals
                .lock()
                .unwrap()
                .iter()
                .filter(|g| g.user_id() == user_id)
                .cloned()
                .collect())
        }

        fn find_active_goals_by_user_id(&self, user_id: &str) -> Result<Vec<Goal>> {
            Ok(self
                .find_by_user_id(user_id)?
                .into_iter()
                .filter(|g| g.is_active())
                .collect())
        }

        fn find_by_user_id_and_type(&self, user_id: &str, goal_type: GoalType) -> Result<Vec<Goal>> {
            Ok(self
                .find_by_user_id(user_id)?
                .into_iter()
                .filter(|g| g.goal_type() == goal_type)
                .collect())
        }

        async fn update(&self, goal: &Goal) -> Result<()> {
            let mut goals = self.goals.lock().unwrap();
            let slot = goals
                .iter_mut()
                .find(|g| g.id() == goal.id())
                .ok_or_else(|| Error::not_found(format!("Goal {}", goal.id())))?;
            *slot = goal.clone();
            Ok(())
        }

        async fn delete(&self, goal_id: &str) -> Result<()> {
            let mut goals = self.goals.lock().unwrap();
            let before = goals.len();
            goals.retain(|g| g.id() != goal_id);
            if goals.len() == before {
                return Err(Error::not_found(format!("Goal {}", goal_id)));
            }
            Ok(())
        }

        fn exists(&self, goal_id: &str) -> Result<bool> {
            Ok(self.find_by_id(goal_id).is_ok())
        }

        fn count_active_goals_by_type(&self, user_id: &str, goal_type: GoalType) -> Result<i64> {
            Ok(self
                .find_by_user_id_and_type(user_id, goal_type)?
                .iter()
                .filter(|g| g.is_active())
                .count() as i64)
        }
    }

    // --- Mock FinancialPlanRepository ---
    #[derive(Clone, Default)]
    struct MockPlanRepository {
        plans: Arc<Mutex<Vec<FinancialPlan>>>,
    }

    impl MockPlanRepository {
        fn with_plan(plan: FinancialPlan) -> Self {
            Self {
                plans: Arc::new(Mutex::new(vec![plan])),
            }
        }
    }

    #[async_trait]
    impl FinancialPlanRepositoryTrait for MockPlanRepository {
        async fn save(&self, plan: &FinancialPlan) -> Result<()> {
            let mut plans = self.plans.lock().unwrap();
            plans.retain(|p| p.user_id() != plan.user_id());
            plans.push(plan.clone());
            Ok(())
        }

        fn find_by_id(&self, plan_id: &str) -> Result<FinancialPlan> {
            self.plans
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id() == plan_id)
                .cloned()
                .ok_or_else(|| Error::not_found(format!("Plan {}", plan_id)))
        }

        fn find_by_user_id(&self, user_id: &str) -> Result<FinancialPlan> {
            self.plans
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.user_id() == user_id)
                .cloned()
                .ok_or_else(|| Error::not_found(format!("Plan for user {}", user_id)))
        }

        async fn update(&self, plan: &FinancialPlan) -> Result<()> {
            self.save(plan).await
        }

        async fn delete(&self, plan_id: &str) -> Result<()> {
            self.plans.lock().unwrap().retain(|p| p.id() != plan_id);
            Ok(())
        }

        fn exists(&self, plan_id: &str) -> Result<bool> {
            Ok(self.find_by_id(plan_id).is_ok())
        }

        fn exists_by_user_id(&self, user_id: &str) -> Result<bool> {
            Ok(self.find_by_user_id(user_id).is_ok())
        }
    }

    fn plan_for(user_id: &str) -> FinancialPlan {
        let profile = FinancialProfile::new(
            user_id,
            Money::jpy(dec!(400000)),
            vec![ExpenseItem::new("living", Money::jpy(dec!(180000)), None)].into(),
            SavingsCollection::default(),
            Rate::new(dec!(3)).unwrap(),
            Rate::new(dec!(1)).unwrap(),
        )
        .unwrap();
        FinancialPlan::new(profile)
    }

    fn new_goal(user_id: &str, goal_type: GoalType, target: Decimal) -> NewGoal {
        NewGoal {
            user_id: user_id.to_string(),
            goal_type,
            title: format!("{} goal", goal_type),
            target_amount: Money::jpy(target),
            target_date: today() + Duration::days(365),
            monthly_contribution: Money::jpy(dec!(50000)),
        }
    }

    fn service_with_plan(user_id: &str) -> (GoalService, MockGoalRepository) {
        let goals = MockGoalRepository::default();
        let plans = MockPlanRepository::with_plan(plan_for(user_id));
        let service = GoalService::new(Arc::new(goals.clone()), Arc::new(plans));
        (service, goals)
    }

    #[tokio::test]
    async fn test_create_goal_saves_through_repository() {
        let (service, repo) = service_with_plan("user-1");
        let goal = service
            .create_goal(new_goal("user-1", GoalType::Savings, dec!(1000000)))
            .await
            .unwrap();
        assert!(repo.exists(goal.id()).unwrap());
        assert_eq!(service.get_goals("user-1").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_goal_requires_plan() {
        let service = GoalService::new(
            Arc::new(MockGoalRepository::default()),
            Arc::new(MockPlanRepository::default()),
        );
        let err = service
            .create_goal(new_goal("user-1", GoalType::Savings, dec!(1000)))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_second_active_retirement_goal_is_rejected() {
        let (service, repo) = service_with_plan("user-1");
        service
            .create_goal(new_goal("user-1", GoalType::Retirement, dec!(1000000)))
            .await
            .unwrap();
        let err = service
            .create_goal(new_goal("user-1", GoalType::Retirement, dec!(500000)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BusinessRule(_)));
        assert_eq!(
            repo.count_active_goals_by_type("user-1", GoalType::Retirement)
                .unwrap(),
            1
        );

        // Savings goals are not limited.
        service
            .create_goal(new_goal("user-1", GoalType::Savings, dec!(1000)))
            .await
            .unwrap();
        service
            .create_goal(new_goal("user-1", GoalType::Savings, dec!(2000)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unachievable_goal_is_rejected() {
        let (service, repo) = service_with_plan("user-1");
        let err = service
            .create_goal(new_goal("user-1", GoalType::Custom, dec!(100000000)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BusinessRule(_)));
        assert!(repo.find_by_user_id("user-1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cross_user_access_is_denied() {
        let (service, _) = service_with_plan("user-1");
        let goal = service
            .create_goal(new_goal("user-1", GoalType::Savings, dec!(1000000)))
            .await
            .unwrap();

        assert!(matches!(
            service.get_goal("user-2", goal.id()),
            Err(Error::PermissionDenied(_))
        ));
        assert!(matches!(
            service
                .update_goal_progress("user-2", goal.id(), Money::jpy(dec!(10)))
                .await,
            Err(Error::PermissionDenied(_))
        ));
        assert!(matches!(
            service.delete_goal("user-2", goal.id()).await,
            Err(Error::PermissionDenied(_))
        ));
        assert!(service.get_goal("user-1", goal.id()).is_ok());
    }

    #[tokio::test]
    async fn test_update_progress_and_delete() {
        let (service, repo) = service_with_plan("user-1");
        let goal = service
            .create_goal(new_goal("user-1", GoalType::Savings, dec!(1000000)))
            .await
            .unwrap();

        let updated = service
            .update_goal_progress("user-1", goal.id(), Money::jpy(dec!(250000)))
            .await
            .unwrap();
        assert_eq!(updated.progress().unwrap().as_percentage(), dec!(25));
        assert_eq!(
            repo.find_by_id(goal.id()).unwrap().current_amount().amount(),
            dec!(250000)
        );

        assert!(service
            .update_goal_progress("user-1", goal.id(), Money::jpy(dec!(-1)))
            .await
            .unwrap_err()
            .is_validation());

        service.delete_goal("user-1", goal.id()).await.unwrap();
        assert!(service.get_goal("user-1", goal.id()).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_reactivating_a_duplicate_is_rejected() {
        let (service, _) = service_with_plan("user-1");
        let first = service
            .create_goal(new_goal("user-1", GoalType::Emergency, dec!(500000)))
            .await
            .unwrap();
        service
            .set_goal_active("user-1", first.id(), false)
            .await
            .unwrap();
        service
            .create_goal(new_goal("user-1", GoalType::Emergency, dec!(600000)))
            .await
            .unwrap();

        let err = service
            .set_goal_active("user-1", first.id(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BusinessRule(_)));
        assert!(!service.get_goal("user-1", first.id()).unwrap().is_active());
    }

    #[tokio::test]
    async fn test_goal_analysis_uses_plan_profile() {
        let (service, _) = service_with_plan("user-1");
        let goal = service
            .create_goal(new_goal("user-1", GoalType::Savings, dec!(1000000)))
            .await
            .unwrap();

        let feasibility = service.analyze_goal("user-1", goal.id()).unwrap();
        assert_eq!(feasibility.net_savings.amount(), dec!(220000));
        assert!(feasibility.achievable);
        assert_eq!(feasibility.risk_level, RiskLevel::Low);

        assert!(service
            .suggest_goal_adjustments("user-1", goal.id())
            .unwrap()
            .is_empty());

        let advice = service
            .recommend_monthly_savings("user-1", goal.id())
            .unwrap();
        assert_eq!(advice.recommended_amount.amount(), dec!(83333.33));
        assert_eq!(advice.priority, RecommendationPriority::Low);
        assert_eq!(advice.achievability, Achievability::NeedsPlanning);
    }

    #[tokio::test]
    async fn test_goal_analysis_of_another_users_goal_is_denied() {
        let (service, _) = service_with_plan("user-1");
        let goal = service
            .create_goal(new_goal("user-1", GoalType::Savings, dec!(1000000)))
            .await
            .unwrap();

        assert!(matches!(
            service.analyze_goal("user-2", goal.id()),
            Err(Error::PermissionDenied(_))
        ));
        assert!(matches!(
            service.suggest_goal_adjustments("user-2", goal.id()),
            Err(Error::PermissionDenied(_))
        ));
        assert!(matches!(
            service.recommend_monthly_savings("user-2", goal.id()),
            Err(Error::PermissionDenied(_))
        ));
        assert!(service
            .analyze_goal("user-1", "missing")
            .unwrap_err()
            .is_not_found());
    }
}
