//! Tests for the financial plan aggregate.

#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::goals::{Goal, GoalParts, GoalType};
    use crate::plans::{EmergencyFundConfig, FinancialPlan, GoalTrackStatus, IssueSeverity};
    use crate::profile::{ExpenseItem, FinancialProfile, SavingsItem};
    use crate::retirement::RetirementData;
    use crate::values::{Currency, Money, Rate};
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn profile(user_id: &str, income: Decimal, expenses: Decimal) -> FinancialProfile {
        FinancialProfile::new(
            user_id,
            Money::jpy(income),
            vec![ExpenseItem::new("living", Money::jpy(expenses), None)].into(),
            vec![SavingsItem::new("deposit", Money::jpy(dec!(1000000)), None)].into(),
            Rate::new(dec!(3)).unwrap(),
            Rate::new(dec!(1)).unwrap(),
        )
        .unwrap()
    }

    fn plan() -> FinancialPlan {
        FinancialPlan::new(profile("user-1", dec!(400000), dec!(180000)))
    }

    /// Builds a goal created `created_days_ago` before the pinned date.
    fn goal(
        user_id: &str,
        goal_type: GoalType,
        target: Decimal,
        current: Decimal,
        created_days_ago: i64,
        due_in_days: i64,
    ) -> Goal {
        let created_at = (today() - Duration::days(created_days_ago))
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Goal::restore(GoalParts {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            goal_type,
            title: format!("{} goal", goal_type),
            target_amount: Money::jpy(target),
            target_date: today() + Duration::days(due_in_days),
            current_amount: Money::jpy(current),
            monthly_contribution: Money::jpy(dec!(10000)),
            is_active: true,
            created_at,
            updated_at: created_at,
        })
        .unwrap()
    }

    // ==================== Composition ====================

    #[test]
    fn test_plan_id_is_profile_id() {
        let plan = plan();
        assert_eq!(plan.id(), plan.profile().id());
        assert_eq!(plan.user_id(), "user-1");
        assert!(plan.retirement_data().is_none());
        assert_eq!(plan.emergency_fund().target_months(), 3);
        assert!(plan.emergency_fund().current_fund().is_zero());
    }

    #[test]
    fn test_children_must_belong_to_profile_user() {
        let mut plan = plan();
        let foreign_goal = goal("user-2", GoalType::Savings, dec!(1000), dec!(0), 0, 100);
        assert!(plan.add_goal(foreign_goal).unwrap_err().is_validation());

        let foreign_retirement = RetirementData::new(
            "user-2",
            35,
            65,
            85,
            Money::jpy(dec!(250000)),
            Money::jpy(dec!(150000)),
        )
        .unwrap();
        assert!(plan.set_retirement_data(foreign_retirement).is_err());

        assert!(plan
            .update_profile(profile("user-2", dec!(1), dec!(0)))
            .is_err());
        plan.update_profile(profile("user-1", dec!(500000), dec!(100000)))
            .unwrap();
    }

    #[test]
    fn test_only_one_active_retirement_or_emergency_goal() {
        let mut plan = plan();
        plan.add_goal(goal("user-1", GoalType::Retirement, dec!(1000), dec!(0), 0, 400))
            .unwrap();
        let err = plan
            .add_goal(goal("user-1", GoalType::Retirement, dec!(2000), dec!(0), 0, 400))
            .unwrap_err();
        assert!(matches!(err, Error::BusinessRule(_)));

        plan.add_goal(goal("user-1", GoalType::Emergency, dec!(1000), dec!(0), 0, 400))
            .unwrap();
        assert!(plan
            .add_goal(goal("user-1", GoalType::Emergency, dec!(1000), dec!(0), 0, 400))
            .is_err());

        plan.add_goal(goal("user-1", GoalType::Savings, dec!(1000), dec!(0), 0, 400))
            .unwrap();
        plan.add_goal(goal("user-1", GoalType::Savings, dec!(1000), dec!(0), 0, 400))
            .unwrap();

        assert!(plan.has_retirement_goal());
        assert!(plan.has_emergency_goal());
        assert_eq!(plan.goals_by_type(GoalType::Savings).len(), 2);
        assert_eq!(plan.active_goals().len(), 4);
    }

    #[test]
    fn test_inactive_duplicate_is_allowed() {
        let mut plan = plan();
        plan.add_goal(goal("user-1", GoalType::Retirement, dec!(1000), dec!(0), 0, 400))
            .unwrap();
        let mut retired = goal("user-1", GoalType::Retirement, dec!(1000), dec!(0), 0, 400);
        retired.deactivate();
        plan.add_goal(retired.clone()).unwrap();
        assert_eq!(plan.active_goals().len(), 1);

        // Reactivating it through replace_goal would create a second active one.
        retired.activate();
        assert!(matches!(
            plan.replace_goal(retired),
            Err(Error::BusinessRule(_))
        ));
    }

    #[test]
    fn test_remove_goal() {
        let mut plan = plan();
        let g = goal("user-1", GoalType::Savings, dec!(1000), dec!(0), 0, 400);
        let id = g.id().to_string();
        plan.add_goal(g).unwrap();
        assert!(plan.add_goal(plan.goal(&id).unwrap().clone()).is_err());

        let removed = plan.remove_goal(&id).unwrap();
        assert_eq!(removed.id(), id);
        assert!(plan.goals().is_empty());
        assert!(plan.remove_goal(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_from_parts_checks_ownership() {
        let profile = profile("user-1", dec!(400000), dec!(180000));
        let goals = vec![goal("user-2", GoalType::Savings, dec!(1000), dec!(0), 0, 10)];
        assert!(FinancialPlan::from_parts(profile.clone(), None, goals).is_err());

        let goals = vec![goal("user-1", GoalType::Savings, dec!(1000), dec!(0), 0, 10)];
        let plan = FinancialPlan::from_parts(profile, None, goals).unwrap();
        assert_eq!(plan.goals().len(), 1);
    }

    // ==================== Emergency fund ====================

    #[test]
    fn test_emergency_fund_config_bounds() {
        assert!(EmergencyFundConfig::new(25, Money::jpy(dec!(0))).is_err());
        assert!(EmergencyFundConfig::new(6, Money::jpy(dec!(-1))).is_err());
        assert!(EmergencyFundConfig::new(24, Money::jpy(dec!(0))).is_ok());
        assert!(EmergencyFundConfig::new(0, Money::jpy(dec!(0))).is_ok());
    }

    #[test]
    fn test_emergency_fund_status() {
        let mut plan = plan();
        plan.update_emergency_fund(EmergencyFundConfig::new(6, Money::jpy(dec!(300000))).unwrap())
            .unwrap();
        let status = plan.emergency_fund_status().unwrap();
        assert_eq!(status.required_amount.amount(), dec!(1080000));
        assert_eq!(status.shortfall.amount(), dec!(780000));
        // 780000 / 220000 is about 3.5 months
        assert_eq!(status.months_to_target, 3);

        assert!(plan
            .update_emergency_fund(
                EmergencyFundConfig::new(6, Money::new(dec!(1), Currency::Usd)).unwrap()
            )
            .is_err());
    }

    // ==================== Projection ====================

    #[test]
    fn test_generate_projection() {
        let mut plan = plan();
        plan.set_retirement_data(
            RetirementData::new(
                "user-1",
                35,
                65,
                85,
                Money::jpy(dec!(250000)),
                Money::jpy(dec!(150000)),
            )
            .unwrap(),
        )
        .unwrap();
        plan.add_goal(goal("user-1", GoalType::Savings, dec!(1000000), dec!(500000), 180, 180))
            .unwrap();
        let mut paused = goal("user-1", GoalType::Custom, dec!(1000), dec!(0), 10, 100);
        paused.deactivate();
        plan.add_goal(paused).unwrap();

        let projection = plan.generate_projection_on(5, today()).unwrap();
        assert_eq!(projection.asset_projections.len(), 5);
        assert!(projection.retirement_calculation.is_some());
        assert_eq!(projection.goal_progress.len(), 1);

        let progress = &projection.goal_progress[0];
        assert_eq!(progress.progress.as_percentage(), dec!(50));
        assert_eq!(progress.status, GoalTrackStatus::OnTrack);
        assert!(progress.on_track);
    }

    #[test]
    fn test_projection_rejects_non_positive_years() {
        assert!(plan().generate_projection_on(0, today()).is_err());
    }

    #[test]
    fn test_goal_track_status() {
        let mut plan = plan();
        // Half the time elapsed, 45% saved: within the 80% tolerance.
        plan.add_goal(goal("user-1", GoalType::Savings, dec!(1000000), dec!(450000), 180, 180))
            .unwrap();
        // Half the time elapsed, 10% saved.
        plan.add_goal(goal("user-1", GoalType::Savings, dec!(1000000), dec!(100000), 180, 180))
            .unwrap();
        // Already reached.
        plan.add_goal(goal("user-1", GoalType::Custom, dec!(1000), dec!(1000), 30, 60))
            .unwrap();
        // Far beyond what net savings can cover.
        plan.add_goal(goal("user-1", GoalType::Custom, dec!(100000000), dec!(0), 10, 90))
            .unwrap();

        let statuses: Vec<GoalTrackStatus> = plan
            .generate_projection_on(1, today())
            .unwrap()
            .goal_progress
            .iter()
            .map(|p| p.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                GoalTrackStatus::MostlyOnTrack,
                GoalTrackStatus::Behind,
                GoalTrackStatus::Completed,
                GoalTrackStatus::Unachievable,
            ]
        );
        assert!(!GoalTrackStatus::Behind.is_on_track());
    }

    // ==================== Validation ====================

    #[test]
    fn test_validate_healthy_plan_has_no_issues() {
        let mut plan = plan();
        plan.update_emergency_fund(EmergencyFundConfig::new(3, Money::jpy(dec!(540000))).unwrap())
            .unwrap();
        plan.add_goal(goal("user-1", GoalType::Savings, dec!(1000000), dec!(0), 0, 360))
            .unwrap();
        assert!(plan.validate_plan_on(today()).is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let mut plan = FinancialPlan::new(profile("user-1", dec!(200000), dec!(250000)));
        plan.add_goal(goal("user-1", GoalType::Savings, dec!(1000000), dec!(0), 0, 360))
            .unwrap();
        let mut paused = goal("user-1", GoalType::Custom, dec!(1000000000), dec!(0), 0, 360);
        paused.deactivate();
        plan.add_goal(paused).unwrap();

        let issues = plan.validate_plan_on(today());
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["financial_profile", "goals[0]", "emergency_fund"]);
        assert_eq!(issues[0].severity, IssueSeverity::Error);
        assert_eq!(issues[2].severity, IssueSeverity::Warning);
    }

    #[test]
    fn test_validate_reports_emergency_fund_failure_as_error() {
        // 24 months of these expenses overflows the decimal range.
        let mut plan = FinancialPlan::new(profile(
            "user-1",
            dec!(400000),
            dec!(7000000000000000000000000000),
        ));
        plan.update_emergency_fund(EmergencyFundConfig::new(24, Money::jpy(dec!(0))).unwrap())
            .unwrap();
        assert!(plan.emergency_fund_status().is_err());

        let issues = plan.validate_plan_on(today());
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["financial_profile", "emergency_fund"]);
        assert_eq!(issues[1].severity, IssueSeverity::Error);
        assert!(issues[1].message.starts_with("Could not check the emergency fund"));
    }

    #[test]
    fn test_validate_reports_low_savings_rate_as_warning() {
        let mut plan = FinancialPlan::new(profile("user-1", dec!(300000), dec!(285000)));
        plan.update_emergency_fund(EmergencyFundConfig::new(0, Money::jpy(dec!(0))).unwrap())
            .unwrap();
        let issues = plan.validate_plan_on(today());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, IssueSeverity::Warning);
        assert!(issues[0].to_string().starts_with("financial_profile: "));
    }
}
