//! Financial plan aggregate and projection models.

use std::fmt;

use chrono::NaiveDate;
use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EMERGENCY_FUND_MONTHS, EMERGENCY_FUND_CRITICAL_SHORTFALL_RATIO,
    GOAL_ON_TRACK_TOLERANCE, MAX_EMERGENCY_FUND_MONTHS,
};
use crate::errors::{Error, Result, ValidationError};
use crate::goals::{Goal, GoalType, ProgressRate};
use crate::profile::{AssetProjection, FinancialHealth, FinancialProfile};
use crate::retirement::{RetirementCalculation, RetirementData};
use crate::utils::time_utils::{days_between, today};
use crate::values::{Currency, Money};

/// How many months of expenses to keep as an emergency fund, and how much is set aside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyFundConfig {
    target_months: u32,
    current_fund: Money,
}

impl EmergencyFundConfig {
    pub fn new(target_months: u32, current_fund: Money) -> Result<Self> {
        if target_months > MAX_EMERGENCY_FUND_MONTHS {
            return Err(Error::invalid_input(format!(
                "Emergency fund target must be at most {} months",
                MAX_EMERGENCY_FUND_MONTHS
            )));
        }
        if current_fund.is_negative() {
            return Err(Error::invalid_input("Emergency fund cannot be negative"));
        }
        Ok(EmergencyFundConfig {
            target_months,
            current_fund,
        })
    }

    /// Three months of expenses, nothing set aside yet.
    pub fn default_for(currency: Currency) -> Self {
        EmergencyFundConfig {
            target_months: DEFAULT_EMERGENCY_FUND_MONTHS,
            current_fund: Money::zero(currency),
        }
    }

    pub fn target_months(&self) -> u32 {
        self.target_months
    }

    pub fn current_fund(&self) -> Money {
        self.current_fund
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyFundStatus {
    pub required_amount: Money,
    pub current_amount: Money,
    pub shortfall: Money,
    /// Whole months of net savings needed to close the shortfall; zero when
    /// there is no shortfall or nothing is being saved.
    pub months_to_target: u32,
}

/// Assessment of an active goal against elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalTrackStatus {
    Completed,
    OnTrack,
    MostlyOnTrack,
    Behind,
    Overdue,
    Unachievable,
}

impl GoalTrackStatus {
    pub fn is_on_track(&self) -> bool {
        matches!(
            self,
            GoalTrackStatus::Completed | GoalTrackStatus::OnTrack | GoalTrackStatus::MostlyOnTrack
        )
    }

    pub fn message(&self) -> &'static str {
        match self {
            GoalTrackStatus::Completed => "Goal reached",
            GoalTrackStatus::OnTrack => "Progressing on schedule",
            GoalTrackStatus::MostlyOnTrack => "Progressing roughly on schedule",
            GoalTrackStatus::Behind => "Behind schedule; consider saving more each month",
            GoalTrackStatus::Overdue => "Target date has passed",
            GoalTrackStatus::Unachievable => "Not reachable at the current savings pace",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal: Goal,
    pub progress: ProgressRate,
    pub on_track: bool,
    pub status: GoalTrackStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProjection {
    pub asset_projections: Vec<AssetProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retirement_calculation: Option<RetirementCalculation>,
    pub emergency_fund_status: EmergencyFundStatus,
    pub goal_progress: Vec<GoalProgress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// A problem found by [`FinancialPlan::validate_plan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanIssue {
    pub field: String,
    pub message: String,
    pub severity: IssueSeverity,
}

impl PlanIssue {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        PlanIssue {
            field: field.into(),
            message: message.into(),
            severity: IssueSeverity::Error,
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        PlanIssue {
            field: field.into(),
            message: message.into(),
            severity: IssueSeverity::Warning,
        }
    }
}

impl fmt::Display for PlanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Aggregate root: one user's profile together with their retirement data and goals.
///
/// Every child belongs to the profile's user. The plan is identified by its
/// profile id.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialPlan {
    profile: FinancialProfile,
    retirement_data: Option<RetirementData>,
    goals: Vec<Goal>,
    emergency_fund: EmergencyFundConfig,
}

impl FinancialPlan {
    pub fn new(profile: FinancialProfile) -> Self {
        let emergency_fund = EmergencyFundConfig::default_for(profile.currency());
        FinancialPlan {
            profile,
            retirement_data: None,
            goals: Vec::new(),
            emergency_fund,
        }
    }

    /// Assembles a plan from stored parts. Only ownership is checked, so stored
    /// goal sets that predate the one-active-per-type rule still load.
    pub fn from_parts(
        profile: FinancialProfile,
        retirement_data: Option<RetirementData>,
        goals: Vec<Goal>,
    ) -> Result<Self> {
        let mut plan = FinancialPlan::new(profile);
        if let Some(retirement_data) = retirement_data {
            plan.set_retirement_data(retirement_data)?;
        }
        for goal in &goals {
            plan.ensure_owned(goal.user_id(), "goal")?;
        }
        plan.goals = goals;
        Ok(plan)
    }

    pub fn id(&self) -> &str {
        self.profile.id()
    }

    pub fn user_id(&self) -> &str {
        self.profile.user_id()
    }

    pub fn profile(&self) -> &FinancialProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut FinancialProfile {
        &mut self.profile
    }

    pub fn retirement_data(&self) -> Option<&RetirementData> {
        self.retirement_data.as_ref()
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn goal(&self, goal_id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id() == goal_id)
    }

    pub fn emergency_fund(&self) -> &EmergencyFundConfig {
        &self.emergency_fund
    }

    fn ensure_owned(&self, user_id: &str, what: &str) -> Result<()> {
        if user_id != self.profile.user_id() {
            return Err(Error::invalid_input(format!(
                "The {} belongs to user {} but the plan belongs to user {}",
                what,
                user_id,
                self.profile.user_id()
            )));
        }
        Ok(())
    }

    /// Replaces the profile; the new profile must belong to the same user.
    pub fn update_profile(&mut self, profile: FinancialProfile) -> Result<()> {
        self.ensure_owned(profile.user_id(), "profile")?;
        self.profile = profile;
        Ok(())
    }

    pub fn set_retirement_data(&mut self, retirement_data: RetirementData) -> Result<()> {
        self.ensure_owned(retirement_data.user_id(), "retirement data")?;
        self.retirement_data = Some(retirement_data);
        Ok(())
    }

    pub fn update_emergency_fund(&mut self, config: EmergencyFundConfig) -> Result<()> {
        if config.current_fund().currency() != self.profile.currency() {
            return Err(Error::Validation(ValidationError::CurrencyMismatch(
                config.current_fund().currency().to_string(),
                self.profile.currency().to_string(),
            )));
        }
        self.emergency_fund = config;
        Ok(())
    }

    /// Adds a goal. Only one active retirement goal and one active emergency
    /// goal are allowed per plan. Achievability is reported by
    /// [`validate_plan`](Self::validate_plan) rather than enforced here.
    pub fn add_goal(&mut self, goal: Goal) -> Result<()> {
        self.ensure_owned(goal.user_id(), "goal")?;
        if self.goal(goal.id()).is_some() {
            return Err(Error::BusinessRule(format!(
                "Goal {} is already part of the plan",
                goal.id()
            )));
        }
        if goal.is_active() && goal.goal_type().is_singular() && self.has_active(goal.goal_type()) {
            return Err(Error::BusinessRule(format!(
                "An active {} goal already exists",
                goal.goal_type()
            )));
        }
        self.goals.push(goal);
        Ok(())
    }

    /// Replaces the stored goal with the same id, keeping the one-active-per-type rule.
    pub fn replace_goal(&mut self, goal: Goal) -> Result<()> {
        self.ensure_owned(goal.user_id(), "goal")?;
        let index = self
            .goals
            .iter()
            .position(|g| g.id() == goal.id())
            .ok_or_else(|| Error::not_found(format!("Goal {} not found in plan", goal.id())))?;
        if goal.is_active() && goal.goal_type().is_singular() {
            let conflict = self.goals.iter().enumerate().any(|(i, g)| {
                i != index && g.goal_type() == goal.goal_type() && g.is_active()
            });
            if conflict {
                return Err(Error::BusinessRule(format!(
                    "An active {} goal already exists",
                    goal.goal_type()
                )));
            }
        }
        self.goals[index] = goal;
        Ok(())
    }

    pub fn remove_goal(&mut self, goal_id: &str) -> Result<Goal> {
        let index = self
            .goals
            .iter()
            .position(|g| g.id() == goal_id)
            .ok_or_else(|| Error::not_found(format!("Goal {} not found in plan", goal_id)))?;
        Ok(self.goals.remove(index))
    }

    pub fn active_goals(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|g| g.is_active()).collect()
    }

    pub fn goals_by_type(&self, goal_type: GoalType) -> Vec<&Goal> {
        self.goals
            .iter()
            .filter(|g| g.goal_type() == goal_type)
            .collect()
    }

    fn has_active(&self, goal_type: GoalType) -> bool {
        self.goals
            .iter()
            .any(|g| g.goal_type() == goal_type && g.is_active())
    }

    pub fn has_retirement_goal(&self) -> bool {
        self.has_active(GoalType::Retirement)
    }

    pub fn has_emergency_goal(&self) -> bool {
        self.has_active(GoalType::Emergency)
    }

    pub fn generate_projection(&self, years: i32) -> Result<PlanProjection> {
        self.generate_projection_on(years, today())
    }

    /// Projects assets, retirement sufficiency, emergency fund status and the
    /// progress of every active goal.
    pub fn generate_projection_on(&self, years: i32, today: NaiveDate) -> Result<PlanProjection> {
        let asset_projections = self.profile.project_assets(years)?;

        let retirement_calculation = match &self.retirement_data {
            Some(retirement_data) => {
                let current_savings = self.profile.total_savings()?;
                let net_savings = self.profile.calculate_net_savings()?;
                Some(retirement_data.calculate_retirement_sufficiency(
                    &current_savings,
                    &net_savings,
                    &self.profile.investment_return(),
                    &self.profile.inflation_rate(),
                )?)
            }
            None => None,
        };

        let emergency_fund_status = self.emergency_fund_status()?;

        let mut goal_progress = Vec::new();
        for goal in self.goals.iter().filter(|g| g.is_active()) {
            let progress = goal.progress()?;
            let status = self.evaluate_goal(goal, &progress, today)?;
            goal_progress.push(GoalProgress {
                goal: goal.clone(),
                progress,
                on_track: status.is_on_track(),
                status,
            });
        }

        debug!(
            "Generated {}-year projection for plan {} with {} active goals",
            years,
            self.id(),
            goal_progress.len()
        );

        Ok(PlanProjection {
            asset_projections,
            retirement_calculation,
            emergency_fund_status,
            goal_progress,
        })
    }

    pub fn emergency_fund_status(&self) -> Result<EmergencyFundStatus> {
        let monthly_expenses = self.profile.total_expenses()?;
        let required_amount = monthly_expenses
            .multiply_by_decimal(Decimal::from(self.emergency_fund.target_months()))?;
        let shortfall = required_amount
            .subtract(&self.emergency_fund.current_fund())?
            .floor_at_zero();

        let mut months_to_target = 0;
        if shortfall.is_positive() {
            let net_savings = self.profile.calculate_net_savings()?;
            if net_savings.is_positive() {
                months_to_target = shortfall
                    .ratio_to(&net_savings)?
                    .trunc()
                    .to_u32()
                    .unwrap_or(u32::MAX);
            }
        }

        Ok(EmergencyFundStatus {
            required_amount,
            current_amount: self.emergency_fund.current_fund(),
            shortfall,
            months_to_target,
        })
    }

    fn evaluate_goal(
        &self,
        goal: &Goal,
        progress: &ProgressRate,
        today: NaiveDate,
    ) -> Result<GoalTrackStatus> {
        if !goal.is_achievable_on(&self.profile, today)? {
            return Ok(GoalTrackStatus::Unachievable);
        }
        if goal.is_overdue_on(today) {
            return Ok(GoalTrackStatus::Overdue);
        }
        if goal.is_completed() {
            return Ok(GoalTrackStatus::Completed);
        }

        let remaining_days = goal.remaining_days_on(today);
        if remaining_days <= 0 {
            return Ok(GoalTrackStatus::Overdue);
        }

        // Progress expected if saving evenly from creation to the target date.
        let total_days = days_between(goal.created_at().date(), goal.target_date());
        let expected = if total_days <= 0 {
            Decimal::ONE_HUNDRED
        } else {
            let elapsed = (total_days - remaining_days).max(0);
            Decimal::from(elapsed) / Decimal::from(total_days) * Decimal::ONE_HUNDRED
        };

        let actual = progress.as_percentage();
        if actual >= expected {
            Ok(GoalTrackStatus::OnTrack)
        } else if actual >= expected * GOAL_ON_TRACK_TOLERANCE {
            Ok(GoalTrackStatus::MostlyOnTrack)
        } else {
            Ok(GoalTrackStatus::Behind)
        }
    }

    pub fn validate_plan(&self) -> Vec<PlanIssue> {
        self.validate_plan_on(today())
    }

    /// Collects every problem with the plan instead of stopping at the first.
    pub fn validate_plan_on(&self, today: NaiveDate) -> Vec<PlanIssue> {
        let mut issues = Vec::new();

        match self.profile.validate_financial_health() {
            Ok(FinancialHealth::Healthy) => {}
            Ok(FinancialHealth::LowSavingsRate {
                savings_rate_percentage,
            }) => issues.push(PlanIssue::warning(
                "financial_profile",
                format!(
                    "Savings rate of {:.1}% is below the recommended 10%",
                    savings_rate_percentage
                ),
            )),
            Err(e) => issues.push(PlanIssue::error("financial_profile", e.to_string())),
        }

        for (index, goal) in self.goals.iter().enumerate() {
            if !goal.is_active() {
                continue;
            }
            let field = format!("goals[{}]", index);
            match goal.is_achievable_on(&self.profile, today) {
                Ok(true) => {}
                Ok(false) => issues.push(PlanIssue::error(
                    field,
                    format!(
                        "Goal '{}' is not reachable with the current finances",
                        goal.title()
                    ),
                )),
                Err(e) => issues.push(PlanIssue::error(
                    field,
                    format!("Could not check goal '{}': {}", goal.title(), e),
                )),
            }
        }

        let shortfall_ratio = self.emergency_fund_status().and_then(|status| {
            if status.required_amount.is_positive() {
                status.shortfall.ratio_to(&status.required_amount)
            } else {
                Ok(Decimal::ZERO)
            }
        });
        match shortfall_ratio {
            Ok(ratio) if ratio > EMERGENCY_FUND_CRITICAL_SHORTFALL_RATIO => {
                issues.push(PlanIssue::warning(
                    "emergency_fund",
                    "Emergency fund is far below target; build it up first",
                ))
            }
            Ok(_) => {}
            Err(e) => issues.push(PlanIssue::error(
                "emergency_fund",
                format!("Could not check the emergency fund: {}", e),
            )),
        }

        issues
    }
}
