//! Savings advice, adjustment suggestions and feasibility analysis for a goal.

use chrono::NaiveDate;
use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::goals_model::{Goal, GoalType, ProgressRate};
use crate::constants::{
    DAYS_PER_MONTH, DEMANDING_MONTHLY_SAVINGS, EASY_MONTHLY_SAVINGS, LARGE_SAVINGS_GAP,
    LOW_INVESTMENT_RETURN_PERCENTAGE, LOW_RISK_SAVINGS_RATIO, MEDIUM_RISK_SAVINGS_RATIO,
    MIN_INVESTMENT_HORIZON_DAYS, MODERATE_MONTHLY_SAVINGS, URGENT_GOAL_MONTHS,
};
use crate::errors::{Error, Result};
use crate::profile::FinancialProfile;
use crate::utils::time_utils::{add_months, approx_months_between, today};
use crate::values::{Money, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

/// What a suggested adjustment changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    IncreaseSavings,
    ExtendDeadline,
    ReduceTarget,
    ReduceExpenses,
    InvestmentStrategy,
}

/// The value a suggestion proposes for the field it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum RecommendedValue {
    Amount(Money),
    Date(NaiveDate),
    Rate(Rate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub priority: RecommendationPriority,
    pub impact: String,
    pub new_value: RecommendedValue,
    pub reason: String,
}

/// How hard the recommended monthly savings are to sustain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievability {
    Completed,
    Overdue,
    Easy,
    WithEffort,
    NeedsPlanning,
    NeedsLifestyleChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRecommendation {
    pub recommended_amount: Money,
    /// Recommended amount minus the goal's planned contribution; negative when
    /// the plan already saves more than needed.
    pub current_gap: Money,
    pub priority: RecommendationPriority,
    pub rationale: String,
    pub achievability: Achievability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        write!(f, "{}", label)
    }
}

/// Snapshot of where a goal stands against the owner's finances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalFeasibility {
    pub goal_type: GoalType,
    pub target_amount: Money,
    pub current_amount: Money,
    pub remaining_days: i64,
    pub net_savings: Money,
    pub required_monthly_savings: Money,
    pub achievable: bool,
    pub progress: ProgressRate,
    pub risk_level: RiskLevel,
}

pub fn recommend_monthly_savings(goal: &Goal) -> Result<SavingsRecommendation> {
    recommend_monthly_savings_on(goal, today())
}

/// Monthly amount that closes the goal by its target date, counting whole
/// 30-day months.
pub fn recommend_monthly_savings_on(
    goal: &Goal,
    today: NaiveDate,
) -> Result<SavingsRecommendation> {
    let remaining = goal.remaining_amount()?;
    if !remaining.is_positive() {
        let zero = Money::zero(remaining.currency());
        return Ok(SavingsRecommendation {
            recommended_amount: zero,
            current_gap: zero,
            priority: RecommendationPriority::Low,
            rationale: format!("Goal '{}' has already been reached", goal.title()),
            achievability: Achievability::Completed,
        });
    }

    let months = approx_months_between(today, goal.target_date());
    if months <= 0 {
        return Ok(SavingsRecommendation {
            recommended_amount: remaining,
            current_gap: remaining,
            priority: RecommendationPriority::High,
            rationale: format!(
                "Goal '{}' is past its target date; the remaining {} is due now",
                goal.title(),
                remaining
            ),
            achievability: Achievability::Overdue,
        });
    }

    let recommended = remaining.divide_by_decimal(Decimal::from(months))?;
    let current_gap = recommended.subtract(&goal.monthly_contribution())?;

    Ok(SavingsRecommendation {
        recommended_amount: recommended,
        current_gap,
        priority: savings_priority(goal.goal_type(), &current_gap, months),
        rationale: format!(
            "Reaching the {} goal needs {} a month over the remaining {} months",
            goal.goal_type(),
            recommended,
            months
        ),
        achievability: achievability_of(&recommended),
    })
}

fn savings_priority(goal_type: GoalType, gap: &Money, months: i64) -> RecommendationPriority {
    if goal_type == GoalType::Emergency || months <= URGENT_GOAL_MONTHS {
        return RecommendationPriority::High;
    }
    if gap.amount() > LARGE_SAVINGS_GAP {
        return RecommendationPriority::High;
    }
    if goal_type == GoalType::Retirement {
        return RecommendationPriority::Medium;
    }
    RecommendationPriority::Low
}

fn achievability_of(recommended: &Money) -> Achievability {
    let amount = recommended.amount();
    if amount <= EASY_MONTHLY_SAVINGS {
        Achievability::Easy
    } else if amount <= MODERATE_MONTHLY_SAVINGS {
        Achievability::WithEffort
    } else if amount <= DEMANDING_MONTHLY_SAVINGS {
        Achievability::NeedsPlanning
    } else {
        Achievability::NeedsLifestyleChange
    }
}

pub fn suggest_goal_adjustments(
    goal: &Goal,
    profile: &FinancialProfile,
) -> Result<Vec<GoalRecommendation>> {
    suggest_goal_adjustments_on(goal, profile, today())
}

/// Ways to bring an unreachable goal back in reach. Empty when the goal is
/// already achievable.
pub fn suggest_goal_adjustments_on(
    goal: &Goal,
    profile: &FinancialProfile,
    today: NaiveDate,
) -> Result<Vec<GoalRecommendation>> {
    if goal.is_achievable_on(profile, today)? {
        return Ok(Vec::new());
    }

    let net_savings = profile.calculate_net_savings()?;
    let required = goal.calculate_required_monthly_savings_on(today)?;

    let suggestions: Vec<GoalRecommendation> = [
        suggest_savings_increase(goal, &net_savings, &required)?,
        suggest_deadline_extension(goal, &net_savings, today)?,
        suggest_target_reduction(goal, &net_savings, today)?,
        suggest_expense_reduction(profile, &net_savings, &required)?,
        suggest_investment_strategy(goal, profile, today),
    ]
    .into_iter()
    .flatten()
    .collect();

    debug!(
        "{} adjustment suggestions for goal {}",
        suggestions.len(),
        goal.id()
    );
    Ok(suggestions)
}

fn suggest_savings_increase(
    goal: &Goal,
    net_savings: &Money,
    required: &Money,
) -> Result<Option<GoalRecommendation>> {
    if !net_savings.is_positive() || net_savings.greater_than(required)? {
        return Ok(None);
    }
    let additional = required.subtract(&goal.monthly_contribution())?;
    Ok(Some(GoalRecommendation {
        kind: RecommendationKind::IncreaseSavings,
        title: "Increase monthly savings".to_string(),
        description: format!("Raise monthly savings for this goal to {}", required),
        priority: RecommendationPriority::High,
        impact: "The goal can be reached by its target date".to_string(),
        new_value: RecommendedValue::Amount(*required),
        reason: format!(
            "The current contribution falls {} a month short",
            additional
        ),
    }))
}

fn suggest_deadline_extension(
    goal: &Goal,
    net_savings: &Money,
    today: NaiveDate,
) -> Result<Option<GoalRecommendation>> {
    if !net_savings.is_positive() {
        return Ok(None);
    }
    let remaining = goal.remaining_amount()?;
    let months_needed = remaining
        .ratio_to(net_savings)?
        .ceil()
        .to_u32()
        .ok_or_else(|| Error::Calculation("Extended deadline is too far away".to_string()))?;
    let new_date = add_months(today, months_needed)
        .ok_or_else(|| Error::Calculation("Extended deadline is out of range".to_string()))?;
    if new_date < goal.target_date() {
        return Ok(None);
    }

    let extension =
        i64::from(months_needed) - goal.remaining_days_on(today) / DAYS_PER_MONTH;
    Ok(Some(GoalRecommendation {
        kind: RecommendationKind::ExtendDeadline,
        title: "Extend the target date".to_string(),
        description: format!(
            "Move the target date by {} months to {}",
            extension,
            new_date.format("%Y-%m")
        ),
        priority: RecommendationPriority::Medium,
        impact: "The goal becomes reachable at the current savings pace".to_string(),
        new_value: RecommendedValue::Date(new_date),
        reason: "A date that matches what can be saved each month".to_string(),
    }))
}

fn suggest_target_reduction(
    goal: &Goal,
    net_savings: &Money,
    today: NaiveDate,
) -> Result<Option<GoalRecommendation>> {
    if !net_savings.is_positive() {
        return Ok(None);
    }
    let remaining_days = goal.remaining_days_on(today);
    if remaining_days <= 0 {
        return Ok(None);
    }

    let months = remaining_days / DAYS_PER_MONTH;
    let reachable = net_savings.multiply_by_decimal(Decimal::from(months))?;
    let new_target = goal.current_amount().add(&reachable)?;
    if !new_target.less_than(&goal.target_amount())? {
        return Ok(None);
    }

    let reduction = goal.target_amount().subtract(&new_target)?;
    Ok(Some(GoalRecommendation {
        kind: RecommendationKind::ReduceTarget,
        title: "Lower the target amount".to_string(),
        description: format!("Set the target amount to {}", new_target),
        priority: RecommendationPriority::Low,
        impact: "The goal fits what can be saved before the target date".to_string(),
        new_value: RecommendedValue::Amount(new_target),
        reason: format!(
            "The target is {} more than current savings can reach",
            reduction
        ),
    }))
}

fn suggest_expense_reduction(
    profile: &FinancialProfile,
    net_savings: &Money,
    required: &Money,
) -> Result<Option<GoalRecommendation>> {
    let shortfall = required.subtract(net_savings)?;
    if !shortfall.is_positive() {
        return Ok(None);
    }
    let share = shortfall.ratio_to(&profile.monthly_income())? * dec!(100);
    Ok(Some(GoalRecommendation {
        kind: RecommendationKind::ReduceExpenses,
        title: "Review monthly expenses".to_string(),
        description: format!(
            "Cut monthly expenses by {} ({:.1}% of income)",
            shortfall,
            share
        ),
        priority: RecommendationPriority::Medium,
        impact: "Frees up the monthly savings the goal needs".to_string(),
        new_value: RecommendedValue::Amount(shortfall),
        reason: "Income alone does not leave enough to save".to_string(),
    }))
}

fn suggest_investment_strategy(
    goal: &Goal,
    profile: &FinancialProfile,
    today: NaiveDate,
) -> Option<GoalRecommendation> {
    if goal.remaining_days_on(today) < MIN_INVESTMENT_HORIZON_DAYS {
        return None;
    }
    if profile.investment_return().as_percentage() >= LOW_INVESTMENT_RETURN_PERCENTAGE {
        return None;
    }

    let (target_return, strategy) = match goal.goal_type() {
        GoalType::Retirement => (
            dec!(6),
            "Long horizons suit an equity-weighted portfolio",
        ),
        GoalType::Emergency => (
            dec!(2),
            "Keep emergency money safe in deposits or government bonds",
        ),
        _ => (dec!(4), "A balanced fund fits a medium-term goal"),
    };
    let target_rate = Rate::new(target_return).ok()?;

    Some(GoalRecommendation {
        kind: RecommendationKind::InvestmentStrategy,
        title: "Revisit the investment strategy".to_string(),
        description: format!("Aim for an investment return of {}", target_rate),
        priority: RecommendationPriority::Medium,
        impact: "Compounding makes the goal easier to reach".to_string(),
        new_value: RecommendedValue::Rate(target_rate),
        reason: strategy.to_string(),
    })
}

pub fn analyze_goal_feasibility(
    goal: &Goal,
    profile: &FinancialProfile,
) -> Result<GoalFeasibility> {
    analyze_goal_feasibility_on(goal, profile, today())
}

pub fn analyze_goal_feasibility_on(
    goal: &Goal,
    profile: &FinancialProfile,
    today: NaiveDate,
) -> Result<GoalFeasibility> {
    let net_savings = profile.calculate_net_savings()?;
    let required_monthly_savings = goal.calculate_required_monthly_savings_on(today)?;

    Ok(GoalFeasibility {
        goal_type: goal.goal_type(),
        target_amount: goal.target_amount(),
        current_amount: goal.current_amount(),
        remaining_days: goal.remaining_days_on(today),
        net_savings,
        required_monthly_savings,
        achievable: goal.is_achievable_on(profile, today)?,
        progress: goal.progress()?,
        risk_level: risk_level(&required_monthly_savings, &net_savings)?,
    })
}

/// Risk grows with the share of net savings the goal would consume.
fn risk_level(required: &Money, net_savings: &Money) -> Result<RiskLevel> {
    if !net_savings.is_positive() {
        return Ok(RiskLevel::High);
    }
    let ratio = required.ratio_to(net_savings)?;
    Ok(if ratio <= LOW_RISK_SAVINGS_RATIO {
        RiskLevel::Low
    } else if ratio <= MEDIUM_RISK_SAVINGS_RATIO {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    })
}
