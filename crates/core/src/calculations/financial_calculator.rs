//! Stand-alone financial formulas shared by goal analysis and callers that
//! need a number without building a full plan.

use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_DEBT_PAYOFF_MONTHS, MONTHS_PER_YEAR};
use crate::errors::{Error, Result};
use crate::values::{Money, Rate};

/// Outcome of growing an amount at a compound rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundInterestResult {
    pub final_amount: Money,
    /// Principal plus every regular payment.
    pub total_contribution: Money,
    pub interest_earned: Money,
    pub annual_rate: Rate,
}

/// Purchasing power of an amount after some years of inflation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationAdjustment {
    pub nominal_value: Money,
    pub real_value: Money,
    pub purchasing_power_loss: Money,
    /// Loss as a share of the nominal value.
    pub inflation_impact: Rate,
}

/// Money needed over a retirement once the pension is accounted for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementNeeds {
    /// Part of the monthly expenses the pension does not cover.
    pub monthly_needs: Money,
    pub total_needs: Money,
    pub years_in_retirement: i32,
    /// Pension received over the whole retirement.
    pub pension_coverage: Money,
    pub additional_required: Money,
}

fn reject_negative(value: i32, what: &str) -> Result<()> {
    if value < 0 {
        return Err(Error::invalid_input(format!(
            "{} cannot be negative, got {}",
            what, value
        )));
    }
    Ok(())
}

/// `principal * (1 + rate)^periods`.
pub fn future_value(present_value: &Money, rate: &Rate, periods: i32) -> Result<Money> {
    reject_negative(periods, "Periods")?;
    present_value.multiply_by_decimal(rate.compound_factor(periods)?)
}

/// Discounts `future_value` back over `periods` at `rate`.
pub fn present_value(future_value: &Money, rate: &Rate, periods: i32) -> Result<Money> {
    reject_negative(periods, "Periods")?;
    if periods == 0 || rate.is_zero() {
        return Ok(*future_value);
    }
    future_value.divide_by_decimal(rate.compound_factor(periods)?)
}

/// Grows `principal` once per period with no further payments.
pub fn compound_interest(
    principal: &Money,
    rate: &Rate,
    periods: i32,
) -> Result<CompoundInterestResult> {
    let final_amount = future_value(principal, rate, periods)?;
    Ok(CompoundInterestResult {
        final_amount,
        total_contribution: *principal,
        interest_earned: final_amount.subtract(principal)?,
        annual_rate: *rate,
    })
}

/// Grows `principal` monthly at the monthly equivalent of `annual_rate`,
/// adding `monthly_payment` after each month's gain.
pub fn compound_interest_with_monthly_payments(
    principal: &Money,
    monthly_payment: &Money,
    annual_rate: &Rate,
    years: i32,
) -> Result<CompoundInterestResult> {
    reject_negative(years, "Years")?;

    let monthly_rate = annual_rate.monthly_rate()?;
    let mut current = *principal;
    let mut contributed = *principal;
    for _ in 0..years * MONTHS_PER_YEAR as i32 {
        let gain = current.multiply(&monthly_rate)?;
        current = current.add(&gain)?.add(monthly_payment)?;
        contributed = contributed.add(monthly_payment)?;
    }

    Ok(CompoundInterestResult {
        final_amount: current,
        total_contribution: contributed,
        interest_earned: current.subtract(&contributed)?,
        annual_rate: *annual_rate,
    })
}

/// Real value of `amount` after `years` of inflation.
pub fn inflation_adjusted_value(
    amount: &Money,
    inflation_rate: &Rate,
    years: i32,
) -> Result<InflationAdjustment> {
    reject_negative(years, "Years")?;

    let real_value = present_value(amount, inflation_rate, years)?;
    let purchasing_power_loss = amount.subtract(&real_value)?;
    let inflation_impact = if amount.is_zero() {
        Rate::zero()
    } else {
        Rate::from_fraction(purchasing_power_loss.ratio_to(amount)?)?
    };

    Ok(InflationAdjustment {
        nominal_value: *amount,
        real_value,
        purchasing_power_loss,
        inflation_impact,
    })
}

/// Totals the part of retirement expenses the pension leaves uncovered.
pub fn retirement_needs(
    monthly_expenses: &Money,
    years_in_retirement: i32,
    pension_amount: &Money,
) -> Result<RetirementNeeds> {
    reject_negative(years_in_retirement, "Years in retirement")?;
    if monthly_expenses.is_negative() {
        return Err(Error::invalid_input("Monthly expenses cannot be negative"));
    }
    if pension_amount.is_negative() {
        return Err(Error::invalid_input("Pension amount cannot be negative"));
    }

    let months = Decimal::from(years_in_retirement) * Decimal::from(MONTHS_PER_YEAR);
    let monthly_needs = monthly_expenses.subtract(pension_amount)?.floor_at_zero();
    let total_needs = monthly_needs.multiply_by_decimal(months)?;

    Ok(RetirementNeeds {
        monthly_needs,
        total_needs,
        years_in_retirement,
        pension_coverage: pension_amount.multiply_by_decimal(months)?,
        additional_required: total_needs,
    })
}

/// Share of `annual_income` that must be saved each year, on top of the
/// growth of `current_savings`, to reach `target_amount` in `years`.
///
/// The yearly amount is a straight division; returns on new savings are
/// ignored.
pub fn required_savings_rate(
    annual_income: &Money,
    target_amount: &Money,
    current_savings: &Money,
    investment_return: &Rate,
    years: i32,
) -> Result<Rate> {
    if years <= 0 {
        return Err(Error::invalid_input(format!(
            "Years must be positive, got {}",
            years
        )));
    }
    if !annual_income.is_positive() {
        return Err(Error::invalid_input("Income must be positive"));
    }

    let grown_savings = future_value(current_savings, investment_return, years)?;
    let additional_required = target_amount.subtract(&grown_savings)?;
    if !additional_required.is_positive() {
        return Ok(Rate::zero());
    }

    let yearly = additional_required.divide_by_decimal(Decimal::from(years))?;
    let rate = Rate::from_fraction(yearly.ratio_to(annual_income)?).map_err(|_| {
        Error::BusinessRule(format!(
            "Saving {} a year is more than the whole income of {}",
            yearly, annual_income
        ))
    })?;
    debug!("Required savings rate for {}: {}", target_amount, rate);
    Ok(rate)
}

/// Months of expenses to hold, inflated to the date the fund should be ready.
pub fn emergency_fund_target(
    monthly_expenses: &Money,
    target_months: u32,
    inflation_rate: &Rate,
    years_to_target: i32,
) -> Result<Money> {
    reject_negative(years_to_target, "Years to target")?;
    let base = monthly_expenses.multiply_by_decimal(Decimal::from(target_months))?;
    if years_to_target == 0 || inflation_rate.is_zero() {
        return Ok(base);
    }
    base.multiply_by_decimal(inflation_rate.compound_factor(years_to_target)?)
}

/// Months until `debt` is repaid with a fixed `monthly_payment` while
/// interest accrues monthly. Zero when there is nothing to repay.
pub fn debt_payoff_months(
    debt: &Money,
    monthly_payment: &Money,
    interest_rate: &Rate,
) -> Result<u32> {
    if !debt.is_positive() {
        return Ok(0);
    }
    if !monthly_payment.is_positive() {
        return Err(Error::invalid_input("Monthly payment must be positive"));
    }

    let monthly_rate = interest_rate.monthly_rate()?;
    if monthly_rate.is_zero() {
        return debt
            .ratio_to(monthly_payment)?
            .ceil()
            .to_u32()
            .ok_or_else(|| Error::Calculation("Payoff period is out of range".to_string()));
    }

    if !monthly_payment.greater_than(&debt.multiply(&monthly_rate)?)? {
        return Err(Error::BusinessRule(format!(
            "A payment of {} does not cover the monthly interest on {}",
            monthly_payment, debt
        )));
    }

    let mut remaining = *debt;
    let mut months = 0;
    while remaining.is_positive() {
        if months >= MAX_DEBT_PAYOFF_MONTHS {
            return Err(Error::BusinessRule(format!(
                "Debt of {} takes more than {} months to repay",
                debt, MAX_DEBT_PAYOFF_MONTHS
            )));
        }
        let interest = remaining.multiply(&monthly_rate)?;
        remaining = remaining.add(&interest)?.subtract(monthly_payment)?;
        months += 1;
    }
    Ok(months)
}
