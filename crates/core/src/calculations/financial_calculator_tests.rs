//! Tests for the stand-alone financial formulas.

#[cfg(test)]
mod tests {
    use crate::calculations::*;
    use crate::errors::Error;
    use crate::values::{Money, Rate};
    use rust_decimal_macros::dec;

    fn jpy(amount: rust_decimal::Decimal) -> Money {
        Money::jpy(amount)
    }

    fn rate(percentage: rust_decimal::Decimal) -> Rate {
        Rate::new(percentage).unwrap()
    }

    // ==================== Present / future value ====================

    #[test]
    fn test_future_and_present_value() {
        let fv = future_value(&jpy(dec!(1000000)), &rate(dec!(5)), 2).unwrap();
        assert_eq!(fv.amount(), dec!(1102500));

        let pv = present_value(&fv, &rate(dec!(5)), 2).unwrap();
        assert_eq!(pv.amount(), dec!(1000000));

        assert_eq!(
            present_value(&fv, &rate(dec!(5)), 0).unwrap(),
            fv,
            "no discounting over zero periods"
        );
        assert_eq!(present_value(&fv, &Rate::zero(), 10).unwrap(), fv);
    }

    #[test]
    fn test_negative_periods_are_rejected() {
        assert!(future_value(&jpy(dec!(1)), &rate(dec!(5)), -1)
            .unwrap_err()
            .is_validation());
        assert!(present_value(&jpy(dec!(1)), &rate(dec!(5)), -1)
            .unwrap_err()
            .is_validation());
        assert!(inflation_adjusted_value(&jpy(dec!(1)), &rate(dec!(2)), -3).is_err());
        assert!(retirement_needs(&jpy(dec!(1)), -1, &jpy(dec!(0))).is_err());
    }

    // ==================== Compound interest ====================

    #[test]
    fn test_compound_interest() {
        let result = compound_interest(&jpy(dec!(1000000)), &rate(dec!(10)), 3).unwrap();
        assert_eq!(result.final_amount.amount(), dec!(1331000));
        assert_eq!(result.interest_earned.amount(), dec!(331000));
        assert_eq!(result.total_contribution.amount(), dec!(1000000));

        let unchanged = compound_interest(&jpy(dec!(5000)), &rate(dec!(10)), 0).unwrap();
        assert_eq!(unchanged.final_amount.amount(), dec!(5000));
        assert!(unchanged.interest_earned.is_zero());
    }

    #[test]
    fn test_monthly_payments_without_return_add_up() {
        let result = compound_interest_with_monthly_payments(
            &jpy(dec!(100000)),
            &jpy(dec!(10000)),
            &Rate::zero(),
            2,
        )
        .unwrap();
        assert_eq!(result.final_amount.amount(), dec!(340000));
        assert_eq!(result.total_contribution.amount(), dec!(340000));
        assert!(result.interest_earned.is_zero());
    }

    #[test]
    fn test_monthly_payments_earn_interest() {
        let result = compound_interest_with_monthly_payments(
            &jpy(dec!(100000)),
            &jpy(dec!(10000)),
            &rate(dec!(5)),
            10,
        )
        .unwrap();
        assert_eq!(result.total_contribution.amount(), dec!(1300000));
        assert!(result.interest_earned.is_positive());
        assert_eq!(
            result.final_amount,
            result
                .total_contribution
                .add(&result.interest_earned)
                .unwrap()
        );
    }

    // ==================== Inflation ====================

    #[test]
    fn test_inflation_adjusted_value() {
        let result = inflation_adjusted_value(&jpy(dec!(1000000)), &rate(dec!(10)), 2).unwrap();
        assert_eq!(result.real_value.amount(), dec!(826446.28));
        assert_eq!(result.purchasing_power_loss.amount(), dec!(173553.72));
        assert_eq!(result.inflation_impact.as_percentage(), dec!(17.3554));

        let now = inflation_adjusted_value(&jpy(dec!(1000000)), &rate(dec!(10)), 0).unwrap();
        assert_eq!(now.real_value, now.nominal_value);
        assert!(now.inflation_impact.is_zero());
    }

    // ==================== Retirement needs ====================

    #[test]
    fn test_retirement_needs_counts_uncovered_expenses() {
        let needs = retirement_needs(&jpy(dec!(250000)), 20, &jpy(dec!(150000))).unwrap();
        assert_eq!(needs.monthly_needs.amount(), dec!(100000));
        assert_eq!(needs.total_needs.amount(), dec!(24000000));
        assert_eq!(needs.additional_required, needs.total_needs);
        assert_eq!(needs.pension_coverage.amount(), dec!(36000000));
        assert_eq!(needs.years_in_retirement, 20);
    }

    #[test]
    fn test_retirement_needs_when_pension_is_enough() {
        let needs = retirement_needs(&jpy(dec!(100000)), 10, &jpy(dec!(150000))).unwrap();
        assert!(needs.monthly_needs.is_zero());
        assert!(needs.total_needs.is_zero());
        assert_eq!(needs.pension_coverage.amount(), dec!(18000000));

        assert!(retirement_needs(&jpy(dec!(-1)), 10, &jpy(dec!(0)))
            .unwrap_err()
            .is_validation());
    }

    // ==================== Savings rate ====================

    #[test]
    fn test_required_savings_rate() {
        let required = required_savings_rate(
            &jpy(dec!(6000000)),
            &jpy(dec!(10000000)),
            &jpy(dec!(1000000)),
            &Rate::zero(),
            5,
        )
        .unwrap();
        assert_eq!(required.as_percentage(), dec!(30));

        let already_there = required_savings_rate(
            &jpy(dec!(6000000)),
            &jpy(dec!(1000000)),
            &jpy(dec!(1000000)),
            &rate(dec!(5)),
            5,
        )
        .unwrap();
        assert!(already_there.is_zero());
    }

    #[test]
    fn test_required_savings_rate_rejects_bad_inputs() {
        let target = jpy(dec!(1000000));
        let none = jpy(dec!(0));
        assert!(required_savings_rate(&jpy(dec!(100)), &target, &none, &Rate::zero(), 0)
            .unwrap_err()
            .is_validation());
        assert!(required_savings_rate(&none, &target, &none, &Rate::zero(), 5)
            .unwrap_err()
            .is_validation());

        let impossible = required_savings_rate(
            &jpy(dec!(1000000)),
            &jpy(dec!(100000000)),
            &none,
            &Rate::zero(),
            1,
        )
        .unwrap_err();
        assert!(matches!(impossible, Error::BusinessRule(_)));
    }

    // ==================== Emergency fund ====================

    #[test]
    fn test_emergency_fund_target() {
        let expenses = jpy(dec!(200000));
        assert_eq!(
            emergency_fund_target(&expenses, 6, &rate(dec!(10)), 0)
                .unwrap()
                .amount(),
            dec!(1200000)
        );
        assert_eq!(
            emergency_fund_target(&expenses, 6, &rate(dec!(10)), 2)
                .unwrap()
                .amount(),
            dec!(1452000)
        );
        assert_eq!(
            emergency_fund_target(&expenses, 6, &Rate::zero(), 2)
                .unwrap()
                .amount(),
            dec!(1200000)
        );
    }

    // ==================== Debt payoff ====================

    #[test]
    fn test_debt_payoff_without_interest_rounds_up() {
        assert_eq!(
            debt_payoff_months(&jpy(dec!(1000000)), &jpy(dec!(300000)), &Rate::zero()).unwrap(),
            4
        );
        assert_eq!(
            debt_payoff_months(&jpy(dec!(0)), &jpy(dec!(300000)), &rate(dec!(12))).unwrap(),
            0
        );
        assert!(
            debt_payoff_months(&jpy(dec!(1000)), &jpy(dec!(0)), &Rate::zero())
                .unwrap_err()
                .is_validation()
        );
    }

    #[test]
    fn test_debt_payoff_with_interest() {
        assert_eq!(
            debt_payoff_months(&jpy(dec!(100000)), &jpy(dec!(10000)), &rate(dec!(12))).unwrap(),
            11
        );

        let never = debt_payoff_months(&jpy(dec!(1000000)), &jpy(dec!(5000)), &rate(dec!(12)))
            .unwrap_err();
        assert!(matches!(never, Error::BusinessRule(_)));
    }
}
