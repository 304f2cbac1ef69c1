//! Tests for retirement data and sufficiency calculations.

#[cfg(test)]
mod tests {
    use crate::retirement::RetirementData;
    use crate::values::{Currency, Money, Rate};
    use rust_decimal_macros::dec;

    fn standard() -> RetirementData {
        RetirementData::new(
            "user-1",
            35,
            65,
            85,
            Money::jpy(dec!(250000)),
            Money::jpy(dec!(150000)),
        )
        .unwrap()
    }

    #[test]
    fn test_years_and_pension_shortfall() {
        let data = standard();
        assert_eq!(data.calculate_years_until_retirement(), 30);
        assert_eq!(data.calculate_retirement_years(), 20);
        assert_eq!(data.pension_shortfall().unwrap().amount(), dec!(100000));
        assert!(!data.is_pension_sufficient().unwrap());
        assert!(!data.is_retired());
    }

    #[test]
    fn test_pension_shortfall_is_floored_at_zero() {
        let data = RetirementData::new(
            "user-1",
            40,
            60,
            90,
            Money::jpy(dec!(100000)),
            Money::jpy(dec!(180000)),
        )
        .unwrap();
        assert!(data.pension_shortfall().unwrap().is_zero());
        assert!(data.is_pension_sufficient().unwrap());
        assert!(data
            .calculate_required_retirement_fund(&Rate::new(dec!(2)).unwrap())
            .unwrap()
            .is_zero());
    }

    #[test]
    fn test_age_ordering_is_enforced() {
        let expenses = Money::jpy(dec!(1));
        let pension = Money::jpy(dec!(0));
        assert!(RetirementData::new("u", -1, 65, 85, expenses, pension).is_err());
        assert!(RetirementData::new("u", 151, 151, 151, expenses, pension).is_err());
        assert!(RetirementData::new("u", 50, 40, 85, expenses, pension).is_err());
        assert!(RetirementData::new("u", 50, 101, 120, expenses, pension).is_err());
        assert!(RetirementData::new("u", 50, 65, 60, expenses, pension).is_err());
        assert!(RetirementData::new("u", 50, 65, 151, expenses, pension).is_err());
        assert!(RetirementData::new("u", 65, 65, 65, expenses, pension).is_ok());
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        assert!(RetirementData::new(
            "u",
            35,
            65,
            85,
            Money::jpy(dec!(-1)),
            Money::jpy(dec!(0))
        )
        .is_err());
        assert!(RetirementData::new(
            "u",
            35,
            65,
            85,
            Money::jpy(dec!(1)),
            Money::jpy(dec!(-1))
        )
        .is_err());
    }

    #[test]
    fn test_required_fund_without_inflation() {
        let fund = standard()
            .calculate_required_retirement_fund(&Rate::zero())
            .unwrap();
        assert_eq!(fund.amount(), dec!(24000000));
    }

    #[test]
    fn test_required_fund_grows_with_inflation() {
        let fund = standard()
            .calculate_required_retirement_fund(&Rate::new(dec!(2)).unwrap())
            .unwrap();
        assert!(fund.amount() > dec!(24000000));
    }

    #[test]
    fn test_sufficiency_with_nothing_saved() {
        let data = standard();
        let result = data
            .calculate_retirement_sufficiency(
                &Money::jpy(dec!(0)),
                &Money::jpy(dec!(0)),
                &Rate::zero(),
                &Rate::zero(),
            )
            .unwrap();
        assert_eq!(result.required_amount.amount(), dec!(24000000));
        assert!(result.projected_amount.is_zero());
        assert_eq!(result.shortfall.amount(), dec!(24000000));
        assert!(result.sufficiency_rate.is_zero());
        assert_eq!(result.recommended_monthly_savings.amount(), dec!(66666.67));
    }

    #[test]
    fn test_sufficiency_when_covered() {
        let data = standard();
        let result = data
            .calculate_retirement_sufficiency(
                &Money::jpy(dec!(10000000)),
                &Money::jpy(dec!(50000)),
                &Rate::zero(),
                &Rate::zero(),
            )
            .unwrap();
        assert_eq!(result.projected_amount.amount(), dec!(28000000));
        assert!(result.shortfall.is_zero());
        assert_eq!(result.sufficiency_rate.as_percentage(), dec!(100));
        assert_eq!(result.recommended_monthly_savings.amount(), dec!(38888.89));
    }

    #[test]
    fn test_sufficiency_at_retirement_age() {
        let data = RetirementData::new(
            "user-1",
            65,
            65,
            85,
            Money::jpy(dec!(250000)),
            Money::jpy(dec!(150000)),
        )
        .unwrap();
        assert!(data.is_retired());
        let result = data
            .calculate_retirement_sufficiency(
                &Money::jpy(dec!(4000000)),
                &Money::jpy(dec!(100000)),
                &Rate::new(dec!(5)).unwrap(),
                &Rate::new(dec!(2)).unwrap(),
            )
            .unwrap();
        // No years left to grow: projected is the current balance.
        assert_eq!(result.projected_amount.amount(), dec!(4000000));
        assert_eq!(result.recommended_monthly_savings.amount(), dec!(20000000));
        assert_eq!(result.sufficiency_rate.as_percentage(), dec!(16.6667));
    }

    #[test]
    fn test_investment_growth_raises_projection() {
        let data = standard();
        let flat = data
            .calculate_retirement_sufficiency(
                &Money::jpy(dec!(1000000)),
                &Money::jpy(dec!(30000)),
                &Rate::zero(),
                &Rate::zero(),
            )
            .unwrap();
        let growing = data
            .calculate_retirement_sufficiency(
                &Money::jpy(dec!(1000000)),
                &Money::jpy(dec!(30000)),
                &Rate::new(dec!(5)).unwrap(),
                &Rate::zero(),
            )
            .unwrap();
        assert!(growing
            .projected_amount
            .greater_than(&flat.projected_amount)
            .unwrap());
        assert!(
            growing.recommended_monthly_savings.amount()
                < flat.recommended_monthly_savings.amount()
        );
    }

    #[test]
    fn test_updates_keep_age_ordering() {
        let mut data = standard();
        assert!(data.update_current_age(66).is_err());
        assert!(data.update_retirement_age(30).is_err());
        assert!(data.update_retirement_age(90).is_err());
        assert!(data.update_life_expectancy(60).is_err());

        data.update_retirement_age(60).unwrap();
        data.update_current_age(40).unwrap();
        data.update_life_expectancy(95).unwrap();
        assert_eq!(data.calculate_years_until_retirement(), 20);
        assert_eq!(data.calculate_retirement_years(), 35);
    }

    #[test]
    fn test_amount_updates() {
        let mut data = standard();
        data.update_pension_amount(Money::jpy(dec!(200000))).unwrap();
        data.update_monthly_retirement_expenses(Money::jpy(dec!(260000)))
            .unwrap();
        assert_eq!(data.pension_shortfall().unwrap().amount(), dec!(60000));

        assert!(data.update_pension_amount(Money::jpy(dec!(-5))).is_err());
        assert!(data
            .update_pension_amount(Money::new(dec!(5), Currency::Usd))
            .is_err());
        assert_eq!(data.pension_amount().amount(), dec!(200000));
    }
}
