use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::values::Currency;

/// Currency used when callers do not specify one
pub const DEFAULT_CURRENCY: Currency = Currency::Jpy;

/// Decimal places kept on monetary amounts
pub const MONEY_DECIMAL_PRECISION: u32 = 2;

/// Decimal places kept on user-entered percentage rates
pub const RATE_DECIMAL_PRECISION: u32 = 4;

/// Decimal places kept on derived (monthly/annual) percentage rates
pub const DERIVED_RATE_DECIMAL_PRECISION: u32 = 8;

/// Upper bound for any rate, in percent
pub const MAX_RATE_PERCENTAGE: Decimal = dec!(100);

/// Upper bound for an investment return accepted from user input, in percent
pub const MAX_INVESTMENT_RETURN_PERCENTAGE: Decimal = dec!(100);

/// Upper bound for an inflation rate accepted from user input, in percent
pub const MAX_INFLATION_RATE_PERCENTAGE: Decimal = dec!(50);

/// Net savings below this share of income triggers a low-savings warning
pub const MIN_HEALTHY_SAVINGS_RATIO: Decimal = dec!(0.1);

/// Approximate month length used for "months until" calculations
pub const DAYS_PER_MONTH: i64 = 30;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Age bounds for retirement planning
pub const MAX_CURRENT_AGE: i32 = 150;
pub const MAX_RETIREMENT_AGE: i32 = 100;
pub const MAX_LIFE_EXPECTANCY: i32 = 150;

/// Emergency fund defaults
pub const DEFAULT_EMERGENCY_FUND_MONTHS: u32 = 3;
pub const MAX_EMERGENCY_FUND_MONTHS: u32 = 24;

/// Emergency fund shortfall above this share of the target is reported by plan validation
pub const EMERGENCY_FUND_CRITICAL_SHORTFALL_RATIO: Decimal = dec!(0.5);

/// A goal whose progress is at least this share of the time-based expectation is still on track
pub const GOAL_ON_TRACK_TOLERANCE: Decimal = dec!(0.8);

/// Upper bound on a debt repayment simulation (100 years)
pub const MAX_DEBT_PAYOFF_MONTHS: u32 = 1200;

/// Monthly savings thresholds, in units of the goal currency, separating the
/// achievability bands of a savings recommendation
pub const EASY_MONTHLY_SAVINGS: Decimal = dec!(10000);
pub const MODERATE_MONTHLY_SAVINGS: Decimal = dec!(50000);
pub const DEMANDING_MONTHLY_SAVINGS: Decimal = dec!(100000);

/// A gap between recommended and planned monthly savings above this is urgent
pub const LARGE_SAVINGS_GAP: Decimal = dec!(50000);

/// Goals due within this many months get high-priority savings advice
pub const URGENT_GOAL_MONTHS: i64 = 6;

/// Investment advice is only given for goals at least this many days away
pub const MIN_INVESTMENT_HORIZON_DAYS: i64 = 365;

/// Investment returns below this percentage trigger investment advice
pub const LOW_INVESTMENT_RETURN_PERCENTAGE: Decimal = dec!(5);

/// Required savings at or below these shares of net savings are low / medium risk
pub const LOW_RISK_SAVINGS_RATIO: Decimal = dec!(0.5);
pub const MEDIUM_RISK_SAVINGS_RATIO: Decimal = dec!(0.8);
