//! SQLite storage implementation for financial plans.

mod model;
mod repository;

pub use model::{
    ExpenseItemDB, FinancialDataDB, NewExpenseItemDB, NewSavingsItemDB, RetirementDataDB,
    SavingsItemDB,
};
pub use repository::FinancialPlanRepository;
