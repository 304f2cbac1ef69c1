//! Profile module - income, expenses, savings and asset projections.

mod profile_model;


pub use profile_model::{
    AssetProjection, ExpenseCollection, ExpenseItem, FinancialHealth, FinancialProfile,
    FinancialProfileParts, SavingsCollection, SavingsItem,
};
