//! SQLite storage implementation for the financial planning core.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `finplan-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for plans and goals
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! `finplan-core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain, services)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! A plan is spread over `financial_data`, `expense_items`, `savings_items`,
//! `retirement_data` and `goals`. Writes go through a single writer task that
//! wraps each job in an `IMMEDIATE` transaction.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod goals;
pub mod plans;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use goals::GoalRepository;
pub use plans::FinancialPlanRepository;

// Re-export from finplan-core for convenience
pub use finplan_core::errors::{DatabaseError, Error, Result};
