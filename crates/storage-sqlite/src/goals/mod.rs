//! SQLite storage implementation for goals.

mod model;
mod repository;

pub use model::{GoalChangesDB, GoalDB};
pub(crate) use model::goals_from_rows;
pub(crate) use repository::owner_of;
pub use repository::GoalRepository;
