//! Command implementations
//!
//! Each command function takes an open `Database` (plus parsed
//! arguments) so tests can drive them against an in-memory database.

mod core;
mod insights;
mod log;
mod plan;

pub use core::{cmd_badges, cmd_init, cmd_status, open_db, parse_date_arg};
pub use insights::cmd_insights;
pub use log::{cmd_expense_add, cmd_expense_list, cmd_income_add, cmd_income_list};
pub use plan::{cmd_budget_set, cmd_budget_show, cmd_goal_add, cmd_goal_list, cmd_goal_progress};
