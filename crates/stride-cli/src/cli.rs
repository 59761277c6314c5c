//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stride - Track spending, build streaks, earn insight
#[derive(Parser)]
#[command(name = "stride")]
#[command(about = "Personal finance tracker with insights and progression", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "stride.db", global = true)]
    pub db: PathBuf,

    /// User id to operate on
    #[arg(long, default_value_t = 1, global = true)]
    pub user: i64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Log and list expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Log and list income
    Income {
        #[command(subcommand)]
        action: IncomeAction,
    },

    /// Manage budgets
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Manage savings goals
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Show ranked insights
    Insights {
        /// Maximum number of insights
        #[arg(short, long, default_value_t = 6)]
        limit: usize,

        /// Show the full ranked set
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show streak, level, XP, and badges
    Status,

    /// List badges, optionally running the badge checks first
    Badges {
        /// Evaluate badge metrics before listing
        #[arg(long)]
        check: bool,
    },
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Log an expense (advances your streak)
    Add {
        /// Amount spent
        amount: f64,

        /// Category: food, transport, shopping, entertainment, bills,
        /// health, education, other
        #[arg(short, long, default_value = "other")]
        category: String,

        /// Payment method: cash, card, mobile_money, bank_transfer
        #[arg(short, long, default_value = "card")]
        method: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Optional note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List recent expenses
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum IncomeAction {
    /// Log an income entry
    Add {
        /// Amount received
        amount: f64,

        /// Source: salary, business, investment, gift, other
        #[arg(short, long, default_value = "other")]
        source: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List recent income entries
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Set the active budget for a period
    Set {
        /// Budget amount
        amount: f64,

        /// Period: weekly or monthly
        #[arg(short, long, default_value = "monthly")]
        period: String,

        /// Start date (YYYY-MM-DD, defaults to the period start)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, defaults to the period end)
        #[arg(long)]
        end: Option<String>,
    },

    /// Show active budgets
    Show,
}

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a savings goal
    Add {
        /// Goal title
        title: String,

        /// Target amount
        target: f64,

        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,
    },

    /// Add progress toward a goal
    Progress {
        /// Goal id
        id: i64,

        /// Amount to add
        amount: f64,
    },

    /// List goals
    List,
}
