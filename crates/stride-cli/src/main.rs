//! Stride CLI - Personal finance tracker with insights and progression
//!
//! Usage:
//!   stride init                        Initialize database
//!   stride expense add 12.50           Log an expense (advances streak)
//!   stride insights                    Show ranked insights
//!   stride status                      Show streak, level, XP, badges

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Expense { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                ExpenseAction::Add {
                    amount,
                    category,
                    method,
                    date,
                    note,
                } => {
                    commands::cmd_expense_add(
                        &db,
                        cli.user,
                        amount,
                        &category,
                        &method,
                        date.as_deref(),
                        note.as_deref(),
                    )
                    .await
                }
                ExpenseAction::List { limit } => commands::cmd_expense_list(&db, cli.user, limit),
            }
        }
        Commands::Income { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                IncomeAction::Add {
                    amount,
                    source,
                    date,
                } => commands::cmd_income_add(&db, cli.user, amount, &source, date.as_deref()),
                IncomeAction::List { limit } => commands::cmd_income_list(&db, cli.user, limit),
            }
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                BudgetAction::Set {
                    amount,
                    period,
                    start,
                    end,
                } => commands::cmd_budget_set(
                    &db,
                    cli.user,
                    &period,
                    amount,
                    start.as_deref(),
                    end.as_deref(),
                ),
                BudgetAction::Show => commands::cmd_budget_show(&db, cli.user),
            }
        }
        Commands::Goal { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                GoalAction::Add {
                    title,
                    target,
                    deadline,
                } => commands::cmd_goal_add(&db, cli.user, &title, target, deadline.as_deref()),
                GoalAction::Progress { id, amount } => {
                    commands::cmd_goal_progress(&db, id, amount)
                }
                GoalAction::List => commands::cmd_goal_list(&db, cli.user),
            }
        }
        Commands::Insights { limit, all, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_insights(&db, cli.user, limit, all, json).await
        }
        Commands::Status => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_status(&db, cli.user)
        }
        Commands::Badges { check } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_badges(&db, cli.user, check).await
        }
    }
}
