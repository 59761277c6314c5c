//! Budget and goal commands

use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Local, NaiveDate};

use stride_core::db::Database;
use stride_core::models::BudgetPeriod;

use super::parse_date_arg;

/// Default window for a new budget: the current week or month
fn default_period_bounds(period: BudgetPeriod, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        BudgetPeriod::Weekly => {
            let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            (start, start + Duration::days(6))
        }
        BudgetPeriod::Monthly => {
            let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
            let next = if today.month() == 12 {
                NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
            };
            let end = next.map(|d| d - Duration::days(1)).unwrap_or(today);
            (start, end)
        }
    }
}

pub fn cmd_budget_set(
    db: &Database,
    user_id: i64,
    period: &str,
    amount: f64,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    let period = BudgetPeriod::from_str(period).map_err(|e| anyhow!(e))?;
    let today = Local::now().date_naive();
    let (default_start, default_end) = default_period_bounds(period, today);

    let start_date = match start {
        Some(s) => parse_date_arg(Some(s))?,
        None => default_start,
    };
    let end_date = match end {
        Some(s) => parse_date_arg(Some(s))?,
        None => default_end,
    };

    db.set_budget(user_id, period, amount, start_date, end_date)?;

    println!(
        "📋 {} budget set: ${:.2} ({} to {})",
        period, amount, start_date, end_date
    );
    Ok(())
}

pub fn cmd_budget_show(db: &Database, user_id: i64) -> Result<()> {
    let mut any = false;
    for period in [BudgetPeriod::Monthly, BudgetPeriod::Weekly] {
        if let Some(budget) = db.active_budget(user_id, period)? {
            let spent = db.expense_total(
                user_id,
                budget.start_date,
                budget.end_date.min(Local::now().date_naive()),
            )?;
            println!(
                "📋 {} budget: ${:.2} spent of ${:.2} ({} to {})",
                period, spent, budget.amount, budget.start_date, budget.end_date
            );
            any = true;
        }
    }

    if !any {
        println!("No active budgets. Set one with: stride budget set 500");
    }
    Ok(())
}

pub fn cmd_goal_add(
    db: &Database,
    user_id: i64,
    title: &str,
    target: f64,
    deadline: Option<&str>,
) -> Result<()> {
    let deadline = deadline.map(|d| parse_date_arg(Some(d))).transpose()?;
    let id = db.insert_goal(user_id, title, target, deadline)?;

    println!("🎯 Goal #{} created: \"{}\" (${:.2})", id, title, target);
    if let Some(d) = deadline {
        println!("   Deadline: {}", d);
    }
    Ok(())
}

pub fn cmd_goal_progress(db: &Database, goal_id: i64, amount: f64) -> Result<()> {
    let goal = db.add_goal_progress(goal_id, amount)?;
    let pct = goal.current_amount / goal.target_amount * 100.0;

    println!(
        "🎯 \"{}\": ${:.2} of ${:.2} ({:.1}%)",
        goal.title, goal.current_amount, goal.target_amount, pct
    );
    if goal.status == stride_core::models::GoalStatus::Completed {
        println!("🎉 Goal completed!");
    }
    Ok(())
}

pub fn cmd_goal_list(db: &Database, user_id: i64) -> Result<()> {
    let goals = db.list_goals(user_id)?;

    if goals.is_empty() {
        println!("No goals yet. Create one with: stride goal add \"Emergency fund\" 1000");
        return Ok(());
    }

    println!("🎯 Goals");
    for goal in &goals {
        let deadline = goal
            .deadline
            .map(|d| format!(" due {}", d))
            .unwrap_or_default();
        println!(
            "   #{} \"{}\" ${:.2}/${:.2} [{}]{}",
            goal.id, goal.title, goal.current_amount, goal.target_amount, goal.status, deadline
        );
    }
    Ok(())
}
