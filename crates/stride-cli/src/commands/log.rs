//! Expense and income logging commands
//!
//! Logging an expense is the event that drives the gamification chain:
//! streak update, XP award, and badge checks.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use stride_core::db::Database;
use stride_core::gamification::{GamificationEngine, MemorySink};
use stride_core::models::{
    ExpenseCategory, IncomeSource, NewExpense, NewIncome, PaymentMethod,
};

use super::parse_date_arg;

pub async fn cmd_expense_add(
    db: &Database,
    user_id: i64,
    amount: f64,
    category: &str,
    method: &str,
    date: Option<&str>,
    note: Option<&str>,
) -> Result<()> {
    if amount <= 0.0 {
        return Err(anyhow!("Amount must be positive"));
    }
    let category = ExpenseCategory::from_str(category).map_err(|e| anyhow!(e))?;
    let method = PaymentMethod::from_str(method).map_err(|e| anyhow!(e))?;
    let date = parse_date_arg(date)?;

    db.insert_expense(&NewExpense {
        user_id,
        amount,
        category,
        payment_method: method,
        date,
        note: note.map(String::from),
        recurring: None,
    })?;

    println!(
        "💸 Logged ${:.2} ({}) on {}",
        amount,
        category.label(),
        date
    );

    // Run the gamification chain and surface whatever it produced
    let sink = Arc::new(MemorySink::new());
    let engine = GamificationEngine::with_sink(db.clone(), sink.clone());
    let update = engine.record_activity(user_id, date).await?;

    if update.counted {
        println!(
            "🔥 Streak: {} days (best: {})",
            update.streak.current_streak, update.streak.longest_streak
        );
    }
    for notification in sink.drain() {
        println!("🔔 {} — {}", notification.title, notification.message);
    }

    Ok(())
}

pub fn cmd_expense_list(db: &Database, user_id: i64, limit: usize) -> Result<()> {
    let expenses = db.list_expenses(user_id, limit)?;

    if expenses.is_empty() {
        println!("No expenses logged yet.");
        return Ok(());
    }

    println!("💸 Recent expenses");
    for expense in &expenses {
        let note = expense
            .note
            .as_deref()
            .map(|n| format!(" — {}", n))
            .unwrap_or_default();
        println!(
            "   {} ${:>8.2}  {:<13} {}{}",
            expense.date,
            expense.amount,
            expense.category.label(),
            expense.payment_method.label(),
            note
        );
    }

    Ok(())
}

pub fn cmd_income_add(
    db: &Database,
    user_id: i64,
    amount: f64,
    source: &str,
    date: Option<&str>,
) -> Result<()> {
    if amount <= 0.0 {
        return Err(anyhow!("Amount must be positive"));
    }
    let source = IncomeSource::from_str(source).map_err(|e| anyhow!(e))?;
    let date = parse_date_arg(date)?;

    db.insert_income(&NewIncome {
        user_id,
        amount,
        source,
        date,
    })?;

    println!("💰 Logged ${:.2} income ({}) on {}", amount, source, date);
    Ok(())
}

pub fn cmd_income_list(db: &Database, user_id: i64, limit: usize) -> Result<()> {
    let incomes = db.list_incomes(user_id, limit)?;

    if incomes.is_empty() {
        println!("No income logged yet.");
        return Ok(());
    }

    println!("💰 Recent income");
    for income in &incomes {
        println!(
            "   {} ${:>8.2}  {}",
            income.date, income.amount, income.source
        );
    }

    Ok(())
}
