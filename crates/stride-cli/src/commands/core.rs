//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show streak, level, XP, and badges
//! - `cmd_badges` - List badges, optionally evaluating first

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use stride_core::db::Database;
use stride_core::gamification::{BadgeContext, GamificationEngine, XpLedger, LEVEL_THRESHOLDS};
use stride_core::models::ExpenseCategory;

/// Open (and migrate) the database at the given path
pub fn open_db(db_path: &Path) -> Result<Database> {
    tracing::debug!(path = %db_path.display(), "Opening database");
    let path_str = db_path.to_string_lossy();
    Database::new(&path_str).context("Failed to open database")
}

/// Parse an optional YYYY-MM-DD argument, defaulting to today
pub fn parse_date_arg(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s)),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Log an expense: stride expense add 12.50 --category food");
    println!("  2. See your insights: stride insights");

    Ok(())
}

pub fn cmd_status(db: &Database, user_id: i64) -> Result<()> {
    let streak = db.get_streak(user_id)?;
    let record = XpLedger::new(db).record(user_id)?;
    let badges = db.list_badges(user_id)?;

    println!("📊 Stride Status");
    println!("   ─────────────────────────────");

    match streak {
        Some(s) => {
            println!(
                "   🔥 Streak: {} days (best: {})",
                s.current_streak, s.longest_streak
            );
            if let Some(last) = s.last_activity_date {
                println!("      Last activity: {}", last);
            }
        }
        None => println!("   🔥 Streak: none yet — log an expense to start one"),
    }

    println!("   ⭐ Level {} ({} XP)", record.level, record.total_xp);
    if let Some(next) = LEVEL_THRESHOLDS.get(record.level as usize) {
        println!("      {} XP to level {}", next - record.total_xp, record.level + 1);
    }

    if badges.is_empty() {
        println!("   🏆 Badges: none yet");
    } else {
        println!("   🏆 Badges:");
        for badge in &badges {
            println!("      {} ({}) — {}", badge.name, badge.tier, badge.description);
        }
    }

    Ok(())
}

pub async fn cmd_badges(db: &Database, user_id: i64, check: bool) -> Result<()> {
    if check {
        println!("🔍 Running badge checks...");
        let engine = GamificationEngine::new(db.clone());
        let today = Local::now().date_naive();

        let contexts = [
            BadgeContext::Streak,
            BadgeContext::BudgetAdherence,
            BadgeContext::CategorySpend(ExpenseCategory::Entertainment),
        ];
        let awarded = engine.evaluate_badges(user_id, &contexts, today).await?;

        if awarded.is_empty() {
            println!("   No new badges this time.");
        } else {
            for badge in &awarded {
                println!("   🎉 New badge: {} ({})", badge.name, badge.tier);
            }
        }
        println!();
    }

    let badges = db.list_badges(user_id)?;
    if badges.is_empty() {
        println!("🏆 No badges earned yet. Keep logging!");
        return Ok(());
    }

    println!("🏆 Badges ({})", badges.len());
    for badge in &badges {
        println!(
            "   {} ({}) — {} [{}]",
            badge.name,
            badge.tier,
            badge.description,
            badge.earned_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}
