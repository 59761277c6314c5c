//! No-Spend Days Insight
//!
//! Counts zero-spend days in the current week so far.

use async_trait::async_trait;

use crate::error::Result;

use super::engine::{week_start, AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightKind};

/// No-spend days this week worth celebrating
const CELEBRATE_THRESHOLD: i64 = 3;
/// Days into the week before an every-day-spend nudge makes sense
const MIN_DAYS_ELAPSED: i64 = 3;

pub struct NoSpendDaysInsight;

#[async_trait]
impl InsightGenerator for NoSpendDaysInsight {
    fn id(&self) -> &'static str {
        "no_spend_days"
    }

    fn name(&self) -> &'static str {
        "No-Spend Days"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let start = week_start(ctx.today);
        let days_elapsed = (ctx.today - start).num_days() + 1;
        let spend_days = ctx.db.spend_dates(ctx.user_id, start, ctx.today)?.len() as i64;
        let zero_days = days_elapsed - spend_days;

        let insight = if zero_days >= CELEBRATE_THRESHOLD {
            Insight::new(
                InsightKind::Positive,
                "✨",
                6,
                "No-Spend Days",
                format!("{} no-spend days this week so far.", zero_days),
                "Those zero days add up fast — see if you can fit in one more.",
            )
        } else if zero_days == 0 && days_elapsed >= MIN_DAYS_ELAPSED {
            Insight::new(
                InsightKind::Info,
                "💸",
                8,
                "Spending Every Day",
                format!(
                    "You've spent money on all {} days of this week so far.",
                    days_elapsed
                ),
                "Try picking one day this week to spend nothing at all.",
            )
        } else {
            return Ok(None);
        };

        Ok(Some(insight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{ExpenseCategory, NewExpense, PaymentMethod};
    use chrono::NaiveDate;

    fn spend(db: &Database, date: NaiveDate) {
        db.insert_expense(&NewExpense {
            user_id: 1,
            amount: 12.0,
            category: ExpenseCategory::Food,
            payment_method: PaymentMethod::Cash,
            date,
            note: None,
            recurring: None,
        })
        .unwrap();
    }

    #[tokio::test]
    async fn test_three_zero_days_celebrated() {
        let db = Database::in_memory().unwrap();
        // Thursday; week started Monday 2026-03-09, 4 days elapsed
        let today = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap();
        spend(&db, NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());

        let ctx = AnalysisContext::new(&db, 1, today);
        let insight = NoSpendDaysInsight.generate(&ctx).await.unwrap().unwrap();
        assert_eq!(insight.kind, InsightKind::Positive);
        assert!(insight.message.contains('3'));
    }

    #[tokio::test]
    async fn test_every_day_spend_nudges() {
        let db = Database::in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        for day in 9..=11 {
            spend(&db, NaiveDate::from_ymd_opt(2026, 3, day).unwrap());
        }

        let ctx = AnalysisContext::new(&db, 1, today);
        let insight = NoSpendDaysInsight.generate(&ctx).await.unwrap().unwrap();
        assert_eq!(insight.kind, InsightKind::Info);
    }

    #[tokio::test]
    async fn test_early_week_is_silent() {
        let db = Database::in_memory().unwrap();
        // Monday: one day elapsed, one spend day
        let today = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        spend(&db, today);

        let ctx = AnalysisContext::new(&db, 1, today);
        assert!(NoSpendDaysInsight.generate(&ctx).await.unwrap().is_none());
    }
}
