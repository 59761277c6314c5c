//! Weekly Change Insight
//!
//! Compares this week's spend (Monday through today) against the whole
//! of last week.

use async_trait::async_trait;
use chrono::Duration;

use crate::error::Result;

use super::engine::{week_start, AnalysisContext, InsightGenerator};
use super::types::{round1, Insight, InsightKind};

/// Week-over-week increase considered a spike
const SPIKE_THRESHOLD_PCT: f64 = 25.0;
/// Week-over-week decrease worth celebrating
const DROP_THRESHOLD_PCT: f64 = -10.0;

pub struct WeeklyChangeInsight;

#[async_trait]
impl InsightGenerator for WeeklyChangeInsight {
    fn id(&self) -> &'static str {
        "weekly_change"
    }

    fn name(&self) -> &'static str {
        "Weekly Change"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let this_start = week_start(ctx.today);
        let prior_start = this_start - Duration::days(7);
        let prior_end = this_start - Duration::days(1);

        let this_week = ctx.db.expense_total(ctx.user_id, this_start, ctx.today)?;
        let prior_week = ctx.db.expense_total(ctx.user_id, prior_start, prior_end)?;

        // Nothing to compare against
        if prior_week <= 0.0 {
            return Ok(None);
        }

        let change = round1((this_week - prior_week) / prior_week * 100.0);

        let insight = if change > SPIKE_THRESHOLD_PCT {
            Insight::new(
                InsightKind::Warning,
                "📈",
                3,
                "Spending Up This Week",
                format!(
                    "You've spent ${:.0} so far this week, {:.1}% more than last week's ${:.0}.",
                    this_week, change, prior_week
                ),
                "Review this week's expenses to see what drove the jump.",
            )
        } else if change < DROP_THRESHOLD_PCT {
            Insight::new(
                InsightKind::Positive,
                "📉",
                6,
                "Spending Down This Week",
                format!(
                    "You've spent {:.1}% less than last week (${:.0} vs ${:.0}).",
                    change.abs(),
                    this_week,
                    prior_week
                ),
                "Nice trend. Keep it up through the weekend.",
            )
        } else if change > 0.0 {
            Insight::new(
                InsightKind::Info,
                "📊",
                8,
                "Slightly Higher Spending",
                format!("Spending is up {:.1}% on last week.", change),
                "A small rise — worth a glance, not a worry.",
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

    fn spend(db: &Database, amount: f64, date: NaiveDate) {
        db.insert_expense(&NewExpense {
            user_id: 1,
            amount,
            category: ExpenseCategory::Food,
            payment_method: PaymentMethod::Card,
            date,
            note: None,
            recurring: None,
        })
        .unwrap();
    }

    #[tokio::test]
    async fn test_drop_reports_positive_change() {
        let db = Database::in_memory().unwrap();
        // 2026-03-11 is a Wednesday; this week starts 2026-03-09
        let today = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();

        spend(&db, 100.0, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        spend(&db, 150.0, NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());

        let ctx = AnalysisContext::new(&db, 1, today);
        let insight = WeeklyChangeInsight.generate(&ctx).await.unwrap().unwrap();

        assert_eq!(insight.kind, InsightKind::Positive);
        // 100 vs 150 is a -33.3% change
        assert!(insight.message.contains("33.3%"));
    }

    #[tokio::test]
    async fn test_spike_warns() {
        let db = Database::in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();

        spend(&db, 260.0, NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
        spend(&db, 200.0, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());

        let ctx = AnalysisContext::new(&db, 1, today);
        let insight = WeeklyChangeInsight.generate(&ctx).await.unwrap().unwrap();
        assert_eq!(insight.kind, InsightKind::Warning);
    }

    #[tokio::test]
    async fn test_no_prior_week_is_silent() {
        let db = Database::in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();

        spend(&db, 50.0, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());

        let ctx = AnalysisContext::new(&db, 1, today);
        assert!(WeeklyChangeInsight.generate(&ctx).await.unwrap().is_none());
    }
}
