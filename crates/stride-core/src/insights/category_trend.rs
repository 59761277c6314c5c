//! Category Trend Insight
//!
//! Finds the category with the largest month-over-month swing, looking
//! only at categories with nonzero prior-month spend.

use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;

use crate::error::Result;
use crate::models::ExpenseCategory;

use super::engine::{month_start, AnalysisContext, InsightGenerator};
use super::types::{round1, Insight, InsightKind};

/// Month-over-month increase considered a spike
const SPIKE_THRESHOLD_PCT: f64 = 30.0;
/// Month-over-month decrease worth celebrating
const DROP_THRESHOLD_PCT: f64 = -30.0;

pub struct CategoryTrendInsight;

#[async_trait]
impl InsightGenerator for CategoryTrendInsight {
    fn id(&self) -> &'static str {
        "category_trend"
    }

    fn name(&self) -> &'static str {
        "Category Trend"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let this_start = month_start(ctx.today);
        let prior_end = this_start - Duration::days(1);
        let prior_start = month_start(prior_end);

        let current: HashMap<ExpenseCategory, f64> = ctx
            .db
            .category_totals(ctx.user_id, this_start, ctx.today)?
            .into_iter()
            .map(|t| (t.category, t.total))
            .collect();
        let prior = ctx
            .db
            .category_totals(ctx.user_id, prior_start, prior_end)?;

        // Largest swing among categories that existed last month
        let mut biggest: Option<(ExpenseCategory, f64, f64, f64)> = None;
        for entry in prior {
            if entry.total <= 0.0 {
                continue;
            }
            let now = current.get(&entry.category).copied().unwrap_or(0.0);
            let change = (now - entry.total) / entry.total * 100.0;
            if biggest
                .as_ref()
                .map(|(_, _, _, c)| change.abs() > c.abs())
                .unwrap_or(true)
            {
                biggest = Some((entry.category, now, entry.total, change));
            }
        }

        let (category, now, before, change) = match biggest {
            Some(b) => b,
            None => return Ok(None),
        };
        let change = round1(change);

        let insight = if change > SPIKE_THRESHOLD_PCT {
            Insight::new(
                InsightKind::Warning,
                "📈",
                4,
                "Category Spending Spike",
                format!(
                    "{} spending is up {:.1}% vs last month (${:.0} vs ${:.0}).",
                    category.label(),
                    change,
                    now,
                    before
                ),
                format!("Check what changed in your {} spending.", category.label()),
            )
        } else if change < DROP_THRESHOLD_PCT {
            Insight::new(
                InsightKind::Positive,
                "📉",
                6,
                "Category Spending Down",
                format!(
                    "You've cut {} spending by {:.1}% vs last month (${:.0} vs ${:.0}).",
                    category.label(),
                    change.abs(),
                    now,
                    before
                ),
                "Whatever you changed, it's working.",
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
    use crate::models::{NewExpense, PaymentMethod};
    use chrono::NaiveDate;

    fn spend(db: &Database, amount: f64, category: ExpenseCategory, date: NaiveDate) {
        db.insert_expense(&NewExpense {
            user_id: 1,
            amount,
            category,
            payment_method: PaymentMethod::Card,
            date,
            note: None,
            recurring: None,
        })
        .unwrap();
    }

    #[tokio::test]
    async fn test_spike_warns() {
        let db = Database::in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

        spend(
            &db,
            100.0,
            ExpenseCategory::Transport,
            NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        );
        spend(
            &db,
            180.0,
            ExpenseCategory::Transport,
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        );

        let ctx = AnalysisContext::new(&db, 1, today);
        let insight = CategoryTrendInsight.generate(&ctx).await.unwrap().unwrap();
        assert_eq!(insight.kind, InsightKind::Warning);
        assert!(insight.message.contains("Transport"));
        assert!(insight.message.contains("80.0%"));
    }

    #[tokio::test]
    async fn test_new_category_without_prior_month_is_ignored() {
        let db = Database::in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

        // Only current-month spend; no prior baseline
        spend(
            &db,
            500.0,
            ExpenseCategory::Shopping,
            NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
        );

        let ctx = AnalysisContext::new(&db, 1, today);
        assert!(CategoryTrendInsight.generate(&ctx).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_big_drop_celebrated() {
        let db = Database::in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

        spend(
            &db,
            200.0,
            ExpenseCategory::Entertainment,
            NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
        );
        spend(
            &db,
            40.0,
            ExpenseCategory::Entertainment,
            NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
        );

        let ctx = AnalysisContext::new(&db, 1, today);
        let insight = CategoryTrendInsight.generate(&ctx).await.unwrap().unwrap();
        assert_eq!(insight.kind, InsightKind::Positive);
    }
}
