//! Top Category Insight
//!
//! Surfaces the largest category's share of trailing-30-day spend
//! whenever any spend exists.

use async_trait::async_trait;
use chrono::Duration;

use crate::error::Result;

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{round1, Insight, InsightKind};

/// Trailing window in days
const WINDOW_DAYS: i64 = 30;

pub struct TopCategoryInsight;

#[async_trait]
impl InsightGenerator for TopCategoryInsight {
    fn id(&self) -> &'static str {
        "top_category"
    }

    fn name(&self) -> &'static str {
        "Top Category"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let from = ctx.today - Duration::days(WINDOW_DAYS - 1);
        let totals = ctx.db.category_totals(ctx.user_id, from, ctx.today)?;

        let grand_total: f64 = totals.iter().map(|t| t.total).sum();
        if grand_total <= 0.0 {
            return Ok(None);
        }

        // category_totals is ordered largest-first
        let top = &totals[0];
        let share = round1(top.total / grand_total * 100.0);

        Ok(Some(Insight::new(
            InsightKind::Info,
            "📊",
            8,
            "Top Spending Category",
            format!(
                "{} makes up {:.1}% of your last {} days of spending (${:.0}).",
                top.category.label(),
                share,
                WINDOW_DAYS,
                top.total
            ),
            format!(
                "Set a budget if {} spending feels higher than it should be.",
                top.category.label()
            ),
        )))
    }
}
