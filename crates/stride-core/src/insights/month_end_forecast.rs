//! Month-End Forecast Insight
//!
//! Linear projection of month-end spend: spent-so-far / days-elapsed ×
//! days-in-month, compared against the active monthly budget when one
//! exists.

use async_trait::async_trait;
use chrono::Datelike;

use crate::error::Result;
use crate::models::BudgetPeriod;

use super::engine::{days_in_month, month_start, AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightKind};

/// Projection must exceed budget by this factor before warning
const OVERSHOOT_FACTOR: f64 = 1.1;

pub struct MonthEndForecastInsight;

#[async_trait]
impl InsightGenerator for MonthEndForecastInsight {
    fn id(&self) -> &'static str {
        "month_end_forecast"
    }

    fn name(&self) -> &'static str {
        "Month-End Forecast"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let start = month_start(ctx.today);
        let spent = ctx.db.expense_total(ctx.user_id, start, ctx.today)?;
        if spent <= 0.0 {
            return Ok(None);
        }

        let days_elapsed = ctx.today.day() as f64;
        let projected = spent / days_elapsed * days_in_month(ctx.today) as f64;

        let budget = ctx.db.active_budget(ctx.user_id, BudgetPeriod::Monthly)?;

        let insight = match budget {
            Some(b) if b.amount > 0.0 && projected > b.amount * OVERSHOOT_FACTOR => Insight::new(
                InsightKind::Warning,
                "🔮",
                3,
                "On Track to Overspend",
                format!(
                    "At this pace you'll spend about ${:.0} this month, ${:.0} over your ${:.0} budget.",
                    projected,
                    projected - b.amount,
                    b.amount
                ),
                "Trimming a little each day beats a crunch at month end.",
            ),
            _ => Insight::new(
                InsightKind::Info,
                "🔮",
                7,
                "Month-End Projection",
                format!(
                    "You're on pace to spend about ${:.0} this month (${:.0} so far).",
                    projected, spent
                ),
                "Projections sharpen as the month goes on.",
            ),
        };

        Ok(Some(insight))
    }
}
