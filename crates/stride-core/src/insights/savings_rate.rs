//! Savings Rate Insight
//!
//! (income − expenses) / income for the current month.

use async_trait::async_trait;

use crate::error::Result;

use super::engine::{month_start, AnalysisContext, InsightGenerator};
use super::types::{round1, Insight, InsightKind};

/// Savings rate worth celebrating
const STRONG_RATE_PCT: f64 = 30.0;
/// Savings rate below which the user is warned
const LOW_RATE_PCT: f64 = 10.0;

pub struct SavingsRateInsight;

#[async_trait]
impl InsightGenerator for SavingsRateInsight {
    fn id(&self) -> &'static str {
        "savings_rate"
    }

    fn name(&self) -> &'static str {
        "Savings Rate"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let start = month_start(ctx.today);
        let income = ctx.db.income_total(ctx.user_id, start, ctx.today)?;
        let expenses = ctx.db.expense_total(ctx.user_id, start, ctx.today)?;

        // No income this month means no rate to compute
        if income <= 0.0 {
            return Ok(None);
        }

        let rate = round1((income - expenses) / income * 100.0);

        let insight = if rate >= STRONG_RATE_PCT {
            Insight::new(
                InsightKind::Positive,
                "💰",
                6,
                "Strong Savings Rate",
                format!("You're saving {:.1}% of your income this month.", rate),
                "Consider sweeping the surplus into a goal.",
            )
        } else if rate < 0.0 {
            Insight::new(
                InsightKind::Alert,
                "🚨",
                2,
                "Spending Exceeds Income",
                format!(
                    "You've spent ${:.0} more than you earned this month.",
                    expenses - income
                ),
                "Cut back now to avoid dipping into savings.",
            )
        } else if rate < LOW_RATE_PCT {
            Insight::new(
                InsightKind::Warning,
                "⚠️",
                4,
                "Low Savings Rate",
                format!(
                    "Only {:.1}% of this month's income is left after expenses.",
                    rate
                ),
                "Aim for at least 10% set aside each month.",
            )
        } else {
            return Ok(None);
        };

        Ok(Some(insight))
    }
}
