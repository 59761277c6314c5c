//! Budget Proximity Insight
//!
//! Compares spend against the active budget. The monthly budget wins
//! when both period types are active; weekly is the fallback.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Budget, BudgetPeriod};

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{round1, Insight, InsightKind};

/// Ratio (in percent) at which the budget is blown
const EXCEEDED_PCT: f64 = 100.0;
/// Ratio at which the user is warned
const WARNING_PCT: f64 = 80.0;
/// Ratio at or below which the user is praised
const COMFORT_PCT: f64 = 40.0;

pub struct BudgetProximityInsight;

impl BudgetProximityInsight {
    fn pick_budget(ctx: &AnalysisContext<'_>) -> Result<Option<Budget>> {
        if let Some(budget) = ctx.db.active_budget(ctx.user_id, BudgetPeriod::Monthly)? {
            return Ok(Some(budget));
        }
        ctx.db.active_budget(ctx.user_id, BudgetPeriod::Weekly)
    }
}

#[async_trait]
impl InsightGenerator for BudgetProximityInsight {
    fn id(&self) -> &'static str {
        "budget_proximity"
    }

    fn name(&self) -> &'static str {
        "Budget Proximity"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let budget = match Self::pick_budget(ctx)? {
            Some(b) if b.amount > 0.0 => b,
            _ => return Ok(None),
        };

        // A budget whose window hasn't started yet says nothing
        if ctx.today < budget.start_date {
            return Ok(None);
        }

        let window_end = budget.end_date.min(ctx.today);
        let spent = ctx
            .db
            .expense_total(ctx.user_id, budget.start_date, window_end)?;
        let ratio = round1(spent / budget.amount * 100.0);

        let insight = if ratio >= EXCEEDED_PCT {
            Insight::new(
                InsightKind::Alert,
                "🚨",
                1,
                "Budget Exceeded",
                format!(
                    "You're ${:.0} over your {} budget of ${:.0}.",
                    spent - budget.amount,
                    budget.period,
                    budget.amount
                ),
                "Pause non-essential spending until the period resets.",
            )
        } else if ratio >= WARNING_PCT {
            Insight::new(
                InsightKind::Warning,
                "⚠️",
                2,
                "Approaching Budget Limit",
                format!(
                    "You've used {:.1}% of your {} budget (${:.0} of ${:.0}).",
                    ratio, budget.period, spent, budget.amount
                ),
                "Slow down a little to stay under the line.",
            )
        } else if ratio <= COMFORT_PCT {
            Insight::new(
                InsightKind::Positive,
                "✅",
                8,
                "Well Under Budget",
                format!(
                    "Only {:.1}% of your {} budget used so far (${:.0} of ${:.0}).",
                    ratio, budget.period, spent, budget.amount
                ),
                "Room to spare — consider moving some to a goal.",
            )
        } else {
            return Ok(None);
        };

        Ok(Some(insight))
    }
}
