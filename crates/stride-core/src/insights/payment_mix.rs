//! Payment Mix Insight
//!
//! Surfaces heavy concentration on one payment method over the
//! trailing 30 days.

use async_trait::async_trait;
use chrono::Duration;

use crate::error::Result;

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{round1, Insight, InsightKind};

/// Trailing window in days
const WINDOW_DAYS: i64 = 30;
/// Share above which a method counts as dominant
const CONCENTRATION_PCT: f64 = 70.0;

pub struct PaymentMixInsight;

#[async_trait]
impl InsightGenerator for PaymentMixInsight {
    fn id(&self) -> &'static str {
        "payment_mix"
    }

    fn name(&self) -> &'static str {
        "Payment Concentration"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let from = ctx.today - Duration::days(WINDOW_DAYS - 1);
        let totals = ctx.db.payment_method_totals(ctx.user_id, from, ctx.today)?;

        let grand_total: f64 = totals.iter().map(|(_, t)| t).sum();
        if grand_total <= 0.0 {
            return Ok(None);
        }

        // payment_method_totals is ordered largest-first
        let (method, amount) = &totals[0];
        let share = round1(amount / grand_total * 100.0);
        if share <= CONCENTRATION_PCT {
            return Ok(None);
        }

        Ok(Some(Insight::new(
            InsightKind::Info,
            "💳",
            7,
            "Payment Concentration",
            format!(
                "{:.1}% of your last {} days of spending went through {}.",
                share,
                WINDOW_DAYS,
                method.label()
            ),
            "Heavy reliance on one method makes spending easy to miss — check its statement.",
        )))
    }
}
