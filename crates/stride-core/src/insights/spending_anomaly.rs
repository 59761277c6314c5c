//! Spending Anomaly Insight
//!
//! Flags a day whose total is far above the trailing-30-day baseline.
//! Tests today first and falls back to yesterday when today is empty.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::error::Result;

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightKind};

/// Baseline window in days
const BASELINE_DAYS: i64 = 30;
/// Standard deviations above the mean before a day is flagged
const SIGMA_FACTOR: f64 = 1.5;

/// Mean and population standard deviation of a sample
pub(crate) fn mean_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

pub struct SpendingAnomalyInsight;

impl SpendingAnomalyInsight {
    /// Baseline of 30 daily totals ending the day before `day`;
    /// zero-spend days count as zeros
    fn baseline(
        totals: &HashMap<NaiveDate, f64>,
        day: NaiveDate,
    ) -> Vec<f64> {
        let end = day - Duration::days(1);
        let start = end - Duration::days(BASELINE_DAYS - 1);
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| totals.get(&d).copied().unwrap_or(0.0))
            .collect()
    }
}

#[async_trait]
impl InsightGenerator for SpendingAnomalyInsight {
    fn id(&self) -> &'static str {
        "spending_anomaly"
    }

    fn name(&self) -> &'static str {
        "Unusual Spending"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        // One extra day so the yesterday-fallback baseline is fully covered
        let from = ctx.today - Duration::days(BASELINE_DAYS + 1);
        let totals: HashMap<NaiveDate, f64> = ctx
            .db
            .daily_totals(ctx.user_id, from, ctx.today)?
            .into_iter()
            .collect();

        // Today's total, or yesterday's when today is still empty
        let (day, amount) = match totals.get(&ctx.today) {
            Some(&t) if t > 0.0 => (ctx.today, t),
            _ => {
                let yesterday = ctx.today - Duration::days(1);
                match totals.get(&yesterday) {
                    Some(&t) if t > 0.0 => (yesterday, t),
                    _ => return Ok(None),
                }
            }
        };

        let (mean, stddev) = mean_stddev(&Self::baseline(&totals, day));
        if stddev <= 0.0 {
            return Ok(None);
        }

        if amount <= mean + SIGMA_FACTOR * stddev {
            return Ok(None);
        }

        Ok(Some(Insight::new(
            InsightKind::Negative,
            "⚠️",
            2,
            "Unusual Spending",
            format!(
                "You spent ${:.0} on {}, well above your ~${:.0} daily average.",
                amount,
                day.format("%b %-d"),
                mean
            ),
            "If this was planned, all good — otherwise it's worth a look.",
        )))
    }
}
