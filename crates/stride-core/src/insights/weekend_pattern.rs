//! Weekend Pattern Insight
//!
//! Splits the trailing 30 days into weekend and weekday per-day
//! averages and reports when one side dominates.

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashMap;

use crate::error::Result;

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightKind};

/// Trailing window in days
const WINDOW_DAYS: i64 = 30;
/// One side must exceed the other by this factor to be surfaced
const DOMINANCE_RATIO: f64 = 1.5;

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub struct WeekendPatternInsight;

#[async_trait]
impl InsightGenerator for WeekendPatternInsight {
    fn id(&self) -> &'static str {
        "weekend_pattern"
    }

    fn name(&self) -> &'static str {
        "Weekend vs Weekday"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let from = ctx.today - Duration::days(WINDOW_DAYS - 1);
        let totals: HashMap<NaiveDate, f64> = ctx
            .db
            .daily_totals(ctx.user_id, from, ctx.today)?
            .into_iter()
            .collect();

        if totals.is_empty() {
            return Ok(None);
        }

        // Zero-spend days count toward the averages so the two sides
        // stay comparable
        let (mut weekend_sum, mut weekend_days) = (0.0, 0u32);
        let (mut weekday_sum, mut weekday_days) = (0.0, 0u32);
        for date in from.iter_days().take_while(|d| *d <= ctx.today) {
            let amount = totals.get(&date).copied().unwrap_or(0.0);
            if is_weekend(date) {
                weekend_sum += amount;
                weekend_days += 1;
            } else {
                weekday_sum += amount;
                weekday_days += 1;
            }
        }

        if weekend_days == 0 || weekday_days == 0 {
            return Ok(None);
        }

        let weekend_avg = weekend_sum / weekend_days as f64;
        let weekday_avg = weekday_sum / weekday_days as f64;

        let insight = if weekend_avg >= weekday_avg * DOMINANCE_RATIO && weekend_avg > 0.0 {
            Insight::new(
                InsightKind::Info,
                "🛍️",
                7,
                "Weekend Spender",
                format!(
                    "You average ${:.0}/day on weekends vs ${:.0}/day on weekdays.",
                    weekend_avg, weekday_avg
                ),
                "Planning weekend activities in advance can keep those days in check.",
            )
        } else if weekday_avg >= weekend_avg * DOMINANCE_RATIO && weekday_avg > 0.0 {
            Insight::new(
                InsightKind::Info,
                "🗓️",
                7,
                "Weekday Spender",
                format!(
                    "You average ${:.0}/day on weekdays vs ${:.0}/day on weekends.",
                    weekday_avg, weekend_avg
                ),
                "Look at recurring weekday costs like commuting and lunches.",
            )
        } else {
            return Ok(None);
        };

        Ok(Some(insight))
    }
}
