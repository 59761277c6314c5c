//! Best Day Insight
//!
//! Names the weekday with the lowest trailing-60-day average spend.

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashMap;

use crate::error::Result;

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightKind};

/// Trailing window in days
const WINDOW_DAYS: i64 = 60;

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub struct BestDayInsight;

#[async_trait]
impl InsightGenerator for BestDayInsight {
    fn id(&self) -> &'static str {
        "best_day"
    }

    fn name(&self) -> &'static str {
        "Best Day"
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

        // Average per weekday over all calendar occurrences in the window
        let mut sums: HashMap<Weekday, (f64, u32)> = HashMap::new();
        for date in from.iter_days().take_while(|d| *d <= ctx.today) {
            let entry = sums.entry(date.weekday()).or_insert((0.0, 0));
            entry.0 += totals.get(&date).copied().unwrap_or(0.0);
            entry.1 += 1;
        }

        let best = sums
            .into_iter()
            .map(|(weekday, (sum, count))| (weekday, sum / count as f64))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let (weekday, average) = match best {
            Some(b) => b,
            None => return Ok(None),
        };

        Ok(Some(Insight::new(
            InsightKind::Info,
            "📆",
            9,
            "Your Cheapest Day",
            format!(
                "You spend the least on {}s — about ${:.0} on average.",
                weekday_name(weekday),
                average
            ),
            "Lean into your low-spend days when the month runs tight.",
        )))
    }
}
