//! Insight engine - orchestrates the generator fan-out

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use futures::future::join_all;

use crate::db::Database;
use crate::Result;

use super::types::Insight;
use super::{
    BestDayInsight, BudgetProximityInsight, CategoryTrendInsight, GoalPaceInsight,
    MonthEndForecastInsight, NoSpendDaysInsight, PaymentMixInsight, SavingsRateInsight,
    SpendingAnomalyInsight, StreakStatusInsight, TopCategoryInsight, WeekendPatternInsight,
    WeeklyChangeInsight,
};

/// Default number of insights returned to the caller
pub const DEFAULT_INSIGHT_LIMIT: usize = 6;

/// Context provided to insight generators
pub struct AnalysisContext<'a> {
    /// Database for read-only aggregate queries
    pub db: &'a Database,
    /// User whose history is being analyzed
    pub user_id: i64,
    /// "Now" for all window math; fixed so a run is deterministic
    pub today: NaiveDate,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(db: &'a Database, user_id: i64, today: NaiveDate) -> Self {
        Self { db, user_id, today }
    }

    /// Create a context anchored on the local calendar date
    pub fn for_today(db: &'a Database, user_id: i64) -> Self {
        Self::new(db, user_id, chrono::Local::now().date_naive())
    }
}

/// Trait for insight generators
///
/// Each generator encapsulates one behavioral heuristic. It is a pure
/// function of (user, today) against the store: `Ok(None)` means the
/// heuristic has nothing to say, and any data shape it cannot interpret
/// resolves to `Ok(None)` rather than an error.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Stable identifier, also used as the insight's source label
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Analyze the user's history and produce at most one insight
    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>>;
}

/// Options for an insight generation request
#[derive(Debug, Clone)]
pub struct InsightRequest {
    /// Maximum number of insights to return
    pub limit: usize,
    /// Return the full ranked set, ignoring `limit`
    pub include_all: bool,
}

impl Default for InsightRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_INSIGHT_LIMIT,
            include_all: false,
        }
    }
}

impl InsightRequest {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            include_all: false,
        }
    }

    pub fn all() -> Self {
        Self {
            limit: DEFAULT_INSIGHT_LIMIT,
            include_all: true,
        }
    }
}

/// The main insight engine that fans out to all generators
pub struct InsightEngine {
    generators: Vec<Box<dyn InsightGenerator>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in generator set
    pub fn new() -> Self {
        let mut engine = Self { generators: vec![] };

        engine.register(Box::new(BudgetProximityInsight));
        engine.register(Box::new(SpendingAnomalyInsight));
        engine.register(Box::new(SavingsRateInsight));
        engine.register(Box::new(WeeklyChangeInsight));
        engine.register(Box::new(MonthEndForecastInsight));
        engine.register(Box::new(GoalPaceInsight));
        engine.register(Box::new(CategoryTrendInsight));
        engine.register(Box::new(NoSpendDaysInsight));
        engine.register(Box::new(StreakStatusInsight));
        engine.register(Box::new(WeekendPatternInsight));
        engine.register(Box::new(PaymentMixInsight));
        engine.register(Box::new(TopCategoryInsight));
        engine.register(Box::new(BestDayInsight));

        engine
    }

    /// Register an insight generator
    pub fn register(&mut self, generator: Box<dyn InsightGenerator>) {
        self.generators.push(generator);
    }

    /// Get list of registered generator ids
    pub fn generator_ids(&self) -> Vec<&'static str> {
        self.generators.iter().map(|g| g.id()).collect()
    }

    /// Run all generators concurrently and return the ranked insights
    ///
    /// Settle-all semantics: a generator's failure or absence never
    /// affects the others. Results sort ascending by priority with ties
    /// broken by registration order, then truncate to `request.limit`
    /// unless `request.include_all`.
    pub async fn generate(
        &self,
        ctx: &AnalysisContext<'_>,
        request: &InsightRequest,
    ) -> Result<Vec<Insight>> {
        let settled = join_all(
            self.generators
                .iter()
                .map(|generator| async move { (generator, generator.generate(ctx).await) }),
        )
        .await;

        let mut insights = Vec::new();
        for (generator, result) in settled {
            match result {
                Ok(Some(insight)) => {
                    insights.push(insight.with_source(generator.id()));
                }
                Ok(None) => {
                    tracing::debug!(generator = generator.id(), "No insight produced");
                }
                Err(e) => {
                    tracing::warn!(
                        generator = generator.id(),
                        error = %e,
                        "Insight generation failed"
                    );
                }
            }
        }

        // Stable sort keeps registration order for equal priorities
        insights.sort_by_key(|i| i.priority);

        if !request.include_all {
            insights.truncate(request.limit);
        }

        Ok(insights)
    }
}

/// Monday of the week containing `date`
pub(crate) fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First day of the month containing `date`
pub(crate) fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Number of days in the month containing `date`
pub(crate) fn days_in_month(date: NaiveDate) -> u32 {
    let next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next.map(|d| (d - month_start(date)).num_days() as u32)
        .unwrap_or(30)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, NewExpense, PaymentMethod};

    #[test]
    fn test_engine_registers_all_generators() {
        let engine = InsightEngine::new();
        let ids = engine.generator_ids();

        assert_eq!(ids.len(), 13);
        assert!(ids.contains(&"budget_proximity"));
        assert!(ids.contains(&"spending_anomaly"));
        assert!(ids.contains(&"month_end_forecast"));
    }

    #[test]
    fn test_week_and_month_helpers() {
        // 2026-03-11 is a Wednesday
        let wed = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        assert_eq!(week_start(wed), NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
        assert_eq!(month_start(wed), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(days_in_month(wed), 31);
        assert_eq!(
            days_in_month(NaiveDate::from_ymd_opt(2026, 2, 5).unwrap()),
            28
        );
    }

    #[tokio::test]
    async fn test_generate_empty_db() {
        let db = Database::in_memory().unwrap();
        let engine = InsightEngine::new();
        let ctx = AnalysisContext::new(&db, 1, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());

        let insights = engine
            .generate(&ctx, &InsightRequest::default())
            .await
            .unwrap();

        // An empty history still nudges the user to start a streak, but
        // nothing spend-derived appears
        assert!(insights.len() <= DEFAULT_INSIGHT_LIMIT);
        for insight in &insights {
            assert!(insight.source.is_some());
        }
    }

    #[tokio::test]
    async fn test_generate_sorted_and_truncated() {
        let db = Database::in_memory().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();

        // Seed a month of daily spending so several generators fire
        let mut date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        while date <= today {
            db.insert_expense(&NewExpense {
                user_id: 1,
                amount: 20.0,
                category: ExpenseCategory::Food,
                payment_method: PaymentMethod::Card,
                date,
                note: None,
                recurring: None,
            })
            .unwrap();
            date += Duration::days(1);
        }

        let engine = InsightEngine::new();
        let ctx = AnalysisContext::new(&db, 1, today);

        let limited = engine
            .generate(&ctx, &InsightRequest::with_limit(3))
            .await
            .unwrap();
        assert!(limited.len() <= 3);
        for pair in limited.windows(2) {
            assert!(pair[0].priority <= pair[1].priority);
        }

        let all = engine.generate(&ctx, &InsightRequest::all()).await.unwrap();
        assert!(all.len() >= limited.len());
    }
}
