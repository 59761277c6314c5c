//! Insight Engine - Behavioral Financial Insights
//!
//! The insight engine derives short, prioritized observations from a
//! user's transaction history. Thirteen independent generators each
//! encapsulate one heuristic; the engine fans out to all of them
//! concurrently, tolerates individual failures, and returns the
//! highest-priority results.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stride_core::insights::{AnalysisContext, InsightEngine, InsightRequest};
//!
//! let engine = InsightEngine::new();
//! let ctx = AnalysisContext::for_today(&db, user_id);
//! let insights = engine.generate(&ctx, &InsightRequest::default()).await?;
//! ```

pub mod best_day;
pub mod budget_proximity;
pub mod category_trend;
pub mod engine;
pub mod goal_pace;
pub mod month_end_forecast;
pub mod no_spend_days;
pub mod payment_mix;
pub mod savings_rate;
pub mod spending_anomaly;
pub mod streak_status;
pub mod top_category;
pub mod types;
pub mod weekend_pattern;
pub mod weekly_change;

pub use best_day::BestDayInsight;
pub use budget_proximity::BudgetProximityInsight;
pub use category_trend::CategoryTrendInsight;
pub use engine::{
    AnalysisContext, InsightEngine, InsightGenerator, InsightRequest, DEFAULT_INSIGHT_LIMIT,
};
pub use goal_pace::GoalPaceInsight;
pub use month_end_forecast::MonthEndForecastInsight;
pub use no_spend_days::NoSpendDaysInsight;
pub use payment_mix::PaymentMixInsight;
pub use savings_rate::SavingsRateInsight;
pub use spending_anomaly::SpendingAnomalyInsight;
pub use streak_status::StreakStatusInsight;
pub use top_category::TopCategoryInsight;
pub use types::{Insight, InsightKind};
pub use weekend_pattern::WeekendPatternInsight;
pub use weekly_change::WeeklyChangeInsight;
