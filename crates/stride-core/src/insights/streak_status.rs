//! Streak Status Insight
//!
//! Reflects the daily-logging streak back to the user.

use async_trait::async_trait;

use crate::error::Result;

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{Insight, InsightKind};

/// Streak length worth celebrating
const CELEBRATE_DAYS: i64 = 7;

pub struct StreakStatusInsight;

#[async_trait]
impl InsightGenerator for StreakStatusInsight {
    fn id(&self) -> &'static str {
        "streak_status"
    }

    fn name(&self) -> &'static str {
        "Streak"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let streak = ctx.db.get_streak(ctx.user_id)?;
        let (current, longest) = streak
            .map(|s| (s.current_streak, s.longest_streak))
            .unwrap_or((0, 0));

        let insight = if current >= CELEBRATE_DAYS {
            Insight::new(
                InsightKind::Positive,
                "🔥",
                6,
                "Logging Streak",
                format!(
                    "You've logged expenses {} days in a row (best: {}).",
                    current, longest
                ),
                "Consistency is what makes the insights sharp — keep going.",
            )
        } else if current == 0 {
            Insight::new(
                InsightKind::Info,
                "📝",
                9,
                "Start a Streak",
                "Log an expense today to start a daily tracking streak.",
                "Daily logging takes under a minute and earns XP.",
            )
        } else {
            return Ok(None);
        };

        Ok(Some(insight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::Streak;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_long_streak_celebrated() {
        let db = Database::in_memory().unwrap();
        db.save_streak(&Streak {
            user_id: 1,
            current_streak: 9,
            longest_streak: 12,
            last_activity_date: Some(NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()),
        })
        .unwrap();

        let ctx = AnalysisContext::new(&db, 1, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        let insight = StreakStatusInsight.generate(&ctx).await.unwrap().unwrap();
        assert_eq!(insight.kind, InsightKind::Positive);
        assert!(insight.message.contains("9 days"));
    }

    #[tokio::test]
    async fn test_no_streak_nudges() {
        let db = Database::in_memory().unwrap();
        let ctx = AnalysisContext::new(&db, 1, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());

        let insight = StreakStatusInsight.generate(&ctx).await.unwrap().unwrap();
        assert_eq!(insight.kind, InsightKind::Info);
    }

    #[tokio::test]
    async fn test_short_streak_is_silent() {
        let db = Database::in_memory().unwrap();
        db.save_streak(&Streak {
            user_id: 1,
            current_streak: 3,
            longest_streak: 3,
            last_activity_date: Some(NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()),
        })
        .unwrap();

        let ctx = AnalysisContext::new(&db, 1, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        assert!(StreakStatusInsight.generate(&ctx).await.unwrap().is_none());
    }
}
