//! Gamification engine - composes streak, XP, and badge updates behind
//! per-user serialization
//!
//! A logging event runs streak → XP → badge as one logical unit. The
//! per-user async lock guarantees exactly one in-flight gamification
//! mutation per user; there is no cross-user contention.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tokio::sync::Mutex as AsyncMutex;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Badge, Notification, NotificationType};

use super::badges::{BadgeContext, BadgeEvaluator};
use super::notify::{LogSink, NotificationSink};
use super::streaks::{StreakTracker, StreakUpdate, STREAK_DAY_XP};
use super::xp::{XpAward, XpLedger};

pub struct GamificationEngine {
    db: Database,
    sink: Arc<dyn NotificationSink>,
    user_locks: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl GamificationEngine {
    /// Create an engine that logs notifications
    pub fn new(db: Database) -> Self {
        Self::with_sink(db, Arc::new(LogSink))
    }

    /// Create an engine with a custom notification sink
    pub fn with_sink(db: Database, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            db,
            sink,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    fn user_lock(&self, user_id: i64) -> Arc<AsyncMutex<()>> {
        self.user_locks
            .lock()
            .expect("user lock map poisoned")
            .entry(user_id)
            .or_default()
            .clone()
    }

    /// Apply a logging event: advance the streak, award the streak-day
    /// XP bonus, and run the consistency badge check at milestones
    ///
    /// The no-op transition (day already counted) awards nothing, which
    /// also makes a retry after a mid-sequence failure safe.
    pub async fn record_activity(&self, user_id: i64, date: NaiveDate) -> Result<StreakUpdate> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let update = StreakTracker::new(&self.db).record(user_id, date)?;

        if update.counted {
            let award = XpLedger::new(&self.db).award(user_id, STREAK_DAY_XP, "daily-log")?;
            self.notify_level_up(user_id, &award);

            if update.milestone.is_some() {
                self.run_badge_check(user_id, &BadgeContext::Streak, date)?;
            }
        }

        Ok(update)
    }

    /// Award XP for an engagement action
    pub async fn award_xp(&self, user_id: i64, amount: i64, reason: &str) -> Result<XpAward> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let award = XpLedger::new(&self.db).award(user_id, amount, reason)?;
        self.notify_level_up(user_id, &award);
        Ok(award)
    }

    /// Evaluate badge metrics, returning the newly awarded badges
    /// (empty if none)
    pub async fn evaluate_badges(
        &self,
        user_id: i64,
        contexts: &[BadgeContext],
        today: NaiveDate,
    ) -> Result<Vec<Badge>> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let mut awarded = Vec::new();
        for context in contexts {
            if let Some(badge) = self.run_badge_check(user_id, context, today)? {
                awarded.push(badge);
            }
        }
        Ok(awarded)
    }

    /// Badge check + bonus XP + notification; caller holds the user lock
    fn run_badge_check(
        &self,
        user_id: i64,
        context: &BadgeContext,
        today: NaiveDate,
    ) -> Result<Option<Badge>> {
        let awarded = match BadgeEvaluator::new(&self.db).evaluate(user_id, context, today)? {
            Some(a) => a,
            None => return Ok(None),
        };

        self.sink.deliver(Notification {
            user_id,
            kind: NotificationType::BadgeEarned,
            title: format!(
                "{} {} badge earned!",
                awarded.badge.name, awarded.badge.tier
            ),
            message: awarded.badge.description.clone(),
        });

        let award = XpLedger::new(&self.db).award(user_id, awarded.bonus_xp, "badge-bonus")?;
        self.notify_level_up(user_id, &award);

        Ok(Some(awarded.badge))
    }

    fn notify_level_up(&self, user_id: i64, award: &XpAward) {
        if award.leveled_up {
            self.sink.deliver(Notification {
                user_id,
                kind: NotificationType::LevelUp,
                title: format!("Level {} reached!", award.new_level),
                message: format!("You now have {} XP. Keep logging!", award.new_xp),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BadgeTier;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[tokio::test]
    async fn test_record_activity_awards_streak_xp() {
        let db = Database::in_memory().unwrap();
        let engine = GamificationEngine::new(db.clone());

        let update = engine.record_activity(1, date(10)).await.unwrap();
        assert!(update.counted);

        let record = db.get_xp_record(1).unwrap().unwrap();
        assert_eq!(record.total_xp, STREAK_DAY_XP);
    }

    #[tokio::test]
    async fn test_same_day_retry_awards_no_double_xp() {
        let db = Database::in_memory().unwrap();
        let engine = GamificationEngine::new(db.clone());

        engine.record_activity(1, date(10)).await.unwrap();
        engine.record_activity(1, date(10)).await.unwrap();

        let record = db.get_xp_record(1).unwrap().unwrap();
        assert_eq!(record.total_xp, STREAK_DAY_XP);
    }

    #[tokio::test]
    async fn test_day_seven_awards_consistency_badge() {
        let db = Database::in_memory().unwrap();
        let sink = Arc::new(super::super::notify::MemorySink::new());
        let engine = GamificationEngine::with_sink(db.clone(), sink.clone());

        for day in 1..=7 {
            engine.record_activity(1, date(day)).await.unwrap();
        }

        let badges = db.list_badges(1).unwrap();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].name, "Consistency");
        assert_eq!(badges[0].tier, BadgeTier::Bronze);

        // Streak XP (7 days) + bronze bonus
        let record = db.get_xp_record(1).unwrap().unwrap();
        assert_eq!(record.total_xp, 7 * STREAK_DAY_XP + 50);

        let kinds: Vec<_> = sink.drain().into_iter().map(|n| n.kind).collect();
        assert!(kinds.contains(&NotificationType::BadgeEarned));
        // 120 XP also crosses the level-2 threshold
        assert!(kinds.contains(&NotificationType::LevelUp));
    }

    #[tokio::test]
    async fn test_award_xp_emits_level_up_once() {
        let db = Database::in_memory().unwrap();
        let sink = Arc::new(super::super::notify::MemorySink::new());
        let engine = GamificationEngine::with_sink(db, sink.clone());

        let award = engine.award_xp(1, 150, "bonus").await.unwrap();
        assert!(award.leveled_up);
        assert_eq!(sink.drain().len(), 1);

        // Staying inside the level emits nothing
        let award = engine.award_xp(1, 10, "bonus").await.unwrap();
        assert!(!award.leveled_up);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_events_serialize_per_user() {
        let db = Database::in_memory().unwrap();
        let engine = Arc::new(GamificationEngine::new(db.clone()));

        // Two racing events for the same day must count exactly once
        let (a, b) = tokio::join!(
            engine.record_activity(1, date(10)),
            engine.record_activity(1, date(10)),
        );
        let counted = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|u| u.counted)
            .count();
        assert_eq!(counted, 1);

        let record = db.get_xp_record(1).unwrap().unwrap();
        assert_eq!(record.total_xp, STREAK_DAY_XP);
    }
}
