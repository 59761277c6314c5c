//! Streak tracker - state machine over per-user daily activity

use chrono::{Duration, NaiveDate};

use crate::db::Database;
use crate::error::Result;
use crate::models::Streak;

/// Streak lengths that trigger a consistency badge check
pub const STREAK_MILESTONES: [i64; 4] = [7, 30, 90, 365];

/// XP awarded for each counted logging day
pub const STREAK_DAY_XP: i64 = 10;

/// Result of applying a logging event to a user's streak
#[derive(Debug, Clone)]
pub struct StreakUpdate {
    pub streak: Streak,
    /// False when the day was already counted (the no-op transition)
    pub counted: bool,
    /// Set when the new current streak hit a milestone value
    pub milestone: Option<i64>,
}

/// Advances, resets, or no-ops a user's logging streak
pub struct StreakTracker<'a> {
    db: &'a Database,
}

impl<'a> StreakTracker<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Apply a logging event dated `today`
    ///
    /// Transitions:
    /// - no record: starts at (1, 1, today)
    /// - last activity today (or later): no-op
    /// - last activity yesterday: increments, raising `longest` if passed
    /// - gap: current resets to 1, `longest` untouched
    ///
    /// Every counted transition advances `last_activity_date`, which
    /// doubles as the retry guard: replaying the same day never counts
    /// twice.
    pub fn record(&self, user_id: i64, today: NaiveDate) -> Result<StreakUpdate> {
        let existing = self.db.get_streak(user_id)?;

        let streak = match existing {
            None => Streak {
                user_id,
                current_streak: 1,
                longest_streak: 1,
                last_activity_date: Some(today),
            },
            Some(streak) => match streak.last_activity_date {
                Some(last) if last >= today => {
                    // Already counted today; backdated events also land here
                    return Ok(StreakUpdate {
                        streak,
                        counted: false,
                        milestone: None,
                    });
                }
                Some(last) if last == today - Duration::days(1) => {
                    let current = streak.current_streak + 1;
                    Streak {
                        current_streak: current,
                        longest_streak: streak.longest_streak.max(current),
                        last_activity_date: Some(today),
                        ..streak
                    }
                }
                _ => Streak {
                    current_streak: 1,
                    longest_streak: streak.longest_streak.max(1),
                    last_activity_date: Some(today),
                    ..streak
                },
            },
        };

        self.db.save_streak(&streak)?;
        tracing::debug!(
            user_id,
            current = streak.current_streak,
            longest = streak.longest_streak,
            "Streak advanced"
        );

        let milestone = STREAK_MILESTONES
            .iter()
            .copied()
            .find(|m| *m == streak.current_streak);

        Ok(StreakUpdate {
            streak,
            counted: true,
            milestone,
        })
    }
}
