//! Streak, XP, and badge rows
//!
//! These rows are mutated only through the gamification engine, which
//! serializes writes per user.

use rusqlite::params;
use std::str::FromStr;

use super::{parse_date, parse_datetime, Database};
use crate::error::Result;
use crate::models::{Badge, BadgeTier, Streak, XpRecord};

impl Database {
    /// Fetch a user's streak record, if one exists
    pub fn get_streak(&self, user_id: i64) -> Result<Option<Streak>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            r#"
            SELECT user_id, current_streak, longest_streak, last_activity_date
            FROM streaks
            WHERE user_id = ?1
            "#,
            params![user_id],
            |row| {
                let last: Option<String> = row.get(3)?;
                Ok(Streak {
                    user_id: row.get(0)?,
                    current_streak: row.get(1)?,
                    longest_streak: row.get(2)?,
                    last_activity_date: last.map(|d| parse_date(&d)),
                })
            },
        );

        match result {
            Ok(streak) => Ok(Some(streak)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or update a streak record
    pub fn save_streak(&self, streak: &Streak) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO streaks (user_id, current_streak, longest_streak, last_activity_date)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                current_streak = excluded.current_streak,
                longest_streak = excluded.longest_streak,
                last_activity_date = excluded.last_activity_date
            "#,
            params![
                streak.user_id,
                streak.current_streak,
                streak.longest_streak,
                streak.last_activity_date.map(|d| d.to_string()),
            ],
        )?;

        Ok(())
    }

    /// Fetch a user's XP record, if one exists
    pub fn get_xp_record(&self, user_id: i64) -> Result<Option<XpRecord>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            "SELECT user_id, total_xp, level FROM xp_records WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(XpRecord {
                    user_id: row.get(0)?,
                    total_xp: row.get(1)?,
                    level: row.get(2)?,
                })
            },
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or update an XP record
    pub fn save_xp_record(&self, record: &XpRecord) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO xp_records (user_id, total_xp, level)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                total_xp = excluded.total_xp,
                level = excluded.level
            "#,
            params![record.user_id, record.total_xp, record.level],
        )?;

        Ok(())
    }

    /// Whether the exact (user, badge, tier) row exists
    pub fn badge_exists(&self, user_id: i64, name: &str, tier: BadgeTier) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM badges WHERE user_id = ?1 AND name = ?2 AND tier = ?3",
            params![user_id, name, tier.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert a badge row; returns false when the row already existed
    ///
    /// INSERT OR IGNORE plus the unique constraint turns a concurrent
    /// duplicate insert into the idempotent no-op case.
    pub fn insert_badge(
        &self,
        user_id: i64,
        name: &str,
        tier: BadgeTier,
        description: &str,
    ) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO badges (user_id, name, tier, description)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![user_id, name, tier.as_str(), description],
        )?;
        Ok(inserted > 0)
    }

    /// All badges earned by a user, newest first
    pub fn list_badges(&self, user_id: i64) -> Result<Vec<Badge>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, name, tier, description, earned_at
            FROM badges
            WHERE user_id = ?1
            ORDER BY earned_at DESC, id DESC
            "#,
        )?;

        let rows = stmt.query_map(params![user_id], |row| {
            let tier: String = row.get(3)?;
            let earned_at: String = row.get(5)?;
            Ok(Badge {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                tier: BadgeTier::from_str(&tier).unwrap_or(BadgeTier::Bronze),
                description: row.get(4)?,
                earned_at: parse_datetime(&earned_at),
            })
        })?;

        let badges: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(badges?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_streak_upsert() {
        let db = Database::in_memory().unwrap();

        assert!(db.get_streak(1).unwrap().is_none());

        let streak = Streak {
            user_id: 1,
            current_streak: 3,
            longest_streak: 5,
            last_activity_date: Some(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()),
        };
        db.save_streak(&streak).unwrap();
        assert_eq!(db.get_streak(1).unwrap().unwrap(), streak);

        let updated = Streak {
            current_streak: 4,
            ..streak
        };
        db.save_streak(&updated).unwrap();
        assert_eq!(db.get_streak(1).unwrap().unwrap().current_streak, 4);
    }

    #[test]
    fn test_xp_upsert() {
        let db = Database::in_memory().unwrap();

        let record = XpRecord {
            user_id: 7,
            total_xp: 120,
            level: 2,
        };
        db.save_xp_record(&record).unwrap();
        db.save_xp_record(&XpRecord {
            total_xp: 300,
            level: 3,
            ..record
        })
        .unwrap();

        let stored = db.get_xp_record(7).unwrap().unwrap();
        assert_eq!(stored.total_xp, 300);
        assert_eq!(stored.level, 3);
    }

    #[test]
    fn test_badge_insert_is_idempotent() {
        let db = Database::in_memory().unwrap();

        assert!(db
            .insert_badge(1, "Consistency", BadgeTier::Bronze, "7 day streak")
            .unwrap());
        // Same tier again is a no-op
        assert!(!db
            .insert_badge(1, "Consistency", BadgeTier::Bronze, "7 day streak")
            .unwrap());
        // A different tier is a new row
        assert!(db
            .insert_badge(1, "Consistency", BadgeTier::Silver, "30 day streak")
            .unwrap());

        assert_eq!(db.list_badges(1).unwrap().len(), 2);
    }
}
