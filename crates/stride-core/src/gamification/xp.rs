//! XP ledger - experience accumulation and level derivation

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::XpRecord;

/// Ascending XP thresholds; index i (0-based) is the entry bar for
/// level i+1
pub const LEVEL_THRESHOLDS: [i64; 10] =
    [0, 100, 250, 500, 1000, 2000, 3500, 5500, 8000, 11000];

/// The highest level whose threshold `total_xp` satisfies
pub fn level_for_xp(total_xp: i64) -> i64 {
    LEVEL_THRESHOLDS
        .iter()
        .rposition(|threshold| total_xp >= *threshold)
        .map(|index| index as i64 + 1)
        .unwrap_or(1)
}

/// Result of an XP award
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpAward {
    pub new_xp: i64,
    pub new_level: i64,
    pub leveled_up: bool,
}

/// Accumulates XP and derives levels for a user
pub struct XpLedger<'a> {
    db: &'a Database,
}

impl<'a> XpLedger<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Award XP to a user, creating the record on first award
    ///
    /// The level never decreases, even if the threshold table were to
    /// change underneath an existing record.
    pub fn award(&self, user_id: i64, amount: i64, reason: &str) -> Result<XpAward> {
        if amount < 0 {
            return Err(Error::InvalidData("XP award must be non-negative".into()));
        }

        let current = self.db.get_xp_record(user_id)?.unwrap_or(XpRecord {
            user_id,
            total_xp: 0,
            level: 1,
        });

        let new_xp = current.total_xp + amount;
        let new_level = level_for_xp(new_xp).max(current.level);
        let leveled_up = new_level > current.level;

        self.db.save_xp_record(&XpRecord {
            user_id,
            total_xp: new_xp,
            level: new_level,
        })?;

        tracing::debug!(user_id, amount, reason, new_xp, new_level, "XP awarded");

        Ok(XpAward {
            new_xp,
            new_level,
            leveled_up,
        })
    }

    /// Current XP record for a user (zeroed default when absent)
    pub fn record(&self, user_id: i64) -> Result<XpRecord> {
        Ok(self.db.get_xp_record(user_id)?.unwrap_or(XpRecord {
            user_id,
            total_xp: 0,
            level: 1,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_xp_thresholds() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(150), 2);
        assert_eq!(level_for_xp(250), 3);
        assert_eq!(level_for_xp(11000), 10);
        assert_eq!(level_for_xp(1_000_000), 10);
    }

    #[test]
    fn test_first_award_creates_record() {
        let db = Database::in_memory().unwrap();
        let ledger = XpLedger::new(&db);

        // 150 XP from zero crosses the level-2 threshold
        let award = ledger.award(1, 150, "test").unwrap();
        assert_eq!(award.new_xp, 150);
        assert_eq!(award.new_level, 2);
        assert!(award.leveled_up);
    }

    #[test]
    fn test_level_is_monotonic_over_awards() {
        let db = Database::in_memory().unwrap();
        let ledger = XpLedger::new(&db);

        let mut last_level = 0;
        for _ in 0..20 {
            let award = ledger.award(1, 60, "test").unwrap();
            assert!(award.new_level >= last_level);
            assert_eq!(award.new_level, level_for_xp(award.new_xp));
            last_level = award.new_level;
        }
    }

    #[test]
    fn test_zero_award_never_levels() {
        let db = Database::in_memory().unwrap();
        let ledger = XpLedger::new(&db);

        let award = ledger.award(1, 0, "noop").unwrap();
        assert_eq!(award.new_xp, 0);
        assert_eq!(award.new_level, 1);
        assert!(!award.leveled_up);
    }

    #[test]
    fn test_negative_award_rejected() {
        let db = Database::in_memory().unwrap();
        let ledger = XpLedger::new(&db);
        assert!(ledger.award(1, -5, "bad").is_err());
    }
}
