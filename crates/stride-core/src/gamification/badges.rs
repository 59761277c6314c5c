//! Badge evaluator - idempotent tiered achievement awards
//!
//! Badge definitions are ordered tier tables keyed by a metric;
//! evaluation is a generic highest-satisfied-tier lookup shared by all
//! badge types.

use chrono::NaiveDate;

use crate::db::Database;
use crate::error::Result;
use crate::insights::engine::month_start;
use crate::models::{Badge, BadgeTier, ExpenseCategory};

/// Whether a tier is met by values at or above, or at or below, its
/// threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierDirection {
    AtLeast,
    AtMost,
}

/// One tier within a badge definition
#[derive(Debug, Clone, Copy)]
pub struct TierRule {
    pub tier: BadgeTier,
    pub threshold: f64,
}

/// A tiered badge definition; tiers are ordered best-first
#[derive(Debug, Clone, Copy)]
pub struct BadgeSpec {
    pub name: &'static str,
    pub direction: TierDirection,
    pub tiers: &'static [TierRule],
}

/// Consecutive daily-logging days
pub const CONSISTENCY: BadgeSpec = BadgeSpec {
    name: "Consistency",
    direction: TierDirection::AtLeast,
    tiers: &[
        TierRule {
            tier: BadgeTier::Extreme,
            threshold: 365.0,
        },
        TierRule {
            tier: BadgeTier::Gold,
            threshold: 90.0,
        },
        TierRule {
            tier: BadgeTier::Silver,
            threshold: 30.0,
        },
        TierRule {
            tier: BadgeTier::Bronze,
            threshold: 7.0,
        },
    ],
};

/// Consecutive on-budget months
pub const BUDGET_KEEPER: BadgeSpec = BadgeSpec {
    name: "Budget Keeper",
    direction: TierDirection::AtLeast,
    tiers: &[
        TierRule {
            tier: BadgeTier::Gold,
            threshold: 6.0,
        },
        TierRule {
            tier: BadgeTier::Silver,
            threshold: 3.0,
        },
        TierRule {
            tier: BadgeTier::Bronze,
            threshold: 1.0,
        },
    ],
};

/// Current-month spend ceiling for one category
pub const MINDFUL_SPENDER: BadgeSpec = BadgeSpec {
    name: "Mindful Spender",
    direction: TierDirection::AtMost,
    tiers: &[
        TierRule {
            tier: BadgeTier::Gold,
            threshold: 50.0,
        },
        TierRule {
            tier: BadgeTier::Silver,
            threshold: 100.0,
        },
        TierRule {
            tier: BadgeTier::Bronze,
            threshold: 200.0,
        },
    ],
};

/// Bonus XP granted when a badge tier is earned
pub fn tier_bonus_xp(tier: BadgeTier) -> i64 {
    match tier {
        BadgeTier::Bronze => 50,
        BadgeTier::Silver => 100,
        BadgeTier::Gold => 200,
        BadgeTier::Extreme => 400,
    }
}

/// The best tier (first in the ordered table) whose threshold the
/// metric value satisfies
pub fn highest_tier(spec: &BadgeSpec, value: f64) -> Option<TierRule> {
    spec.tiers
        .iter()
        .copied()
        .find(|rule| match spec.direction {
            TierDirection::AtLeast => value >= rule.threshold,
            TierDirection::AtMost => value <= rule.threshold,
        })
}

/// Which metric a badge evaluation should look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeContext {
    /// Current streak length
    Streak,
    /// Consecutive on-budget months
    BudgetAdherence,
    /// Current-month spend in one category
    CategorySpend(ExpenseCategory),
}

/// A badge that was just awarded, with its XP bonus
#[derive(Debug, Clone)]
pub struct AwardedBadge {
    pub badge: Badge,
    pub bonus_xp: i64,
}

/// Evaluates tiered badges against a user's current metrics
pub struct BadgeEvaluator<'a> {
    db: &'a Database,
}

impl<'a> BadgeEvaluator<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Evaluate one metric context; returns the newly awarded badge, or
    /// `None` when no tier is met or the tier was already earned
    pub fn evaluate(
        &self,
        user_id: i64,
        context: &BadgeContext,
        today: NaiveDate,
    ) -> Result<Option<AwardedBadge>> {
        let (spec, value, description) = match context {
            BadgeContext::Streak => {
                let current = self
                    .db
                    .get_streak(user_id)?
                    .map(|s| s.current_streak)
                    .unwrap_or(0);
                (CONSISTENCY, current as f64, None)
            }
            BadgeContext::BudgetAdherence => {
                let run = self.db.on_budget_month_run(user_id, today)?;
                (BUDGET_KEEPER, run as f64, None)
            }
            BadgeContext::CategorySpend(category) => {
                let start = month_start(today);
                // A ceiling badge needs evidence of activity; an empty
                // month trivially "stays under" every ceiling
                if self.db.expense_total(user_id, start, today)? <= 0.0 {
                    return Ok(None);
                }
                let spent = self.db.category_total(user_id, *category, start, today)?;
                (MINDFUL_SPENDER, spent, Some(*category))
            }
        };

        let rule = match highest_tier(&spec, value) {
            Some(rule) => rule,
            None => return Ok(None),
        };

        let description = match (context, description) {
            (BadgeContext::Streak, _) => {
                format!("Logged expenses {:.0} days in a row", rule.threshold)
            }
            (BadgeContext::BudgetAdherence, _) => {
                format!("Stayed on budget {:.0} month(s) running", rule.threshold)
            }
            (_, Some(category)) => format!(
                "Kept {} spending under ${:.0} this month",
                category.label(),
                rule.threshold
            ),
            _ => spec.name.to_string(),
        };

        // Re-awarding the same tier is a no-op; the unique constraint
        // also swallows concurrent duplicate inserts
        if !self
            .db
            .insert_badge(user_id, spec.name, rule.tier, &description)?
        {
            return Ok(None);
        }

        tracing::info!(user_id, badge = spec.name, tier = %rule.tier, "Badge earned");

        let badge = self
            .db
            .list_badges(user_id)?
            .into_iter()
            .find(|b| b.name == spec.name && b.tier == rule.tier)
            .ok_or_else(|| crate::Error::NotFound(format!("Badge {}", spec.name)))?;

        Ok(Some(AwardedBadge {
            badge,
            bonus_xp: tier_bonus_xp(rule.tier),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Streak;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn test_highest_tier_at_least() {
        assert_eq!(
            highest_tier(&CONSISTENCY, 35.0).map(|r| r.tier),
            Some(BadgeTier::Silver)
        );
        assert_eq!(
            highest_tier(&CONSISTENCY, 400.0).map(|r| r.tier),
            Some(BadgeTier::Extreme)
        );
        assert!(highest_tier(&CONSISTENCY, 3.0).is_none());
    }

    #[test]
    fn test_highest_tier_at_most() {
        assert_eq!(
            highest_tier(&MINDFUL_SPENDER, 40.0).map(|r| r.tier),
            Some(BadgeTier::Gold)
        );
        assert_eq!(
            highest_tier(&MINDFUL_SPENDER, 150.0).map(|r| r.tier),
            Some(BadgeTier::Bronze)
        );
        assert!(highest_tier(&MINDFUL_SPENDER, 250.0).is_none());
    }

    #[test]
    fn test_streak_badge_awarded_once() {
        let db = Database::in_memory().unwrap();
        db.save_streak(&Streak {
            user_id: 1,
            current_streak: 7,
            longest_streak: 7,
            last_activity_date: Some(today()),
        })
        .unwrap();

        let evaluator = BadgeEvaluator::new(&db);

        let first = evaluator
            .evaluate(1, &BadgeContext::Streak, today())
            .unwrap();
        assert!(first.is_some());
        let awarded = first.unwrap();
        assert_eq!(awarded.badge.tier, BadgeTier::Bronze);
        assert_eq!(awarded.bonus_xp, 50);

        // Second evaluation of the same tier is a no-op
        let second = evaluator
            .evaluate(1, &BadgeContext::Streak, today())
            .unwrap();
        assert!(second.is_none());
        assert_eq!(db.list_badges(1).unwrap().len(), 1);
    }

    #[test]
    fn test_no_tier_met_is_silent() {
        let db = Database::in_memory().unwrap();
        let evaluator = BadgeEvaluator::new(&db);

        let result = evaluator
            .evaluate(1, &BadgeContext::Streak, today())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_category_ceiling_requires_activity() {
        let db = Database::in_memory().unwrap();
        let evaluator = BadgeEvaluator::new(&db);

        // No spending at all this month: no trivial gold award
        let result = evaluator
            .evaluate(
                1,
                &BadgeContext::CategorySpend(ExpenseCategory::Entertainment),
                today(),
            )
            .unwrap();
        assert!(result.is_none());
    }
}
