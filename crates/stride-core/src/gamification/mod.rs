//! Gamification - streaks, XP, levels, and badges
//!
//! A logging action triggers streak tracking, XP accumulation, and
//! badge evaluation in sequence, serialized per user. Each step may
//! emit a notification through the pluggable sink.

pub mod badges;
pub mod engine;
pub mod notify;
pub mod streaks;
pub mod xp;

pub use badges::{
    highest_tier, tier_bonus_xp, AwardedBadge, BadgeContext, BadgeEvaluator, BadgeSpec,
    TierDirection, TierRule, BUDGET_KEEPER, CONSISTENCY, MINDFUL_SPENDER,
};
pub use engine::GamificationEngine;
pub use notify::{LogSink, MemorySink, NotificationSink};
pub use streaks::{StreakTracker, StreakUpdate, STREAK_DAY_XP, STREAK_MILESTONES};
pub use xp::{level_for_xp, XpAward, XpLedger, LEVEL_THRESHOLDS};
