//! Stride Core Library
//!
//! Shared functionality for the Stride personal finance tracker:
//! - Database access and migrations
//! - Domain models (expenses, income, budgets, goals)
//! - Insight engine: 13 behavioral analyzers with a ranked aggregator
//! - Gamification: streak tracking, XP/levels, tiered badges
//! - Notification sink seam for level-up and badge events

pub mod db;
pub mod error;
pub mod gamification;
pub mod insights;
pub mod models;

pub use db::Database;
pub use error::{Error, Result};
pub use gamification::{
    BadgeContext, BadgeEvaluator, GamificationEngine, LogSink, MemorySink, NotificationSink,
    StreakTracker, StreakUpdate, XpAward, XpLedger,
};
pub use insights::{
    AnalysisContext, Insight, InsightEngine, InsightGenerator, InsightKind, InsightRequest,
};
