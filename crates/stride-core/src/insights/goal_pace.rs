//! Goal Pace Insight
//!
//! Watches the active goal with the nearest deadline.

use async_trait::async_trait;

use crate::error::Result;

use super::engine::{AnalysisContext, InsightGenerator};
use super::types::{round1, Insight, InsightKind};

/// Days before a deadline at which an under-funded goal is flagged
const CRUNCH_DAYS: i64 = 7;
/// Completion percentage considered safe inside the crunch window
const CRUNCH_SAFE_PCT: f64 = 90.0;

pub struct GoalPaceInsight;

#[async_trait]
impl InsightGenerator for GoalPaceInsight {
    fn id(&self) -> &'static str {
        "goal_pace"
    }

    fn name(&self) -> &'static str {
        "Goal Pace"
    }

    async fn generate(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        // active_goals orders by deadline ascending with NULLs last, so
        // the first goal with a deadline is the nearest one
        let goal = ctx
            .db
            .active_goals(ctx.user_id)?
            .into_iter()
            .find(|g| g.deadline.is_some());

        let goal = match goal {
            Some(g) if g.target_amount > 0.0 => g,
            _ => return Ok(None),
        };
        let deadline = match goal.deadline {
            Some(d) => d,
            None => return Ok(None),
        };
        let pct = round1(goal.current_amount / goal.target_amount * 100.0);
        let remaining = goal.target_amount - goal.current_amount;

        let insight = if deadline < ctx.today && pct < 100.0 {
            Insight::new(
                InsightKind::Warning,
                "⏰",
                3,
                "Goal Deadline Passed",
                format!(
                    "\"{}\" is {:.1}% funded but its deadline ({}) has passed.",
                    goal.title,
                    pct,
                    deadline.format("%b %-d")
                ),
                "Extend the deadline or adjust the target to keep it realistic.",
            )
        } else if (deadline - ctx.today).num_days() <= CRUNCH_DAYS && pct < CRUNCH_SAFE_PCT {
            Insight::new(
                InsightKind::Warning,
                "🎯",
                3,
                "Goal Deadline Approaching",
                format!(
                    "\"{}\" is due {} and is only {:.1}% funded (${:.0} to go).",
                    goal.title,
                    deadline.format("%b %-d"),
                    pct,
                    remaining
                ),
                "A few focused contributions could still get you there.",
            )
        } else if pct >= CRUNCH_SAFE_PCT && pct < 100.0 {
            Insight::new(
                InsightKind::Positive,
                "🎯",
                7,
                "Almost There",
                format!(
                    "\"{}\" is {:.1}% funded — just ${:.0} to go.",
                    goal.title, pct, remaining
                ),
                "One more push and this goal is done.",
            )
        } else {
            return Ok(None);
        };

        Ok(Some(insight))
    }
}
