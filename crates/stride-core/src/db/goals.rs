//! Savings goal operations

use chrono::NaiveDate;
use rusqlite::params;
use std::str::FromStr;

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Goal, GoalStatus};

impl Database {
    /// Create a new goal, returning its id
    pub fn insert_goal(
        &self,
        user_id: i64,
        title: &str,
        target_amount: f64,
        deadline: Option<NaiveDate>,
    ) -> Result<i64> {
        if target_amount <= 0.0 {
            return Err(Error::InvalidData("Goal target must be positive".into()));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goals (user_id, title, target_amount, deadline)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                user_id,
                title,
                target_amount,
                deadline.map(|d| d.to_string())
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Add progress toward a goal
    ///
    /// The current amount is capped at the target; reaching the target
    /// marks the goal completed.
    pub fn add_goal_progress(&self, goal_id: i64, amount: f64) -> Result<Goal> {
        if amount <= 0.0 {
            return Err(Error::InvalidData(
                "Progress amount must be positive".into(),
            ));
        }

        let goal = self
            .get_goal(goal_id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {}", goal_id)))?;

        let new_amount = (goal.current_amount + amount).min(goal.target_amount);
        let new_status = if new_amount >= goal.target_amount {
            GoalStatus::Completed
        } else {
            goal.status
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE goals SET current_amount = ?1, status = ?2 WHERE id = ?3",
            params![new_amount, new_status.as_str(), goal_id],
        )?;

        self.get_goal(goal_id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {}", goal_id)))
    }

    /// Fetch a single goal by id
    pub fn get_goal(&self, goal_id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            r#"
            SELECT id, user_id, title, target_amount, current_amount, deadline, status, created_at
            FROM goals
            WHERE id = ?1
            "#,
            params![goal_id],
            row_to_goal,
        );

        match result {
            Ok(goal) => Ok(Some(goal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All active goals for a user
    pub fn active_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, title, target_amount, current_amount, deadline, status, created_at
            FROM goals
            WHERE user_id = ?1 AND status = 'active'
            ORDER BY deadline IS NULL, deadline, id
            "#,
        )?;

        let rows = stmt.query_map(params![user_id], row_to_goal)?;
        let goals: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(goals?)
    }

    /// All goals for a user, newest first
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, title, target_amount, current_amount, deadline, status, created_at
            FROM goals
            WHERE user_id = ?1
            ORDER BY id DESC
            "#,
        )?;

        let rows = stmt.query_map(params![user_id], row_to_goal)?;
        let goals: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(goals?)
    }
}

fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    let deadline: Option<String> = row.get(5)?;
    let status: String = row.get(6)?;
    let created_at: String = row.get(7)?;
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        deadline: deadline.map(|d| parse_date(&d)),
        status: GoalStatus::from_str(&status).unwrap_or(GoalStatus::Active),
        created_at: parse_datetime(&created_at),
    })
}
