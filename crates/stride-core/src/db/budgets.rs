//! Budget management and adherence metrics

use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::params;
use std::str::FromStr;

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetPeriod};

/// How many months back the adherence run is allowed to reach
const ADHERENCE_LOOKBACK_MONTHS: u32 = 24;

/// First and last day of the month containing `date`
pub(crate) fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    let next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    let end = next.map(|d| d - Duration::days(1)).unwrap_or(date);
    (start, end)
}

impl Database {
    /// Set the active budget for a period type
    ///
    /// Deactivates any previous active budget of the same period so the
    /// "at most one active budget per period type" invariant holds.
    pub fn set_budget(
        &self,
        user_id: i64,
        period: BudgetPeriod,
        amount: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<i64> {
        if amount <= 0.0 {
            return Err(Error::InvalidData("Budget amount must be positive".into()));
        }
        if end_date < start_date {
            return Err(Error::InvalidData(
                "Budget end date precedes start date".into(),
            ));
        }

        let conn = self.conn()?;

        conn.execute(
            "UPDATE budgets SET active = 0 WHERE user_id = ?1 AND period = ?2 AND active = 1",
            params![user_id, period.as_str()],
        )?;

        conn.execute(
            r#"
            INSERT INTO budgets (user_id, period, amount, start_date, end_date, active)
            VALUES (?1, ?2, ?3, ?4, ?5, 1)
            "#,
            params![
                user_id,
                period.as_str(),
                amount,
                start_date.to_string(),
                end_date.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// The active budget for a period type, if any
    pub fn active_budget(&self, user_id: i64, period: BudgetPeriod) -> Result<Option<Budget>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            r#"
            SELECT id, user_id, period, amount, start_date, end_date, active, created_at
            FROM budgets
            WHERE user_id = ?1 AND period = ?2 AND active = 1
            ORDER BY id DESC
            LIMIT 1
            "#,
            params![user_id, period.as_str()],
            row_to_budget,
        );

        match result {
            Ok(budget) => Ok(Some(budget)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Consecutive on-budget months, counted backwards from the most
    /// recent fully elapsed month
    ///
    /// A month counts when a monthly budget row covered it and that
    /// month's expense total stayed at or under the budget amount. The
    /// partially elapsed current month neither extends nor breaks the run.
    pub fn on_budget_month_run(&self, user_id: i64, today: NaiveDate) -> Result<i64> {
        let mut run = 0i64;
        // Step into the most recent fully elapsed month
        let (current_start, _) = month_bounds(today);
        let mut cursor = current_start - Duration::days(1);

        for _ in 0..ADHERENCE_LOOKBACK_MONTHS {
            let (month_start, month_end) = month_bounds(cursor);

            let budget = self.budget_covering(user_id, month_start, month_end)?;
            let amount = match budget {
                Some(a) => a,
                None => break,
            };

            let spent = self.expense_total(user_id, month_start, month_end)?;
            if spent > amount {
                break;
            }

            run += 1;
            cursor = month_start - Duration::days(1);
        }

        Ok(run)
    }

    /// Amount of the most recent monthly budget overlapping the given range
    fn budget_covering(
        &self,
        user_id: i64,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> Result<Option<f64>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            r#"
            SELECT amount FROM budgets
            WHERE user_id = ?1 AND period = 'monthly'
              AND start_date <= ?2 AND end_date >= ?3
            ORDER BY id DESC
            LIMIT 1
            "#,
            params![user_id, month_end.to_string(), month_start.to_string()],
            |row| row.get(0),
        );

        match result {
            Ok(amount) => Ok(Some(amount)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
    let period: String = row.get(2)?;
    let start_date: String = row.get(4)?;
    let end_date: String = row.get(5)?;
    let created_at: String = row.get(7)?;
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        period: BudgetPeriod::from_str(&period).unwrap_or(BudgetPeriod::Monthly),
        amount: row.get(3)?,
        start_date: parse_date(&start_date),
        end_date: parse_date(&end_date),
        active: row.get(6)?,
        created_at: parse_datetime(&created_at),
    })
}
