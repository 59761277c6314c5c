//! Expense writes and aggregate queries
//!
//! The insight generators only read from here; everything is scoped by
//! user and an inclusive date range.

use chrono::NaiveDate;
use rusqlite::params;
use std::str::FromStr;

use super::{parse_date, parse_datetime, Database};
use crate::error::Result;
use crate::models::{CategoryTotal, Expense, ExpenseCategory, NewExpense, PaymentMethod};

impl Database {
    /// Record a new expense, returning its id
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO expenses (user_id, amount, category, payment_method, date, note, recurring)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                expense.user_id,
                expense.amount,
                expense.category.as_str(),
                expense.payment_method.as_str(),
                expense.date.to_string(),
                expense.note,
                expense.recurring,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Total spend for a user over an inclusive date range
    pub fn expense_total(&self, user_id: i64, from: NaiveDate, to: NaiveDate) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3",
            params![user_id, from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Total spend in one category over an inclusive date range
    pub fn category_total(
        &self,
        user_id: i64,
        category: ExpenseCategory,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0) FROM expenses
            WHERE user_id = ?1 AND category = ?2 AND date BETWEEN ?3 AND ?4
            "#,
            params![
                user_id,
                category.as_str(),
                from.to_string(),
                to.to_string()
            ],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Spend grouped by category, largest first
    pub fn category_totals(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, SUM(amount) AS total FROM expenses
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            GROUP BY category
            ORDER BY total DESC
            "#,
        )?;

        let rows = stmt.query_map(
            params![user_id, from.to_string(), to.to_string()],
            |row| {
                let category: String = row.get(0)?;
                let total: f64 = row.get(1)?;
                Ok((category, total))
            },
        )?;

        let mut totals = Vec::new();
        for row in rows {
            let (category, total) = row?;
            // Rows with a category this build doesn't know are skipped
            if let Ok(category) = ExpenseCategory::from_str(&category) {
                totals.push(CategoryTotal { category, total });
            }
        }
        Ok(totals)
    }

    /// Per-day spend totals; only days with at least one expense appear
    pub fn daily_totals(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT date, SUM(amount) FROM expenses
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            GROUP BY date
            ORDER BY date
            "#,
        )?;

        let rows = stmt.query_map(
            params![user_id, from.to_string(), to.to_string()],
            |row| {
                let date: String = row.get(0)?;
                let total: f64 = row.get(1)?;
                Ok((date, total))
            },
        )?;

        let mut totals = Vec::new();
        for row in rows {
            let (date, total) = row?;
            totals.push((parse_date(&date), total));
        }
        Ok(totals)
    }

    /// Spend grouped by payment method, largest first
    pub fn payment_method_totals(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(PaymentMethod, f64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT payment_method, SUM(amount) AS total FROM expenses
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            GROUP BY payment_method
            ORDER BY total DESC
            "#,
        )?;

        let rows = stmt.query_map(
            params![user_id, from.to_string(), to.to_string()],
            |row| {
                let method: String = row.get(0)?;
                let total: f64 = row.get(1)?;
                Ok((method, total))
            },
        )?;

        let mut totals = Vec::new();
        for row in rows {
            let (method, total) = row?;
            if let Ok(method) = PaymentMethod::from_str(&method) {
                totals.push((method, total));
            }
        }
        Ok(totals)
    }

    /// Distinct dates with at least one expense, ascending
    pub fn spend_dates(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT date FROM expenses
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            ORDER BY date
            "#,
        )?;

        let rows = stmt.query_map(
            params![user_id, from.to_string(), to.to_string()],
            |row| row.get::<_, String>(0),
        )?;

        let mut dates = Vec::new();
        for row in rows {
            dates.push(parse_date(&row?));
        }
        Ok(dates)
    }

    /// Most recent expenses for a user, newest first
    pub fn list_expenses(&self, user_id: i64, limit: usize) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, amount, category, payment_method, date, note, recurring, created_at
            FROM expenses
            WHERE user_id = ?1
            ORDER BY date DESC, id DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, limit as i64], |row| {
            let category: String = row.get(3)?;
            let method: String = row.get(4)?;
            let date: String = row.get(5)?;
            let created_at: String = row.get(8)?;
            Ok(Expense {
                id: row.get(0)?,
                user_id: row.get(1)?,
                amount: row.get(2)?,
                category: ExpenseCategory::from_str(&category)
                    .unwrap_or(ExpenseCategory::Other),
                payment_method: PaymentMethod::from_str(&method)
                    .unwrap_or(PaymentMethod::Card),
                date: parse_date(&date),
                note: row.get(6)?,
                recurring: row.get(7)?,
                created_at: parse_datetime(&created_at),
            })
        })?;

        let expenses: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(expenses?)
    }
}
