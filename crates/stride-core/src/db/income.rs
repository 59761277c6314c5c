//! Income writes and totals

use chrono::NaiveDate;
use rusqlite::params;
use std::str::FromStr;

use super::{parse_date, parse_datetime, Database};
use crate::error::Result;
use crate::models::{Income, IncomeSource, NewIncome};

impl Database {
    /// Record a new income entry, returning its id
    pub fn insert_income(&self, income: &NewIncome) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO incomes (user_id, amount, source, date) VALUES (?1, ?2, ?3, ?4)",
            params![
                income.user_id,
                income.amount,
                income.source.as_str(),
                income.date.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Total income for a user over an inclusive date range
    pub fn income_total(&self, user_id: i64, from: NaiveDate, to: NaiveDate) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM incomes WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3",
            params![user_id, from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Most recent income entries for a user, newest first
    pub fn list_incomes(&self, user_id: i64, limit: usize) -> Result<Vec<Income>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, amount, source, date, created_at
            FROM incomes
            WHERE user_id = ?1
            ORDER BY date DESC, id DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, limit as i64], |row| {
            let source: String = row.get(3)?;
            let date: String = row.get(4)?;
            let created_at: String = row.get(5)?;
            Ok(Income {
                id: row.get(0)?,
                user_id: row.get(1)?,
                amount: row.get(2)?,
                source: IncomeSource::from_str(&source).unwrap_or(IncomeSource::Other),
                date: parse_date(&date),
                created_at: parse_datetime(&created_at),
            })
        })?;

        let incomes: std::result::Result<Vec<_>, _> = rows.collect();
        Ok(incomes?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_total() {
        let db = Database::in_memory().unwrap();

        db.insert_income(&NewIncome {
            user_id: 1,
            amount: 1200.0,
            source: IncomeSource::Salary,
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        })
        .unwrap();
        db.insert_income(&NewIncome {
            user_id: 1,
            amount: 300.0,
            source: IncomeSource::Business,
            date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
        })
        .unwrap();

        let total = db
            .income_total(
                1,
                NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            )
            .unwrap();
        assert!((total - 1500.0).abs() < f64::EPSILON);
    }
}
