use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::db::statement;
use crate::error::AppError;

use super::method::Method;

/// Ledger row. `date` is the business timestamp supplied by the register,
/// kept verbatim so day filtering matches what the operator saw;
/// `created_at` is the insertion time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub method: String,
    pub amount: f64,
    pub date: String,
    pub branch_id: String,
    pub user: String,
    pub shift: String,
    pub deleted: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub method: Method,
    pub amount: Decimal,
    pub date: String,
    pub branch_id: String,
    pub user: String,
    pub shift: String,
}

impl Payment {
    pub async fn record(db: &SqlitePool, new: &NewPayment) -> Result<Payment, AppError> {
        let amount = new
            .amount
            .to_f64()
            .ok_or_else(|| AppError::Validation("amount is out of range".into()))?;

        let outcome = statement::write(
            db,
            sqlx::query(
                "INSERT INTO payments (method, amount, date, branch_id, user, shift, deleted, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
            )
            .bind(new.method.as_str())
            .bind(amount)
            .bind(&new.date)
            .bind(&new.branch_id)
            .bind(&new.user)
            .bind(&new.shift)
            .bind(OffsetDateTime::now_utc()),
        )
        .await?;

        statement::read_row(
            db,
            sqlx::query_as::<_, Payment>(
                "SELECT id, method, amount, date, branch_id, user, shift, deleted, created_at
                 FROM payments WHERE id = ?1",
            )
            .bind(outcome.inserted_id),
        )
        .await?
        .ok_or(AppError::Storage(sqlx::Error::RowNotFound))
    }

    /// Non-deleted rows whose business timestamp falls on `date`
    /// (`YYYY-MM-DD`) at the given branch, in insertion order.
    pub async fn list_for_date_and_branch(
        db: &SqlitePool,
        date: &str,
        branch_id: &str,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        statement::read_rows(
            db,
            sqlx::query_as::<_, Payment>(
                "SELECT id, method, amount, date, branch_id, user, shift, deleted, created_at
                 FROM payments
                 WHERE deleted = 0 AND branch_id = ?1 AND date LIKE ?2 || '%'
                 ORDER BY id",
            )
            .bind(branch_id)
            .bind(date),
        )
        .await
    }

    /// Same day across every branch, for the export endpoint.
    pub async fn list_for_date(db: &SqlitePool, date: &str) -> Result<Vec<Payment>, sqlx::Error> {
        statement::read_rows(
            db,
            sqlx::query_as::<_, Payment>(
                "SELECT id, method, amount, date, branch_id, user, shift, deleted, created_at
                 FROM payments
                 WHERE deleted = 0 AND date LIKE ?1 || '%'
                 ORDER BY id",
            )
            .bind(date),
        )
        .await
    }

    /// Marks the row deleted. This is the sole removal path; already
    /// deleted and unknown ids both come back as not found. The row itself
    /// stays stored for audit.
    pub async fn soft_delete(db: &SqlitePool, id: i64) -> Result<(), AppError> {
        let outcome = statement::write(
            db,
            sqlx::query("UPDATE payments SET deleted = 1 WHERE id = ?1 AND deleted = 0").bind(id),
        )
        .await?;

        if outcome.affected_rows == 0 {
            return Err(AppError::NotFound(format!("payment {id} not found")));
        }
        Ok(())
    }

    /// Distinct business dates among non-deleted rows, newest first.
    pub async fn list_distinct_dates(db: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
        let rows = statement::read_rows(
            db,
            sqlx::query_as::<_, (String,)>(
                "SELECT DISTINCT substr(date, 1, 10) AS day
                 FROM payments WHERE deleted = 0
                 ORDER BY day DESC",
            ),
        )
        .await?;
        Ok(rows.into_iter().map(|(day,)| day).collect())
    }
}
