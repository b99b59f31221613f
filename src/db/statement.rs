//! Statement routing over the shared SQLite pool.
//!
//! Callers tag every statement by entry point: `read_rows`/`read_row` for
//! queries, `write` for mutations. Reads come back as decoded rows; writes
//! come back normalized as a [`WriteOutcome`], so no caller touches the
//! driver's native result types and nothing ever inspects SQL text to guess
//! what a statement does. Failed statements surface as-is; there is no
//! retry layer.

use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{Execute, FromRow, SqlitePool};
use tracing::debug;

/// Normalized result of a mutating statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub affected_rows: u64,
    /// Rowid assigned by the most recent INSERT on the connection; only
    /// meaningful right after an INSERT. Updates and deletes read
    /// `affected_rows` instead.
    pub inserted_id: i64,
}

pub async fn read_rows<'q, T>(
    db: &SqlitePool,
    statement: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
) -> Result<Vec<T>, sqlx::Error>
where
    T: Send + Unpin + for<'r> FromRow<'r, SqliteRow> + 'q,
{
    let sql = statement.sql();
    debug!(sql, kind = "read", "statement");
    statement.fetch_all(db).await
}

pub async fn read_row<'q, T>(
    db: &SqlitePool,
    statement: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
) -> Result<Option<T>, sqlx::Error>
where
    T: Send + Unpin + for<'r> FromRow<'r, SqliteRow> + 'q,
{
    let sql = statement.sql();
    debug!(sql, kind = "read", "statement");
    statement.fetch_optional(db).await
}

pub async fn write<'q>(
    db: &SqlitePool,
    statement: Query<'q, Sqlite, SqliteArguments<'q>>,
) -> Result<WriteOutcome, sqlx::Error> {
    let sql = statement.sql();
    debug!(sql, kind = "write", "statement");
    let result = statement.execute(db).await?;
    Ok(WriteOutcome {
        affected_rows: result.rows_affected(),
        inserted_id: result.last_insert_rowid(),
    })
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(e) if e.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn write_reports_inserted_id_and_affected_rows() {
        let pool = test_pool().await;
        write(
            &pool,
            sqlx::query("CREATE TABLE scratch (id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT)"),
        )
        .await
        .expect("create table");

        let first = write(&pool, sqlx::query("INSERT INTO scratch (label) VALUES (?1)").bind("a"))
            .await
            .expect("insert");
        assert_eq!(first.affected_rows, 1);
        assert_eq!(first.inserted_id, 1);

        let second = write(&pool, sqlx::query("INSERT INTO scratch (label) VALUES (?1)").bind("b"))
            .await
            .expect("insert");
        assert_eq!(second.inserted_id, 2);
    }

    #[tokio::test]
    async fn write_reports_zero_affected_rows_on_miss() {
        let pool = test_pool().await;
        write(&pool, sqlx::query("CREATE TABLE scratch (id INTEGER PRIMARY KEY, label TEXT)"))
            .await
            .expect("create table");

        let outcome = write(
            &pool,
            sqlx::query("UPDATE scratch SET label = ?1 WHERE id = ?2")
                .bind("missing")
                .bind(42_i64),
        )
        .await
        .expect("update");
        assert_eq!(outcome.affected_rows, 0);
    }

    #[tokio::test]
    async fn read_rows_decodes_in_order() {
        let pool = test_pool().await;
        write(&pool, sqlx::query("CREATE TABLE scratch (id INTEGER PRIMARY KEY, label TEXT)"))
            .await
            .expect("create table");
        for (id, label) in [(1_i64, "uno"), (2, "dos")] {
            write(
                &pool,
                sqlx::query("INSERT INTO scratch (id, label) VALUES (?1, ?2)")
                    .bind(id)
                    .bind(label),
            )
            .await
            .expect("insert");
        }

        let rows = read_rows(
            &pool,
            sqlx::query_as::<_, (i64, String)>("SELECT id, label FROM scratch ORDER BY id"),
        )
        .await
        .expect("select");
        assert_eq!(rows, vec![(1, "uno".to_string()), (2, "dos".to_string())]);
    }
}
