//! Schema application and first-boot seeding.
//!
//! `ensure_ready` is safe to run any number of times: the schema is applied
//! with `IF NOT EXISTS` and the admin seed is a check-then-insert whose
//! losing side, under a concurrent first boot, lands on the unique username
//! index and is treated as already seeded.

use sqlx::SqlitePool;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::accounts::{password, User};
use crate::config::AdminSeed;
use crate::db::statement;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        name TEXT NOT NULL,
        surname TEXT NOT NULL,
        branch TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        last_login TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS payments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        method TEXT NOT NULL,
        amount REAL NOT NULL,
        date TEXT NOT NULL,
        branch_id TEXT NOT NULL,
        user TEXT NOT NULL,
        shift TEXT NOT NULL,
        deleted INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users(username)",
    "CREATE INDEX IF NOT EXISTS idx_payments_date ON payments(date)",
    "CREATE INDEX IF NOT EXISTS idx_payments_branch_date ON payments(branch_id, date)",
];

/// Applies the schema and seeds the default administrator. Must complete
/// before the first request is served; any failure here aborts startup.
pub async fn ensure_ready(db: &SqlitePool, admin: &AdminSeed) -> anyhow::Result<()> {
    for ddl in SCHEMA {
        statement::write(db, sqlx::query(ddl)).await?;
    }
    seed_initial_admin(db, admin).await
}

async fn seed_initial_admin(db: &SqlitePool, admin: &AdminSeed) -> anyhow::Result<()> {
    if User::find_by_username(db, &admin.username).await?.is_some() {
        debug!(username = %admin.username, "initial admin already present");
        return Ok(());
    }

    let hash = password::hash_password(&admin.password)?;
    let outcome = statement::write(
        db,
        sqlx::query(
            "INSERT INTO users (username, name, surname, branch, password_hash, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&admin.username)
        .bind(&admin.name)
        .bind(&admin.surname)
        .bind(&admin.branch)
        .bind(&hash)
        .bind(&admin.role)
        .bind(OffsetDateTime::now_utc()),
    )
    .await;

    match outcome {
        Ok(_) => {
            info!(username = %admin.username, "seeded initial admin");
            Ok(())
        }
        // a concurrent first boot won the race; the unique index holds the row
        Err(e) if statement::is_unique_violation(&e) => {
            debug!(username = %admin.username, "initial admin seeded concurrently");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
