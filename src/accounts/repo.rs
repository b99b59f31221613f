use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;
use tracing::warn;

use crate::db::statement;
use crate::error::AppError;

use super::password;

/// Account record. Usernames are unique and case-sensitive; accounts are
/// never physically deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub branch: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub surname: String,
    pub branch: String,
    pub role: String,
}

impl User {
    pub async fn find_by_username(
        db: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        statement::read_row(
            db,
            sqlx::query_as::<_, User>(
                "SELECT id, username, name, surname, branch, password_hash, role, last_login, created_at
                 FROM users WHERE username = ?1",
            )
            .bind(username),
        )
        .await
    }

    /// Hashes the password and inserts the account. A duplicate username
    /// lands on the unique index and comes back as a conflict.
    pub async fn create(
        db: &SqlitePool,
        new: &NewUser,
        plain_password: &str,
    ) -> Result<User, AppError> {
        let hash = password::hash_password(plain_password)?;
        let outcome = statement::write(
            db,
            sqlx::query(
                "INSERT INTO users (username, name, surname, branch, password_hash, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(&new.username)
            .bind(&new.name)
            .bind(&new.surname)
            .bind(&new.branch)
            .bind(&hash)
            .bind(&new.role)
            .bind(OffsetDateTime::now_utc()),
        )
        .await
        .map_err(|e| {
            if statement::is_unique_violation(&e) {
                AppError::Conflict(format!("username \"{}\" already exists", new.username))
            } else {
                AppError::Storage(e)
            }
        })?;

        let user = statement::read_row(
            db,
            sqlx::query_as::<_, User>(
                "SELECT id, username, name, surname, branch, password_hash, role, last_login, created_at
                 FROM users WHERE id = ?1",
            )
            .bind(outcome.inserted_id),
        )
        .await?
        .ok_or(AppError::Storage(sqlx::Error::RowNotFound))?;
        Ok(user)
    }

    /// Looks the account up and checks the password against the stored
    /// hash. Unknown username and wrong password are indistinguishable to
    /// the caller. On success `last_login` is stamped with the current
    /// time and the refreshed record returned.
    pub async fn verify_credentials(
        db: &SqlitePool,
        username: &str,
        plain_password: &str,
    ) -> Result<User, AppError> {
        let Some(mut user) = User::find_by_username(db, username).await? else {
            warn!(username, "login for unknown username");
            return Err(AppError::Authentication);
        };

        if !password::verify_password(plain_password, &user.password_hash)? {
            warn!(username, user_id = user.id, "login with wrong password");
            return Err(AppError::Authentication);
        }

        let now = OffsetDateTime::now_utc();
        statement::write(
            db,
            sqlx::query("UPDATE users SET last_login = ?1 WHERE id = ?2")
                .bind(now)
                .bind(user.id),
        )
        .await?;
        user.last_login = Some(now);
        Ok(user)
    }
}
