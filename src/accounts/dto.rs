use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::User;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub name: String,
    pub surname: String,
    pub branch: String,
    pub role: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckUsernameQuery {
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckUsernameResponse {
    pub is_unique: bool,
}

/// Account summary handed back to the register UI. Never carries the hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub branch: String,
    pub role: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            surname: user.surname,
            branch: user.branch,
            role: user.role,
            last_login: user.last_login,
        }
    }
}
