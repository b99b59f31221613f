use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::state::AppState;

use super::dto::{
    CheckUsernameQuery, CheckUsernameResponse, CreateUserRequest, LoginRequest, PublicUser,
};
use super::repo::{NewUser, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/users", post(create_user))
        .route("/users/check-username", get(check_username))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "username and password are required".into(),
        ));
    }

    let user = User::verify_credentials(&state.db, username, &payload.password).await?;
    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("username is required".into()));
    }
    if payload.password.len() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }

    let new = NewUser {
        username: username.to_string(),
        name: payload.name,
        surname: payload.surname,
        branch: payload.branch,
        role: payload.role,
    };
    let user = User::create(&state.db, &new, &payload.password).await?;
    info!(user_id = user.id, username = %user.username, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state))]
async fn check_username(
    State(state): State<AppState>,
    Query(query): Query<CheckUsernameQuery>,
) -> Result<Json<CheckUsernameResponse>, AppError> {
    let is_unique = User::find_by_username(&state.db, query.username.trim())
        .await?
        .is_none();
    Ok(Json(CheckUsernameResponse { is_unique }))
}
