mod dto;
pub mod handlers;
pub mod password;
pub mod repo;

pub use repo::User;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
