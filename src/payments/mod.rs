mod dto;
mod export;
pub mod handlers;
mod method;
pub mod repo;
pub mod summary;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
