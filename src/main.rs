mod accounts;
mod app;
mod config;
mod db;
mod error;
mod payments;
mod state;

use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "cashdesk=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env();
    let state = AppState::init(config).await?;

    // schema and seed must hold before the first request; failures abort startup
    db::bootstrap::ensure_ready(&state.db, &state.config.admin).await?;

    let app = app::build_app(state.clone());
    app::serve(app).await?;

    state.close().await;
    Ok(())
}
