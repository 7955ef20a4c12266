mod app;
mod config;
mod courses;
mod db;
mod error;
mod extract;
mod participants;
mod response;
mod state;
#[cfg(test)]
mod testing;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "skilltanam=debug,axum=info,tower_http=info".to_string());
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

    let config = AppConfig::from_env()?;

    tracing::info!("connecting to database");
    let db = db::connect(&config).await?;
    db::migrate(&db).await?;
    tracing::info!("database ready");

    let app = app::build_app(AppState::init(db.clone()));
    let served = app::serve(app, &config.listen_addr()).await;

    db.close().await;
    tracing::info!("database pool closed");
    served
}
