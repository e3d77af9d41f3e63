use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ridebook::config::AppConfig;
use ridebook::db;
use ridebook::handlers;
use ridebook::services::notify::NotificationDispatcher;
use ridebook::services::session::{LoginRateLimiter, MemorySessionStore, SessionGuard};
use ridebook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let store = db::open_store(&config)?;
    let notifier = NotificationDispatcher::from_config(&config)?;
    let sessions = SessionGuard::new(
        Arc::new(MemorySessionStore::new()),
        config.admin_password.clone(),
        LoginRateLimiter::new(
            config.login_rate_limit_max,
            chrono::Duration::seconds(config.login_rate_limit_window_secs),
        ),
    );

    let state = Arc::new(AppState {
        store,
        config: config.clone(),
        sessions,
        notifier,
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
