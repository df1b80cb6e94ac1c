//! bazaar-server — marketplace order/basket backend
//!
//! Long-running service that:
//! - Keeps users' baskets (orders at status 0) and their product views
//! - Drives the order status lifecycle with a one-time stock decrement
//!   on the first exit from the basket
//! - Authenticates requests via a JWT session cookie

mod api;
mod auth;
mod config;
mod db;
mod error;
mod services;
mod state;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting bazaar-server (env: {})", config.environment);

    // Initialize application state (pool + migrations)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("bazaar-server HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
