mod app_state;
mod chain;
mod config;
mod database;
mod external;
mod models;
mod orders;
mod prices;
mod routes;
mod scheduler;
mod whitelist;
pub use app_state::AppState;
pub use config::Config;

use crate::routes::make_app;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::init()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let bind_addr = config.bind_addr.clone();
    let state = AppState::from_config(config)?;
    let app = make_app(Arc::new(state));

    let listener = TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "🚀 Server started successfully");
    axum::serve(listener, app).await?;
    Ok(())
}
