use std::sync::Arc;

use mock_server::MockState;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let zones = std::env::var("MOCK_ZONES").unwrap_or_else(|_| "example.com".to_string());
    let state = Arc::new(MockState::new(
        zones.split(',').map(str::trim).filter(|z| !z.is_empty()),
    ));

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, %zones, "mock zone API listening");
    mock_server::run_with_state(listener, state).await
}
