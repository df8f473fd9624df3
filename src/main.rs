use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;

use tradelink_server::config::Config;
use tradelink_server::notify::LogDispatcher;
use tradelink_server::routes::{create_routes, AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let port = config.port;
    if config.payment.gateway_secret.is_empty() {
        tracing::warn!("GATEWAY_SECRET_KEY not set, gateway webhooks will be rejected");
    }

    let state = AppState::new(config, Arc::new(LogDispatcher));
    let app: Router = create_routes(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
