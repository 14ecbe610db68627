use std::net::{Ipv4Addr, SocketAddrV4};

use anyhow::Context;
use axum::Router;
use swipe_checkout_connect::{
    config::Config, connect, gateway::transport::HttpTransport, state::AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .init();

    match dotenvy::dotenv() {
        Ok(p) => tracing::info!(path = %p.display(), "Loaded environment variables from .env file"),
        Err(e) => tracing::warn!("Failed to environment variables from .env: {e}"),
    };
    let config = Config::from_env()?;
    tracing::info!(
        region = %config.gateway.region,
        test = config.gateway.test,
        verify_currency = config.gateway.verify_currency,
        "Swipe Checkout gateway settings"
    );
    let transport = HttpTransport::new(config.timeout).context("build http client")?;
    let state = AppState::new(transport, config.gateway);

    let app = Router::new()
        .merge(connect::api::router::<HttpTransport>())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state);

    let listener =
        tokio::net::TcpListener::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.port))
            .await
            .context("bind listener")?;

    tracing::info!("Serving on port {}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
