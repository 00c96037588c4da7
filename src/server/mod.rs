use crate::adapters::{HttpRateProvider, JsonSnapshot};
use crate::core::cache::RateCache;
use crate::core::client::RateClient;
use crate::domain::model::CurrencyPair;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use axum::{routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;

pub type LiveRateClient = RateClient<HttpRateProvider, JsonSnapshot>;

/// Shared state handed to every request handler.
pub struct AppState {
    pub client: LiveRateClient,
    pub pair: CurrencyPair,
}

impl AppState {
    pub fn new(client: LiveRateClient, pair: CurrencyPair) -> Self {
        Self { client, pair }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let provider = HttpRateProvider::from_config(config)?;
        let fallback = JsonSnapshot::new(config.fallback_path());
        let client = RateClient::new(provider, fallback, RateCache::new(config.cache_ttl()))
            .with_timeout(config.upstream_timeout());

        Ok(Self::new(client, config.currency_pair()))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/summary", get(handlers::get_summary))
        .route("/latest", get(handlers::get_latest))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serves until `shutdown` resolves, then releases the rate client.
pub async fn run_server(
    state: Arc<AppState>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(Arc::clone(&state)))
        .with_graceful_shutdown(shutdown)
        .await?;

    state.client.shutdown();
    Ok(())
}
