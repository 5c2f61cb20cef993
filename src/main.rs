use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filmage_api::config::Config;
use filmage_api::handlers::{self, AppState};
use filmage_api::search::AgeMatchSearch;
use filmage_api::tmdb_client::TmdbClient;

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, builds the TMDB client and the
/// search, then serves the HTTP API until the process is stopped.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filmage_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let client = TmdbClient::new(
        config.tmdb_base_url.clone(),
        config.tmdb_api_key.clone(),
        config.tmdb_timeout,
    )?;
    tracing::info!("✓ TMDB client initialized: {}", config.tmdb_base_url);

    let search = AgeMatchSearch::new(client, config.search.clone());
    let app_state = Arc::new(AppState::new(config.clone(), search));
    if app_state.search_cache.is_some() {
        tracing::info!(
            "Search cache initialized ({}s TTL)",
            config.search_cache_ttl.as_secs()
        );
    }

    // One search every 2 seconds per IP, burst of 5. Each search fans out to
    // hundreds of provider requests.
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(5)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let search_routes = Router::new()
        .route("/api/search", get(handlers::search))
        .layer(ServiceBuilder::new().layer(GovernorLayer {
            config: governor_conf,
        }));

    // Health check bypasses rate limiting
    let app = Router::new()
        .route("/api/health", get(handlers::health))
        .merge(search_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("FilmAge server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
