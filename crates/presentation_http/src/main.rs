//! Verdiroute HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::sync::Arc;

use application::ports::{BikeRoutingPort, CarRoutingPort, GeocodingPort, TransitRoutingPort};
use application::services::JourneyPlanner;
use infrastructure::AppConfig;
use infrastructure::adapters::{
    GeocodingAdapter, GeoveloAdapter, GraphHopperAdapter, NavitiaAdapter,
};
use infrastructure::parking;
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verdiroute_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Verdiroute v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    info!(
        host = %config.server.host,
        port = %config.server.port,
        "Configuration loaded"
    );

    // Load parking facilities
    let parking_index = Arc::new(
        parking::load_index(&config.parking)
            .map_err(|e| anyhow::anyhow!("Failed to load parking data: {e}"))?,
    );

    // Initialize port adapters
    let bike: Arc<dyn BikeRoutingPort> = Arc::new(
        GeoveloAdapter::new(&config.geovelo)
            .map_err(|e| anyhow::anyhow!("Failed to initialize bike routing: {e}"))?,
    );
    let car: Arc<dyn CarRoutingPort> = Arc::new(
        GraphHopperAdapter::new(&config.graphhopper)
            .map_err(|e| anyhow::anyhow!("Failed to initialize car routing: {e}"))?,
    );
    let transit: Arc<dyn TransitRoutingPort> = Arc::new(
        NavitiaAdapter::new(&config.navitia)
            .map_err(|e| anyhow::anyhow!("Failed to initialize transit routing: {e}"))?,
    );
    let geocoding: Arc<dyn GeocodingPort> = Arc::new(
        GeocodingAdapter::new(&config.geocoding)
            .map_err(|e| anyhow::anyhow!("Failed to initialize geocoding: {e}"))?,
    );

    // Assemble the planner and app state
    let planner = Arc::new(JourneyPlanner::new(bike, car, transit, parking_index));
    let state = AppState { planner, geocoding };

    // Build router
    let app = routes::create_router(state);

    // Configure CORS layer
    let cors_layer = if config.server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    };

    // Add middleware (order matters: first added = outermost)
    let mut app = app.layer(TraceLayer::new_for_http());
    if config.server.cors_enabled {
        app = app.layer(cors_layer);
    }

    // Start server
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
