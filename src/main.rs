use anyhow::Result;
use gas_lens::{
    config::Config,
    handlers::{router, AppState},
    services::*,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gas_lens=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting Gas Lens API v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {:?}", config.environment);

    // Initialize services
    let resolver = Arc::new(ProviderResolver::new(config.chains.clone(), config.rpc_timeout)?);
    let estimator = Arc::new(GasEstimator::new(
        resolver.clone(),
        config.fallback_prices.clone(),
    ));
    let sampler = Arc::new(FeeHistorySampler::new(resolver.clone()));
    let simulator = Arc::new(CallSimulator::new(resolver.clone()));

    let app_state = AppState {
        resolver,
        estimator,
        sampler,
        simulator,
        generations: Arc::new(Generations::new()),
        analytics: Arc::new(Analytics::new()),
    };

    let app = router(app_state).layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::default().include_headers(true)),
            )
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(config.request_timeout)),
    );

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        return;
    }
    tracing::info!("Shutting down gracefully...");
}
