mod auth;
mod autocomplete;
mod config;
mod db;
mod error;
mod extractors;
mod favorites;
mod middleware;
mod openapi;
mod provider;
mod routes;
mod weather;

use anyhow::Context;
use axum::{
    error_handling::HandleErrorLayer,
    http::{header, Method, StatusCode},
    BoxError,
};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::auth::{AuthService, CredentialVerifier, StaticCredentialVerifier};
use crate::autocomplete::AutocompleteService;
use crate::config::AppConfig;
use crate::db::{DbConfig, SqliteFavoriteRepository};
use crate::favorites::FavoritesService;
use crate::provider::ProviderSettings;
use crate::weather::WeatherService;

/// Shared HTTP client configuration
const HTTP_TIMEOUT_SECS: u64 = 30;
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Whole-request budget enforced by the server
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub autocomplete_service: Arc<AutocompleteService>,
    pub favorites_service: Arc<FavoritesService>,
    pub auth_service: Arc<AuthService>,
}

/// Create shared HTTP client with connection pooling
fn create_http_client() -> anyhow::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
        .context("Failed to create HTTP client")
}

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", err),
        )
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

/// Flag startup settings that only make sense on a developer machine
fn warn_on_dev_settings(config: &AppConfig, provider: &ProviderSettings) {
    if config.auth.uses_dev_secret() {
        tracing::warn!("Using the built-in development JWT secret; set CLIMA_AUTH__JWT_SECRET");
    }
    if config.auth.uses_dev_credentials() {
        tracing::warn!("Using the built-in development login; set CLIMA_AUTH__EMAIL and CLIMA_AUTH__PASSWORD");
    }
    if !provider.is_configured() {
        tracing::warn!(
            "Weather provider not configured; weather and autocomplete requests will fail until CLIMA_WEATHER_API_KEY and CLIMA_WEATHER_API_BASE_URL are set"
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clima=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded successfully");

    let provider = Arc::new(ProviderSettings::from_config(&config));
    warn_on_dev_settings(&config, &provider);

    // Database
    let pool = db::create_pool(&DbConfig {
        url: config.database_url.clone(),
        ..DbConfig::default()
    })
    .await?;
    db::run_migrations(&pool).await?;
    tracing::info!(url = %config.database_url, "Database ready");

    // Create shared HTTP client with connection pooling
    let http_client = create_http_client()?;
    tracing::debug!("Shared HTTP client created");

    // Initialize services with shared client
    let weather_service = Arc::new(WeatherService::new(
        http_client.clone(),
        Arc::clone(&provider),
        &config.default_lang,
    ));
    let autocomplete_service = Arc::new(AutocompleteService::new(
        http_client,
        Arc::clone(&provider),
    ));
    let favorites_service = Arc::new(FavoritesService::new(Arc::new(
        SqliteFavoriteRepository::new(pool),
    )));

    let verifier: Arc<dyn CredentialVerifier> =
        Arc::new(StaticCredentialVerifier::from_config(&config.auth));
    let auth_service = Arc::new(AuthService::new(
        verifier,
        &config.auth.jwt_secret,
        config.auth.jwt_expires_in_secs,
    ));

    // Create shared application state
    let state = AppState {
        weather_service,
        autocomplete_service,
        favorites_service,
        auth_service,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = routes::build_router(state)
        .layer(
            ServiceBuilder::new()
                // Handle timeout errors
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);
    tracing::info!("API docs at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
