//! FOD League Data Service
//!
//! Serves the site settings bridge, the league directory and team rosters from
//! SQLite, plus the server-rendered dashboard and roster views built on them.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod settings;
mod views;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{CredentialVerifier, KeyRing};
use config::Config;
use db::Repository;
use settings::FieldSource;
use views::ApiClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub fields: Arc<dyn FieldSource>,
    pub api: Arc<ApiClient>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_tracing(&config);

    tracing::info!("Starting FOD League Data Service");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Views call API at {}", config.api_base_url);
    tracing::debug!(
        "Settings keys: {:?}",
        settings::known_keys(&config.leagues)
    );

    let key_ring = KeyRing::from_keys(&config.bridge_keys);
    if key_ring.is_empty() {
        tracing::warn!(
            "No bridge keys configured (FOD_BRIDGE_KEYS). Settings bridge will reject every request"
        );
    }
    let verifier: Arc<dyn CredentialVerifier> = Arc::new(key_ring);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    if let Some(seed_path) = &config.seed_path {
        let summary = repo.import_snapshot_file(seed_path).await?;
        tracing::info!(
            leagues = summary.leagues,
            teams = summary.teams,
            players = summary.players,
            options = summary.options,
            "Imported snapshot from {:?}",
            seed_path
        );
    }

    let api = Arc::new(ApiClient::new(&config.api_base_url, config.view_timeout)?);

    let state = AppState {
        fields: repo.clone() as Arc<dyn FieldSource>,
        repo,
        api,
        verifier,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited");
    Ok(())
}

fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    let verifier = state.verifier.clone();

    // Settings bridge, behind the shared-secret check
    let bridge_routes = Router::new()
        .route("/fod-bridge/v1/site-settings", get(api::get_site_settings))
        .layer(middleware::from_fn(move |req, next| {
            auth::bridge_key_layer(verifier.clone(), req, next)
        }));

    // Read-only JSON endpoints
    let api_routes = Router::new()
        .route("/dashboard", get(api::list_leagues))
        .route("/teams/{id}", get(api::get_team));

    // HTML views
    let view_routes = Router::new()
        .route("/", get(views::dashboard_page))
        .route("/roster/{id}", get(views::roster_page));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(bridge_routes)
        .merge(api_routes)
        .merge(view_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                )),
        )
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!("Ignoring invalid FOD_CORS_ORIGIN: {}", e);
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutting down server...");
}
