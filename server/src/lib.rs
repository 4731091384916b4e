//! Places web service.
//!
//! An authenticated user browses countries from a third-party catalog and
//! keeps a personal list of places (visited / wishlist / favorite). Every
//! route is one catalog call or one store operation, followed by a view
//! render or a redirect.
//!
//! # Layout
//! - `routes`: the `/places` resource handlers and the error page.
//! - `store`: `PlaceRepository` with in-memory and SQLite implementations.
//! - `catalog`: reqwest transport for `places_core::CatalogClient`.
//! - `session`: typed request identity read from request extensions.
//! - `error`: `PlaceError` and the redirect/status error boundary.
//! - `views`: the renderer seam; templates live elsewhere.
//!
//! # Running
//! ```sh
//! COUNTRY_API_URL=https://restcountries.com/v3.1/all \
//! C_BY_NAME_BASE_URL=https://restcountries.com/v3.1/name/ \
//! PLACES_DB=places.db RUST_LOG=info cargo run -p places-server
//! ```
use axum::{middleware, routing::get, Router};
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod views;

use config::{Config, ErrorMode};
use error::{error_boundary, ERROR_PAGE};
use routes::{error_page, MOUNT};
use state::AppState;

pub fn app(state: AppState, error_mode: ErrorMode) -> Router {
    Router::new()
        .nest(MOUNT, routes::router())
        .route(ERROR_PAGE, get(error_page))
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(error_mode, error_boundary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `app` plus the session provider selected by `config`, as served by
/// `start_server`.
pub fn configured_app(state: AppState, config: &Config) -> Router {
    let app = app(state, config.error_mode);
    if !config.session_headers {
        return app;
    }
    info!("Reading sessions from proxy headers");
    app.layer(middleware::from_fn(session::header_session))
}

async fn health() -> &'static str {
    "ok"
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::from_config(&config)?;

    let app = configured_app(state, &config);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
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
}
