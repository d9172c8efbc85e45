//! HTTP listener: routing, the API key gate, and server lifecycle.

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::handlers::{self, protected, public};
use crate::middleware::api_key_middleware;
use crate::state::AppState;

/// Errors that can occur when starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/health", get(public::health_get))
        // Protected API
        .merge(api_routes(state.clone()))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(state.max_body_bytes));

    let router = if state.request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

/// Every route in here is gated by the API key. The method fallbacks sit
/// behind the gate too, so a keyless GET is a 401, not a 405.
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/block",
            post(protected::block_post).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/spawn",
            post(protected::spawn_post).fallback(handlers::method_not_allowed),
        )
        .route_layer(middleware::from_fn_with_state(state, api_key_middleware))
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn serve<F>(config: &AppConfig, state: AppState, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = config
        .server
        .bind_addr()
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!("REST API server started on port {}", config.server.port);

    serve_on(listener, state, shutdown).await
}

/// Serve on an already-bound listener. Tests bind port 0 and use this.
pub async fn serve_on<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = app(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    info!("REST API server stopped");
    Ok(())
}

/// Resolves on Ctrl-C (and SIGTERM on unix)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("failed to listen for SIGTERM: {}", e);
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
