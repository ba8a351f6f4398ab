//! Minimal HTTP service exposing a health-check endpoint.
//!
//! Every route group is mounted behind the same middleware stack: request
//! tracing, permissive CORS and panic recovery.

pub mod config;
pub mod error;
pub mod routes;

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use config::Config;
use error::ServerError;
use routes::RouteGroup;
use routes::health::HealthRouter;

/// Version reported by the health endpoint, fixed at build time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the Axum application router with all route groups and middleware.
pub fn create_app(config: &Config) -> Router {
    let groups: Vec<Box<dyn RouteGroup>> =
        vec![Box::new(HealthRouter::new(config.version.as_str()))];

    let router = groups
        .iter()
        .fold(Router::new(), |router, group| group.configure(router));

    with_middleware(router)
}

/// Wraps `router` (including its fallback) with recovery, CORS and request logging.
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Binds a TCP listener on `addr`.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Accepts connections on a background task until `shutdown` resolves.
///
/// In-flight requests are not drained: once `shutdown` completes the accept
/// loop is aborted and the listener dropped.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()>,
{
    let mut server = tokio::spawn(async move { axum::serve(listener, app).await });

    let finished = tokio::select! {
        () = shutdown => None,
        joined = &mut server => Some(joined),
    };

    match finished {
        None => {
            tracing::info!("shutting down server");
            server.abort();
            // Wait for the task to drop the listener.
            if let Some(failure) = shutdown_failure(server.await) {
                tracing::error!(error = %failure, "accept loop failed during shutdown");
            }
            Ok(())
        }
        Some(Ok(Ok(()))) => Ok(()),
        Some(Ok(Err(err))) => Err(ServerError::Serve(err)),
        Some(Err(err)) => Err(ServerError::Task(err)),
    }
}

/// Describes how an aborted accept loop ended, unless it was simply cancelled.
fn shutdown_failure(joined: Result<std::io::Result<()>, JoinError>) -> Option<String> {
    match joined {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(err.to_string()),
        Err(err) if err.is_cancelled() => None,
        Err(err) => Some(err.to_string()),
    }
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT");
        }
        () = terminate => {
            tracing::info!("received SIGTERM");
        }
    }
}
