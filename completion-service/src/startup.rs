//! Application startup and lifecycle management.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use service_common::error::AppError;

use crate::config::ServiceConfig;
use crate::handlers;
use crate::middleware::request_context_middleware;
use crate::services::providers::ollama::OllamaProvider;
use crate::services::providers::CompletionProvider;
use crate::services::{CompletionHistory, LogStore};

/// Shared application state. Per-request data never lives here — it travels
/// in the request extensions (see `middleware::request_context`).
#[derive(Clone)]
pub struct AppState {
    pub config: ServiceConfig,
    pub op_log: LogStore,
    pub history: CompletionHistory,
    /// `None` when no backend is configured; `/completion` then uses the
    /// local fallback transform.
    pub upstream: Option<Arc<dyn CompletionProvider>>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ServiceConfig) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(&config.logs.dir)
            .await
            .map_err(|e| {
                tracing::error!(
                    dir = %config.logs.dir.display(),
                    "Failed to create log directory: {}",
                    e
                );
                AppError::from(e)
            })?;

        let op_log = LogStore::new(config.operational_log_path());
        let history = CompletionHistory::new(config.completion_log_path());

        let upstream: Option<Arc<dyn CompletionProvider>> = match &config.upstream.url {
            Some(url) => {
                tracing::info!(
                    url = %url,
                    model = %config.upstream.model,
                    "Initialized Ollama completion backend"
                );
                Some(Arc::new(OllamaProvider::new(
                    url,
                    &config.upstream.model,
                    Duration::from_secs(config.upstream.timeout_secs),
                )))
            }
            None => {
                let warning =
                    "OLLAMA_URL is not set; /completion will use the local fallback transform";
                tracing::warn!("{}", warning);
                op_log.append("WARNING", None, None, warning).await;
                None
            }
        };

        let state = AppState {
            config: config.clone(),
            op_log,
            history,
            upstream,
        };

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(
            self.listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

/// Builds the gateway router: the four routes behind the request-context
/// middleware, with HTTP tracing outermost.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/logs", get(handlers::logs::operational_log))
        .route("/history", get(handlers::logs::completion_history))
        .route("/completion", post(handlers::completion::completion))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            request_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
