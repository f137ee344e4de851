//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all handler
//! - Wire up middleware (tracing)
//! - Dispatch each request to a transformer or the forwarder
//! - Map translation failures to caller responses
//! - Record per-request metrics

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::AdapterConfig;
use crate::http::forwarder::Forwarder;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::{Dispatcher, Route};
use crate::transform::{LoginTransformer, TransformError, UpsertTransformer};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub forwarder: Forwarder,
    pub upsert: UpsertTransformer,
    pub login: LoginTransformer,
}

impl AppState {
    pub fn new(config: &AdapterConfig) -> Self {
        let forwarder = Forwarder::new(config.backend.base_url.clone());
        let max_body_bytes = config.limits.max_body_bytes;
        Self {
            dispatcher: Arc::new(Dispatcher::new(config.login.path.clone())),
            upsert: UpsertTransformer::new(forwarder.clone(), max_body_bytes),
            login: LoginTransformer::new(forwarder.clone(), max_body_bytes),
            forwarder,
        }
    }
}

/// HTTP server for the adapter.
pub struct HttpServer {
    router: Router,
    config: AdapterConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AdapterConfig) -> Self {
        let state = AppState::new(&config);
        let router = Self::build_router(state);
        Self { router, config }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(adapter_handler))
            .route("/", any(adapter_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for serving or in-process calls.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.base_url,
            login_path = %self.config.login.path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }
}

/// Main handler: dispatch, translate or forward, map errors.
async fn adapter_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let route = state.dispatcher.dispatch(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(route = %route, method = %method, path = %path, "Dispatching request");

    let result = match route {
        Route::Upsert => state.upsert.handle(request).await,
        Route::Login => state.login.handle(request).await,
        Route::PassThrough => state
            .forwarder
            .forward(request)
            .await
            .map_err(TransformError::from),
    };

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            match &err {
                TransformError::Forward(e) => {
                    tracing::error!(route = %route, path = %path, error = %e, "Upstream error");
                    metrics::record_upstream_error(route);
                }
                TransformError::Upstream(captured) => {
                    tracing::info!(route = %route, path = %path, status = %captured.status, "Relaying backend answer");
                }
                e => {
                    tracing::warn!(route = %route, path = %path, error = %e, "Rejected request");
                }
            }
            err.into_response()
        }
    };

    metrics::record_request(route, response.status().as_u16(), start);
    response
}
