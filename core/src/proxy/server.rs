//! Proxy Server - Axum HTTP server
//! Every route in the table goes through the same dispatch path.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, on, MethodFilter},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{ConfigError, UpstreamError};
use crate::proxy::credentials::UpstreamCredentials;
use crate::proxy::descriptor::UpstreamRequest;
use crate::proxy::route::{RouteSpec, ROUTES};
use crate::proxy::upstream::client::UpstreamClient;

/// Validated upstream settings, fixed at startup
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub api_key: String,
    pub default_language: String,
    pub default_region: String,
}

impl UpstreamSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let upstream = &config.upstream;

        Ok(Self {
            base_url: upstream.base_url.trim().to_string(),
            api_key: upstream.require_api_key()?.to_string(),
            default_language: upstream.default_language.clone(),
            default_region: upstream.default_region.clone(),
        })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub settings: Arc<UpstreamSettings>,
}

impl AppState {
    pub fn new(upstream: UpstreamClient, settings: UpstreamSettings) -> Self {
        Self {
            upstream,
            settings: Arc::new(settings),
        }
    }
}

/// Proxy server instance
pub struct ProxyServer {
    host: String,
    port: u16,
    state: AppState,
}

impl ProxyServer {
    /// Fails if the configuration is incomplete.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let settings = UpstreamSettings::from_config(config)?;
        let upstream = UpstreamClient::new(
            config.upstream.request_timeout,
            config.upstream.proxy_url.as_deref(),
        )?;

        Ok(Self {
            host: config.server.bind_host().to_string(),
            port: config.server.port,
            state: AppState::new(upstream, settings),
        })
    }

    /// Run the proxy server (blocking)
    pub async fn run(self) -> anyhow::Result<()> {
        let app = build_router(self.state);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("Proxy server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Proxy server stopped");
        Ok(())
    }
}

/// Build the router: health checks plus one handler per table entry.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/healthz", get(health_check_handler))
        .route("/health", get(health_check_handler));

    for spec in ROUTES {
        app = register(app, spec);
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Register a single table entry.
fn register(app: Router<AppState>, spec: &'static RouteSpec) -> Router<AppState> {
    let filter = match MethodFilter::try_from(spec.method.clone()) {
        Ok(filter) => filter,
        Err(e) => {
            tracing::error!("Skipping route {}: {}", spec.local_path, e);
            return app;
        }
    };

    app.route(
        spec.local_path,
        on(
            filter,
            move |State(state): State<AppState>,
                  path: Option<Path<HashMap<String, String>>>,
                  Query(query): Query<HashMap<String, String>>| async move {
                // A rejected path (e.g. invalid UTF-8) leaves placeholders
                // unresolved, which fails before any upstream call.
                let path_params = path.map(|Path(p)| p).unwrap_or_default();
                dispatch(&state, spec, &path_params, &query).await
            },
        ),
    )
}

async fn dispatch(
    state: &AppState,
    spec: &RouteSpec,
    path_params: &HashMap<String, String>,
    query: &HashMap<String, String>,
) -> Response {
    match call_upstream(state, spec, path_params, query).await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            log_failure(spec, &e);
            e.into_response()
        }
    }
}

async fn call_upstream(
    state: &AppState,
    spec: &RouteSpec,
    path_params: &HashMap<String, String>,
    query: &HashMap<String, String>,
) -> Result<Bytes, UpstreamError> {
    let settings = &state.settings;
    let credentials = UpstreamCredentials::derive(
        &settings.api_key,
        query.get("language").map(String::as_str),
        &settings.default_language,
        &settings.default_region,
    );
    let request = UpstreamRequest::build(&settings.base_url, spec, &credentials, path_params, query)?;
    state.upstream.fetch(&request).await
}

fn log_failure(spec: &RouteSpec, error: &UpstreamError) {
    match error {
        UpstreamError::Status { status, body } => tracing::warn!(
            "{} -> {}: upstream returned {}: {}",
            spec.local_path,
            spec.upstream_path,
            status,
            body.chars().take(200).collect::<String>()
        ),
        other => tracing::warn!("{} -> {}: {}", spec.local_path, spec.upstream_path, other),
    }
}

/// Health check handler
async fn health_check_handler() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install signal handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
