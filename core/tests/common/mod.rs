//! Shared helpers for proxy integration tests.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::Query,
    http::{header, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use tmdb_proxy_core::proxy::{build_router, AppState, UpstreamClient, UpstreamSettings};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const API_KEY: &str = "test-key";

/// Start a programmable mock upstream on an ephemeral port.
///
/// `f` receives the request path and query pairs and returns a status and raw body.
pub async fn start_upstream<F>(f: F) -> String
where
    F: Fn(&str, &[(String, String)]) -> (StatusCode, String) + Send + Sync + 'static,
{
    let f = Arc::new(f);
    let app = Router::new().fallback(move |uri: Uri, Query(params): Query<Vec<(String, String)>>| {
        let f = f.clone();
        async move {
            let (status, body) = (*f)(uri.path(), &params);
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{}", addr)
}

/// Mock upstream that echoes the path and query it received.
#[allow(dead_code)]
pub async fn start_echo_upstream() -> String {
    start_upstream(|path, params| {
        let body = json!({ "path": path, "params": params });
        (StatusCode::OK, body.to_string())
    })
    .await
}

pub fn proxy_router(base_url: &str) -> Router {
    let settings = UpstreamSettings {
        base_url: base_url.to_string(),
        api_key: API_KEY.to_string(),
        default_language: "pt-BR".to_string(),
        default_region: "BR".to_string(),
    };
    let client = UpstreamClient::new(5, None).unwrap();
    build_router(AppState::new(client, settings))
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>, Option<String>) {
    let response: Response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec(), content_type)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body, _) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

/// Look up a param in an echoed `params` array.
#[allow(dead_code)]
pub fn param<'a>(echo: &'a Value, name: &str) -> Option<&'a str> {
    echo["params"]
        .as_array()?
        .iter()
        .find(|pair| pair[0] == name)
        .and_then(|pair| pair[1].as_str())
}

#[allow(dead_code)]
pub fn param_names(echo: &Value) -> Vec<String> {
    echo["params"]
        .as_array()
        .map(|pairs| {
            pairs
                .iter()
                .filter_map(|pair| pair[0].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
