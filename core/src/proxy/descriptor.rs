//! Upstream request builder

use axum::http::Method;
use std::collections::HashMap;

use crate::error::UpstreamError;
use crate::proxy::credentials::UpstreamCredentials;
use crate::proxy::route::RouteSpec;

/// A fully resolved outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl UpstreamRequest {
    /// Resolve `route` against inbound path and query parameters.
    ///
    /// Parameter order is credentials, then forwarded params that were
    /// present on the inbound request, then the route's fixed params.
    /// Values are passed through without validation. Fails only when the
    /// route's path template has a placeholder with no matching parameter.
    pub fn build(
        base_url: &str,
        route: &RouteSpec,
        credentials: &UpstreamCredentials,
        path_params: &HashMap<String, String>,
        query: &HashMap<String, String>,
    ) -> Result<Self, UpstreamError> {
        let url = format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            route.resolve_upstream_path(path_params)?
        );

        let mut params: Vec<(String, String)> = credentials
            .as_params()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        for name in route.forwarded_params {
            if let Some(value) = query.get(*name) {
                params.push((name.to_string(), value.clone()));
            }
        }

        params.extend(
            route
                .fixed_params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );

        Ok(Self {
            method: route.method.clone(),
            url,
            params,
        })
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
