//! Route table
//! Each entry maps one local endpoint onto one upstream endpoint.

use axum::http::Method;
use std::collections::HashMap;

use crate::error::UpstreamError;

/// Declarative description of one proxied endpoint
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub method: Method,
    /// Local path in router syntax, e.g. `/movie/:id`
    pub local_path: &'static str,
    /// Upstream path template, e.g. `/movie/{id}`
    pub upstream_path: &'static str,
    /// Inbound query parameters copied to the upstream call when present
    pub forwarded_params: &'static [&'static str],
    pub fixed_params: &'static [(&'static str, &'static str)],
}

impl RouteSpec {
    const fn get(local_path: &'static str, upstream_path: &'static str) -> Self {
        Self {
            method: Method::GET,
            local_path,
            upstream_path,
            forwarded_params: &[],
            fixed_params: &[],
        }
    }

    const fn forwarding(mut self, params: &'static [&'static str]) -> Self {
        self.forwarded_params = params;
        self
    }

    const fn with_fixed(mut self, params: &'static [(&'static str, &'static str)]) -> Self {
        self.fixed_params = params;
        self
    }

    /// Interpolate `{name}` placeholders with path parameter values.
    ///
    /// Values are inserted verbatim. A placeholder with no matching
    /// parameter is an error; the template never goes out literally.
    pub fn resolve_upstream_path(
        &self,
        path_params: &HashMap<String, String>,
    ) -> Result<String, UpstreamError> {
        let mut out = String::with_capacity(self.upstream_path.len());
        let mut rest = self.upstream_path;

        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + len];
            out.push_str(&rest[..start]);
            let value = path_params
                .get(name)
                .ok_or_else(|| UpstreamError::MissingPathParam(name.to_string()))?;
            out.push_str(value);
            rest = &rest[start + len + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

pub const ROUTES: &[RouteSpec] = &[
    RouteSpec::get("/trending", "/trending/movie/week"),
    RouteSpec::get("/top-rated", "/movie/top_rated"),
    RouteSpec::get("/popular", "/movie/popular"),
    RouteSpec::get("/now-playing", "/movie/now_playing"),
    RouteSpec::get("/genres", "/genre/movie/list"),
    RouteSpec::get("/movie/:id", "/movie/{id}")
        .with_fixed(&[("append_to_response", "videos,credits,watch/providers")]),
    RouteSpec::get("/movie/:id/recommendations", "/movie/{id}/recommendations"),
    RouteSpec::get("/discover", "/discover/movie")
        .forwarding(&["with_genres"])
        .with_fixed(&[("sort_by", "popularity.desc")]),
    RouteSpec::get("/search", "/search/movie").forwarding(&["query"]),
    RouteSpec::get("/actor/:id", "/person/{id}")
        .with_fixed(&[("append_to_response", "movie_credits")]),
];
