//! Upstream client for calling the movie metadata API

use bytes::Bytes;
use reqwest::Client;
use tokio::time::Duration;

use crate::error::UpstreamError;
use crate::proxy::descriptor::UpstreamRequest;

#[derive(Clone)]
pub struct UpstreamClient {
    http_client: Client,
}

impl UpstreamClient {
    /// Without `proxy_url` the client connects directly, ignoring proxy env vars.
    pub fn new(request_timeout_secs: u64, proxy_url: Option<&str>) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(Duration::from_secs(request_timeout_secs))
            .user_agent(concat!("tmdb-proxy/", env!("CARGO_PKG_VERSION")));

        match proxy_url.filter(|p| !p.is_empty()) {
            Some(proxy) => {
                builder = builder.proxy(reqwest::Proxy::all(proxy)?);
                tracing::info!("Using upstream proxy: {}", proxy);
            }
            None => builder = builder.no_proxy(),
        }

        let http_client = builder.build()?;
        Ok(Self { http_client })
    }

    /// Issue `request` and return the upstream body untouched.
    ///
    /// Non-2xx statuses and bodies that are not valid JSON are errors.
    pub async fn fetch(&self, request: &UpstreamRequest) -> Result<Bytes, UpstreamError> {
        let response = self
            .http_client
            .request(request.method.clone(), &request.url)
            .query(&request.params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Upstream {} returned {}: {}", request.url, status, body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice::<serde::de::IgnoredAny>(&body)?;

        Ok(body)
    }
}
