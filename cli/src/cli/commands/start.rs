use std::path::PathBuf;

use tmdb_proxy_core::config::load_config;
use tmdb_proxy_core::proxy::ProxyServer;

pub async fn run(
    config_path: Option<PathBuf>,
    port_override: Option<u16>,
    host_override: Option<String>,
) -> anyhow::Result<()> {
    // Load configuration
    let mut config = load_config(config_path)?;

    if let Some(port) = port_override {
        config.server.port = port;
    }
    if let Some(host) = host_override {
        config.server.host = host;
    }

    tracing::info!("Starting tmdb-proxy...");
    tracing::info!("  Port: {}", config.server.port);
    tracing::info!("  Host: {}", config.server.bind_host());
    tracing::info!("  Upstream: {}", config.upstream.base_url);
    tracing::info!(
        "  Defaults: language={} region={}",
        config.upstream.default_language,
        config.upstream.default_region
    );

    // Fails fast when the api key is missing
    let server = ProxyServer::new(&config)?;

    tracing::info!(
        "Proxy server starting on http://{}:{}",
        config.server.bind_host(),
        config.server.port
    );
    tracing::info!("Press Ctrl+C to stop");

    // Run server (blocks until shutdown)
    server.run().await?;

    Ok(())
}
