use std::path::PathBuf;
use std::time::Duration;

use tmdb_proxy_core::config::{default_config_path, load_config};

const HEALTH_TIMEOUT_SECS: u64 = 3;

pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    println!("tmdb-proxy Status");
    println!("=================");
    println!();
    println!("Configuration:");
    println!("  Default config file: {:?}", default_config_path());
    println!();
    println!("Server settings:");
    println!("  Host: {}", config.server.bind_host());
    println!("  Port: {}", config.server.port);
    println!();
    println!("Upstream:");
    println!("  Base URL: {}", config.upstream.base_url);
    println!("  API key: {}", mask(config.upstream.api_key.as_deref()));
    println!("  Default language: {}", config.upstream.default_language);
    println!("  Default region: {}", config.upstream.default_region);
    println!("  Timeout: {}s", config.upstream.request_timeout);
    if let Err(e) = config.validate() {
        println!("  Problem: {}", e);
    }

    // Check if server is reachable
    println!();
    let host = match config.server.bind_host() {
        "0.0.0.0" => "127.0.0.1",
        other => other,
    };
    let url = format!("http://{}:{}/healthz", host, config.server.port);
    match probe_health(&url).await {
        Ok(resp) if resp.status().is_success() => {
            println!("Server: RUNNING ✓");
        }
        _ => {
            println!("Server: NOT RUNNING");
        }
    }

    Ok(())
}

async fn probe_health(url: &str) -> reqwest::Result<reqwest::Response> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
        .no_proxy()
        .build()?;
    client.get(url).send().await
}

fn mask(key: Option<&str>) -> String {
    match key.map(str::trim) {
        Some(k) if k.chars().count() > 4 => format!("{}…", k.chars().take(4).collect::<String>()),
        Some(k) if !k.is_empty() => "****".to_string(),
        _ => "(not set)".to_string(),
    }
}
