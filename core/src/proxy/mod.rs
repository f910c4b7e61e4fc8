//! Proxy module - route table, request building, and the HTTP server

pub mod route;
pub mod credentials;
pub mod descriptor;
pub mod upstream;
pub mod server;

pub use credentials::UpstreamCredentials;
pub use descriptor::UpstreamRequest;
pub use route::{RouteSpec, ROUTES};
pub use server::{build_router, AppState, ProxyServer, UpstreamSettings};
pub use upstream::client::UpstreamClient;
