pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tmdb-proxy")]
#[command(author, version, about = "Movie metadata proxy - forwards a fixed route table to TMDB")]
pub struct Cli {
    /// Path to config file (checked in order: local config.toml, ~/.config/tmdb-proxy/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for this program (RUST_LOG still applies)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Start {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the route table
    Routes,

    /// Show effective configuration and whether the server answers
    Status,
}
