use clap::Parser;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = cli.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("tmdb_proxy={}", level).parse()?)
                .add_directive(format!("tmdb_proxy_core={}", level).parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    match cli.command {
        Commands::Start { port, host } => {
            cli::commands::start::run(cli.config, port, host).await?;
        }
        Commands::Routes => {
            cli::commands::routes::run();
        }
        Commands::Status => {
            cli::commands::status::run(cli.config).await?;
        }
    }

    Ok(())
}
