use store_hex::config::Config;
use store_hex::inbound::http::{AppState, HttpServer, HttpServerConfig};
use store_repo::{build_repo, Repo, DEFAULT_DATABASE_URL};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / SERVER_PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let config = Config::from_env()?;
    // Schema creation happens here; an unreachable database ends the process.
    let database_url = config
        .database_url
        .as_deref()
        .unwrap_or(DEFAULT_DATABASE_URL);
    let repo: Repo = build_repo(Some(database_url)).await?;
    tracing::info!(port = %config.server_port, "store api configured");

    let server_cfg = HttpServerConfig {
        host: config.server_host.clone(),
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(AppState::new(repo), server_cfg).await?;
    http.run().await
}
