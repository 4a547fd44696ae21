//! cinedb - movie-industry database administration

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cine_admin::Cli;
use cine_config::AppConfig;
use cine_db::{DbClient, Repository};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    cine_obs::init("cinedb", config.log_format(), &config.log_filter());

    let database_url = cli.database.unwrap_or_else(|| config.database_url());
    let client = DbClient::connect(&database_url, config.max_connections())
        .await
        .with_context(|| format!("Failed to connect to {}", database_url))?;
    client.ping().await.context("Database ping failed")?;
    info!(%database_url, "Connected to database");

    let repo = Repository::new(client);
    let mut stdout = std::io::stdout();
    let result = cine_admin::run(&repo, &cli.command, &mut stdout).await;

    repo.into_inner().close().await;
    result
}
