//! BizTime server
//!
//! Reads `AppConfig` from `BIZTIME_CONFIG` and the environment, opens the
//! configured store and serves the API until SIGTERM or Ctrl+C.

use anyhow::Result;
use biztime::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let builder = ServerBuilder::new().with_cors(config.cors);
    let builder = match config.backend {
        Backend::Memory => {
            tracing::info!("Using in-memory store");
            builder.with_store(InMemoryStore::new())
        }
        Backend::Postgres => builder.with_store(open_postgres(&config.database).await?),
    };

    builder.serve(&config.bind).await
}

#[cfg(feature = "postgres")]
async fn open_postgres(database: &DatabaseConfig) -> Result<PostgresStore> {
    tracing::info!(database = %database.database_name(), "Connecting to Postgres");
    let store =
        PostgresStore::connect_with(database.connect_options()?, database.max_connections).await?;
    store.migrate().await?;
    Ok(store)
}

#[cfg(not(feature = "postgres"))]
async fn open_postgres(_database: &DatabaseConfig) -> Result<InMemoryStore> {
    anyhow::bail!("the postgres backend requires building with `--features postgres`")
}
