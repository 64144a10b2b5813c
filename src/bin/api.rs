//! Task store API server binary.
//!
//! Owns the process lifecycle: parse configuration, open and migrate the
//! database, serve until shutdown, then close the pool.

use clap::Parser;
use miette::Diagnostic;
use taskstore::api::{self, ApiError};
use taskstore::config::{Config, ConfigError};
use taskstore::db::SqliteDatabase;
use taskstore::error::AppError;
use thiserror::Error;
use tracing::info;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(taskstore::binary::config))]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    #[diagnostic(code(taskstore::binary::database))]
    Database(#[from] AppError),

    #[error("API server error: {0}")]
    #[diagnostic(code(taskstore::binary::api))]
    Api(#[from] ApiError),
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    run().await.map_err(miette::Report::new)
}

async fn run() -> Result<(), BinaryError> {
    let config = Config::parse();
    config.validate()?;
    api::init_tracing(&config);

    info!(url = %config.database_url, "Opening database");
    let db = SqliteDatabase::connect(&config.database_url, config.max_connections).await?;

    // Run migrations before starting the server
    db.migrate().await?;

    let served = api::run(&config, &db).await;
    db.close().await;
    served?;

    Ok(())
}
