//! Runtime configuration.
//!
//! Every setting is a command-line flag with an environment-variable
//! fallback, so the same binary runs from a shell or a container.

use std::net::IpAddr;
use std::time::Duration;

use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL is required")]
    #[diagnostic(code(taskstore::config::database_url))]
    MissingDatabaseUrl,

    #[error("DB_MAX_CONNECTIONS must be at least 1")]
    #[diagnostic(code(taskstore::config::max_connections))]
    NoConnections,

    #[error("REQUEST_TIMEOUT_SECS must be at least 1")]
    #[diagnostic(code(taskstore::config::request_timeout))]
    NoTimeout,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "taskstore-api")]
#[command(author, version, about = "Task store API server", long_about = None)]
pub struct Config {
    /// Deployment environment (dev, prod)
    #[arg(long = "env", env = "ENV", default_value = "dev")]
    pub environment: String,

    /// Host address to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://taskstore.db")]
    pub database_url: String,

    /// Upper bound on pooled database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Deadline applied to every request's storage work
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        if self.max_connections == 0 {
            return Err(ConfigError::NoConnections);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::NoTimeout);
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == "dev"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "prod"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
