//! HTTP boundary.
//!
//! Handlers translate requests into repository calls on the shared
//! [`Store`](crate::db::Store) and render every outcome, success or
//! failure, in the JSON envelope defined in [`response`].

mod response;
mod routes;
mod state;
pub mod v1;


use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::SqliteDatabase;

pub use response::{ApiResponse, ErrorInfo, ErrorResponse};
pub use routes::{ApiDoc, create_router};
pub use state::AppState;

#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(code(taskstore::api::bind))]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(taskstore::api::serve))]
    Serve(#[source] std::io::Error),
}

/// Default log filter for a given level, used when `RUST_LOG` is unset.
pub fn default_filter(level: &str) -> String {
    format!("taskstore={level},tower_http={level}")
}

/// Log output style for the deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogStyle {
    /// Colored output for terminals
    pub ansi: bool,
    /// Include the event's module path
    pub target: bool,
}

impl LogStyle {
    /// Colors in development; plain lines without module paths in production.
    pub fn for_config(config: &Config) -> Self {
        Self {
            ansi: config.is_development(),
            target: !config.is_production(),
        }
    }
}

/// Initialize tracing subscriber with env filter
pub fn init_tracing(config: &Config) {
    let style = LogStyle::for_config(config);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(&config.log_level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(style.ansi)
                .with_target(style.target),
        )
        .init();
}

/// Run the API server until Ctrl-C.
pub async fn run(config: &Config, db: &SqliteDatabase) -> Result<(), ApiError> {
    let state = AppState::new(db.store(), config.request_timeout());
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ApiError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(env = %config.environment, "API server listening on http://{}", addr);
    info!("API docs available at http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ApiError::Serve)?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
