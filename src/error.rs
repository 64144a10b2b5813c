//! Application error taxonomy.
//!
//! Every failure that leaves the persistence layer is one of four kinds.
//! Each kind has a fixed HTTP status affinity and a wire code, and carries
//! a message that is safe to show to a caller. Driver errors are kept as
//! the `source` for logging only.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The closed set of error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Database,
    Internal,
    BadRequest,
}

impl ErrorKind {
    /// HTTP status this kind renders as.
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Database | ErrorKind::Internal => 500,
            ErrorKind::BadRequest => 400,
        }
    }

    /// Machine-readable code used in the response envelope.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Database => "DATABASE_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
            ErrorKind::BadRequest => "BAD_REQUEST",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Classified application error.
#[derive(Error, Diagnostic, Debug)]
pub enum AppError {
    #[error("{message}")]
    #[diagnostic(code(taskstore::not_found))]
    NotFound {
        message: String,
        details: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(taskstore::database))]
    Database {
        message: String,
        details: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    #[diagnostic(code(taskstore::internal))]
    Internal {
        message: String,
        details: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    #[diagnostic(code(taskstore::bad_request))]
    BadRequest {
        message: String,
        details: Option<String>,
    },
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
            details: None,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        AppError::Database {
            message: message.into(),
            details: None,
            source: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
            details: None,
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    /// Attach diagnostic details (operation, target identity, field name).
    pub fn with_details(mut self, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match &mut self {
            AppError::NotFound { details, .. }
            | AppError::Database { details, .. }
            | AppError::Internal { details, .. }
            | AppError::BadRequest { details, .. } => *details = value,
        }
        self
    }

    /// Attach the underlying cause. Ignored for client-facing kinds.
    pub fn with_source<E>(mut self, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match &mut self {
            AppError::Database { source, .. } | AppError::Internal { source, .. } => {
                *source = Some(Box::new(err));
            }
            AppError::NotFound { .. } | AppError::BadRequest { .. } => {}
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Database { .. } => ErrorKind::Database,
            AppError::Internal { .. } => ErrorKind::Internal,
            AppError::BadRequest { .. } => ErrorKind::BadRequest,
        }
    }

    pub fn status(&self) -> u16 {
        self.kind().status()
    }

    /// The caller-safe message.
    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound { message, .. }
            | AppError::Database { message, .. }
            | AppError::Internal { message, .. }
            | AppError::BadRequest { message, .. } => message,
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            AppError::NotFound { details, .. }
            | AppError::Database { details, .. }
            | AppError::Internal { details, .. }
            | AppError::BadRequest { details, .. } => details.as_deref(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}

/// Result type for every repository and handler operation.
pub type AppResult<T> = Result<T, AppError>;
