use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Upstream catalog request failed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Bad command-line value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<fpcomm_service::CacheError> for CliError {
    fn from(e: fpcomm_service::CacheError) -> Self {
        match e {
            fpcomm_service::CacheError::Upstream(e) => Self::catalog(e.to_string()),
            fpcomm_service::CacheError::Db(e) => Self::database(e.to_string()),
            not_found @ fpcomm_service::CacheError::NotFound { .. } => {
                Self::invalid_argument(not_found.to_string())
            }
        }
    }
}
