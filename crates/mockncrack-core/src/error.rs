//! Unified error handling for mockncrack-core

use thiserror::Error;

/// Core error type for mockncrack-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Insufficient tokens: balance is {balance}, at least 1 token is required")]
    InsufficientTokens { balance: i64 },

    #[error("All {attempts} generation credentials failed")]
    GenerationExhausted { attempts: usize },

    #[error("Could not source a question for topic '{0}'")]
    SourcingFailed(String),

    /// The question was already sourced (and consumed from the bank) when the
    /// conditional decrement refused. No rollback is performed.
    #[error("Token debit failed")]
    TokenDebitFailed { question: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for mockncrack-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Error::Unauthorized(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Stable machine-readable code carried in error responses
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Unauthorized(_) | Error::Jwt(_) => "UNAUTHORIZED",
            Error::InsufficientTokens { .. } => "INSUFFICIENT_TOKENS",
            Error::GenerationExhausted { .. } => "GENERATION_EXHAUSTED",
            Error::SourcingFailed(_) => "SOURCING_FAILED",
            Error::TokenDebitFailed { .. } => "TOKEN_DEBIT_FAILED",
            Error::Configuration(_) => "CONFIGURATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Database(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Http(_)
            | Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP-equivalent status code
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidInput(_) => 400,
            Error::Unauthorized(_) | Error::Jwt(_) => 401,
            Error::InsufficientTokens { .. } => 402,
            Error::NotFound(_) => 404,
            _ => 500,
        }
    }

    /// Whether the message is safe to show a client outside development mode
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
