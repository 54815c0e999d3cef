//! # mockncrack-core
//!
//! Question supply pipeline for MockNCrack - shared between the API server and the CLI.
//!
//! This crate provides:
//! - Database operations (`db` module)
//! - Data models (`models` module)
//! - Question sourcing, generation and the token ledger (`services` module)
//! - Identity tokens (`auth` module)
//! - Environment configuration (`config` module)
//! - Log-line secret redaction (`redact` module)
//! - Unified error handling (`error` module)

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod redact;
pub mod services;

// Re-exports for convenience
pub use config::{OperatingMode, ServiceConfig};
pub use db::Database;
pub use error::{Error, Result};

pub use models::{
    Account, Claims, QuestionOrigin, QuestionRecord, SeedResult, ServedQuestion, SourcedQuestion,
    TopicStats,
};

pub use services::{
    seed_questions, validate_topic, ApiKey, CredentialRotator, GeminiQuestionGenerator,
    QuestionGenerator, QuestionSourcer, QuestionStore, SqliteQuestionStore, SqliteTokenLedger,
    TokenGate, TokenLedger,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
