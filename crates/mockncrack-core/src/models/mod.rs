//! Data models for the MockNCrack question pipeline

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A stored technical question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QuestionRecord {
    pub id: String,
    /// Case-sensitive exact-match key
    pub topic: String,
    pub question: String,
    pub used: bool,
}

/// Per-topic counts of the question bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TopicStats {
    pub topic: String,
    pub total: i64,
    pub used: i64,
}

/// Where a served question came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionOrigin {
    /// Claimed from the unused pool
    Stored,
    /// Freshly generated and stored for reuse
    Generated,
    /// Claimed after the topic's used questions were reset
    Recycled,
    /// Generated on the final fallback attempt
    FinalGenerated,
}

impl fmt::Display for QuestionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionOrigin::Stored => write!(f, "stored"),
            QuestionOrigin::Generated => write!(f, "generated"),
            QuestionOrigin::Recycled => write!(f, "recycled"),
            QuestionOrigin::FinalGenerated => write!(f, "final_generated"),
        }
    }
}

/// Result of the sourcing orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedQuestion {
    pub question: String,
    pub origin: QuestionOrigin,
}

/// Successful gate response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServedQuestion {
    pub question: String,
    pub new_balance: i64,
    pub tokens_used: i64,
}

/// Identity token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Ledger user id
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
}

/// Ledger row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub user_id: String,
    pub email: Option<String>,
    pub token_balance: i64,
}

/// Outcome of loading the sample question bank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedResult {
    pub inserted: usize,
    pub skipped: usize,
}
