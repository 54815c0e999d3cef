//! Token ledger and the gate that charges for served questions
//!
//! The gate runs `Requested → BalanceChecked → Sourced → Debited → Served`.
//! Any failed transition ends the request; nothing is retried here.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::sourcing::QuestionSourcer;
use crate::error::{Error, Result};
use crate::models::{Account, ServedQuestion};

/// Tokens charged per served question
pub const TOKENS_PER_QUESTION: i64 = 1;

// ============================================================================
// Ledger Trait
// ============================================================================

/// Per-user token balances
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Current balance, `None` for an unknown user
    async fn balance(&self, user_id: &str) -> Result<Option<i64>>;

    /// Decrement by one only if the balance is at least one at that moment.
    /// Returns the new balance, or `None` when the condition did not hold.
    async fn try_debit(&self, user_id: &str) -> Result<Option<i64>>;

    /// Add `amount` tokens, creating the account if needed; returns the new balance
    async fn credit(&self, user_id: &str, amount: i64) -> Result<i64>;
}

// ============================================================================
// SqliteTokenLedger
// ============================================================================

/// SQLite implementation of [`TokenLedger`] over the `users` table
#[derive(Clone)]
pub struct SqliteTokenLedger {
    pool: SqlitePool,
}

impl SqliteTokenLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Full ledger row for a user
    pub async fn account(&self, user_id: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT user_id, email, token_balance FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}

#[async_trait]
impl TokenLedger for SqliteTokenLedger {
    async fn balance(&self, user_id: &str) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT token_balance FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.0))
    }

    async fn try_debit(&self, user_id: &str) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE users
            SET token_balance = token_balance - ?, updated_at = datetime('now')
            WHERE user_id = ? AND token_balance >= ?
            RETURNING token_balance
            "#,
        )
        .bind(TOKENS_PER_QUESTION)
        .bind(user_id)
        .bind(TOKENS_PER_QUESTION)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.0))
    }

    async fn credit(&self, user_id: &str, amount: i64) -> Result<i64> {
        if amount <= 0 {
            return Err(Error::invalid_input("Credit amount must be positive"));
        }

        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO users (user_id, token_balance, created_at, updated_at)
            VALUES (?, ?, datetime('now'), datetime('now'))
            ON CONFLICT(user_id) DO UPDATE
            SET token_balance = token_balance + excluded.token_balance,
                updated_at = datetime('now')
            RETURNING token_balance
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        log::info!("[ledger] Credited {} tokens to {}, balance now {}", amount, user_id, row.0);
        Ok(row.0)
    }
}

// ============================================================================
// TokenGate
// ============================================================================

/// Checks balance, sources a question, then charges for it
#[derive(Clone)]
pub struct TokenGate {
    ledger: Arc<dyn TokenLedger>,
    sourcer: QuestionSourcer,
}

impl TokenGate {
    pub fn new(ledger: Arc<dyn TokenLedger>, sourcer: QuestionSourcer) -> Self {
        Self { ledger, sourcer }
    }

    pub fn ledger(&self) -> &Arc<dyn TokenLedger> {
        &self.ledger
    }

    /// Serve one question to `user_id` for `topic`, charging one token.
    ///
    /// `topic` must already be validated. The debit is re-checked atomically
    /// after sourcing; if it fails the sourced question is not returned to
    /// the bank.
    pub async fn authorize_and_serve(&self, user_id: &str, topic: &str) -> Result<ServedQuestion> {
        // BalanceChecked
        let balance = self
            .ledger
            .balance(user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("Unknown account"))?;

        if balance < TOKENS_PER_QUESTION {
            log::info!("[ledger] {} has insufficient tokens ({})", user_id, balance);
            return Err(Error::InsufficientTokens { balance });
        }

        // Sourced
        let sourced = self.sourcer.source_question(topic).await?;

        // Debited
        let new_balance = match self.ledger.try_debit(user_id).await {
            Ok(Some(new_balance)) => new_balance,
            Ok(None) => {
                log::error!("[ledger] Debit refused for {} after sourcing", user_id);
                return Err(Error::TokenDebitFailed {
                    question: sourced.question,
                });
            }
            Err(e) => {
                log::error!("[ledger] Debit error for {}: {}", user_id, e.code());
                log::debug!("[ledger] Debit error detail: {}", e);
                return Err(Error::TokenDebitFailed {
                    question: sourced.question,
                });
            }
        };

        log::info!(
            "[ledger] Served {} question to {}, balance now {}",
            sourced.origin,
            user_id,
            new_balance
        );

        // Served
        Ok(ServedQuestion {
            question: sourced.question,
            new_balance,
            tokens_used: TOKENS_PER_QUESTION,
        })
    }
}
