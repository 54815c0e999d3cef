//! Question storage layer
//!
//! Persists the per-topic question bank in SQLite. Records are never deleted;
//! only the `used` flag changes.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{QuestionRecord, TopicStats};

// ============================================================================
// Store Trait
// ============================================================================

/// Question bank operations used by the sourcing orchestrator
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// At most one unused record for the topic, arbitrary tie-break
    async fn fetch_unused(&self, topic: &str) -> Result<Option<QuestionRecord>>;

    /// Set `used = true`; idempotent
    async fn mark_used(&self, id: &str) -> Result<()>;

    /// Flip one unused record to used and return it, in a single statement.
    /// Two concurrent callers never receive the same record.
    async fn claim_unused(&self, topic: &str) -> Result<Option<QuestionRecord>>;

    /// Create a new record
    async fn insert(&self, topic: &str, question: &str, used: bool) -> Result<QuestionRecord>;

    /// Set `used = false` on every used record of the topic; returns how many flipped.
    /// Zero when the topic has no records at all.
    async fn reset_topic(&self, topic: &str) -> Result<u64>;

    /// All question texts stored for a topic
    async fn list_questions(&self, topic: &str) -> Result<Vec<String>>;

    /// Per-topic totals
    async fn topic_stats(&self) -> Result<Vec<TopicStats>>;
}

// ============================================================================
// SqliteQuestionStore
// ============================================================================

/// SQLite implementation of [`QuestionStore`]
#[derive(Clone)]
pub struct SqliteQuestionStore {
    pool: SqlitePool,
}

impl SqliteQuestionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionStore for SqliteQuestionStore {
    async fn fetch_unused(&self, topic: &str) -> Result<Option<QuestionRecord>> {
        let record = sqlx::query_as::<_, QuestionRecord>(
            "SELECT id, topic, question, used FROM technical_questions WHERE topic = ? AND used = 0 LIMIT 1",
        )
        .bind(topic)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn mark_used(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE technical_questions SET used = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn claim_unused(&self, topic: &str) -> Result<Option<QuestionRecord>> {
        // SQLite serialises writers, so the subselect and the flip happen under
        // one write lock; the `used = 0` guard keeps the claim conditional.
        let record = sqlx::query_as::<_, QuestionRecord>(
            r#"
            UPDATE technical_questions
            SET used = 1
            WHERE id = (
                SELECT id FROM technical_questions
                WHERE topic = ? AND used = 0
                LIMIT 1
            )
            AND used = 0
            RETURNING id, topic, question, used
            "#,
        )
        .bind(topic)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(ref r) = record {
            log::debug!("[questions:store] Claimed question {} for topic '{}'", r.id, topic);
        }

        Ok(record)
    }

    async fn insert(&self, topic: &str, question: &str, used: bool) -> Result<QuestionRecord> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO technical_questions (id, topic, question, used, created_at)
            VALUES (?, ?, ?, ?, datetime('now'))
            "#,
        )
        .bind(&id)
        .bind(topic)
        .bind(question)
        .bind(used)
        .execute(&self.pool)
        .await?;

        log::debug!("[questions:store] Inserted question {} for topic '{}'", id, topic);

        Ok(QuestionRecord {
            id,
            topic: topic.to_string(),
            question: question.to_string(),
            used,
        })
    }

    async fn reset_topic(&self, topic: &str) -> Result<u64> {
        let result =
            sqlx::query("UPDATE technical_questions SET used = 0 WHERE topic = ? AND used = 1")
                .bind(topic)
                .execute(&self.pool)
                .await?;

        let count = result.rows_affected();
        log::info!("[questions:store] Reset {} questions for topic '{}'", count, topic);

        Ok(count)
    }

    async fn list_questions(&self, topic: &str) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT question FROM technical_questions WHERE topic = ?")
                .bind(topic)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn topic_stats(&self) -> Result<Vec<TopicStats>> {
        let stats = sqlx::query_as::<_, TopicStats>(
            r#"
            SELECT topic,
                   COUNT(*) AS total,
                   SUM(CASE WHEN used THEN 1 ELSE 0 END) AS used
            FROM technical_questions
            GROUP BY topic
            ORDER BY topic
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::collections::HashSet;
    use tempfile::TempDir;

    async fn create_store() -> (SqliteQuestionStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = Database::open(temp_dir.path().join("test.db"))
            .await
            .expect("Failed to create test database");
        (SqliteQuestionStore::new(db.pool), temp_dir)
    }

    #[tokio::test]
    async fn test_fetch_unused_empty_topic() {
        let (store, _dir) = create_store().await;
        assert!(store.fetch_unused("python").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_unused_skips_used_and_other_topics() {
        let (store, _dir) = create_store().await;
        store.insert("python", "used one", true).await.unwrap();
        store.insert("Python", "other case", false).await.unwrap();
        let fresh = store.insert("python", "fresh one", false).await.unwrap();

        let found = store.fetch_unused("python").await.unwrap().unwrap();
        assert_eq!(found, fresh);
    }

    #[tokio::test]
    async fn test_mark_used_is_idempotent() {
        let (store, _dir) = create_store().await;
        let record = store.insert("python", "q", false).await.unwrap();

        store.mark_used(&record.id).await.unwrap();
        store.mark_used(&record.id).await.unwrap();
        assert!(store.fetch_unused("python").await.unwrap().is_none());

        // Unknown ids are a no-op
        store.mark_used("missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_claim_unused_flips_flag() {
        let (store, _dir) = create_store().await;
        store.insert("python", "q1", false).await.unwrap();

        let claimed = store.claim_unused("python").await.unwrap().unwrap();
        assert_eq!(claimed.question, "q1");
        assert!(claimed.used);
        assert!(store.claim_unused("python").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_claims_never_duplicate() {
        let (store, _dir) = create_store().await;
        for i in 0..5 {
            store
                .insert("python", &format!("question {}", i), false)
                .await
                .unwrap();
        }

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.claim_unused("python").await.unwrap()
            }));
        }

        let mut claimed = Vec::new();
        for handle in handles {
            if let Some(record) = handle.await.unwrap() {
                claimed.push(record.id);
            }
        }

        let unique: HashSet<_> = claimed.iter().collect();
        assert_eq!(claimed.len(), 5);
        assert_eq!(unique.len(), 5);
    }

    #[tokio::test]
    async fn test_reset_topic_counts() {
        let (store, _dir) = create_store().await;
        assert_eq!(store.reset_topic("python").await.unwrap(), 0);

        store.insert("python", "a", true).await.unwrap();
        store.insert("python", "b", true).await.unwrap();
        store.insert("python", "c", false).await.unwrap();
        store.insert("rust", "d", true).await.unwrap();

        assert_eq!(store.reset_topic("python").await.unwrap(), 2);
        assert_eq!(store.reset_topic("python").await.unwrap(), 0);

        let stats = store.topic_stats().await.unwrap();
        let python = stats.iter().find(|s| s.topic == "python").unwrap();
        assert_eq!((python.total, python.used), (3, 0));
        let rust = stats.iter().find(|s| s.topic == "rust").unwrap();
        assert_eq!((rust.total, rust.used), (1, 1));
    }

    #[tokio::test]
    async fn test_list_questions() {
        let (store, _dir) = create_store().await;
        store.insert("python", "a", true).await.unwrap();
        store.insert("python", "b", false).await.unwrap();

        let mut questions = store.list_questions("python").await.unwrap();
        questions.sort();
        assert_eq!(questions, vec!["a".to_string(), "b".to_string()]);
        assert!(store.list_questions("go").await.unwrap().is_empty());
    }
}
