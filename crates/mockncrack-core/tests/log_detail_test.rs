//! Log hygiene tests: store and provider error detail must stay at `debug`.
//!
//! Installs a capturing logger at the production level (`info`) and drives
//! the pipeline through store, provider and ledger failures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use log::{Level, LevelFilter, Log, Metadata, Record};
use mockncrack_core::config::GeneratorConfig;
use mockncrack_core::models::{QuestionRecord, TopicStats};
use mockncrack_core::{
    ApiKey, Error, GeminiQuestionGenerator, QuestionGenerator, QuestionSourcer, QuestionStore,
    Result, TokenGate, TokenLedger,
};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Capturing logger
// ============================================================================

struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};
static INSTALL: Once = Once::new();

fn install_logger() {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Info);
    });
}

/// Captured lines at `info` and above
fn captured() -> Vec<(Level, String)> {
    LOGGER.records.lock().unwrap().clone()
}

fn assert_not_logged(marker: &str) {
    let leaked: Vec<_> = captured()
        .into_iter()
        .filter(|(_, line)| line.contains(marker))
        .collect();
    assert!(leaked.is_empty(), "detail reached the log: {:?}", leaked);
}

fn store_failure(marker: &str) -> Error {
    Error::Database(sqlx::Error::Protocol(format!(
        "{} table technical_questions at /var/db",
        marker
    )))
}

// ============================================================================
// Test doubles
// ============================================================================

/// Store where every operation fails with a detailed database error
struct BrokenStore {
    marker: &'static str,
}

#[async_trait]
impl QuestionStore for BrokenStore {
    async fn fetch_unused(&self, _topic: &str) -> Result<Option<QuestionRecord>> {
        Err(store_failure(self.marker))
    }

    async fn mark_used(&self, _id: &str) -> Result<()> {
        Err(store_failure(self.marker))
    }

    async fn claim_unused(&self, _topic: &str) -> Result<Option<QuestionRecord>> {
        Err(store_failure(self.marker))
    }

    async fn insert(&self, _topic: &str, _question: &str, _used: bool) -> Result<QuestionRecord> {
        Err(store_failure(self.marker))
    }

    async fn reset_topic(&self, _topic: &str) -> Result<u64> {
        Err(store_failure(self.marker))
    }

    async fn list_questions(&self, _topic: &str) -> Result<Vec<String>> {
        Err(store_failure(self.marker))
    }

    async fn topic_stats(&self) -> Result<Vec<TopicStats>> {
        Err(store_failure(self.marker))
    }
}

/// Generator that fails with provider detail, or succeeds
struct FixedGenerator {
    failure: Option<&'static str>,
    calls: AtomicUsize,
}

#[async_trait]
impl QuestionGenerator for FixedGenerator {
    async fn generate(&self, topic: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            Some(detail) => Err(Error::internal(format!("{} 403 body", detail))),
            None => Ok(format!("What is {}?", topic)),
        }
    }
}

/// Ledger with funds whose debit fails with a detailed database error
struct BrokenDebitLedger {
    marker: &'static str,
}

#[async_trait]
impl TokenLedger for BrokenDebitLedger {
    async fn balance(&self, _user_id: &str) -> Result<Option<i64>> {
        Ok(Some(5))
    }

    async fn try_debit(&self, _user_id: &str) -> Result<Option<i64>> {
        Err(store_failure(self.marker))
    }

    async fn credit(&self, _user_id: &str, amount: i64) -> Result<i64> {
        Ok(amount)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_sourcing_failures_log_codes_only() {
    install_logger();

    let generator = Arc::new(FixedGenerator {
        failure: Some("SOURCING-PROVIDER-DETAIL"),
        calls: AtomicUsize::new(0),
    });
    let sourcer = QuestionSourcer::new(
        Arc::new(BrokenStore {
            marker: "SOURCING-STORE-DETAIL",
        }),
        generator.clone(),
    );

    let err = sourcer.source_question("python").await.unwrap_err();
    assert!(matches!(err, Error::SourcingFailed(_)));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 2);

    assert_not_logged("SOURCING-STORE-DETAIL");
    assert_not_logged("SOURCING-PROVIDER-DETAIL");
    assert!(captured().iter().any(|(level, line)| {
        *level == Level::Warn
            && line.contains("stored_fetch failed for topic 'python'")
            && line.contains("INTERNAL_ERROR")
    }));
}

#[tokio::test]
async fn test_insert_and_debit_failures_log_codes_only() {
    install_logger();

    let sourcer = QuestionSourcer::new(
        Arc::new(BrokenStore {
            marker: "INSERT-STORE-DETAIL",
        }),
        Arc::new(FixedGenerator {
            failure: None,
            calls: AtomicUsize::new(0),
        }),
    );
    let gate = TokenGate::new(
        Arc::new(BrokenDebitLedger {
            marker: "DEBIT-LEDGER-DETAIL",
        }),
        sourcer,
    );

    let err = gate.authorize_and_serve("user-1", "rust").await.unwrap_err();
    assert!(matches!(err, Error::TokenDebitFailed { .. }));

    assert_not_logged("INSERT-STORE-DETAIL");
    assert_not_logged("DEBIT-LEDGER-DETAIL");
    assert!(captured()
        .iter()
        .any(|(level, line)| *level == Level::Error && line.contains("[ledger] Debit error")));
}

#[tokio::test]
async fn test_provider_error_body_not_logged() {
    install_logger();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("GEMINI-BODY-DETAIL quota"))
        .mount(&server)
        .await;

    let generator = GeminiQuestionGenerator::from_config(&GeneratorConfig {
        keys: vec![ApiKey::new("log-test-key")],
        model: "test-model".to_string(),
        base_url: server.uri(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = generator.generate("rust").await.unwrap_err();
    assert!(matches!(err, Error::GenerationExhausted { attempts: 1 }));

    assert_not_logged("GEMINI-BODY-DETAIL");
    assert_not_logged("API error 403");
}
