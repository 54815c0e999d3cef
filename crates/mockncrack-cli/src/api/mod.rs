//! API module - Axum routes

pub mod auth;
pub mod error;
pub mod questions;
pub mod tokens;

use std::time::Instant;

use axum::{
    extract::Request,
    http::{header, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use mockncrack_core::auth::JwtKeys;
use mockncrack_core::{Error, OperatingMode, TokenGate};

use self::error::ApiError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub gate: TokenGate,
    pub keys: JwtKeys,
    pub mode: OperatingMode,
}

impl AppState {
    pub fn new(gate: TokenGate, keys: JwtKeys, mode: OperatingMode) -> Self {
        Self { gate, keys, mode }
    }

    /// Wrap a core error for the response, carrying the operating mode
    pub fn fail(&self, error: Error) -> ApiError {
        ApiError::new(error, self.mode)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let api = Router::new()
        .route("/generate-question", post(questions::generate_question))
        .route("/tokens/balance", get(tokens::balance))
        .route("/health", get(health));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: mockncrack_core::version(),
    })
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    log::info!(
        "[api] {} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use mockncrack_core::auth::JwtKeys;
    use mockncrack_core::{
        ApiKey, Database, Error, OperatingMode, QuestionGenerator, QuestionSourcer,
        SqliteQuestionStore, SqliteTokenLedger, TokenGate,
    };

    use super::{create_router, AppState};

    pub const SECRET: &str = "api-test-secret-that-is-long-enough-42";

    /// Generator that succeeds or fails on every call
    pub struct StubGenerator {
        pub succeed: bool,
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl QuestionGenerator for StubGenerator {
        async fn generate(&self, topic: &str) -> mockncrack_core::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(format!("What is the hardest part of {}?", topic))
            } else {
                Err(Error::GenerationExhausted { attempts: 1 })
            }
        }
    }

    pub struct TestApp {
        pub state: AppState,
        pub store: SqliteQuestionStore,
        pub ledger: SqliteTokenLedger,
        pub generator: Arc<StubGenerator>,
        _dir: TempDir,
    }

    impl TestApp {
        pub async fn new(mode: OperatingMode, succeed: bool) -> Self {
            let dir = TempDir::new().unwrap();
            let db = Database::open(dir.path().join("api.db")).await.unwrap();
            let store = SqliteQuestionStore::new(db.pool.clone());
            let ledger = SqliteTokenLedger::new(db.pool.clone());
            let generator = Arc::new(StubGenerator {
                succeed,
                calls: AtomicUsize::new(0),
            });

            let sourcer = QuestionSourcer::new(Arc::new(store.clone()), generator.clone());
            let gate = TokenGate::new(Arc::new(ledger.clone()), sourcer);
            let keys = JwtKeys::new(&ApiKey::new(SECRET));

            Self {
                state: AppState::new(gate, keys, mode),
                store,
                ledger,
                generator,
                _dir: dir,
            }
        }

        pub fn bearer(&self, user_id: &str) -> String {
            let token = self.state.keys.create_token(user_id, None, 1).unwrap();
            format!("Bearer {}", token)
        }

        /// Send a request and return status plus parsed JSON body
        pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
            let response = create_router(self.state.clone())
                .oneshot(request)
                .await
                .unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = if bytes.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, body)
        }
    }
}
