//! Business logic services

pub mod credentials;
pub mod generator;
pub mod ledger;
pub mod question_store;
pub mod seed;
pub mod sourcing;
pub mod validation;

pub use credentials::{ApiKey, CredentialRotator};
pub use generator::{build_prompt, sanitize_question, GeminiQuestionGenerator, QuestionGenerator};
pub use ledger::{SqliteTokenLedger, TokenGate, TokenLedger, TOKENS_PER_QUESTION};
pub use question_store::{QuestionStore, SqliteQuestionStore};
pub use seed::{seed_from, seed_questions, SAMPLE_QUESTIONS};
pub use sourcing::{QuestionSourcer, SourcingStep, StepOutcome};
pub use validation::{validate_topic, MAX_TOPIC_CHARS};
