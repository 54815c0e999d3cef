//! Question sourcing orchestrator
//!
//! Resolves exactly one question for a topic by running an ordered list of
//! strategies until one produces a question:
//!
//! ```text
//! StoredFetch ──miss──▶ Generate ──fail──▶ ResetAndRefetch ──miss──▶ FinalGenerate
//!      │                   │                     │                       │
//!      ▼                   ▼                     ▼                       ▼
//!   Stored             Generated              Recycled            FinalGenerated
//! ```
//!
//! Cheap reuse always comes first; generation only runs when the unused pool
//! is empty, and a generation failure never strands a topic that still has
//! used questions to recycle.

use std::sync::Arc;

use super::generator::QuestionGenerator;
use super::question_store::QuestionStore;
use crate::error::{Error, Result};
use crate::models::{QuestionOrigin, SourcedQuestion};

/// One strategy in the sourcing pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcingStep {
    StoredFetch,
    Generate,
    ResetAndRefetch,
    FinalGenerate,
}

impl SourcingStep {
    /// Pipeline order
    pub const PIPELINE: [SourcingStep; 4] = [
        SourcingStep::StoredFetch,
        SourcingStep::Generate,
        SourcingStep::ResetAndRefetch,
        SourcingStep::FinalGenerate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SourcingStep::StoredFetch => "stored_fetch",
            SourcingStep::Generate => "generate",
            SourcingStep::ResetAndRefetch => "reset_and_refetch",
            SourcingStep::FinalGenerate => "final_generate",
        }
    }
}

/// Result of running a single step
#[derive(Debug)]
pub enum StepOutcome {
    Served(SourcedQuestion),
    /// Nothing available for this step; move on
    Miss,
    /// The step failed; move on, remembering why
    Failed(Error),
}

/// Orchestrates the question store and the generator
#[derive(Clone)]
pub struct QuestionSourcer {
    store: Arc<dyn QuestionStore>,
    generator: Arc<dyn QuestionGenerator>,
}

impl QuestionSourcer {
    pub fn new(store: Arc<dyn QuestionStore>, generator: Arc<dyn QuestionGenerator>) -> Self {
        Self { store, generator }
    }

    /// Return exactly one question for `topic`.
    ///
    /// # Errors
    /// `Configuration` when generation was needed but no credentials exist,
    /// otherwise `SourcingFailed` once every step has been tried.
    pub async fn source_question(&self, topic: &str) -> Result<SourcedQuestion> {
        let mut last_failure: Option<Error> = None;

        for step in SourcingStep::PIPELINE {
            match self.run_step(step, topic).await {
                StepOutcome::Served(sourced) => {
                    log::info!(
                        "[sourcing] Served {} question for topic '{}' via {}",
                        sourced.origin,
                        topic,
                        step.name()
                    );
                    return Ok(sourced);
                }
                StepOutcome::Miss => {
                    log::debug!("[sourcing] {} found nothing for topic '{}'", step.name(), topic);
                }
                StepOutcome::Failed(e) => {
                    log::warn!(
                        "[sourcing] {} failed for topic '{}': {}",
                        step.name(),
                        topic,
                        e.code()
                    );
                    log::debug!("[sourcing] {} failure detail: {}", step.name(), e);
                    last_failure = Some(e);
                }
            }
        }

        match last_failure {
            Some(Error::Configuration(msg)) => Err(Error::Configuration(msg)),
            _ => Err(Error::SourcingFailed(topic.to_string())),
        }
    }

    async fn run_step(&self, step: SourcingStep, topic: &str) -> StepOutcome {
        match step {
            SourcingStep::StoredFetch => self.claim(topic, QuestionOrigin::Stored).await,
            SourcingStep::Generate => self.generate(topic, QuestionOrigin::Generated).await,
            SourcingStep::ResetAndRefetch => match self.store.reset_topic(topic).await {
                Ok(0) => StepOutcome::Miss,
                Ok(_) => self.claim(topic, QuestionOrigin::Recycled).await,
                Err(e) => StepOutcome::Failed(e),
            },
            SourcingStep::FinalGenerate => {
                self.generate(topic, QuestionOrigin::FinalGenerated).await
            }
        }
    }

    async fn claim(&self, topic: &str, origin: QuestionOrigin) -> StepOutcome {
        match self.store.claim_unused(topic).await {
            Ok(Some(record)) => StepOutcome::Served(SourcedQuestion {
                question: record.question,
                origin,
            }),
            Ok(None) => StepOutcome::Miss,
            Err(e) => StepOutcome::Failed(e),
        }
    }

    async fn generate(&self, topic: &str, origin: QuestionOrigin) -> StepOutcome {
        let question = match self.generator.generate(topic).await {
            Ok(q) => q,
            Err(e) => return StepOutcome::Failed(e),
        };

        // A failed insert loses reuse, not the question
        if let Err(e) = self.store.insert(topic, &question, true).await {
            log::warn!(
                "[sourcing] Could not store generated question for '{}': {}",
                topic,
                e.code()
            );
            log::debug!("[sourcing] Insert failure detail: {}", e);
        }

        StepOutcome::Served(SourcedQuestion { question, origin })
    }
}
