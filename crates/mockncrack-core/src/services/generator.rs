//! Question generation via the Gemini `generateContent` API
//!
//! One call builds a fixed interviewer prompt around the topic and walks the
//! credential rotator: each failure (network, timeout, non-2xx, empty output)
//! advances the cursor and retries with the next key, until every configured
//! key has been tried once.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::credentials::{ApiKey, CredentialRotator};
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};

/// Generated text longer than this is cut; the prompt asks for under 20 words
pub const MAX_QUESTION_CHARS: usize = 300;

/// Produces one short interview question for a topic
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, topic: &str) -> Result<String>;
}

/// Build the fixed instruction prompt embedding the topic
pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"You are a senior technical interviewer.

Ask one clear, short, voice-friendly interview question about the topic: "{topic}".

Rules:
- Do not ask follow-up questions.
- Do not add explanations.
- Reply with exactly one short plain-text question (fewer than 20 words).

Examples:
- What is JSX in React?
- How does async/await work in JavaScript?
- What is normalization in a database?"#,
        topic = topic
    )
}

/// Reduce untrusted provider output to a single plain-text line.
///
/// Returns `None` when nothing usable is left.
pub fn sanitize_question(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let question: String = collapsed.chars().take(MAX_QUESTION_CHARS).collect();
    let question = question.trim().to_string();

    (!question.is_empty()).then_some(question)
}

// ============ Gemini API types ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

// ============ Generator ============

/// Gemini-backed [`QuestionGenerator`] with credential rotation
pub struct GeminiQuestionGenerator {
    client: reqwest::Client,
    rotator: Arc<CredentialRotator>,
    model: String,
    base_url: String,
}

impl GeminiQuestionGenerator {
    /// Build a generator sharing `rotator` with any other generator in the process
    pub fn new(config: &GeneratorConfig, rotator: Arc<CredentialRotator>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(5)))
            .build()?;

        Ok(Self {
            client,
            rotator,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a generator owning a fresh rotator over the configured keys
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let rotator = Arc::new(CredentialRotator::new(config.keys.clone()));
        Self::new(config, rotator)
    }

    pub fn rotator(&self) -> &Arc<CredentialRotator> {
        &self.rotator
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// One request with one credential
    async fn request_once(&self, key: &ApiKey, prompt: &str) -> std::result::Result<String, String> {
        let request = GenerateContentRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 100,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", key.expose())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    "Request timed out".to_string()
                } else {
                    format!("Request failed: {}", e.without_url())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::debug!(
                "[generator:gemini] Error body (first 200 chars): {}",
                body.chars().take(200).collect::<String>()
            );
            return Err(format!("API error {}", status));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e.without_url()))?;

        result
            .first_text()
            .and_then(sanitize_question)
            .ok_or_else(|| "No content generated".to_string())
    }
}

#[async_trait]
impl QuestionGenerator for GeminiQuestionGenerator {
    async fn generate(&self, topic: &str) -> Result<String> {
        let attempts = self.rotator.len();
        if attempts == 0 {
            return Err(Error::config("No generation provider keys configured"));
        }

        let prompt = build_prompt(topic);
        log::info!("[generator:gemini] Generating question for topic '{}'", topic);

        for _ in 0..attempts {
            let index = self.rotator.cursor();
            let Some(key) = self.rotator.next_credential() else {
                break;
            };

            log::debug!("[generator:gemini] Trying key {}/{}", index + 1, attempts);

            match self.request_once(key, &prompt).await {
                Ok(question) => {
                    log::info!("[generator:gemini] Question generated");
                    return Ok(question);
                }
                Err(e) => {
                    log::warn!("[generator:gemini] Key {} failed", index + 1);
                    log::debug!("[generator:gemini] Key {} failure detail: {}", index + 1, e);
                    self.rotator.advance();
                }
            }
        }

        log::error!("[generator:gemini] All {} keys exhausted", attempts);
        Err(Error::GenerationExhausted { attempts })
    }
}
