//! Topic validation applied at the request boundary

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Maximum topic length in characters, after trimming
pub const MAX_TOPIC_CHARS: usize = 200;

fn injection_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        [
            r"(?i)ignore\s+(previous|all)\s+instructions",
            r"(?i)system\s*:",
            r"(?i)\[INST\]",
            r"<\|.*?\|>",
            r"(?i)###\s*System",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid injection pattern"))
        .collect()
    })
}

/// Validate a raw topic and return its trimmed form.
///
/// Rejects empty topics, topics longer than [`MAX_TOPIC_CHARS`] and topics
/// matching known prompt-injection patterns.
pub fn validate_topic(raw: &str) -> Result<String> {
    let topic = raw.trim();

    if topic.is_empty() {
        return Err(Error::invalid_input("Topic cannot be empty"));
    }

    if topic.chars().count() > MAX_TOPIC_CHARS {
        return Err(Error::invalid_input(format!(
            "Topic must be at most {} characters",
            MAX_TOPIC_CHARS
        )));
    }

    if injection_patterns().iter().any(|p| p.is_match(topic)) {
        log::warn!("[validation] Suspicious topic rejected");
        return Err(Error::invalid_input("Invalid topic format"));
    }

    Ok(topic.to_string())
}
