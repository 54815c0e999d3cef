//! Secret redaction for the log sink
//!
//! Applied to every formatted log line, whatever its level.

use regex::Regex;
use std::sync::OnceLock;

pub const REDACTED: &str = "[REDACTED]";

fn google_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"AIza[0-9A-Za-z_\-]{35}").expect("valid key pattern"))
}

/// Replaces known secrets and key-shaped strings with [`REDACTED`]
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    secrets: Vec<String>,
}

impl Redactor {
    pub fn new<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut secrets: Vec<String> = secrets
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.is_empty())
            .collect();
        // Longest first so a secret containing another is removed whole
        secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));
        secrets.dedup();
        Self { secrets }
    }

    pub fn redact(&self, line: &str) -> String {
        let mut out = line.to_string();
        for secret in &self.secrets {
            if out.contains(secret.as_str()) {
                out = out.replace(secret.as_str(), REDACTED);
            }
        }
        google_key_pattern().replace_all(&out, REDACTED).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_configured_secrets() {
        let redactor = Redactor::new(["super-secret-key", "jwt-secret-value"]);
        let line = "calling with super-secret-key and jwt-secret-value twice super-secret-key";
        let out = redactor.redact(line);
        assert!(!out.contains("super-secret-key"));
        assert!(!out.contains("jwt-secret-value"));
        assert_eq!(out.matches(REDACTED).count(), 3);
    }

    #[test]
    fn test_redacts_google_key_shape() {
        let redactor = Redactor::default();
        let key = format!("AIza{}", "A".repeat(35));
        let out = redactor.redact(&format!("url?key={}&x=1", key));
        assert_eq!(out, format!("url?key={}&x=1", REDACTED));
    }

    #[test]
    fn test_overlapping_secrets_longest_first() {
        let redactor = Redactor::new(["abcd", "abcdefgh"]);
        assert_eq!(redactor.redact("x abcdefgh y"), format!("x {} y", REDACTED));
    }

    #[test]
    fn test_short_secrets_still_redacted() {
        let redactor = Redactor::new(["k9"]);
        assert_eq!(redactor.redact("key=k9"), format!("key={}", REDACTED));
    }

    #[test]
    fn test_empty_secret_ignored() {
        let redactor = Redactor::new([""]);
        assert_eq!(redactor.redact("nothing here"), "nothing here");
    }
}
