//! Provider credentials and the rotation cursor shared across requests

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An opaque secret. `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret, for request headers and the log redactor only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Ordered credential list with a wrapping cursor.
///
/// The cursor only moves forward on failure and is never reset. A credential
/// that keeps failing is retried on every cycle; nothing is ever evicted.
/// Concurrent failures may make the cursor skip or repeat a credential, which
/// only affects load spreading.
#[derive(Debug)]
pub struct CredentialRotator {
    keys: Vec<ApiKey>,
    cursor: AtomicUsize,
}

impl CredentialRotator {
    pub fn new(keys: Vec<ApiKey>) -> Self {
        Self::with_cursor(keys, 0)
    }

    /// Start at a given position (taken modulo the key count)
    pub fn with_cursor(keys: Vec<ApiKey>, start: usize) -> Self {
        let start = if keys.is_empty() { 0 } else { start % keys.len() };
        Self {
            keys,
            cursor: AtomicUsize::new(start),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }

    /// Credential at the current cursor, or `None` when nothing is configured
    pub fn next_credential(&self) -> Option<&ApiKey> {
        if self.keys.is_empty() {
            return None;
        }
        self.keys.get(self.cursor() % self.keys.len())
    }

    /// Move the cursor to `(cursor + 1) mod N`; returns the new position
    pub fn advance(&self) -> usize {
        let n = self.keys.len();
        if n == 0 {
            return 0;
        }
        let previous = self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| Some((c + 1) % n))
            .unwrap_or_else(|c| c);
        (previous + 1) % n
    }
}
