//! Authentication module - identity token issue and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{Error, Result};
use crate::models::Claims;
use crate::services::credentials::ApiKey;

pub const DEFAULT_TOKEN_EXPIRY_DAYS: i64 = 7;

/// HS256 signing keys derived from the shared secret
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &ApiKey) -> Self {
        let bytes = secret.expose().as_bytes();
        if bytes.len() < 32 {
            log::warn!("[auth] JWT secret is shorter than 32 characters. Consider using a longer secret.");
        }
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Create a token identifying `user_id`, valid for `days`
    pub fn create_token(&self, user_id: &str, email: Option<&str>, days: i64) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(days))
            .ok_or_else(|| Error::internal("Token expiry out of range"))?
            .timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            exp: expiration,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        if token_data.claims.sub.trim().is_empty() {
            return Err(Error::unauthorized("Token has no subject"));
        }
        Ok(token_data.claims)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new(&ApiKey::new("test-secret-that-is-long-enough-1234567"))
    }

    #[test]
    fn test_create_and_verify() {
        let keys = keys();
        let token = keys.create_token("user-123", Some("a@b.c"), 7).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = keys.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.email.as_deref(), Some("a@b.c"));
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = keys().create_token("user-123", None, 7).unwrap();
        let other = JwtKeys::new(&ApiKey::new("a-completely-different-secret-value-xyz"));
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = keys().create_token("user-123", None, -2).unwrap();
        assert!(keys().verify_token(&token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(keys().verify_token("not-a-jwt").is_err());
        assert!(keys().verify_token("").is_err());
    }

    #[test]
    fn test_empty_subject_rejected() {
        let token = keys().create_token("  ", None, 7).unwrap();
        assert!(matches!(
            keys().verify_token(&token),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer   tok"), Some("tok"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
