//! Bearer-token extractor

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use mockncrack_core::auth::bearer_token;
use mockncrack_core::{Claims, Error};

use super::{error::ApiError, AppState};

/// Authenticated caller, taken from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| state.fail(Error::unauthorized("Missing authorization header")))?;

        let claims = state.keys.verify_token(token).map_err(|e| {
            log::debug!("[api:auth] Token rejected: {}", e);
            state.fail(e)
        })?;

        Ok(AuthUser(claims))
    }
}
