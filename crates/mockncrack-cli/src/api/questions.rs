//! Question endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use mockncrack_core::{validate_topic, Error};

use super::{auth::AuthUser, error::ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionRequest {
    pub topic: Option<String>,
}

/// `POST /api/generate-question`
///
/// The topic is validated before authentication is looked at, so a malformed
/// request is a 400 whether or not a token was sent.
pub async fn generate_question(
    State(state): State<AppState>,
    auth: Result<AuthUser, ApiError>,
    body: Result<Json<GenerateQuestionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let raw = body
        .ok()
        .and_then(|Json(req)| req.topic)
        .ok_or_else(|| state.fail(Error::invalid_input("Topic is required and must be a string")))?;

    let topic = validate_topic(&raw).map_err(|e| state.fail(e))?;
    let user = auth?;

    log::debug!("[api:questions] {} requested topic '{}'", user.user_id(), topic);

    let served = state
        .gate
        .authorize_and_serve(user.user_id(), &topic)
        .await
        .map_err(|e| state.fail(e))?;

    Ok(Json(served))
}
