//! Token balance endpoint

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use mockncrack_core::{Error, TokenLedger};

use super::{auth::AuthUser, error::ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub user_id: String,
    pub balance: i64,
}

/// `GET /api/tokens/balance`
pub async fn balance(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let balance = state
        .gate
        .ledger()
        .balance(user.user_id())
        .await
        .map_err(|e| state.fail(e))?
        .ok_or_else(|| state.fail(Error::unauthorized("Unknown account")))?;

    Ok(Json(BalanceResponse {
        user_id: user.0.sub,
        balance,
    }))
}
