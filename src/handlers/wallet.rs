use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::WalletResponse;
use crate::models::entities::{User, WalletTransaction};
use crate::models::AppState;
use crate::schema::users;
use crate::services::ledger_service::LedgerService;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;

const HISTORY_PAGE_SIZE: i64 = 50;

#[utoipa::path(
    get,
    path = "/api/wallet",
    responses(
        (status = 200, description = "Wallet balance and plan quotas", body = WalletResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<WalletResponse>, (StatusCode, String)> {
    let user_id = claims.user_id()?;
    let mut conn = state.db.get().map_err(ApiError::from)?;

    let user = users::table
        .find(user_id)
        .select(User::as_select())
        .first(&mut conn)
        .optional()
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::NotFound("User".to_string()))?;

    Ok(Json(WalletResponse {
        balance: user.wallet_balance,
        subscription_plan: user.subscription_plan,
        card_quota: user.subscription_plan.card_quota(),
        item_quota: user.subscription_plan.item_quota(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/wallet/transactions",
    responses(
        (status = 200, description = "Recent ledger entries, newest first", body = [WalletTransaction]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<WalletTransaction>>, (StatusCode, String)> {
    let user_id = claims.user_id()?;
    let mut conn = state.db.get().map_err(ApiError::from)?;
    let history = LedgerService::history(&mut conn, user_id, HISTORY_PAGE_SIZE)?;
    Ok(Json(history))
}
