use crate::config::security_config::Claims;
use crate::models::dtos::{WithdrawRequest, WithdrawResponse, WithdrawalDto};
use crate::models::AppState;
use crate::services::withdrawal_service::WithdrawalService;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/withdrawals",
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Withdrawal requested and funds reserved", body = WithdrawResponse),
        (status = 400, description = "Invalid amount or insufficient balance"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Withdrawals"
)]
pub async fn request_withdrawal(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<WithdrawRequest>,
) -> Result<Json<WithdrawResponse>, (StatusCode, String)> {
    let user_id = claims.user_id()?;
    let response = WithdrawalService::request_withdrawal(state, user_id, req).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/withdrawals",
    responses(
        (status = 200, description = "The caller's withdrawals, newest first", body = [WithdrawalDto]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Withdrawals"
)]
pub async fn list_withdrawals(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<WithdrawalDto>>, (StatusCode, String)> {
    let user_id = claims.user_id()?;
    let mut conn = state.db.get().map_err(crate::error::ApiError::from)?;
    let withdrawals = WithdrawalService::list_for_user(&mut conn, user_id)?;
    Ok(Json(withdrawals.into_iter().map(WithdrawalDto::from).collect()))
}
