use crate::error::ApiError;
use crate::models::dtos::{
    BatchApproveRequest, BatchApproveResponse, RejectWithdrawalRequest, WithdrawalDto,
};
use crate::models::AppState;
use crate::services::withdrawal_service::WithdrawalService;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/admin/withdrawals",
    responses(
        (status = 200, description = "Pending withdrawals, oldest first", body = [WithdrawalDto]),
        (status = 403, description = "Admin access required")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_pending_withdrawals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WithdrawalDto>>, (StatusCode, String)> {
    let mut conn = state.db.get().map_err(ApiError::from)?;
    let pending = WithdrawalService::list_pending(&mut conn)?;
    Ok(Json(pending.into_iter().map(WithdrawalDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/admin/withdrawals/{id}/approve",
    params(("id" = Uuid, Path, description = "Withdrawal id")),
    responses(
        (status = 200, description = "Transfer submitted", body = WithdrawalDto),
        (status = 400, description = "Withdrawal is not pending"),
        (status = 404, description = "Withdrawal not found"),
        (status = 502, description = "Processor rejected the transfer; withdrawal left pending")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn approve_withdrawal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WithdrawalDto>, (StatusCode, String)> {
    let withdrawal = WithdrawalService::approve(state, id).await?;
    Ok(Json(withdrawal))
}

#[utoipa::path(
    post,
    path = "/api/admin/withdrawals/{id}/reject",
    params(("id" = Uuid, Path, description = "Withdrawal id")),
    request_body = RejectWithdrawalRequest,
    responses(
        (status = 200, description = "Withdrawal rejected and refunded", body = WithdrawalDto),
        (status = 400, description = "Withdrawal is not pending"),
        (status = 404, description = "Withdrawal not found")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn reject_withdrawal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectWithdrawalRequest>,
) -> Result<Json<WithdrawalDto>, (StatusCode, String)> {
    req.validate().map_err(|e| ApiError::Validation(e.to_string()))?;
    let withdrawal = WithdrawalService::reject(state, id, &req.reason).await?;
    Ok(Json(withdrawal))
}

#[utoipa::path(
    post,
    path = "/api/admin/withdrawals/approve_batch",
    request_body = BatchApproveRequest,
    responses(
        (status = 200, description = "Per-item outcomes", body = BatchApproveResponse),
        (status = 403, description = "Admin access required")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn approve_withdrawal_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchApproveRequest>,
) -> Result<Json<BatchApproveResponse>, (StatusCode, String)> {
    if req.withdrawal_ids.is_empty() {
        return Err(ApiError::Validation("No withdrawal ids supplied".to_string()).into());
    }
    let response = WithdrawalService::approve_batch(state, req.withdrawal_ids).await?;
    Ok(Json(response))
}
